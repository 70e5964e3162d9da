//! Shopping cart state and its persisted JSON layout.
//!
//! The persisted form is a single JSON object keyed by product id:
//!
//! ```json
//! { "amplifier": { "id": "amplifier", "name": "Amplifier", "price": 1499, "qty": 2 } }
//! ```
//!
//! Lines keep insertion order both in memory and in the serialized object.
//! The in-memory invariant is that every line has `qty >= 1` and at most one
//! line exists per product id; decoding enforces the same shape.

use core::fmt;

use rust_decimal::Decimal;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;

/// One product's accumulated quantity and snapshot price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    /// Product name captured when the line was created.
    pub name: String,
    /// Unit price captured when the line was created.
    #[serde(with = "json_number")]
    pub price: Decimal,
    pub qty: u32,
}

/// Prices persist as bare JSON numbers; quoted or non-numeric values are
/// rejected rather than coerced.
mod json_number {
    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let number = serde_json::Number::deserialize(deserializer)?;
        if let Some(int) = number.as_i64() {
            return Ok(Decimal::from(int));
        }
        if let Some(int) = number.as_u64() {
            return Ok(Decimal::from(int));
        }
        number
            .as_f64()
            .and_then(|float| Decimal::try_from(float).ok())
            .ok_or_else(|| D::Error::custom(format!("price {number} is out of range")))
    }
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

/// The shopper's cart: product id to [`CartLine`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Decode the persisted JSON blob.
    ///
    /// # Errors
    ///
    /// Returns an error when the blob is not a JSON object of well-formed
    /// cart lines. Callers that must never fail should fall back to
    /// [`Cart::default`].
    pub fn from_json(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob)
    }

    /// Encode the cart into its persisted JSON blob.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id.as_str() == id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add `qty` units of a product, creating the line on first add.
    ///
    /// The name and price snapshot are taken only when the line is created.
    /// A zero `qty` never creates a line.
    pub fn add(&mut self, id: ProductId, name: impl Into<String>, price: Decimal, qty: u32) {
        if qty == 0 {
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.qty = line.qty.saturating_add(qty);
            return;
        }

        self.lines.push(CartLine {
            id,
            name: name.into(),
            price,
            qty,
        });
    }

    /// Change a line's quantity by `delta`, deleting it at zero or below.
    ///
    /// Returns `false` when no line exists for `id`.
    pub fn adjust_qty(&mut self, id: &str, delta: i64) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };

        let current = self.lines.get(position).map_or(0, |line| i64::from(line.qty));
        let next = current.saturating_add(delta);
        if next <= 0 {
            self.lines.remove(position);
        } else if let Some(line) = self.lines.get_mut(position) {
            line.qty = u32::try_from(next).unwrap_or(u32::MAX);
        }
        true
    }

    /// Delete a line. Returns `false` when no line exists for `id`.
    pub fn remove(&mut self, id: &str) -> bool {
        self.position(id).is_some_and(|position| {
            self.lines.remove(position);
            true
        })
    }

    /// Sum of `price * qty` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.qty)).sum()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.id.as_str() == id)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.lines.iter().map(|line| (&line.id, line)))
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CartVisitor)
    }
}

struct CartVisitor;

impl<'de> Visitor<'de> for CartVisitor {
    type Value = Cart;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of product id to cart line")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut lines: Vec<CartLine> = Vec::with_capacity(access.size_hint().unwrap_or(0));

        while let Some((key, line)) = access.next_entry::<String, CartLine>()? {
            if line.id.as_str() != key {
                return Err(de::Error::custom(format!(
                    "cart key {key:?} does not match line id {:?}",
                    line.id.as_str()
                )));
            }
            if lines.iter().any(|existing| existing.id == line.id) {
                return Err(de::Error::custom(format!("duplicate cart line {key:?}")));
            }
            // Zero-quantity lines cannot exist; drop them rather than reject the cart.
            if line.qty > 0 {
                lines.push(line);
            }
        }

        Ok(Cart { lines })
    }
}
