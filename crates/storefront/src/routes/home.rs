//! Home page route handlers: hero carousel, featured strip and catalog.

use std::time::Duration;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::products::{CatalogView, PageContext, ProductCardView};
use super::{Chrome, cart_store, chrome};
use crate::carousel::Carousel;
use crate::filters;
use crate::state::AppState;

// =============================================================================
// Hero Configuration (Static content for carousel)
// =============================================================================

/// A single slide in the hero carousel.
#[derive(Clone)]
pub struct HeroSlide {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub image_path: String,
    pub image_alt: String,
}

/// Hero carousel configuration.
#[derive(Clone)]
pub struct HeroConfig {
    pub slides: Vec<HeroSlide>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            slides: vec![
                HeroSlide {
                    title: Some("Crafted in Small Batches".to_string()),
                    subtitle: Some(
                        "Attars and parfums blended by hand, aged until they settle.".to_string(),
                    ),
                    button_text: Some("Shop Fragrance".to_string()),
                    button_url: Some("/category/fragrance".to_string()),
                    image_path: "/static/images/hero/hero-atelier.svg".to_string(),
                    image_alt: "Perfume bottles on a workbench".to_string(),
                },
                HeroSlide {
                    title: Some("Mythical Seduction".to_string()),
                    subtitle: None,
                    button_text: Some("Discover".to_string()),
                    button_url: Some("/products/mythical-seduction".to_string()),
                    image_path: "/static/images/hero/hero-seduction.svg".to_string(),
                    image_alt: "Mythical Seduction eau de parfum".to_string(),
                },
                HeroSlide {
                    title: None,
                    subtitle: None,
                    button_text: Some("Explore the Collection".to_string()),
                    button_url: Some("/products".to_string()),
                    image_path: "/static/images/hero/hero-collection.svg".to_string(),
                    image_alt: "The full Attar collection".to_string(),
                },
            ],
        }
    }
}

// =============================================================================
// Carousel View
// =============================================================================

/// One slide as rendered.
#[derive(Clone)]
pub struct SlideView {
    pub index: usize,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub image_path: String,
    pub image_alt: String,
    pub is_active: bool,
}

/// Carousel display data for templates.
#[derive(Clone)]
pub struct CarouselView {
    pub slides: Vec<SlideView>,
    pub prev_index: usize,
    pub next_index: usize,
    /// Poll interval for auto-advance.
    pub autoplay_ms: u128,
}

impl CarouselView {
    /// Render `carousel`'s position over the hero slides.
    #[must_use]
    pub fn new(hero: &HeroConfig, carousel: Carousel, autoplay: Duration) -> Self {
        let slides = hero
            .slides
            .iter()
            .enumerate()
            .map(|(index, slide)| SlideView {
                index,
                title: slide.title.clone(),
                subtitle: slide.subtitle.clone(),
                button_text: slide.button_text.clone(),
                button_url: slide.button_url.clone(),
                image_path: slide.image_path.clone(),
                image_alt: slide.image_alt.clone(),
                is_active: index == carousel.index(),
            })
            .collect();

        Self {
            slides,
            prev_index: carousel.prev_index(),
            next_index: carousel.next_index(),
            autoplay_ms: autoplay.as_millis(),
        }
    }

    fn for_state(state: &AppState, index: usize) -> Self {
        Self::new(
            state.hero(),
            state.carousel_at(index),
            state.ui().carousel_autoplay,
        )
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Number of products in the home page thumbnail strip.
const FEATURED_COUNT: usize = 4;

/// Home page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub slide: Option<usize>,
    pub filter: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: Chrome,
    pub carousel: CarouselView,
    /// Thumbnail strip with quick add buttons.
    pub featured: Vec<ProductCardView>,
    pub catalog: CatalogView,
}

/// Carousel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/carousel.html")]
pub struct CarouselTemplate {
    pub carousel: CarouselView,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HomeQuery>,
) -> HomeTemplate {
    let store = cart_store(&state, session);
    let context = PageContext::new(query.filter, None);

    HomeTemplate {
        chrome: chrome(&state, &store).await,
        carousel: CarouselView::for_state(&state, query.slide.unwrap_or(0)),
        featured: state
            .catalog()
            .featured(FEATURED_COUNT)
            .into_iter()
            .map(ProductCardView::from)
            .collect(),
        catalog: CatalogView::new(state.catalog(), &context),
    }
}

/// Carousel positioned at a slide (HTMX).
///
/// Serves manual navigation and the auto-advance poll alike.
pub async fn carousel(State(state): State<AppState>, Path(index): Path<usize>) -> CarouselTemplate {
    CarouselTemplate {
        carousel: CarouselView::for_state(&state, index),
    }
}

/// Liveness health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const AUTOPLAY: Duration = Duration::from_millis(5000);

    #[test]
    fn test_carousel_view_marks_active_slide() {
        let hero = HeroConfig::default();
        let view = CarouselView::new(&hero, Carousel::at(hero.slides.len(), 1), AUTOPLAY);

        let active: Vec<usize> = view
            .slides
            .iter()
            .filter(|s| s.is_active)
            .map(|s| s.index)
            .collect();
        assert_eq!(active, vec![1]);
        assert_eq!(view.prev_index, 0);
        assert_eq!(view.next_index, 2);
        assert_eq!(view.autoplay_ms, 5000);
    }

    #[test]
    fn test_default_slide_images_are_shipped() {
        let static_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("static");
        for slide in HeroConfig::default().slides {
            let relative = slide.image_path.strip_prefix("/static/").unwrap();
            assert!(static_dir.join(relative).is_file(), "missing {}", slide.image_path);
        }
    }

    #[test]
    fn test_carousel_view_wraps_links() {
        let hero = HeroConfig::default();
        let last = hero.slides.len() - 1;
        let view = CarouselView::new(&hero, Carousel::at(hero.slides.len(), last), AUTOPLAY);
        assert_eq!(view.next_index, 0);

        let first = CarouselView::new(&hero, Carousel::new(hero.slides.len()), AUTOPLAY);
        assert_eq!(first.prev_index, last);
    }

    #[test]
    fn test_carousel_template_renders_controls() {
        let hero = HeroConfig::default();
        let html = CarouselTemplate {
            carousel: CarouselView::new(&hero, Carousel::new(hero.slides.len()), AUTOPLAY),
        }
        .render()
        .unwrap();

        assert!(html.contains("hx-get=\"/carousel/1\""));
        assert!(html.contains("every 5000ms"));
        assert!(html.contains("carousel-btn prev"));
        assert_eq!(html.matches("class=\"dot").count(), hero.slides.len());
    }

    #[test]
    fn test_empty_carousel_renders_nothing() {
        let hero = HeroConfig { slides: Vec::new() };
        let html = CarouselTemplate {
            carousel: CarouselView::new(&hero, Carousel::new(0), AUTOPLAY),
        }
        .render()
        .unwrap();

        assert!(!html.contains("carousel-track"));
    }
}
