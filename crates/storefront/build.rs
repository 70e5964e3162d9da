//! Build script for the storefront crate.
//!
//! Fingerprints the static assets pages link to. Each asset is copied into a
//! `derived/` directory beside it under a content-hashed name, and the hash
//! is exported as a compile-time variable read by the template filters.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// A static asset served under a fingerprinted name.
struct Asset {
    /// Variable exported to the crate, read with `env!`.
    env_var: &'static str,
    /// Directory under the crate root.
    dir: &'static str,
    stem: &'static str,
    extension: &'static str,
}

const ASSETS: [Asset; 2] = [
    Asset {
        env_var: "CSS_HASH",
        dir: "static/css",
        stem: "main",
        extension: "css",
    },
    Asset {
        env_var: "JS_HASH",
        dir: "static/js",
        stem: "storefront",
        extension: "js",
    },
];

fn main() {
    let manifest_dir = PathBuf::from(
        env::var_os("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo"),
    );

    for asset in &ASSETS {
        if let Err(e) = fingerprint(&manifest_dir, asset) {
            panic!("Failed to fingerprint {}.{}: {e}", asset.stem, asset.extension);
        }
    }

    println!("cargo:rerun-if-changed=templates");
    println!("cargo:rerun-if-changed=content/catalog.json");
}

/// Hash one asset, export its hash and write the derived copy.
///
/// A missing source exports an empty hash with a warning instead of failing
/// the build.
fn fingerprint(manifest_dir: &Path, asset: &Asset) -> io::Result<()> {
    let dir = manifest_dir.join(asset.dir);
    let source = dir.join(format!("{}.{}", asset.stem, asset.extension));
    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", source.display());
            println!("cargo:rustc-env={}=", asset.env_var);
            return Ok(());
        }
    };

    // 8 hex chars
    let short_hash: String = Sha256::digest(&content)
        .iter()
        .take(4)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    println!("cargo:rustc-env={}={short_hash}", asset.env_var);

    let derived_dir = dir.join("derived");
    fs::create_dir_all(&derived_dir)?;
    let derived_name = format!("{}.{short_hash}.{}", asset.stem, asset.extension);
    prune_stale(&derived_dir, asset, &derived_name)?;
    fs::copy(&source, derived_dir.join(&derived_name))?;

    Ok(())
}

/// Remove fingerprinted copies of `asset` other than `keep`.
fn prune_stale(derived_dir: &Path, asset: &Asset, keep: &str) -> io::Result<()> {
    let prefix = format!("{}.", asset.stem);
    let suffix = format!(".{}", asset.extension);

    for entry in fs::read_dir(derived_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name != keep && name.starts_with(&prefix) && name.ends_with(&suffix) {
            fs::remove_file(entry.path())?;
        }
    }

    Ok(())
}
