//! Manifest writer for Obescan model artifacts.
//!
//! Records SHA-256 digests of `scaler.json`, `model.json` and
//! `label_encoder.json` in `manifest.json`, which the application checks
//! at startup.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- [<artifact_dir>]
//! ```
//!
//! Without an argument the directory comes from `OBESCAN_ARTIFACT_DIR`.
//! The artifacts are parsed and cross-checked before anything is written.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use obescan::adapters::{ArtifactBundle, ArtifactManifest};
use obescan::ports::{Classifier, FeatureScaler};
use obescan::AppConfig;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dir = match args.next() {
        Some(arg) if arg == "-h" || arg == "--help" => {
            eprintln!("Usage: write_manifest [<artifact_dir>]");
            return Ok(());
        }
        Some(arg) => PathBuf::from(arg),
        None => AppConfig::from_env().artifact_dir,
    };
    if args.next().is_some() {
        bail!("Usage: write_manifest [<artifact_dir>]");
    }

    let dir = if dir.is_file() {
        dir.parent()
            .context("Artifact path has no parent directory")?
            .to_path_buf()
    } else {
        dir
    };

    let bundle = ArtifactBundle::load(&dir, false)
        .with_context(|| format!("Refusing to write a manifest for {dir:?}"))?;

    let manifest = ArtifactManifest::for_dir(&dir)?;
    let path = manifest.write(&dir)?;

    println!(
        "Wrote {} ({} files, {} columns, {} classes)",
        path.display(),
        manifest.files.len(),
        bundle.scaler.n_features(),
        bundle.classifier.n_classes()
    );
    for (name, digest) in &manifest.files {
        println!("  {name}: {digest}");
    }
    Ok(())
}
