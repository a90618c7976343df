use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use blueprint_core::diagram::{self, DiagramView};
use blueprint_core::ArtifactBundle;

pub const BUNDLE_FILE: &str = "bundle.json";
pub const EXPLORER_FILE: &str = "explorer.html";

fn write(dir: &Path, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Write every artifact of a bundle into `dir`. Returns the files written.
///
/// A diagram that fails inspection is still written, as raw source, so the
/// rest of the result is never lost over it.
pub fn write_bundle(dir: &Path, bundle: &ArtifactBundle) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = vec![
        write(dir, "schema.sql", &bundle.database_schema)?,
        write(dir, "api.yaml", &bundle.rest_api)?,
        write(dir, "reasoning.md", &bundle.schema_reasoning)?,
    ];

    match diagram::inspect(&bundle.erd_diagram) {
        DiagramView::Ready(chart) => written.push(write(dir, "erd.mmd", &chart)?),
        DiagramView::Failed { error, source } => {
            tracing::warn!(%error, "diagram could not be rendered; keeping raw source");
            written.push(write(dir, "erd.mmd", &source)?);
        }
        DiagramView::Empty => tracing::warn!("diagram was empty after cleanup; skipped"),
    }

    let endpoints = serde_json::to_string_pretty(&bundle.api_endpoints)?;
    written.push(write(dir, "endpoints.json", &endpoints)?);

    let full = serde_json::to_string_pretty(bundle)?;
    written.push(write(dir, BUNDLE_FILE, &full)?);

    Ok(written)
}

/// Read a bundle written by `write_bundle`, validating it like a fresh answer.
pub fn read_bundle(path: &Path) -> anyhow::Result<ArtifactBundle> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    ArtifactBundle::from_response_text(&raw)
        .with_context(|| format!("{} is not a complete bundle", path.display()))
}

pub fn write_explorer(path: &Path, html: &str) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(path, html).with_context(|| format!("writing {}", path.display()))
}
