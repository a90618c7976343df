use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context;

/// Open a file in the user's browser: $BROWSER → xdg-open → open.
pub fn open_in_browser(path: &Path) -> anyhow::Result<()> {
    let opener = std::env::var("BROWSER")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            ["xdg-open", "open"]
                .iter()
                .find(|name| which::which(name).is_ok())
                .map(|s| s.to_string())
        })
        .context("no browser opener found; set $BROWSER")?;

    tracing::info!(%opener, path = %path.display(), "opening explorer");

    Command::new(&opener)
        .arg(path)
        .stdin(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to launch {opener}"))?;

    Ok(())
}
