//! Superficial cleanup of generated Mermaid ERD source.
//!
//! The source is never parsed for real. A diagram that does not look like an
//! `erDiagram` is reported as failed together with its raw text, so callers
//! can show the source next to an error notice instead of dropping the result.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramView {
    /// Nothing left after cleanup.
    Empty,
    Ready(String),
    Failed { error: String, source: String },
}

/// Strip Markdown code fences the model sometimes wraps around the diagram.
pub fn clean_chart(source: &str) -> String {
    let mut chart = source.trim_start();
    if let Some(rest) = chart.strip_prefix("```") {
        chart = rest.strip_prefix("mermaid").unwrap_or(rest).trim_start();
    }
    let mut chart = chart.trim_end();
    if let Some(rest) = chart.strip_suffix("```") {
        chart = rest;
    }
    chart.trim().to_string()
}

pub fn inspect(source: &str) -> DiagramView {
    let cleaned = clean_chart(source);
    if cleaned.is_empty() {
        return DiagramView::Empty;
    }

    let header = cleaned
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("%%"))
        .unwrap_or_default();

    if header.split_whitespace().next() == Some("erDiagram") {
        DiagramView::Ready(cleaned)
    } else {
        DiagramView::Failed {
            error: format!("expected an `erDiagram` declaration, found `{header}`"),
            source: source.to_string(),
        }
    }
}
