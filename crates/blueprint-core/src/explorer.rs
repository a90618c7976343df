//! Static API explorer page.
//!
//! Renders a deployed bundle's endpoints as one self-contained HTML document
//! with inline styles, one method badge per endpoint, and every generated
//! string escaped.

use crate::deploy;
use crate::ArtifactBundle;

const STYLE: &str = "\
body{margin:0;background:#111827;color:#e5e7eb;font-family:system-ui,-apple-system,sans-serif}\
main{max-width:960px;margin:0 auto;padding:32px 16px}\
h1{font-size:28px;color:#fff;margin:0 0 8px}\
h2{font-size:20px;color:#fff;margin:0}\
.muted{color:#9ca3af}\
.url{margin-top:8px;background:#1f2937;border:1px solid #374151;border-radius:6px;padding:12px;font-family:monospace;color:#4ade80;word-break:break-all}\
.card{margin-top:32px;background:rgba(31,41,55,.5);border:1px solid #374151;border-radius:8px}\
.card-head{padding:24px;border-bottom:1px solid #374151}\
.endpoint{display:grid;grid-template-columns:auto 1fr;gap:16px;align-items:center;padding:16px 24px;border-top:1px solid #374151}\
.endpoint:first-child{border-top:none}\
.method{width:96px;text-align:center;font-family:monospace;font-size:14px;font-weight:700;padding:8px;border-radius:6px}\
.get{background:rgba(22,163,74,.8);color:#dcfce7}\
.post{background:rgba(37,99,235,.8);color:#dbeafe}\
.put{background:rgba(202,138,4,.8);color:#fef9c3}\
.patch{background:rgba(234,88,12,.8);color:#ffedd5}\
.delete{background:rgba(220,38,38,.8);color:#fee2e2}\
.other{background:rgba(75,85,99,.8);color:#f3f4f6}\
.path{font-family:monospace;color:#d1d5db;word-break:break-all}\
.summary{font-size:14px;color:#9ca3af;margin-top:4px}";

fn method_class(method: &str) -> &'static str {
    match method.to_ascii_uppercase().as_str() {
        "GET" => "get",
        "POST" => "post",
        "PUT" => "put",
        "PATCH" => "patch",
        "DELETE" => "delete",
        _ => "other",
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render a standalone API explorer page for a deployed bundle.
///
/// Everything is inlined: no scripts, no stylesheets or fonts fetched from
/// elsewhere. Endpoints keep the bundle's order and are listed against the
/// base URL derived from `deployment_url`.
pub fn render_explorer(bundle: &ArtifactBundle, deployment_url: &str) -> String {
    let base = deploy::base_url(deployment_url);
    let mut out = String::with_capacity(4096 + bundle.api_endpoints.len() * 256);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str("<title>API Explorer</title>\n<style>");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n<main>\n");

    out.push_str("<h1>Live API Explorer</h1>\n");
    out.push_str("<p class=\"muted\">Your generated REST API is available at the following URL:</p>\n");
    out.push_str("<div class=\"url\">");
    out.push_str(&escape_html(deployment_url));
    out.push_str("</div>\n");

    out.push_str("<section class=\"card\">\n<div class=\"card-head\"><h2>API Endpoints</h2></div>\n");
    if bundle.api_endpoints.is_empty() {
        out.push_str("<p class=\"endpoint muted\">No endpoints were generated.</p>\n");
    }
    for endpoint in &bundle.api_endpoints {
        out.push_str("<div class=\"endpoint\">");
        out.push_str("<span class=\"method ");
        out.push_str(method_class(&endpoint.method));
        out.push_str("\">");
        out.push_str(&escape_html(&endpoint.method.to_uppercase()));
        out.push_str("</span><div><p class=\"path\">");
        out.push_str(&escape_html(base));
        out.push_str(&escape_html(&endpoint.path));
        out.push_str("</p><p class=\"summary\">");
        out.push_str(&escape_html(&endpoint.summary));
        out.push_str("</p></div></div>\n");
    }
    out.push_str("</section>\n</main>\n</body>\n</html>\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_bundle;
    use crate::ApiEndpoint;

    #[test]
    fn lists_endpoints_against_base_url() {
        let html = render_explorer(&sample_bundle(), "https://api-abc123.example/v1/docs");
        assert_eq!(html.matches("https://api-abc123.example/users").count(), 2);
        assert!(html.contains("list users"));
        assert!(html.contains("create user"));

        let get = html.find("list users").unwrap();
        let post = html.find("create user").unwrap();
        assert!(get < post);
    }

    #[test]
    fn document_is_self_contained() {
        let html = render_explorer(&sample_bundle(), "https://api-abc123.example/v1/docs");
        assert!(!html.contains("<script"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("src="));
        assert!(html.contains("<style>"));
    }

    #[test]
    fn each_method_gets_its_own_badge() {
        let mut bundle = sample_bundle();
        bundle.api_endpoints = ["get", "POST", "Put", "PATCH", "delete", "OPTIONS"]
            .iter()
            .map(|m| ApiEndpoint {
                path: "/x".to_string(),
                method: m.to_string(),
                summary: String::new(),
            })
            .collect();
        let html = render_explorer(&bundle, "https://api-abc123.example/v1/docs");
        for class in ["get", "post", "put", "patch", "delete", "other"] {
            assert!(
                html.contains(&format!("class=\"method {class}\"")),
                "missing {class}"
            );
        }
        assert!(html.contains(">OPTIONS</span>"));
        assert!(html.contains(">GET</span>"));
    }

    #[test]
    fn generated_text_is_escaped() {
        let mut bundle = sample_bundle();
        bundle.api_endpoints[0].summary = "<script>alert(1)</script> & more".to_string();
        let html = render_explorer(&bundle, "https://api-abc123.example/v1/docs");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
    }
}
