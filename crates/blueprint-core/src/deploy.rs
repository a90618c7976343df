//! Simulated deployment.
//!
//! Nothing is provisioned here. A "deployment" is a timed state transition that
//! ends with a fabricated URL, so the explorer has something to point at.

use std::time::Duration;

use rand::Rng;

pub const DEPLOY_DOMAIN: &str = "prod.dev-cloud.run";
pub const DOCS_SUFFIX: &str = "/v1/docs";
pub const DEFAULT_DEPLOY_DELAY: Duration = Duration::from_millis(3000);

const TOKEN_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub url: Option<String>,
    pub in_progress: bool,
}

impl DeploymentRecord {
    pub fn start(&mut self) {
        self.url = None;
        self.in_progress = true;
    }

    pub fn finish(&mut self, url: String) {
        self.url = Some(url);
        self.in_progress = false;
    }
}

/// A URL of the form `https://api-<token>.prod.dev-cloud.run/v1/docs`.
pub fn fabricate_url() -> String {
    let mut rng = rand::rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("https://api-{token}.{DEPLOY_DOMAIN}{DOCS_SUFFIX}")
}

/// Strip the docs suffix to get the API base URL.
pub fn base_url(deployment_url: &str) -> &str {
    deployment_url
        .strip_suffix(DOCS_SUFFIX)
        .unwrap_or(deployment_url)
}

#[cfg(test)]
pub(crate) fn is_fabricated_url(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("https://api-") else {
        return false;
    };
    let Some(token) = rest.strip_suffix(&format!(".{DEPLOY_DOMAIN}{DOCS_SUFFIX}")) else {
        return false;
    };
    token.len() == TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}
