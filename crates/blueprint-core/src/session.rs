//! Response store for one interactive session.
//!
//! `Session` owns the staged input, the last bundle, the last error and the
//! deployment record. Readers get owned snapshots. The lock is never held
//! across an await, so a generation or deployment that resolves late is
//! applied on top of whatever happened in between.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::deploy::{self, DeploymentRecord};
use crate::explorer;
use crate::{ArtifactBundle, ArtifactGenerator, UserInput};

pub const NO_INPUT_MESSAGE: &str = "Please provide a data source first.";

#[derive(Debug, Default)]
struct SessionState {
    input: Option<UserInput>,
    bundle: Option<ArtifactBundle>,
    error: Option<String>,
    loading: bool,
    deployment: DeploymentRecord,
    /// Bundle captured when the last deployment started.
    deployed: Option<ArtifactBundle>,
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub input: Option<UserInput>,
    pub bundle: Option<ArtifactBundle>,
    pub error: Option<String>,
    pub is_loading: bool,
    pub deployment: DeploymentRecord,
}

#[derive(Clone)]
pub struct Session {
    generator: Arc<dyn ArtifactGenerator>,
    state: Arc<Mutex<SessionState>>,
    deploy_delay: Duration,
}

impl Session {
    pub fn new(generator: Arc<dyn ArtifactGenerator>) -> Self {
        Self {
            generator,
            state: Arc::new(Mutex::new(SessionState::default())),
            deploy_delay: deploy::DEFAULT_DEPLOY_DELAY,
        }
    }

    pub fn with_deploy_delay(mut self, delay: Duration) -> Self {
        self.deploy_delay = delay;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            input: state.input.clone(),
            bundle: state.bundle.clone(),
            error: state.error.clone(),
            is_loading: state.loading,
            deployment: state.deployment.clone(),
        }
    }

    /// Stage a new data source. A present value drops stale results.
    pub fn set_input(&self, input: Option<UserInput>) {
        let mut state = self.lock();
        if input.is_some() {
            state.bundle = None;
            state.error = None;
            state.deployment = DeploymentRecord::default();
            state.deployed = None;
        }
        state.input = input;
    }

    /// Drop input, results and deployment. A generation still in flight
    /// writes its result when it resolves.
    pub fn clear(&self) {
        *self.lock() = SessionState::default();
    }

    /// Run one generation for the staged input.
    ///
    /// Calls are not de-duplicated: each one issues its own request and the
    /// last to resolve wins.
    pub async fn generate(&self) {
        let input = {
            let mut state = self.lock();
            let Some(input) = state.input.clone() else {
                state.error = Some(NO_INPUT_MESSAGE.to_string());
                return;
            };
            state.loading = true;
            state.error = None;
            state.bundle = None;
            state.deployment = DeploymentRecord::default();
            state.deployed = None;
            input
        };

        tracing::debug!(mode = ?input.mode(), "starting generation");
        let result = self.generator.generate(&input).await;

        let mut state = self.lock();
        state.loading = false;
        match result {
            Ok(bundle) => {
                tracing::info!(endpoints = bundle.api_endpoints.len(), "generation succeeded");
                state.bundle = Some(bundle);
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                state.bundle = None;
                state.error = Some(e.to_string());
            }
        }
    }

    /// Simulate a deployment of the current bundle. No-op without one.
    pub async fn deploy(&self) -> Option<String> {
        if !self.begin_deploy() {
            return None;
        }
        tokio::time::sleep(self.deploy_delay).await;
        Some(self.complete_deploy())
    }

    fn begin_deploy(&self) -> bool {
        let mut state = self.lock();
        let Some(bundle) = state.bundle.clone() else {
            return false;
        };
        state.deployment.start();
        state.deployed = Some(bundle);
        true
    }

    fn complete_deploy(&self) -> String {
        let url = deploy::fabricate_url();
        tracing::info!(%url, "simulated deployment finished");
        self.lock().deployment.finish(url.clone());
        url
    }

    /// Standalone explorer page for the last deployment, once its URL exists.
    pub fn explorer_document(&self) -> Option<String> {
        let state = self.lock();
        let url = state.deployment.url.as_deref()?;
        let bundle = state.deployed.as_ref()?;
        Some(explorer::render_explorer(bundle, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_bundle;
    use crate::GenerateError;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct Fixed(Result<ArtifactBundle, &'static str>);

    #[async_trait::async_trait]
    impl ArtifactGenerator for Fixed {
        async fn generate(&self, _input: &UserInput) -> Result<ArtifactBundle, GenerateError> {
            match &self.0 {
                Ok(bundle) => Ok(bundle.clone()),
                Err(text) => ArtifactBundle::from_response_text(text),
            }
        }
    }

    /// Blocks until released, so tests can look at the state mid-flight.
    struct Gated {
        release: Arc<Notify>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ArtifactGenerator for Gated {
        async fn generate(&self, _input: &UserInput) -> Result<ArtifactBundle, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            Ok(sample_bundle())
        }
    }

    fn text_input() -> Option<UserInput> {
        UserInput::text("a library with books and loans")
    }

    fn session_with(result: Result<ArtifactBundle, &'static str>) -> Session {
        Session::new(Arc::new(Fixed(result)))
    }

    #[tokio::test]
    async fn generate_without_input_sets_error() {
        let session = session_with(Ok(sample_bundle()));
        session.generate().await;
        let snap = session.snapshot();
        assert_eq!(snap.error.as_deref(), Some(NO_INPUT_MESSAGE));
        assert_eq!(snap.bundle, None);
    }

    #[tokio::test]
    async fn success_stores_bundle() {
        let session = session_with(Ok(sample_bundle()));
        session.set_input(text_input());
        session.generate().await;
        let snap = session.snapshot();
        assert_eq!(snap.bundle, Some(sample_bundle()));
        assert_eq!(snap.error, None);
        assert!(!snap.is_loading);
    }

    #[tokio::test]
    async fn incomplete_response_does_not_populate_store() {
        let session = session_with(Err(r#"{"databaseSchema":"x","restApi":"y"}"#));
        session.set_input(text_input());
        session.generate().await;
        let snap = session.snapshot();
        assert_eq!(snap.bundle, None);
        assert_eq!(
            snap.error.as_deref(),
            Some("The AI returned an invalid or unparsable response. Please try again.")
        );
    }

    #[tokio::test]
    async fn new_generation_clears_previous_results_before_resolving() {
        let gated = Arc::new(Gated {
            release: Arc::new(Notify::new()),
            calls: AtomicUsize::new(0),
        });
        let session = Session::new(gated.clone()).with_deploy_delay(Duration::ZERO);
        session.set_input(text_input());

        gated.release.notify_one();
        session.generate().await;
        session.deploy().await;
        {
            let mut state = session.lock();
            state.error = Some("old failure".to_string());
        }
        let before = session.snapshot();
        assert!(before.bundle.is_some());
        assert!(before.deployment.url.is_some());

        // A second deployment is still waiting on its timer.
        assert!(session.begin_deploy());
        assert!(session.snapshot().deployment.in_progress);

        let in_flight = tokio::spawn({
            let session = session.clone();
            async move { session.generate().await }
        });
        while gated.calls.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }

        let during = session.snapshot();
        assert!(during.is_loading);
        assert_eq!(during.bundle, None);
        assert_eq!(during.error, None);
        assert_eq!(during.deployment, DeploymentRecord::default());
        assert_eq!(session.explorer_document(), None);

        gated.release.notify_one();
        in_flight.await.unwrap();
        assert_eq!(session.snapshot().bundle, Some(sample_bundle()));
    }

    #[tokio::test]
    async fn staging_input_drops_stale_results() {
        let session = session_with(Ok(sample_bundle())).with_deploy_delay(Duration::ZERO);
        session.set_input(text_input());
        session.generate().await;
        session.deploy().await;

        session.set_input(UserInput::url("https://example.com/data.csv"));
        let snap = session.snapshot();
        assert_eq!(snap.bundle, None);
        assert_eq!(snap.deployment, DeploymentRecord::default());

        session.set_input(None);
        assert_eq!(session.snapshot().input, None);
    }

    #[tokio::test(start_paused = true)]
    async fn deploy_without_bundle_is_a_no_op() {
        let session = session_with(Ok(sample_bundle()));
        assert_eq!(session.deploy().await, None);
        assert_eq!(session.snapshot().deployment, DeploymentRecord::default());
        assert_eq!(session.explorer_document(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn deploy_goes_in_progress_then_yields_url() {
        let session = session_with(Ok(sample_bundle()));
        session.set_input(text_input());
        session.generate().await;

        assert!(session.begin_deploy());
        let mid = session.snapshot().deployment;
        assert!(mid.in_progress);
        assert_eq!(mid.url, None);
        session.complete_deploy();

        let started = tokio::time::Instant::now();
        let url = session.deploy().await.unwrap();
        assert!(started.elapsed() >= deploy::DEFAULT_DEPLOY_DELAY);
        assert!(deploy::is_fabricated_url(&url), "bad url {url}");

        let done = session.snapshot().deployment;
        assert!(!done.in_progress);
        assert_eq!(done.url.as_deref(), Some(url.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn explorer_renders_from_deployed_snapshot() {
        let session = session_with(Ok(sample_bundle()));
        session.set_input(text_input());
        session.generate().await;
        let url = session.deploy().await.unwrap();

        let html = session.explorer_document().unwrap();
        let base = deploy::base_url(&url);
        assert!(html.contains(&format!("{base}/users")));
        assert!(html.contains("list users"));
    }

    #[tokio::test]
    async fn clear_resets_everything() {
        let session = session_with(Ok(sample_bundle()));
        session.set_input(text_input());
        session.generate().await;
        assert!(session.begin_deploy());
        session.clear();
        let snap = session.snapshot();
        assert_eq!(snap.input, None);
        assert_eq!(snap.bundle, None);
        assert_eq!(snap.error, None);
        assert!(!snap.is_loading);
        assert_eq!(snap.deployment, DeploymentRecord::default());
        assert_eq!(session.lock().deployed, None);
    }
}
