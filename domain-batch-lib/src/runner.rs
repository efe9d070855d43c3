//! High-level batch run orchestration.
//!
//! `BatchRunner` ties the pipeline together: it validates the configuration
//! (fail fast, before any querying), expands the position model into
//! suffixed candidate domains, and drives the dispatcher with an injected
//! query function. The query capability stays injected all the way down so
//! runs can be exercised without a network; [`run_with_proxy`] wires in the
//! production WHOIS proxy client.
//!
//! [`run_with_proxy`]: BatchRunner::run_with_proxy

use std::future::Future;

use tokio::sync::mpsc;

use crate::dispatch::{Dispatcher, RunHandle};
use crate::error::BatchError;
use crate::generate::generate;
use crate::protocols::WhoisProxyClient;
use crate::types::{BatchConfig, Progress, QueryResult, RunSummary};
use crate::utils::{full_domain, validate_suffix};

/// Orchestrates one batch run from config to summary.
///
/// # Example
///
/// ```rust,no_run
/// use domain_batch_lib::{BatchConfig, BatchRunner, PatternFilter, PositionSpec, RunHandle};
/// use domain_batch_lib::WhoisProxyClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = BatchConfig::new(vec![PositionSpec::Digit, PositionSpec::Digit], "com")
///         .with_filter(PatternFilter::Aa)
///         .with_concurrency(10);
///     let runner = BatchRunner::new(config);
///     let client = WhoisProxyClient::new("https://api.example.com/whois")?;
///
///     let handle = RunHandle::new();
///     let summary = runner.run_with_proxy(&client, &handle, None).await?;
///     println!("{}/{} checked", summary.completed, summary.total);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: BatchConfig,
}

impl BatchRunner {
    /// Create a runner for the given configuration.
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// The configuration backing this runner.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Expand the position model into suffixed candidate domains.
    ///
    /// Pure recomputation: identical config yields an identical list, so
    /// callers may regenerate on every config edit. The suffix is validated
    /// first — an invalid suffix rejects the whole run with a configuration
    /// error before any candidate work happens.
    pub fn candidates(&self) -> Result<Vec<String>, BatchError> {
        validate_suffix(&self.config.suffix)?;
        let labels = generate(&self.config.positions, self.config.filter)?;
        Ok(labels
            .into_iter()
            .map(|label| full_domain(&label, &self.config.suffix))
            .collect())
    }

    /// Run the batch with an injected query function.
    ///
    /// Configuration errors surface synchronously before dispatch starts.
    /// Once dispatch begins the returned future only resolves successfully:
    /// per-candidate failures are contained as error-tagged results and
    /// cancellation via `handle` is a normal terminal state, not a failure.
    pub async fn run<Q, Fut>(
        &self,
        query: Q,
        handle: &RunHandle,
        progress: Option<mpsc::UnboundedSender<Progress>>,
    ) -> Result<RunSummary, BatchError>
    where
        Q: Fn(String) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<QueryResult, BatchError>> + Send + 'static,
    {
        let candidates = self.candidates()?;

        let mut dispatcher = Dispatcher::new(self.config.concurrency);
        if let Some(timeout) = self.config.query_timeout {
            dispatcher = dispatcher.with_query_timeout(timeout);
        }

        Ok(dispatcher.run(candidates, query, handle, progress).await)
    }

    /// Run the batch against the production WHOIS proxy.
    pub async fn run_with_proxy(
        &self,
        client: &WhoisProxyClient,
        handle: &RunHandle,
        progress: Option<mpsc::UnboundedSender<Progress>>,
    ) -> Result<RunSummary, BatchError> {
        let client = client.clone();
        self.run(
            move |domain: String| {
                let client = client.clone();
                async move { client.query(&domain).await }
            },
            handle,
            progress,
        )
        .await
    }
}
