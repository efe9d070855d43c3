//! Concurrent query dispatching with cooperative cancellation.
//!
//! The dispatcher partitions the candidate list into contiguous chunks, one
//! per worker, and runs the workers concurrently on the tokio runtime. Each
//! worker walks its chunk strictly sequentially, so at most `concurrency`
//! queries are in flight at any moment. Cancellation is cooperative: the
//! shared stop flag is checked before and after every query, and an
//! in-flight query is always allowed to complete.
//!
//! Shared run state is append-only — workers only push results and bump the
//! completed counter, so a mutex over the result vector plus an atomic
//! counter is all the coordination required.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::BatchError;
use crate::types::{Progress, QueryResult, RunSummary};

/// Partition `total` items into exactly `workers` contiguous chunks.
///
/// Chunk sizes are `total / workers`, with the first `total % workers`
/// chunks receiving one extra element. Every index is covered exactly once
/// and relative order is preserved. Chunks may be empty when `workers`
/// exceeds `total`.
pub fn partition(total: usize, workers: usize) -> Vec<std::ops::Range<usize>> {
    assert!(workers > 0, "worker count must be positive");
    let base = total / workers;
    let extra = total % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let len = if i < extra { base + 1 } else { base };
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Shared cancellation handle for one run.
///
/// Owns the stop flag outright — there is no ambient state. Cloning is cheap
/// and all clones observe the same flag. `stop()` is idempotent: it only
/// sets the flag and never aborts an in-flight query.
#[derive(Debug, Clone, Default)]
pub struct RunHandle {
    stopped: Arc<AtomicBool>,
}

impl RunHandle {
    /// Create a fresh handle. A new handle is required per run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cooperative cancellation.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Runs batches of candidate domains against an injected query function.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    /// Number of concurrent workers (one chunk each)
    concurrency: usize,
    /// Optional per-query timeout; None matches the upstream behavior of
    /// letting a slow query stall its chunk indefinitely
    query_timeout: Option<Duration>,
}

impl Dispatcher {
    /// Create a dispatcher with the given worker count (minimum 1).
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            query_timeout: None,
        }
    }

    /// Guard every query with a timeout. A timed-out query is recorded as an
    /// error-tagged result, same as any other failure.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Query every candidate, aggregating results as workers complete them.
    ///
    /// `query` is the injected async capability: it receives a fully
    /// qualified domain and resolves to a [`QueryResult`] or an error. A
    /// failed query is recorded as an error-tagged result and never aborts
    /// the run — sibling workers are unaffected, and this future itself only
    /// ever resolves successfully (possibly with a partial result set).
    ///
    /// Progress is sent on `progress` after every single completion, as
    /// `{completed, total}`. Result append order reflects completion order
    /// across workers, not candidate order.
    ///
    /// Returns once all workers have exited, either by exhausting their
    /// chunk or by observing the stop flag on `handle`.
    pub async fn run<Q, Fut>(
        &self,
        candidates: Vec<String>,
        query: Q,
        handle: &RunHandle,
        progress: Option<mpsc::UnboundedSender<Progress>>,
    ) -> RunSummary
    where
        Q: Fn(String) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<QueryResult, BatchError>> + Send + 'static,
    {
        let total = candidates.len();
        let results = Arc::new(Mutex::new(Vec::with_capacity(total)));
        let completed = Arc::new(AtomicUsize::new(0));

        tracing::debug!(total, workers = self.concurrency, "dispatching batch run");

        let mut tasks = Vec::with_capacity(self.concurrency);
        for range in partition(total, self.concurrency) {
            if range.is_empty() {
                continue;
            }
            let chunk: Vec<String> = candidates[range].to_vec();
            let worker = Worker {
                query: query.clone(),
                handle: handle.clone(),
                results: results.clone(),
                completed: completed.clone(),
                progress: progress.clone(),
                total,
                query_timeout: self.query_timeout,
            };
            tasks.push(tokio::spawn(worker.process(chunk)));
        }

        for joined in futures::future::join_all(tasks).await {
            // A worker panic is an internal bug; surface it instead of
            // silently losing its chunk.
            joined.expect("batch worker panicked");
        }

        let results = Arc::try_unwrap(results)
            .expect("all workers joined")
            .into_inner()
            .expect("results lock poisoned");

        RunSummary {
            total,
            completed: completed.load(Ordering::SeqCst),
            results,
            stopped: handle.is_stopped(),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Per-worker state: one chunk, shared run aggregates.
struct Worker<Q> {
    query: Q,
    handle: RunHandle,
    results: Arc<Mutex<Vec<QueryResult>>>,
    completed: Arc<AtomicUsize>,
    progress: Option<mpsc::UnboundedSender<Progress>>,
    total: usize,
    query_timeout: Option<Duration>,
}

impl<Q, Fut> Worker<Q>
where
    Q: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<QueryResult, BatchError>> + Send + 'static,
{
    /// Walk the chunk strictly sequentially, honoring the stop flag before
    /// and after every query.
    async fn process(self, chunk: Vec<String>) {
        for domain in chunk {
            if self.handle.is_stopped() {
                return;
            }

            let outcome = match self.query_timeout {
                Some(timeout) => {
                    match tokio::time::timeout(timeout, (self.query)(domain.clone())).await {
                        Ok(result) => result,
                        Err(_) => Err(BatchError::timeout(
                            format!("query for '{}'", domain),
                            timeout,
                        )),
                    }
                }
                None => (self.query)(domain.clone()).await,
            };

            // A failure is recorded as an error-tagged result rather than
            // dropped, so callers can tell "ran and failed" apart from
            // "never ran" after an early stop.
            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(domain = %domain, error = %e, "query failed");
                    QueryResult::from_error(domain, e.to_string())
                }
            };

            self.results
                .lock()
                .expect("results lock poisoned")
                .push(result);
            let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;

            if let Some(tx) = &self.progress {
                let _ = tx.send(Progress {
                    completed: done,
                    total: self.total,
                });
            }

            if self.handle.is_stopped() {
                return;
            }
        }
    }
}
