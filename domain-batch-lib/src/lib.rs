//! # Domain Batch Library
//!
//! A library for generating batches of candidate domain names from a position
//! model, filtering them by digit patterns, and checking their availability
//! through a WHOIS proxy with bounded concurrency.
//!
//! The pipeline has three stages: expand a position model into the Cartesian
//! product of per-position values, filter and validate the resulting labels,
//! then dispatch availability queries across a fixed pool of workers with
//! cooperative cancellation and per-completion progress.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_batch_lib::{BatchConfig, BatchRunner, PatternFilter, PositionSpec, RunHandle};
//! use domain_batch_lib::WhoisProxyClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // All two-digit .com domains with both digits equal: 00.com .. 99.com
//!     let config = BatchConfig::new(vec![PositionSpec::Digit, PositionSpec::Digit], "com")
//!         .with_filter(PatternFilter::Aa)
//!         .with_concurrency(10);
//!
//!     let runner = BatchRunner::new(config);
//!     let client = WhoisProxyClient::new("https://api.example.com/whois")?;
//!
//!     let handle = RunHandle::new();
//!     let summary = runner.run_with_proxy(&client, &handle, None).await?;
//!     for result in &summary.results {
//!         println!("{}: available={}", result.domain, result.is_available());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Position Model**: digits, letters, or fixed text per position (up to 6)
//! - **Pattern Filters**: named digit-string predicates (AA, ABCBA, consecutive, ...)
//! - **Bounded Dispatch**: fixed worker pool with contiguous chunk partitioning
//! - **Cooperative Cancellation**: stop a run between queries, keeping partial results
//! - **Configurable**: TOML files and environment variables

// Re-export main public API types and functions
// This makes them available as domain_batch_lib::TypeName
pub use aggregate::ResultView;
pub use config::{
    load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
    OutputConfig,
};
pub use dispatch::{partition, Dispatcher, RunHandle};
pub use error::BatchError;
pub use generate::{estimate_count, generate, Combinations};
pub use patterns::PatternFilter;
pub use protocols::WhoisProxyClient;
pub use runner::BatchRunner;
pub use types::{
    BatchConfig, PositionSpec, Progress, QueryResult, RunSummary, MAX_CONCURRENCY, MAX_POSITIONS,
};
pub use utils::{full_domain, is_valid_label, validate_label, validate_suffix};

// Internal modules - these are not part of the public API
mod aggregate;
mod config;
mod dispatch;
mod error;
mod generate;
mod patterns;
mod protocols;
mod runner;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, BatchError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
