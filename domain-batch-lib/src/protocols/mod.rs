//! External collaborator clients.
//!
//! The batch dispatcher only ever sees an injected async query function;
//! this module provides the production implementation backing it — an HTTP
//! client for the WHOIS proxy endpoint.

/// WHOIS proxy HTTP client
pub mod whois;

// Re-export commonly used types
pub use whois::WhoisProxyClient;
