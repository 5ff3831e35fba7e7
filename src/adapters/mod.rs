//! Adapters module: user-facing front ends.
//!
//! Each adapter feeds user text into an [`AgentLoop`](crate::agent::AgentLoop)
//! and shows the notices and the final answer (or the error) it produces.
//!
//! # Supported Channels
//!
//! - **CLI**: single message or interactive line-by-line prompt
//! - **Web**: browser page plus JSON endpoint, served with axum

pub mod cli;
pub mod web;

/// Channel trait for front ends.
///
/// All channel implementations must be [`Send`] + [`Sync`] for async compatibility.
pub trait Channel: Send + Sync {
    /// Channel name (e.g., "web", "cli").
    fn name(&self) -> &str;

    /// Start serving submissions; resolves when the channel shuts down.
    fn start(&self) -> impl std::future::Future<Output = crate::Result<()>> + Send;

    /// Ask a running channel to stop.
    fn stop(&self) -> impl std::future::Future<Output = crate::Result<()>> + Send;
}

/// Channel registry: metadata about available channels.
pub struct ChannelRegistry;

impl ChannelRegistry {
    /// List all available channel names.
    pub fn available() -> &'static [&'static str] {
        &["cli", "web"]
    }

    /// Get a human-readable description of a channel.
    pub fn description(name: &str) -> &'static str {
        match name {
            "cli" => "Interactive command line interface",
            "web" => "Browser UI served over HTTP",
            _ => "Unknown channel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_channel_is_described() {
        for name in ChannelRegistry::available() {
            assert_ne!(ChannelRegistry::description(name), "Unknown channel");
        }
    }
}
