//! netagent - tool-calling AI assistant for network troubleshooting
//!
//! This library provides the agent loop, the tools it can call (web
//! search, device show commands, log analysis), and the CLI and browser
//! front ends that drive it.

pub mod agent;
pub mod tools;
pub mod adapters;
pub mod config;
pub mod error;
pub mod templates;
pub mod ui;

pub use error::{Error, Result};
