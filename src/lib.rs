//! Opero: a business automation backend.
//!
//! This library provides:
//! - An in-memory contact list with CRUD, search and stats
//! - A rule-based assistant that classifies chat messages by keyword
//! - Templated task generators (email drafts, meeting plans, reports)
//! - Per-user conversation context
//! - CLI and HTTP API interfaces
//!
//! # Example
//!
//! ```rust
//! use opero::{Config, Opero};
//! use opero::agent::TaskRequest;
//!
//! let opero = Opero::new(Config::default());
//! assert_eq!(opero.contacts().len(), 3);
//!
//! let task = opero.agent().execute_task(&TaskRequest::new("report_generation", Default::default()));
//! assert_eq!(task.status.as_str(), "completed");
//! ```

pub mod error;
pub mod agent;
pub mod contacts;
pub mod cli;
#[cfg(feature = "server")]
pub mod server;

// Re-export key types
pub use crate::error::{OperoError, OperoResult};
pub use crate::agent::{AgentService, ContextStore};
pub use crate::contacts::ContactStore;

use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Configuration for an Opero instance
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Start with the demo contact list instead of an empty one
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            seed_demo_data: true,
        }
    }
}

impl Config {
    /// Socket address the HTTP server binds to
    ///
    /// `host` may be an IP literal or a hostname; hostnames are resolved and
    /// the first address is used.
    pub fn bind_addr(&self) -> OperoResult<SocketAddr> {
        let invalid = |reason: String| {
            OperoError::Configuration(format!("invalid bind address '{}:{}': {}", self.host, self.port, reason))
        };
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("host resolved to no addresses".to_string()))
    }
}

/// Opero application handle
///
/// Bundles the agent service and the contact store. Clones share state.
#[derive(Clone)]
pub struct Opero {
    config: Config,
    agent: AgentService,
    contacts: Arc<ContactStore>,
}

impl Opero {
    pub fn new(config: Config) -> Self {
        let contacts = if config.seed_demo_data {
            ContactStore::with_demo_data()
        } else {
            ContactStore::new()
        };
        tracing::debug!(contacts = contacts.len(), "Initialized Opero");

        Self {
            config,
            agent: AgentService::new(),
            contacts: Arc::new(contacts),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn agent(&self) -> &AgentService {
        &self.agent
    }

    pub fn contacts(&self) -> &Arc<ContactStore> {
        &self.contacts
    }
}
