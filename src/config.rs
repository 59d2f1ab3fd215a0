//! Host configuration — the options an embedding application supplies when
//! wiring up the A2A server.
//!
//! Loading from environment variables or a config file is the embedding
//! application's job; this module only defines the shape and its defaults.

use serde::{Deserialize, Serialize};

/// Configuration for an A2A protocol host.
///
/// All fields have defaults matching the values documented for the wire
/// protocol (`path = "/a2a"`, `shutdownTimeoutSeconds = 60`, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    /// URL prefix under which the REST surface (C8) is mounted.
    #[serde(default = "default_path")]
    pub path: String,

    /// Whether inbound requests must carry authentication.
    ///
    /// The core does not implement authentication itself (out of scope,
    /// §1); this flag is surfaced so an embedding auth middleware can
    /// consult it.
    #[serde(default = "default_require_auth")]
    pub require_auth: bool,

    /// Seconds to wait for in-flight turns to drain on shutdown before
    /// abandoning them.
    #[serde(default = "default_shutdown_timeout_seconds")]
    pub shutdown_timeout_seconds: u64,

    /// Maximum number of queued-but-not-yet-running work items (C5).
    #[serde(default = "default_max_queue_depth")]
    pub max_queue_depth: usize,

    /// Number of background workers draining the work queue (C5).
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Overrides for the agent card's `name` field.
    #[serde(default)]
    pub agent_name: Option<String>,

    /// Overrides for the agent card's `description` field.
    #[serde(default)]
    pub agent_description: Option<String>,

    /// Overrides for the agent card's `version` field.
    #[serde(default)]
    pub agent_version: Option<String>,
}

fn default_path() -> String {
    "/a2a".to_string()
}

fn default_require_auth() -> bool {
    true
}

fn default_shutdown_timeout_seconds() -> u64 {
    60
}

fn default_max_queue_depth() -> usize {
    256
}

fn default_worker_count() -> usize {
    4
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            require_auth: default_require_auth(),
            shutdown_timeout_seconds: default_shutdown_timeout_seconds(),
            max_queue_depth: default_max_queue_depth(),
            worker_count: default_worker_count(),
            agent_name: None,
            agent_description: None,
            agent_version: None,
        }
    }
}

impl HostConfig {
    /// The configured shutdown timeout as a [`std::time::Duration`].
    pub fn shutdown_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.shutdown_timeout_seconds)
    }
}
