//! Container configuration.
//!
//! Configuration covers how the container behaves, never what it contains:
//! registrations are always made in code.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

/// Default bound on nested resolve calls per thread.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Environment variable prefix read by [`ContainerConfig::from_env`].
pub const ENV_PREFIX: &str = "FERROUS_IOC";

/// Behavior settings shared by a container and its children.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, ContainerConfig};
///
/// let config = ContainerConfig::default()
///     .with_label("api")
///     .with_max_depth(64);
///
/// let container = Container::with_config(config);
/// assert_eq!(container.config().max_depth, 64);
/// assert_eq!(container.config().display_label(), "api");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    /// Name used in log events
    pub label: Option<String>,
    /// Maximum nesting of resolve calls before failing with `DepthExceeded`
    pub max_depth: usize,
    /// Install a `TracingObserver` on creation
    pub trace_resolutions: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            label: None,
            max_depth: DEFAULT_MAX_DEPTH,
            trace_resolutions: false,
        }
    }
}

impl ContainerConfig {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.trace_resolutions = enabled;
        self
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("root")
    }

    /// Reads overrides from `FERROUS_IOC_LABEL`, `FERROUS_IOC_MAX_DEPTH` and
    /// `FERROUS_IOC_TRACE`, starting from the defaults.
    pub fn from_env() -> DiResult<Self> {
        Self::from_lookup(|key| env::var(format!("{}_{}", ENV_PREFIX, key)).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> DiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(label) = lookup("LABEL") {
            config.label = Some(label);
        }
        if let Some(depth) = lookup("MAX_DEPTH") {
            config.max_depth = depth
                .trim()
                .parse()
                .map_err(|_| DiError::Config(format!("MAX_DEPTH is not a positive integer: {}", depth)))?;
        }
        if let Some(trace) = lookup("TRACE") {
            config.trace_resolutions = match trace.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => return Err(DiError::Config(format!("TRACE is not a boolean: {}", other))),
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DiResult<()> {
        if self.max_depth == 0 {
            return Err(DiError::Config("max_depth must be greater than 0".to_string()));
        }
        Ok(())
    }

    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| DiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "config")]
    pub fn to_json(&self) -> DiResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DiError::Config(e.to_string()))
    }
}
