use crate::foundation::error::{TableauError, TableauResult};

/// Environment variable overriding [`GameOpts::max_delta_ms`].
pub const MAX_DELTA_ENV: &str = "TABLEAU_MAX_DELTA_MS";

/// Frame-loop options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameOpts {
    /// Surface clear color as straight RGBA8; `None` clears to transparent.
    pub clear_rgba: Option<[u8; 4]>,
    /// Upper clamp for a frame delta, in milliseconds.
    pub max_delta_ms: f64,
}

impl Default for GameOpts {
    fn default() -> Self {
        Self {
            clear_rgba: None,
            max_delta_ms: 250.0,
        }
    }
}

impl GameOpts {
    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; unparsable or non-positive values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(MAX_DELTA_ENV)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
        {
            self.max_delta_ms = v;
        }
        self
    }

    /// Check option domains.
    pub fn validate(&self) -> TableauResult<()> {
        if !self.max_delta_ms.is_finite() || self.max_delta_ms <= 0.0 {
            return Err(TableauError::invalid_parameter(format!(
                "max_delta_ms must be positive, got {}",
                self.max_delta_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/game/opts.rs"]
mod tests;
