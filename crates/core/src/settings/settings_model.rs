//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{Error, Result};

/// What the valuator does when a held position has no close price for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum MissingPricePolicy {
    /// Market value and variation become `Unknown` and a data gap is recorded.
    #[default]
    MarkUnknown,
    /// Reuse the instrument's most recent earlier close. Falls back to
    /// `MarkUnknown` when no earlier close exists.
    CarryForward,
    /// Abort the instrument with a `DataGapError`.
    Fail,
}

impl MissingPricePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingPricePolicy::MarkUnknown => "markUnknown",
            MissingPricePolicy::CarryForward => "carryForward",
            MissingPricePolicy::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineSettings {
    pub missing_price_policy: MissingPricePolicy,
    /// Run the per-instrument stages on the rayon thread pool.
    pub parallel: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            missing_price_policy: MissingPricePolicy::default(),
            parallel: true,
        }
    }
}

impl EngineSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        Ok(settings)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Settings(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn with_missing_price_policy(mut self, policy: MissingPricePolicy) -> Self {
        self.missing_price_policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
