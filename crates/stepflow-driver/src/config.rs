//! # Driver Configuration
//!
//! [`DriverConfig`] controls how a plan is driven. Every field has a
//! default, so an empty JSON object is a valid configuration:
//!
//! ```
//! use stepflow_driver::DriverConfig;
//!
//! let config = DriverConfig::from_json(r#"{ "pump_steps": 8 }"#).unwrap();
//! assert_eq!(config.pump_steps, 8);
//! assert_eq!(config.max_recoveries, None);
//! ```

use serde::{Deserialize, Serialize};
use stepflow_core::StepflowError;

/// Upper bound accepted for [`DriverConfig::pump_steps`].
pub const MAX_PUMP_STEPS: usize = 1_000_000;

/// How the driver runs a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Unit items applied (one at a time, while the plan stays open) before
    /// `EndOfInput`. Zero sends `EndOfInput` straight away.
    pub pump_steps: usize,
    /// Maximum number of recovery actions one run may invoke. `None` is
    /// unbounded; `Some(0)` never recovers.
    pub max_recoveries: Option<u32>,
}

impl DriverConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(raw: &str) -> Result<Self, StepflowError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> Result<(), StepflowError> {
        if self.pump_steps > MAX_PUMP_STEPS {
            return Err(StepflowError::InvalidConfig(format!(
                "pump_steps ({}) must not exceed {MAX_PUMP_STEPS}",
                self.pump_steps
            )));
        }
        Ok(())
    }

    /// Set [`pump_steps`](Self::pump_steps).
    pub fn with_pump_steps(mut self, pump_steps: usize) -> Self {
        self.pump_steps = pump_steps;
        self
    }

    /// Set [`max_recoveries`](Self::max_recoveries).
    pub fn with_max_recoveries(mut self, max_recoveries: u32) -> Self {
        self.max_recoveries = Some(max_recoveries);
        self
    }

    /// Whether `used` recoveries leave room for one more.
    pub(crate) fn allows_recovery(&self, used: u32) -> bool {
        self.max_recoveries.map_or(true, |max| used < max)
    }
}
