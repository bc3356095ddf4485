//! YAML loop configuration.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```yaml
//! setpoint: 1.0
//! kp: 0.8
//! ti: 0.5
//! period_s: 0.02
//! cycles: 250
//! on_unbound: skip_cycle
//! plant:
//!   tau: 0.3
//!   gain: 2.0
//! ```

use std::fs;
use std::path::Path;

use lt_core::Real;
use lt_shim::UnboundOutputPolicy;
use serde::{Deserialize, Serialize};

use crate::control_loop::CyclePolicy;
use crate::error::{LoopError, LoopResult};
use crate::law::PiLaw;
use crate::period::LoopPeriod;

/// Host loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    pub setpoint: Real,
    pub kp: Real,
    pub ti: Real,
    pub out_min: Real,
    pub out_max: Real,
    pub period_s: Real,
    pub cycles: u64,
    /// Label printed by the feedback shim.
    pub source_label: String,
    /// Label printed by the output shim.
    pub output_label: String,
    /// What the loop does when a shim reports a missing controller.
    pub on_unbound: CyclePolicy,
    /// What the output shim does while unbound.
    pub unbound_output: UnboundOutputPolicy,
    pub plant: PlantConfig,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            setpoint: 1.0,
            kp: 0.8,
            ti: 0.5,
            out_min: -1.0,
            out_max: 1.0,
            period_s: 0.02,
            cycles: 250,
            source_label: "plant_sensor".to_string(),
            output_label: "plant_drive".to_string(),
            on_unbound: CyclePolicy::default(),
            unbound_output: UnboundOutputPolicy::default(),
            plant: PlantConfig::default(),
        }
    }
}

/// Simulated plant settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    pub tau: Real,
    pub gain: Real,
    pub rate_limit: Real,
    pub initial: Real,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            tau: 0.3,
            gain: 2.0,
            rate_limit: 5.0,
            initial: 0.0,
        }
    }
}

impl LoopConfig {
    /// Parse and validate a YAML document. Missing fields take defaults.
    pub fn from_yaml_str(text: &str) -> LoopResult<Self> {
        let config: Self = serde_yaml::from_str(text).map_err(|e| LoopError::ConfigLoad {
            path: "<inline>".to_string(),
            what: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    ///
    /// # Errors
    ///
    /// [`LoopError::ConfigLoad`] if the file cannot be read or parsed,
    /// [`LoopError::InvalidConfig`] or [`LoopError::Core`] if a value is out
    /// of range.
    pub fn load(path: &Path) -> LoopResult<Self> {
        let load_err = |what: String| LoopError::ConfigLoad {
            path: path.display().to_string(),
            what,
        };
        let text = fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let config: Self = serde_yaml::from_str(&text).map_err(|e| load_err(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LoopResult<()> {
        if !self.setpoint.is_finite() {
            return Err(LoopError::InvalidConfig {
                what: "setpoint must be finite".to_string(),
            });
        }
        if self.cycles == 0 {
            return Err(LoopError::InvalidConfig {
                what: "cycles must be at least 1".to_string(),
            });
        }
        if self.source_label.is_empty() || self.output_label.is_empty() {
            return Err(LoopError::InvalidConfig {
                what: "shim labels must not be empty".to_string(),
            });
        }
        self.law()?;
        self.period()?;
        Ok(())
    }

    pub fn law(&self) -> LoopResult<PiLaw> {
        Ok(PiLaw::new(self.kp, self.ti, self.out_min, self.out_max)?)
    }

    pub fn period(&self) -> LoopResult<LoopPeriod> {
        Ok(LoopPeriod::new(self.period_s)?)
    }
}
