//! A host control loop for exercising looptrace shims.
//!
//! The loop owns its feedback and output endpoints, runs a PI law against a
//! shared setpoint, and decides what an unbound shim means for a cycle
//! ([`CyclePolicy`]). A first-order [`SimulatedPlant`] provides endpoints so
//! the whole chain can run without hardware.
//!
//! # Construction
//!
//! ```
//! use std::sync::Arc;
//! use lt_loop::{LoopConfig, SimulatedPlant, assemble};
//! use lt_shim::MemorySink;
//!
//! let config = LoopConfig::default();
//! let plant = SimulatedPlant::from_config(&config.plant).unwrap();
//! let sink = MemorySink::new();
//!
//! // Shims first, then the loop that owns them, then bind.
//! let mut control = assemble(&config, &plant, Arc::new(sink.clone())).unwrap();
//! control.bind_shims();
//!
//! control.step().unwrap();
//! assert!(sink.lines().iter().any(|l| l.starts_with("sp=1.000 src=0.000")));
//! ```

pub mod assembly;
pub mod config;
pub mod control_loop;
pub mod error;
pub mod law;
pub mod period;
pub mod plant;
pub mod setpoint;

pub use assembly::{TracedLoop, assemble};
pub use config::{LoopConfig, PlantConfig};
pub use control_loop::{ControlLoop, CycleOutcome, CyclePolicy, CycleReport, LoopSummary};
pub use error::{LoopError, LoopResult};
pub use law::{PiLaw, PiState};
pub use period::{CycleClock, LoopPeriod};
pub use plant::{PlantDrive, PlantModel, PlantSensor, SimulatedPlant};
pub use setpoint::SetpointHandle;
