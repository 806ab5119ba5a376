#![warn(missing_docs)]
//! Configuration surface and factories wiring the veld learning core to
//! its environments.
pub mod config;
pub mod factory;

pub use config::{load_agents, AgentSpec, MethodKind, ScheduleChoice};
pub use factory::{BatchLimits, EnvKind};
