//! # Conveyor Logic Library
//!
//! Signal propagation and gate evaluation for a conveyor sorting station.
//!
//! This library provides:
//! - Tri-state input and output pins wired by fan-out connectors
//! - AND, OR, NOT, SR latch and D latch gates with pure evaluation rules
//! - A wavefront propagation engine that evaluates each gate at most once per tick
//! - The beam, sensor and kicker that feed and read a circuit, tied together by a station loop
//! - JSON level configuration and a terminal monitor

pub mod circuit_config;
pub mod components;
pub mod connection;
pub mod console;
pub mod engine;
pub mod error;
pub mod pin;
pub mod systems;
pub mod types;

// Re-export commonly used items for easier importing
pub use components::gate::{Evaluation, Gate, GateId, GateKind};
pub use connection::{Circuit, Connector, ConnectorId, WiringEdit};
pub use engine::{propagate, PropagationEngine, PropagationReport, Scene};
pub use error::ConfigError;
pub use pin::{InputPin, InputPinId, OutputPin, OutputPinId};
pub use systems::conveyor_station::{ConveyorStation, Product, TickOutcome};
pub use types::{Point, TriState};
