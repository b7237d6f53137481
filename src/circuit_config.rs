//! # JSON Circuit Configuration
//!
//! Levels are described in JSON: which sensor channels exist, which gates are
//! placed where, and how their pins are wired. [`CircuitFactory`] turns such a
//! file into a ready [`ConveyorStation`].
//!
//! ## Usage
//!
//! ```no_run
//! use conveyor_logic::circuit_config::CircuitFactory;
//!
//! let factory = CircuitFactory::new();
//! let station = factory.create_from_json("configs/level1_beam.json").expect("Could not load level!");
//! println!("Loaded {} with {} gates", station.name(), station.circuit().gate_count());
//! ```
//!
//! ## Configuration File Format
//!
//! ```json
//! {
//!   "name": "level1",
//!   "description": "NOT in front of the kicker",
//!   "sensor": { "channels": ["basketball", "square"] },
//!   "gates": {
//!     "inv": { "gate_type": "not", "position": [300, 200] }
//!   },
//!   "wires": {
//!     "beam_to_inv": {
//!       "source": {"component": "beam", "pin": "out"},
//!       "targets": [{"component": "inv", "pin": "a"}]
//!     }
//!   }
//! }
//! ```
//!
//! `beam`, `sensor` and `kicker` are reserved component names. The beam has
//! one output `out`, the sensor one output per channel, the kicker one input
//! `in`. Gate pins are named as in [`crate::components::gate`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

use crate::components::gate::GateKind;
use crate::error::ConfigError;
use crate::pin::{InputPinId, OutputPinId};
use crate::systems::conveyor_station::{ConveyorStation, Product, StationLayout};
use crate::types::Point;

pub const BEAM: &str = "beam";
pub const SENSOR: &str = "sensor";
pub const KICKER: &str = "kicker";

/// A whole level: fixed parts, placed gates and wiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub layout: Option<StationLayout>,
    #[serde(default)]
    pub sensor: Option<SensorConfig>,
    #[serde(default)]
    pub gates: BTreeMap<String, GateConfig>,
    #[serde(default)]
    pub wires: BTreeMap<String, WireConfig>,
    /// Products the level feeds through the beam, in order.
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub gate_type: String,
    #[serde(default)]
    pub position: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireConfig {
    pub source: PinReference,
    pub targets: Vec<PinReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinReference {
    pub component: String,
    pub pin: String,
}

impl PinReference {
    pub fn new(component: impl Into<String>, pin: impl Into<String>) -> Self {
        PinReference {
            component: component.into(),
            pin: pin.into(),
        }
    }

    fn unknown(&self) -> ConfigError {
        ConfigError::UnknownPin {
            component: self.component.clone(),
            pin: self.pin.clone(),
        }
    }
}

/// Builds stations from configuration.
#[derive(Debug, Default)]
pub struct CircuitFactory {
    layout: StationLayout,
}

impl CircuitFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout used when a configuration does not carry its own.
    pub fn with_layout(layout: StationLayout) -> Self {
        CircuitFactory { layout }
    }

    pub fn create_from_json(&self, json_path: impl AsRef<Path>) -> Result<ConveyorStation, ConfigError> {
        let config = load_json_config(json_path)?;
        self.create_from_config(&config)
    }

    pub fn create_from_str(&self, json: &str) -> Result<ConveyorStation, ConfigError> {
        let config: CircuitConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                path: "<inline>".into(),
                source,
            })?;
        self.create_from_config(&config)
    }

    pub fn create_from_config(&self, config: &CircuitConfig) -> Result<ConveyorStation, ConfigError> {
        let layout = config.layout.unwrap_or(self.layout);
        let channels = config.sensor.as_ref().map(|s| s.channels.as_slice());
        let mut station = ConveyorStation::new(config.name.clone(), layout, channels)
            .with_description(config.description.clone());

        self.place_gates(config, &mut station)?;
        self.connect_wires(config, &mut station)?;

        info!(
            station = %config.name,
            gates = config.gates.len(),
            wires = config.wires.len(),
            "circuit loaded"
        );
        Ok(station)
    }

    fn place_gates(&self, config: &CircuitConfig, station: &mut ConveyorStation) -> Result<(), ConfigError> {
        for (name, gate) in &config.gates {
            if is_reserved(name) || station.circuit().gate_by_name(name).is_some() {
                return Err(ConfigError::DuplicateComponent(name.clone()));
            }
            let kind = GateKind::from_type_name(&gate.gate_type)
                .ok_or_else(|| ConfigError::UnknownGateType(gate.gate_type.clone()))?;
            station.add_gate(kind, name.clone(), Point::from(gate.position));
            debug!(gate = %name, %kind, "gate placed");
        }
        Ok(())
    }

    fn connect_wires(&self, config: &CircuitConfig, station: &mut ConveyorStation) -> Result<(), ConfigError> {
        for (wire_id, wire) in &config.wires {
            let source = resolve_output(station, &wire.source)?;
            for target in &wire.targets {
                let input = resolve_input(station, target)?;
                let circuit = station.circuit_mut();
                let connector = circuit
                    .free_connector(source)
                    .ok_or_else(|| wire.source.unknown())?;
                circuit.connect(connector, input);
            }
            debug!(wire = %wire_id, targets = wire.targets.len(), "wire connected");
        }
        Ok(())
    }
}

pub fn load_json_config(path: impl AsRef<Path>) -> Result<CircuitConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn is_reserved(name: &str) -> bool {
    [BEAM, SENSOR, KICKER]
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

fn resolve_output(station: &ConveyorStation, pin: &PinReference) -> Result<OutputPinId, ConfigError> {
    let component = pin.component.to_ascii_lowercase();
    match component.as_str() {
        BEAM if pin.pin.eq_ignore_ascii_case("out") => Ok(station.beam().pin()),
        BEAM | KICKER => Err(pin.unknown()),
        SENSOR => {
            let sensor = station
                .sensor()
                .ok_or_else(|| ConfigError::MissingSensor(pin.pin.clone()))?;
            sensor.pin(&pin.pin).ok_or_else(|| pin.unknown())
        }
        _ => {
            let circuit = station.circuit();
            let gate = circuit
                .gate_by_name(&pin.component)
                .and_then(|id| circuit.gate(id))
                .ok_or_else(|| ConfigError::UnknownComponent(pin.component.clone()))?;
            gate.output(&pin.pin).ok_or_else(|| pin.unknown())
        }
    }
}

fn resolve_input(station: &ConveyorStation, pin: &PinReference) -> Result<InputPinId, ConfigError> {
    let component = pin.component.to_ascii_lowercase();
    match component.as_str() {
        KICKER if pin.pin.eq_ignore_ascii_case("in") => Ok(station.kicker().pin()),
        BEAM | SENSOR | KICKER => Err(pin.unknown()),
        _ => {
            let circuit = station.circuit();
            let gate = circuit
                .gate_by_name(&pin.component)
                .and_then(|id| circuit.gate(id))
                .ok_or_else(|| ConfigError::UnknownComponent(pin.component.clone()))?;
            gate.input(&pin.pin).ok_or_else(|| pin.unknown())
        }
    }
}
