//! # Conveyor Station
//!
//! Ties the circuit to the things around it: the beam and sensor that feed it,
//! and the kicker that reads its result. A station tick applies queued wiring
//! edits, refreshes the sources from the product currently in the beam, runs
//! one propagation pass, and decides whether to kick.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::components::beam::Beam;
use crate::components::gate::{GateId, GateKind};
use crate::components::kicker::Kicker;
use crate::components::sensor::Sensor;
use crate::connection::{Circuit, WiringEdit};
use crate::engine::{PropagationEngine, PropagationReport, Scene};
use crate::pin::OutputPinId;
use crate::types::{Point, TriState};

/// Where the fixed parts of a station sit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationLayout {
    pub beam: Point,
    pub sensor: Point,
    pub kicker: Point,
    pub kicker_pin: Point,
}

impl Default for StationLayout {
    fn default() -> Self {
        Self {
            beam: Point::new(400.0, 600.0),
            sensor: Point::new(100.0, 100.0),
            kicker: Point::new(600.0, 650.0),
            kicker_pin: Point::new(720.0, 600.0),
        }
    }
}

/// An item riding the conveyor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub shape: String,
    #[serde(default)]
    pub content: String,
    /// Properties beyond the three named ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
    /// Whether a correct circuit should kick this product off the line.
    #[serde(default, rename = "kick")]
    pub should_kick: bool,
    #[serde(skip)]
    kicked: bool,
}

impl Product {
    pub fn new(
        color: impl Into<String>,
        shape: impl Into<String>,
        content: impl Into<String>,
        should_kick: bool,
    ) -> Self {
        Product {
            color: color.into(),
            shape: shape.into(),
            content: content.into(),
            extras: Vec::new(),
            should_kick,
            kicked: false,
        }
    }

    /// A product described only by a list of properties, as typed on the command line.
    ///
    /// The first three fill shape, color and content; the rest are kept as extras.
    pub fn from_properties<S: AsRef<str>>(properties: &[S]) -> Self {
        let mut product = Product::default();
        product.set_properties(properties);
        product
    }

    /// Replace every property, keeping the kick expectation and record.
    pub fn set_properties<S: AsRef<str>>(&mut self, properties: &[S]) {
        let mut names = properties
            .iter()
            .map(|p| p.as_ref().trim().to_ascii_lowercase());
        self.shape = names.next().unwrap_or_default();
        self.color = names.next().unwrap_or_default();
        self.content = names.next().unwrap_or_default();
        self.extras = names.collect();
    }

    /// Non-empty properties the sensor can see.
    pub fn properties(&self) -> Vec<&str> {
        [&self.shape, &self.color, &self.content]
            .into_iter()
            .chain(&self.extras)
            .map(|p| p.as_str())
            .filter(|p| !p.is_empty())
            .collect()
    }

    pub fn was_kicked(&self) -> bool {
        self.kicked
    }

    pub fn is_sorted_correctly(&self) -> bool {
        self.kicked == self.should_kick
    }
}

/// How many of `products` were kicked exactly when expected.
pub fn sorted_count(products: &[Product]) -> usize {
    products.iter().filter(|p| p.is_sorted_correctly()).count()
}

/// What happened during one station tick.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub tick: u64,
    pub edits_applied: usize,
    pub beam: bool,
    pub sink: TriState,
    pub kicked: bool,
    pub report: PropagationReport,
}

#[derive(Debug)]
pub struct ConveyorStation {
    name: String,
    description: String,
    circuit: Circuit,
    beam: Beam,
    sensor: Option<Sensor>,
    kicker: Kicker,
    engine: PropagationEngine,
    queued: Vec<WiringEdit>,
}

impl ConveyorStation {
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        layout: StationLayout,
        sensor_channels: Option<&[S]>,
    ) -> Self {
        let name = name.into();
        let mut circuit = Circuit::new();
        let beam = Beam::new(&mut circuit, layout.beam);
        let sensor = sensor_channels.map(|channels| Sensor::new(&mut circuit, layout.sensor, channels));
        let kicker = Kicker::new(&mut circuit, layout.kicker, layout.kicker_pin);
        info!(
            station = %name,
            channels = sensor.as_ref().map_or(0, |s| s.channels().len()),
            "station created"
        );
        ConveyorStation {
            name,
            description: String::new(),
            circuit,
            beam,
            sensor,
            kicker,
            engine: PropagationEngine::new(),
            queued: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Direct access for wiring between ticks.
    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    pub fn beam(&self) -> &Beam {
        &self.beam
    }

    pub fn sensor(&self) -> Option<&Sensor> {
        self.sensor.as_ref()
    }

    pub fn kicker(&self) -> &Kicker {
        &self.kicker
    }

    pub fn add_gate(&mut self, kind: GateKind, name: impl Into<String>, position: Point) -> GateId {
        self.circuit.add_gate(kind, name, position)
    }

    /// Queue a wiring edit for the start of the next tick.
    pub fn queue_edit(&mut self, edit: WiringEdit) {
        self.queued.push(edit);
    }

    pub fn queued_edits(&self) -> &[WiringEdit] {
        &self.queued
    }

    /// Beam pin first, then sensor channels in order.
    pub fn sources(&self) -> Vec<OutputPinId> {
        let mut sources = vec![self.beam.pin()];
        if let Some(sensor) = &self.sensor {
            sources.extend_from_slice(sensor.pins());
        }
        sources
    }

    pub fn ticks(&self) -> u64 {
        self.engine.ticks()
    }

    pub fn last_report(&self) -> Option<&PropagationReport> {
        self.engine.last_report()
    }

    pub fn sink_value(&self) -> TriState {
        self.kicker.value(&self.circuit)
    }

    /// Run one tick with `product` in the beam, or an empty beam.
    pub fn tick(&mut self, product: Option<&mut Product>) -> TickOutcome {
        self.kicker.settle();
        let edits_applied = self.circuit.apply_edits(self.queued.drain(..));
        if edits_applied > 0 {
            debug!(edits_applied, "wiring edits applied");
        }

        let in_beam = product.is_some();
        self.beam.set_item_touching(&mut self.circuit, in_beam);
        if let Some(sensor) = &self.sensor {
            sensor.reset(&mut self.circuit);
            if let Some(product) = product.as_deref() {
                sensor.activate(&mut self.circuit, &product.properties());
            }
        }

        let sources = self.sources();
        let gates = self.circuit.gate_ids();
        let report = self
            .engine
            .run(&mut self.circuit, Scene::new(&sources, &gates))
            .clone();

        let mut kicked = false;
        if let Some(product) = product {
            if !product.kicked && self.kicker.is_triggered(&self.circuit) {
                self.kicker.kick();
                product.kicked = true;
                kicked = true;
            }
        }

        TickOutcome {
            tick: self.engine.ticks(),
            edits_applied,
            beam: in_beam,
            sink: self.sink_value(),
            kicked,
            report,
        }
    }
}
