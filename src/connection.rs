//! # Wiring
//!
//! The [`Circuit`] arena owns every pin, connector and gate. Output pins own
//! their connectors; input pins and connectors refer to each other only by id,
//! and every id is looked up (and may be found dead) before it is used.
//!
//! Every output pin always has a free connector at the end of its list. When
//! that connector is caught on an input pin, the output pin is handed a new
//! free one, so one source can fan out to any number of inputs.

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace, warn};

use crate::components::gate::{Evaluation, Gate, GateId, GateKind};
use crate::pin::{InputPin, InputPinId, OutputPin, OutputPinId};
use crate::types::{Point, TriState};

new_key_type! {
    /// Handle to a [`Connector`] stored in a [`Circuit`].
    pub struct ConnectorId;
}

/// A wire from one output pin towards at most one input pin.
#[derive(Debug, Clone)]
pub struct Connector {
    owner: OutputPinId,
    terminus: Option<InputPinId>,
    drag_end: Option<Point>,
}

impl Connector {
    fn new(owner: OutputPinId) -> Self {
        Connector {
            owner,
            terminus: None,
            drag_end: None,
        }
    }

    pub fn owner(&self) -> OutputPinId {
        self.owner
    }

    /// The input pin this wire is caught on, if any.
    pub fn terminus(&self) -> Option<InputPinId> {
        self.terminus
    }

    pub fn is_free(&self) -> bool {
        self.terminus.is_none()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_end.is_some()
    }

    /// Where the loose end is while the user drags it.
    pub fn drag_end(&self) -> Option<Point> {
        self.drag_end
    }
}

/// A wiring change requested between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WiringEdit {
    Connect {
        connector: ConnectorId,
        input: InputPinId,
    },
    Disconnect {
        connector: ConnectorId,
    },
    Drag {
        connector: ConnectorId,
        point: Point,
    },
    Release {
        connector: ConnectorId,
    },
    Catch {
        connector: ConnectorId,
        point: Point,
    },
}

/// Arena holding the whole wiring graph.
#[derive(Debug, Default)]
pub struct Circuit {
    inputs: SlotMap<InputPinId, InputPin>,
    outputs: SlotMap<OutputPinId, OutputPin>,
    connectors: SlotMap<ConnectorId, Connector>,
    gates: SlotMap<GateId, Gate>,
    placement: Vec<GateId>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- pins ----

    pub fn add_input_pin(&mut self, name: impl Into<String>, location: Point) -> InputPinId {
        self.inputs.insert(InputPin::new(name, location))
    }

    /// Create an output pin together with its first free connector.
    pub fn add_output_pin(&mut self, name: impl Into<String>, location: Point) -> OutputPinId {
        let id = self.outputs.insert(OutputPin::new(name, location));
        self.grant_connector(id);
        id
    }

    pub fn input_pin(&self, id: InputPinId) -> Option<&InputPin> {
        self.inputs.get(id)
    }

    pub fn input_pin_mut(&mut self, id: InputPinId) -> Option<&mut InputPin> {
        self.inputs.get_mut(id)
    }

    pub fn output_pin(&self, id: OutputPinId) -> Option<&OutputPin> {
        self.outputs.get(id)
    }

    pub fn output_pin_mut(&mut self, id: OutputPinId) -> Option<&mut OutputPin> {
        self.outputs.get_mut(id)
    }

    pub fn input_pins(&self) -> impl Iterator<Item = (InputPinId, &InputPin)> {
        self.inputs.iter()
    }

    pub fn output_pins(&self) -> impl Iterator<Item = (OutputPinId, &OutputPin)> {
        self.outputs.iter()
    }

    /// Value of an input pin, `Unknown` if the id is dead.
    pub fn input_value(&self, id: InputPinId) -> TriState {
        self.inputs.get(id).map_or(TriState::Unknown, |p| p.value())
    }

    /// Value of an output pin, `Unknown` if the id is dead.
    pub fn output_value(&self, id: OutputPinId) -> TriState {
        self.outputs.get(id).map_or(TriState::Unknown, |p| p.value())
    }

    // ---- connectors ----

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(id)
    }

    pub fn connectors(&self) -> impl Iterator<Item = (ConnectorId, &Connector)> {
        self.connectors.iter()
    }

    /// The free connector a user would drag out of `output`.
    pub fn free_connector(&self, output: OutputPinId) -> Option<ConnectorId> {
        self.outputs.get(output).and_then(|p| p.newest_connector())
    }

    /// Input pins currently fed by `output`, in connector order.
    pub fn fed_inputs(&self, output: OutputPinId) -> Vec<InputPinId> {
        let Some(pin) = self.outputs.get(output) else {
            return Vec::new();
        };
        pin.connectors()
            .iter()
            .filter_map(|c| self.connectors.get(*c))
            .filter_map(|c| c.terminus)
            .collect()
    }

    /// The output pin driving `input`, if its connector is still alive.
    pub fn source_of(&self, input: InputPinId) -> Option<OutputPinId> {
        let line = self.inputs.get(input)?.line()?;
        let connector = self.connectors.get(line)?;
        (connector.terminus == Some(input)).then_some(connector.owner)
    }

    fn grant_connector(&mut self, owner: OutputPinId) -> ConnectorId {
        let id = self.connectors.insert(Connector::new(owner));
        if let Some(pin) = self.outputs.get_mut(owner) {
            pin.push_connector(id);
        }
        id
    }

    /// Clear a connector's terminus, reverting that input pin to `Unknown`.
    fn release_terminus(&mut self, connector: ConnectorId) {
        let Some(wire) = self.connectors.get_mut(connector) else {
            return;
        };
        if let Some(input) = wire.terminus.take() {
            if let Some(pin) = self.inputs.get_mut(input) {
                if pin.line() == Some(connector) {
                    pin.detach();
                }
            }
            debug!(?connector, ?input, "connector released");
        }
    }

    /// Terminate `connector` at `input`.
    ///
    /// Whatever previously fed `input` is cut off, and whatever `connector`
    /// previously fed loses it. The owning output pin receives a fresh free
    /// connector. Returns `false` only for dead ids.
    pub fn connect(&mut self, connector: ConnectorId, input: InputPinId) -> bool {
        if !self.inputs.contains_key(input) {
            warn!(?input, "connect to unknown input pin ignored");
            return false;
        }
        let Some(owner) = self.connectors.get(connector).map(|c| c.owner) else {
            warn!(?connector, "connect with unknown connector ignored");
            return false;
        };

        if let Some(wire) = self.connectors.get_mut(connector) {
            wire.drag_end = None;
            if wire.terminus == Some(input) {
                return true;
            }
        }
        self.release_terminus(connector);

        if let Some(old) = self.inputs.get(input).and_then(|p| p.line()) {
            if let Some(wire) = self.connectors.get_mut(old) {
                if wire.terminus == Some(input) {
                    wire.terminus = None;
                    debug!(connector = ?old, ?input, "previous connector detached");
                }
            }
        }

        let (value, connected) = self
            .outputs
            .get(owner)
            .map_or((TriState::Unknown, false), |p| (p.value(), p.is_connected()));
        if let Some(wire) = self.connectors.get_mut(connector) {
            wire.terminus = Some(input);
        }
        if let Some(pin) = self.inputs.get_mut(input) {
            pin.attach(connector, value, connected);
        }
        // only the free newest connector needs replacing
        if self.free_connector(owner) == Some(connector) {
            self.grant_connector(owner);
        }
        debug!(?connector, ?input, ?owner, "connector caught");
        true
    }

    /// Cut a connector loose from its input pin.
    pub fn disconnect(&mut self, connector: ConnectorId) -> bool {
        if !self.connectors.contains_key(connector) {
            warn!(?connector, "disconnect of unknown connector ignored");
            return false;
        }
        self.release_terminus(connector);
        true
    }

    /// Catch `connector` on the first input pin within hit radius of `point`.
    pub fn catch(&mut self, connector: ConnectorId, point: Point) -> Option<InputPinId> {
        let target = self
            .inputs
            .iter()
            .find(|(_, pin)| pin.catches(point))
            .map(|(id, _)| id)?;
        self.connect(connector, target).then_some(target)
    }

    /// The free connector of the output pin under `point`, where a drag starts.
    pub fn hit_connector(&self, point: Point) -> Option<ConnectorId> {
        self.outputs
            .values()
            .find(|pin| pin.hit_test(point))
            .and_then(|pin| pin.newest_connector())
    }

    /// Move the loose end of a connector. Any current catch is released.
    pub fn drag_connector(&mut self, connector: ConnectorId, point: Point) -> bool {
        if !self.connectors.contains_key(connector) {
            warn!(?connector, "drag of unknown connector ignored");
            return false;
        }
        self.release_terminus(connector);
        if let Some(wire) = self.connectors.get_mut(connector) {
            wire.drag_end = Some(point);
        }
        trace!(?connector, %point, "connector dragged");
        true
    }

    /// Drop a dragged connector, catching whatever input pin lies under its end.
    pub fn release_connector(&mut self, connector: ConnectorId) -> Option<InputPinId> {
        let end = self.connectors.get_mut(connector)?.drag_end.take()?;
        self.catch(connector, end)
    }

    pub fn apply(&mut self, edit: WiringEdit) -> bool {
        match edit {
            WiringEdit::Connect { connector, input } => self.connect(connector, input),
            WiringEdit::Disconnect { connector } => self.disconnect(connector),
            WiringEdit::Drag { connector, point } => self.drag_connector(connector, point),
            WiringEdit::Release { connector } => self.release_connector(connector).is_some(),
            WiringEdit::Catch { connector, point } => self.catch(connector, point).is_some(),
        }
    }

    /// Apply queued edits in order; returns how many took effect.
    pub fn apply_edits(&mut self, edits: impl IntoIterator<Item = WiringEdit>) -> usize {
        edits.into_iter().filter(|edit| self.apply(*edit)).count()
    }

    /// Copy `output`'s value and connected flag onto every input it feeds.
    ///
    /// Returns the input pins that received the value.
    pub fn deliver(&mut self, output: OutputPinId) -> Vec<InputPinId> {
        let Some(pin) = self.outputs.get(output) else {
            return Vec::new();
        };
        let (value, connected) = (pin.value(), pin.is_connected());
        let targets = self.fed_inputs(output);
        for input in &targets {
            if let Some(pin) = self.inputs.get_mut(*input) {
                pin.receive(value, connected);
            }
        }
        targets
    }

    // ---- gates ----

    /// Place a gate centred on `position`, creating its pins.
    pub fn add_gate(&mut self, kind: GateKind, name: impl Into<String>, position: Point) -> GateId {
        let name = name.into();
        let (input_offsets, output_offsets) = kind.pin_offsets();
        let inputs = kind
            .input_names()
            .iter()
            .zip(input_offsets)
            .map(|(pin, off)| {
                self.add_input_pin(format!("{}.{}", name, pin), position.offset(off.x, off.y))
            })
            .collect();
        let outputs = kind
            .output_names()
            .iter()
            .zip(output_offsets)
            .map(|(pin, off)| {
                self.add_output_pin(format!("{}.{}", name, pin), position.offset(off.x, off.y))
            })
            .collect();
        let id = self
            .gates
            .insert(Gate::new(kind, name.clone(), position, inputs, outputs));
        self.placement.push(id);
        debug!(gate = %name, %kind, %position, "gate placed");
        id
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id)
    }

    pub fn gate_by_name(&self, name: &str) -> Option<GateId> {
        self.placement
            .iter()
            .copied()
            .find(|id| self.gates.get(*id).is_some_and(|g| g.name() == name))
    }

    /// Placed gates in placement order.
    pub fn gate_ids(&self) -> Vec<GateId> {
        self.placement.clone()
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Move a gate and its pins to a new centre.
    pub fn move_gate(&mut self, id: GateId, position: Point) -> bool {
        let Some(gate) = self.gates.get_mut(id) else {
            return false;
        };
        gate.set_position(position);
        let (input_offsets, output_offsets) = gate.kind().pin_offsets();
        for (pin, off) in gate.inputs().iter().zip(input_offsets) {
            if let Some(pin) = self.inputs.get_mut(*pin) {
                pin.set_location(position.offset(off.x, off.y));
            }
        }
        for (pin, off) in gate.outputs().iter().zip(output_offsets) {
            if let Some(pin) = self.outputs.get_mut(*pin) {
                pin.set_location(position.offset(off.x, off.y));
            }
        }
        true
    }

    /// The gate whose body contains `point`, topmost (latest placed) first.
    pub fn hit_gate(&self, point: Point) -> Option<GateId> {
        self.placement
            .iter()
            .rev()
            .copied()
            .find(|id| self.gates.get(*id).is_some_and(|g| g.hit_test(point)))
    }

    /// Remove a gate with its pins and every connector its outputs own.
    pub fn remove_gate(&mut self, id: GateId) -> bool {
        let Some(gate) = self.gates.remove(id) else {
            return false;
        };
        self.placement.retain(|g| *g != id);

        for input in gate.inputs() {
            if let Some(line) = self.inputs.get(*input).and_then(|p| p.line()) {
                if let Some(wire) = self.connectors.get_mut(line) {
                    if wire.terminus == Some(*input) {
                        wire.terminus = None;
                    }
                }
            }
            self.inputs.remove(*input);
        }
        for output in gate.outputs() {
            if let Some(pin) = self.outputs.remove(*output) {
                for connector in pin.connectors() {
                    self.release_terminus(*connector);
                    self.connectors.remove(*connector);
                }
            }
        }
        debug!(gate = %gate.name(), "gate removed");
        true
    }

    /// Evaluate one gate against the current values of its input pins.
    ///
    /// Outputs are only written when every input is connected and known and
    /// the gate rule does not hold.
    pub fn evaluate_gate(&mut self, id: GateId) -> Evaluation {
        let Some(gate) = self.gates.get(id) else {
            warn!(?id, "evaluate of unknown gate ignored");
            return Evaluation::NotReady;
        };
        let mut values = Vec::with_capacity(gate.inputs().len());
        for input in gate.inputs() {
            match self.inputs.get(*input) {
                Some(pin) if pin.is_ready() => values.push(pin.value().is_true()),
                _ => return Evaluation::NotReady,
            }
        }
        let Some(results) = gate.kind().evaluate(&values) else {
            trace!(gate = %gate.name(), "latch holds");
            return Evaluation::Held;
        };
        for (output, value) in gate.outputs().iter().zip(results) {
            if let Some(pin) = self.outputs.get_mut(*output) {
                pin.drive(value);
            }
        }
        trace!(gate = %gate.name(), "gate fired");
        Evaluation::Fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(circuit: &mut Circuit, value: bool) -> OutputPinId {
        let out = circuit.add_output_pin("src", Point::default());
        circuit.output_pin_mut(out).unwrap().drive(value);
        out
    }

    #[test]
    fn test_output_pin_starts_with_one_free_connector() {
        let mut circuit = Circuit::new();
        let out = circuit.add_output_pin("src", Point::default());
        let pin = circuit.output_pin(out).unwrap();
        assert_eq!(pin.connectors().len(), 1);
        let free = circuit.free_connector(out).unwrap();
        assert!(circuit.connector(free).unwrap().is_free());
        assert_eq!(circuit.connector(free).unwrap().owner(), out);
    }

    #[test]
    fn test_pin_connection() {
        let mut circuit = Circuit::new();
        let out = source(&mut circuit, true);
        let input = circuit.add_input_pin("in", Point::default());
        let wire = circuit.free_connector(out).unwrap();

        assert!(circuit.connect(wire, input));

        let pin = circuit.input_pin(input).unwrap();
        assert_eq!(pin.line(), Some(wire));
        assert!(pin.is_connected());
        assert_eq!(pin.value(), TriState::True);
        assert_eq!(circuit.source_of(input), Some(out));

        // a new free connector was granted and it is the newest
        let pin = circuit.output_pin(out).unwrap();
        assert_eq!(pin.connectors().len(), 2);
        let fresh = circuit.free_connector(out).unwrap();
        assert_ne!(fresh, wire);
        assert!(circuit.connector(fresh).unwrap().is_free());
    }

    #[test]
    fn test_connect_to_unconnected_owner_stays_unknown() {
        let mut circuit = Circuit::new();
        let out = circuit.add_output_pin("gate.y", Point::default());
        let input = circuit.add_input_pin("in", Point::default());
        let wire = circuit.free_connector(out).unwrap();
        circuit.connect(wire, input);
        let pin = circuit.input_pin(input).unwrap();
        assert!(!pin.is_connected());
        assert_eq!(pin.value(), TriState::Unknown);
    }

    #[test]
    fn test_pin_disconnection() {
        let mut circuit = Circuit::new();
        let out = source(&mut circuit, true);
        let input = circuit.add_input_pin("in", Point::default());
        let wire = circuit.free_connector(out).unwrap();
        circuit.connect(wire, input);

        assert!(circuit.disconnect(wire));

        assert!(circuit.connector(wire).unwrap().is_free());
        let pin = circuit.input_pin(input).unwrap();
        assert!(pin.line().is_none());
        assert!(!pin.is_connected());
        assert_eq!(pin.value(), TriState::Unknown);
        assert!(circuit.fed_inputs(out).is_empty());
    }

    #[test]
    fn test_new_catch_detaches_previous_source() {
        let mut circuit = Circuit::new();
        let first = source(&mut circuit, true);
        let second = source(&mut circuit, false);
        let input = circuit.add_input_pin("in", Point::default());

        let old = circuit.free_connector(first).unwrap();
        circuit.connect(old, input);
        let new = circuit.free_connector(second).unwrap();
        circuit.connect(new, input);

        assert!(circuit.connector(old).unwrap().terminus().is_none());
        assert_eq!(circuit.connector(new).unwrap().terminus(), Some(input));
        assert_eq!(circuit.source_of(input), Some(second));
        assert_eq!(circuit.input_value(input), TriState::False);
        assert!(circuit.fed_inputs(first).is_empty());
    }

    #[test]
    fn test_recatching_connector_releases_old_input() {
        let mut circuit = Circuit::new();
        let out = source(&mut circuit, true);
        let a = circuit.add_input_pin("a", Point::default());
        let b = circuit.add_input_pin("b", Point::default());
        let wire = circuit.free_connector(out).unwrap();
        circuit.connect(wire, a);
        circuit.connect(wire, b);

        let a_pin = circuit.input_pin(a).unwrap();
        assert!(!a_pin.is_connected());
        assert_eq!(a_pin.value(), TriState::Unknown);
        assert_eq!(circuit.input_value(b), TriState::True);
        assert_eq!(circuit.output_pin(out).unwrap().connectors().len(), 2);
    }

    #[test]
    fn test_recatch_does_not_pile_up_free_connectors() {
        let mut circuit = Circuit::new();
        let out = source(&mut circuit, true);
        let inputs: Vec<InputPinId> = (0..4)
            .map(|i| circuit.add_input_pin(format!("in{}", i), Point::default()))
            .collect();
        let wire = circuit.free_connector(out).unwrap();
        for input in &inputs {
            circuit.connect(wire, *input);
        }

        let pin = circuit.output_pin(out).unwrap();
        assert_eq!(pin.connectors().len(), 2);
        let newest = circuit.free_connector(out).unwrap();
        assert_ne!(newest, wire);
        assert!(circuit.connector(newest).unwrap().is_free());
        assert_eq!(circuit.fed_inputs(out), vec![inputs[3]]);
    }

    #[test]
    fn test_fan_out_delivery() {
        let mut circuit = Circuit::new();
        let out = source(&mut circuit, false);
        let targets: Vec<_> = (0..3)
            .map(|i| circuit.add_input_pin(format!("in{}", i), Point::default()))
            .collect();
        for input in &targets {
            let wire = circuit.free_connector(out).unwrap();
            circuit.connect(wire, *input);
        }

        circuit.output_pin_mut(out).unwrap().drive(true);
        let delivered = circuit.deliver(out);

        assert_eq!(delivered, targets);
        for input in targets {
            let pin = circuit.input_pin(input).unwrap();
            assert_eq!(pin.value(), TriState::True);
            assert!(pin.is_connected());
        }
        assert_eq!(circuit.output_pin(out).unwrap().connectors().len(), 4);
    }

    #[test]
    fn test_deliver_from_dangling_connector_is_empty() {
        let mut circuit = Circuit::new();
        let out = source(&mut circuit, true);
        assert!(circuit.deliver(out).is_empty());
    }

    #[test]
    fn test_drag_and_release_catches_within_radius() {
        let mut circuit = Circuit::new();
        let out = circuit.add_output_pin("src", Point::new(0.0, 0.0));
        circuit.output_pin_mut(out).unwrap().drive(true);
        let input = circuit.add_input_pin("in", Point::new(100.0, 150.0));

        let wire = circuit.hit_connector(Point::new(2.0, 1.0)).unwrap();
        assert!(circuit.drag_connector(wire, Point::new(94.0, 150.0)));
        assert!(circuit.connector(wire).unwrap().is_dragging());
        assert_eq!(circuit.release_connector(wire), None);
        assert!(!circuit.connector(wire).unwrap().is_dragging());

        circuit.drag_connector(wire, Point::new(97.0, 151.0));
        assert_eq!(circuit.release_connector(wire), Some(input));
        assert_eq!(circuit.input_value(input), TriState::True);
    }

    #[test]
    fn test_rim_starts_a_drag_but_does_not_catch() {
        let mut circuit = Circuit::new();
        let out = circuit.add_output_pin("src", Point::new(0.0, 0.0));
        let input = circuit.add_input_pin("in", Point::new(100.0, 150.0));

        let wire = circuit.hit_connector(Point::new(5.0, 0.0)).unwrap();
        assert_eq!(circuit.connector(wire).unwrap().owner(), out);
        assert!(circuit.input_pin(input).unwrap().hit_test(Point::new(95.0, 150.0)));

        circuit.drag_connector(wire, Point::new(95.0, 150.0));
        assert_eq!(circuit.release_connector(wire), None);
        assert!(circuit.connector(wire).unwrap().is_free());
    }

    #[test]
    fn test_dragging_caught_connector_releases_it() {
        let mut circuit = Circuit::new();
        let out = source(&mut circuit, true);
        let input = circuit.add_input_pin("in", Point::new(50.0, 50.0));
        let wire = circuit.free_connector(out).unwrap();
        circuit.connect(wire, input);

        circuit.drag_connector(wire, Point::new(300.0, 300.0));
        assert!(!circuit.input_pin(input).unwrap().is_connected());
        assert_eq!(circuit.release_connector(wire), None);
    }

    #[test]
    fn test_queued_edits() {
        let mut circuit = Circuit::new();
        let out = source(&mut circuit, true);
        let input = circuit.add_input_pin("in", Point::new(10.0, 10.0));
        let wire = circuit.free_connector(out).unwrap();
        let edits = vec![
            WiringEdit::Catch {
                connector: wire,
                point: Point::new(500.0, 500.0),
            },
            WiringEdit::Catch {
                connector: wire,
                point: Point::new(11.0, 10.0),
            },
        ];
        assert_eq!(circuit.apply_edits(edits), 1);
        assert_eq!(circuit.source_of(input), Some(out));
    }

    #[test]
    fn test_stale_ids_are_ignored() {
        let mut circuit = Circuit::new();
        let gate = circuit.add_gate(GateKind::And, "and", Point::default());
        let input = circuit.gate(gate).unwrap().inputs()[0];
        let out = source(&mut circuit, true);
        let wire = circuit.free_connector(out).unwrap();
        circuit.remove_gate(gate);

        assert!(!circuit.connect(wire, input));
        assert_eq!(circuit.evaluate_gate(gate), Evaluation::NotReady);
        assert!(!circuit.move_gate(gate, Point::default()));
        assert!(!circuit.remove_gate(gate));
    }

    #[test]
    fn test_remove_gate_releases_downstream_inputs() {
        let mut circuit = Circuit::new();
        let not = circuit.add_gate(GateKind::Not, "inv", Point::default());
        let y = circuit.gate(not).unwrap().outputs()[0];
        let sink = circuit.add_input_pin("sink", Point::default());
        let wire = circuit.free_connector(y).unwrap();
        circuit.connect(wire, sink);
        circuit.input_pin_mut(sink).unwrap().receive(TriState::True, true);

        assert!(circuit.remove_gate(not));

        let pin = circuit.input_pin(sink).unwrap();
        assert!(!pin.is_connected());
        assert_eq!(pin.value(), TriState::Unknown);
        assert!(circuit.connector(wire).is_none());
        assert_eq!(circuit.gate_count(), 0);
        assert!(circuit.gate_ids().is_empty());
    }

    #[test]
    fn test_move_gate_moves_pins() {
        let mut circuit = Circuit::new();
        let not = circuit.add_gate(GateKind::Not, "inv", Point::new(0.0, 0.0));
        circuit.move_gate(not, Point::new(100.0, 100.0));
        let input = circuit.gate(not).unwrap().inputs()[0];
        assert_eq!(
            circuit.input_pin(input).unwrap().location(),
            Point::new(55.0, 100.0)
        );
        assert_eq!(circuit.hit_gate(Point::new(110.0, 90.0)), Some(not));
        assert_eq!(circuit.hit_gate(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_evaluate_gate_unconnected_is_noop() {
        let mut circuit = Circuit::new();
        let and = circuit.add_gate(GateKind::And, "and", Point::default());
        assert_eq!(circuit.evaluate_gate(and), Evaluation::NotReady);
        let y = circuit.gate(and).unwrap().outputs()[0];
        assert_eq!(circuit.output_value(y), TriState::Unknown);
        assert!(!circuit.output_pin(y).unwrap().is_connected());
    }

    #[test]
    fn test_evaluate_gate_fires() {
        let mut circuit = Circuit::new();
        let and = circuit.add_gate(GateKind::And, "and", Point::default());
        let gate = circuit.gate(and).unwrap().clone();
        circuit
            .input_pin_mut(gate.inputs()[0])
            .unwrap()
            .receive(TriState::True, true);
        circuit
            .input_pin_mut(gate.inputs()[1])
            .unwrap()
            .receive(TriState::False, true);

        assert_eq!(circuit.evaluate_gate(and), Evaluation::Fired);
        let y = circuit.output_pin(gate.outputs()[0]).unwrap();
        assert_eq!(y.value(), TriState::False);
        assert!(y.is_connected());
    }
}
