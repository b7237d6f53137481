//! # Propagation Engine
//!
//! One call to [`propagate`] is one tick. Values flow in waves: the frontier
//! of output pins is delivered over its connectors, then every pending gate
//! whose input pins have all been reached this tick is evaluated, and the
//! outputs of those gates form the next frontier. The pass stops when a wave
//! fires no gate.
//!
//! Each gate leaves the pending set the first time it is evaluated, so it
//! fires at most once per tick and the pass always terminates. A gate whose
//! inputs can only be reached through its own outputs stays pending and keeps
//! its previous outputs; feedback therefore takes effect one tick later.

use std::collections::HashSet;

use tracing::trace;

use crate::components::gate::{Evaluation, GateId};
use crate::connection::Circuit;
use crate::pin::{InputPinId, OutputPinId};

/// What to evaluate during one tick.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Output pins whose values are set from outside before the tick.
    pub sources: &'a [OutputPinId],
    /// Gates taking part in the tick.
    pub gates: &'a [GateId],
}

impl<'a> Scene<'a> {
    pub fn new(sources: &'a [OutputPinId], gates: &'a [GateId]) -> Self {
        Scene { sources, gates }
    }
}

/// Outcome of one propagation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Number of waves in which at least one gate was evaluated.
    pub waves: usize,
    /// Every gate evaluated this tick, in evaluation order, with what it did.
    pub evaluated: Vec<(GateId, Evaluation)>,
    /// Gates never reached this tick.
    pub pending: Vec<GateId>,
    /// Number of input pins that received a value.
    pub satisfied: usize,
}

impl PropagationReport {
    pub fn fired(&self) -> impl Iterator<Item = GateId> + '_ {
        self.evaluated
            .iter()
            .filter(|(_, e)| *e == Evaluation::Fired)
            .map(|(g, _)| *g)
    }

    pub fn was_evaluated(&self, gate: GateId) -> bool {
        self.evaluated.iter().any(|(g, _)| *g == gate)
    }

    pub fn evaluation_of(&self, gate: GateId) -> Option<Evaluation> {
        self.evaluated
            .iter()
            .find(|(g, _)| *g == gate)
            .map(|(_, e)| *e)
    }
}

/// Run one forward pass over `scene`.
pub fn propagate(circuit: &mut Circuit, scene: Scene<'_>) -> PropagationReport {
    let mut report = PropagationReport::default();
    let mut frontier: Vec<OutputPinId> = scene.sources.to_vec();
    let mut satisfied: HashSet<InputPinId> = HashSet::new();
    let mut pending: Vec<GateId> = scene.gates.to_vec();

    while !frontier.is_empty() {
        for output in frontier.drain(..) {
            satisfied.extend(circuit.deliver(output));
        }

        let mut fired_this_wave = false;
        let mut next = Vec::new();
        pending.retain(|gate_id| {
            let Some(gate) = circuit.gate(*gate_id) else {
                return false;
            };
            if !gate.inputs().iter().all(|pin| satisfied.contains(pin)) {
                return true;
            }
            next.extend_from_slice(gate.outputs());
            let evaluation = circuit.evaluate_gate(*gate_id);
            report.evaluated.push((*gate_id, evaluation));
            fired_this_wave = true;
            false
        });

        if fired_this_wave {
            report.waves += 1;
            trace!(wave = report.waves, outputs = next.len(), "wave evaluated");
        }
        frontier = next;
    }

    report.pending = pending;
    report.satisfied = satisfied.len();
    report
}

/// Convenience wrapper that owns nothing but remembers the last report.
#[derive(Debug, Default)]
pub struct PropagationEngine {
    ticks: u64,
    last_report: Option<PropagationReport>,
}

impl PropagationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&mut self, circuit: &mut Circuit, scene: Scene<'_>) -> &PropagationReport {
        let report = propagate(circuit, scene);
        self.ticks += 1;
        trace!(
            tick = self.ticks,
            waves = report.waves,
            evaluated = report.evaluated.len(),
            pending = report.pending.len(),
            "propagation complete"
        );
        self.last_report.insert(report)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_report(&self) -> Option<&PropagationReport> {
        self.last_report.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::gate::GateKind;
    use crate::types::{Point, TriState};

    fn source(circuit: &mut Circuit, name: &str, value: bool) -> OutputPinId {
        let out = circuit.add_output_pin(name, Point::default());
        circuit.output_pin_mut(out).unwrap().drive(value);
        out
    }

    fn wire(circuit: &mut Circuit, from: OutputPinId, to: InputPinId) {
        let connector = circuit.free_connector(from).unwrap();
        assert!(circuit.connect(connector, to));
    }

    #[test]
    fn test_not_and_chain_takes_two_waves() {
        let mut circuit = Circuit::new();
        let s = source(&mut circuit, "s", true);
        let one = source(&mut circuit, "one", true);
        let not = circuit.add_gate(GateKind::Not, "inv", Point::default());
        let and = circuit.add_gate(GateKind::And, "and", Point::default());
        let sink = circuit.add_input_pin("sink", Point::default());

        let not_gate = circuit.gate(not).unwrap().clone();
        let and_gate = circuit.gate(and).unwrap().clone();
        wire(&mut circuit, s, not_gate.inputs()[0]);
        wire(&mut circuit, not_gate.outputs()[0], and_gate.inputs()[0]);
        wire(&mut circuit, one, and_gate.inputs()[1]);
        wire(&mut circuit, and_gate.outputs()[0], sink);

        let gates = circuit.gate_ids();
        let report = propagate(&mut circuit, Scene::new(&[s, one], &gates));

        assert_eq!(report.waves, 2);
        assert_eq!(report.evaluated, vec![(not, Evaluation::Fired), (and, Evaluation::Fired)]);
        assert!(report.pending.is_empty());
        let sink_pin = circuit.input_pin(sink).unwrap();
        assert_eq!(sink_pin.value(), TriState::False);
        assert!(sink_pin.is_connected());
    }

    #[test]
    fn test_unwired_gate_stays_pending() {
        let mut circuit = Circuit::new();
        let s = source(&mut circuit, "s", true);
        let and = circuit.add_gate(GateKind::And, "and", Point::default());
        let a = circuit.gate(and).unwrap().inputs()[0];
        wire(&mut circuit, s, a);

        let gates = circuit.gate_ids();
        let report = propagate(&mut circuit, Scene::new(&[s], &gates));

        assert_eq!(report.waves, 0);
        assert_eq!(report.pending, vec![and]);
        let y = circuit.gate(and).unwrap().outputs()[0];
        assert_eq!(circuit.output_value(y), TriState::Unknown);
    }

    #[test]
    fn test_feedback_loop_terminates_and_holds() {
        let mut circuit = Circuit::new();
        let s = source(&mut circuit, "s", true);
        let or = circuit.add_gate(GateKind::Or, "or", Point::default());
        let gate = circuit.gate(or).unwrap().clone();
        wire(&mut circuit, s, gate.inputs()[0]);
        wire(&mut circuit, gate.outputs()[0], gate.inputs()[1]);

        let gates = circuit.gate_ids();
        for _ in 0..3 {
            let report = propagate(&mut circuit, Scene::new(&[s], &gates));
            assert_eq!(report.pending, vec![or]);
        }
        assert_eq!(circuit.output_value(gate.outputs()[0]), TriState::Unknown);
    }

    #[test]
    fn test_no_sources_does_nothing() {
        let mut circuit = Circuit::new();
        let not = circuit.add_gate(GateKind::Not, "inv", Point::default());
        let gates = circuit.gate_ids();
        let report = propagate(&mut circuit, Scene::new(&[], &gates));
        assert_eq!(report, PropagationReport {
            pending: vec![not],
            ..Default::default()
        });
    }

    #[test]
    fn test_engine_counts_ticks() {
        let mut circuit = Circuit::new();
        let s = source(&mut circuit, "s", false);
        let mut engine = PropagationEngine::new();
        engine.run(&mut circuit, Scene::new(&[s], &[]));
        engine.run(&mut circuit, Scene::new(&[s], &[]));
        assert_eq!(engine.ticks(), 2);
        assert_eq!(engine.last_report().map(|r| r.waves), Some(0));
    }
}
