//! # Logic Gates
//!
//! Gates are a tagged variant over the five supported kinds. The rule for each
//! kind is a pure function of the current input values; latches report "hold"
//! instead of producing outputs when their firing condition is not met, so the
//! caller keeps their previous outputs untouched.
//!
//! | Kind      | Inputs    | Outputs  |
//! |-----------|-----------|----------|
//! | AND / OR  | `a`, `b`  | `y`      |
//! | NOT       | `a`       | `y`      |
//! | SR latch  | `s`, `r`  | `q`, `qn`|
//! | D latch   | `d`, `clk`| `q`, `qn`|

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

use crate::pin::{InputPinId, OutputPinId};
use crate::types::Point;

new_key_type! {
    /// Handle to a [`Gate`] placed in a [`crate::connection::Circuit`].
    pub struct GateId;
}

/// Length of the lead drawn between a gate body and its pin.
pub const LEAD_LENGTH: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    And,
    Or,
    Not,
    SrLatch,
    DLatch,
}

impl GateKind {
    pub const ALL: [GateKind; 5] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Not,
        GateKind::SrLatch,
        GateKind::DLatch,
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            GateKind::And => "and",
            GateKind::Or => "or",
            GateKind::Not => "not",
            GateKind::SrLatch => "sr_latch",
            GateKind::DLatch => "d_latch",
        }
    }

    /// Parse a configuration type name. Case-insensitive, accepts a few aliases.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "and" => Some(GateKind::And),
            "or" => Some(GateKind::Or),
            "not" | "inverter" => Some(GateKind::Not),
            "sr_latch" | "sr" | "srflipflop" | "sr_flip_flop" => Some(GateKind::SrLatch),
            "d_latch" | "d" | "dflipflop" | "d_flip_flop" => Some(GateKind::DLatch),
            _ => None,
        }
    }

    pub fn input_names(&self) -> &'static [&'static str] {
        match self {
            GateKind::And | GateKind::Or => &["a", "b"],
            GateKind::Not => &["a"],
            GateKind::SrLatch => &["s", "r"],
            GateKind::DLatch => &["d", "clk"],
        }
    }

    pub fn output_names(&self) -> &'static [&'static str] {
        match self {
            GateKind::And | GateKind::Or | GateKind::Not => &["y"],
            GateKind::SrLatch | GateKind::DLatch => &["q", "qn"],
        }
    }

    pub fn input_arity(&self) -> usize {
        self.input_names().len()
    }

    pub fn output_arity(&self) -> usize {
        self.output_names().len()
    }

    pub fn is_latch(&self) -> bool {
        matches!(self, GateKind::SrLatch | GateKind::DLatch)
    }

    /// Body width and height in virtual pixels.
    pub fn size(&self) -> (f64, f64) {
        match self {
            GateKind::And | GateKind::Or => (75.0, 50.0),
            GateKind::Not => (50.0, 50.0),
            GateKind::SrLatch | GateKind::DLatch => (50.0, 75.0),
        }
    }

    /// Pin positions relative to the gate centre: `(inputs, outputs)`.
    pub fn pin_offsets(&self) -> (Vec<Point>, Vec<Point>) {
        let (w, h) = self.size();
        let left = -w / 2.0 - LEAD_LENGTH;
        let right = w / 2.0 + LEAD_LENGTH;
        match self {
            GateKind::And => (
                vec![Point::new(left, h / 4.0), Point::new(left, -h / 4.0)],
                // the AND body is drawn with a rounded nose, so its lead is longer
                vec![Point::new(w / 2.0 + 3.0 * LEAD_LENGTH, 0.0)],
            ),
            GateKind::Or => (
                vec![Point::new(left, h / 4.0), Point::new(left, -h / 4.0)],
                vec![Point::new(right, 0.0)],
            ),
            GateKind::Not => (vec![Point::new(left, 0.0)], vec![Point::new(right, 0.0)]),
            GateKind::SrLatch | GateKind::DLatch => (
                vec![Point::new(left, -h / 4.0), Point::new(left, h / 4.0)],
                vec![Point::new(right, -h / 4.0), Point::new(right, h / 4.0)],
            ),
        }
    }

    /// Apply the gate rule to known input values.
    ///
    /// Returns `None` when a latch holds, otherwise one value per output pin.
    /// `inputs` must have exactly [`GateKind::input_arity`] entries.
    pub fn evaluate(&self, inputs: &[bool]) -> Option<Vec<bool>> {
        if inputs.len() != self.input_arity() {
            return None;
        }
        match self {
            GateKind::And => Some(vec![inputs[0] && inputs[1]]),
            GateKind::Or => Some(vec![inputs[0] || inputs[1]]),
            GateKind::Not => Some(vec![!inputs[0]]),
            GateKind::SrLatch => match (inputs[0], inputs[1]) {
                (true, false) => Some(vec![true, false]),
                (false, true) => Some(vec![false, true]),
                // both set is illegal, both clear is idle: hold either way
                _ => None,
            },
            GateKind::DLatch => {
                let (d, clk) = (inputs[0], inputs[1]);
                if clk {
                    Some(vec![d, !d])
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Not => "NOT",
            GateKind::SrLatch => "SR",
            GateKind::DLatch => "D",
        };
        write!(f, "{}", label)
    }
}

/// What a call to evaluate a gate did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// At least one input was unconnected or unknown; outputs untouched.
    NotReady,
    /// Inputs were ready but the latch condition was not met; outputs untouched.
    Held,
    /// Outputs were overwritten and marked connected.
    Fired,
}

/// A placed gate. Its pins live in the circuit arena.
#[derive(Debug, Clone)]
pub struct Gate {
    kind: GateKind,
    name: String,
    position: Point,
    inputs: Vec<InputPinId>,
    outputs: Vec<OutputPinId>,
}

impl Gate {
    pub(crate) fn new(
        kind: GateKind,
        name: String,
        position: Point,
        inputs: Vec<InputPinId>,
        outputs: Vec<OutputPinId>,
    ) -> Self {
        Gate {
            kind,
            name,
            position,
            inputs,
            outputs,
        }
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn inputs(&self) -> &[InputPinId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputPinId] {
        &self.outputs
    }

    pub fn input(&self, name: &str) -> Option<InputPinId> {
        self.kind
            .input_names()
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .and_then(|i| self.inputs.get(i).copied())
    }

    pub fn output(&self, name: &str) -> Option<OutputPinId> {
        self.kind
            .output_names()
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .and_then(|i| self.outputs.get(i).copied())
    }

    /// Body hit test against the gate rectangle.
    pub fn hit_test(&self, point: Point) -> bool {
        let (w, h) = self.kind.size();
        let x = point.x - self.position.x + w / 2.0;
        let y = point.y - self.position.y + h / 2.0;
        x >= 0.0 && y >= 0.0 && x < w && y < h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        let arities: Vec<(usize, usize)> = GateKind::ALL
            .iter()
            .map(|k| (k.input_arity(), k.output_arity()))
            .collect();
        assert_eq!(arities, vec![(2, 1), (2, 1), (1, 1), (2, 2), (2, 2)]);
    }

    #[test]
    fn test_combinational_truth_tables() {
        for a in [false, true] {
            assert_eq!(GateKind::Not.evaluate(&[a]), Some(vec![!a]));
            for b in [false, true] {
                assert_eq!(GateKind::And.evaluate(&[a, b]), Some(vec![a && b]));
                assert_eq!(GateKind::Or.evaluate(&[a, b]), Some(vec![a || b]));
            }
        }
    }

    #[test]
    fn test_sr_latch_rule() {
        assert_eq!(GateKind::SrLatch.evaluate(&[true, false]), Some(vec![true, false]));
        assert_eq!(GateKind::SrLatch.evaluate(&[false, true]), Some(vec![false, true]));
        assert_eq!(GateKind::SrLatch.evaluate(&[true, true]), None);
        assert_eq!(GateKind::SrLatch.evaluate(&[false, false]), None);
    }

    #[test]
    fn test_d_latch_rule() {
        assert_eq!(GateKind::DLatch.evaluate(&[true, true]), Some(vec![true, false]));
        assert_eq!(GateKind::DLatch.evaluate(&[false, true]), Some(vec![false, true]));
        assert_eq!(GateKind::DLatch.evaluate(&[true, false]), None);
        assert_eq!(GateKind::DLatch.evaluate(&[false, false]), None);
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        assert_eq!(GateKind::And.evaluate(&[true]), None);
        assert_eq!(GateKind::Not.evaluate(&[true, true]), None);
    }

    #[test]
    fn test_type_names() {
        for kind in GateKind::ALL {
            assert_eq!(GateKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(GateKind::from_type_name("SRFlipFlop"), Some(GateKind::SrLatch));
        assert_eq!(GateKind::from_type_name(" D "), Some(GateKind::DLatch));
        assert_eq!(GateKind::from_type_name("xor"), None);
    }

    #[test]
    fn test_pin_offsets_match_arity() {
        for kind in GateKind::ALL {
            let (inputs, outputs) = kind.pin_offsets();
            assert_eq!(inputs.len(), kind.input_arity());
            assert_eq!(outputs.len(), kind.output_arity());
        }
    }
}
