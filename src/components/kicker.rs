use tracing::info;

use crate::connection::Circuit;
use crate::pin::InputPinId;
use crate::types::{Point, TriState};

/// The actuator at the end of the line. Kicks the product in the beam when
/// its input pin reads true.
#[derive(Debug, Clone)]
pub struct Kicker {
    position: Point,
    pin: InputPinId,
    kicking: bool,
    kicks: u64,
}

impl Kicker {
    /// Create the kicker with its trigger pin at `pin_location`.
    pub fn new(circuit: &mut Circuit, position: Point, pin_location: Point) -> Self {
        let pin = circuit.add_input_pin("kicker.in", pin_location);
        Kicker {
            position,
            pin,
            kicking: false,
            kicks: 0,
        }
    }

    pub fn pin(&self) -> InputPinId {
        self.pin
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn value(&self, circuit: &Circuit) -> TriState {
        circuit.input_value(self.pin)
    }

    /// Connected and true.
    pub fn is_triggered(&self, circuit: &Circuit) -> bool {
        circuit
            .input_pin(self.pin)
            .is_some_and(|p| p.is_connected() && p.value().is_true())
    }

    pub fn kick(&mut self) {
        self.kicking = true;
        self.kicks += 1;
        info!(kicks = self.kicks, "kick");
    }

    /// Called once the kick has played out.
    pub fn settle(&mut self) {
        self.kicking = false;
    }

    pub fn is_kicking(&self) -> bool {
        self.kicking
    }

    pub fn kicks(&self) -> u64 {
        self.kicks
    }
}
