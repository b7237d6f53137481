use crate::connection::Circuit;
use crate::pin::OutputPinId;
use crate::types::{Point, TriState};

/// Offset of the beam's output pin from the beam position, clear of the kicker's feet.
pub const BEAM_PIN_OFFSET: f64 = 105.0;

/// Light beam across the conveyor. Its single output reads true while a
/// product interrupts it.
#[derive(Debug, Clone)]
pub struct Beam {
    position: Point,
    pin: OutputPinId,
    item_touching: bool,
}

impl Beam {
    /// Create the beam and its output pin, which is always connected.
    pub fn new(circuit: &mut Circuit, position: Point) -> Self {
        let pin = circuit.add_output_pin("beam.out", position.offset(BEAM_PIN_OFFSET, 0.0));
        if let Some(out) = circuit.output_pin_mut(pin) {
            out.drive(false);
        }
        Beam {
            position,
            pin,
            item_touching: false,
        }
    }

    pub fn pin(&self) -> OutputPinId {
        self.pin
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_item_touching(&self) -> bool {
        self.item_touching
    }

    pub fn set_item_touching(&mut self, circuit: &mut Circuit, touching: bool) {
        self.item_touching = touching;
        if let Some(out) = circuit.output_pin_mut(self.pin) {
            out.drive(touching);
        }
    }

    pub fn value(&self, circuit: &Circuit) -> TriState {
        circuit.output_value(self.pin)
    }
}
