use tracing::debug;

use crate::connection::Circuit;
use crate::pin::OutputPinId;
use crate::types::{Point, TriState};

/// Horizontal offset of the channel pins from the sensor position.
const CHANNEL_PIN_X: f64 = 285.0;
/// Vertical offset of the first channel pin.
const CHANNEL_PIN_Y: f64 = 137.0;
/// Vertical spacing between channel pins.
const CHANNEL_SPACING: f64 = 40.0;

/// Camera sensor with one output channel per property it can recognise
/// (a shape, a colour, or a content picture).
#[derive(Debug, Clone)]
pub struct Sensor {
    position: Point,
    channels: Vec<String>,
    pins: Vec<OutputPinId>,
}

impl Sensor {
    pub fn new<S: AsRef<str>>(circuit: &mut Circuit, position: Point, channels: &[S]) -> Self {
        let mut names = Vec::with_capacity(channels.len());
        let mut pins = Vec::with_capacity(channels.len());
        for (i, channel) in channels.iter().enumerate() {
            let name = channel.as_ref().trim().to_ascii_lowercase();
            let location = position.offset(
                CHANNEL_PIN_X,
                CHANNEL_PIN_Y + CHANNEL_SPACING * i as f64,
            );
            let pin = circuit.add_output_pin(format!("sensor.{}", name), location);
            if let Some(out) = circuit.output_pin_mut(pin) {
                out.drive(false);
            }
            names.push(name);
            pins.push(pin);
        }
        Sensor {
            position,
            channels: names,
            pins,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn pins(&self) -> &[OutputPinId] {
        &self.pins
    }

    pub fn pin(&self, channel: &str) -> Option<OutputPinId> {
        self.channels
            .iter()
            .position(|c| c.eq_ignore_ascii_case(channel))
            .map(|i| self.pins[i])
    }

    /// Raise every channel matching one of `properties`. Other channels are left alone.
    pub fn activate<S: AsRef<str>>(&self, circuit: &mut Circuit, properties: &[S]) {
        for property in properties {
            if let Some(pin) = self.pin(property.as_ref()) {
                if let Some(out) = circuit.output_pin_mut(pin) {
                    out.drive(true);
                }
                debug!(channel = property.as_ref(), "sensor channel active");
            }
        }
    }

    /// Drop every channel back to false.
    pub fn reset(&self, circuit: &mut Circuit) {
        for pin in &self.pins {
            if let Some(out) = circuit.output_pin_mut(*pin) {
                out.drive(false);
            }
        }
    }

    pub fn set_channel(&self, circuit: &mut Circuit, channel: &str, value: bool) -> bool {
        match self.pin(channel).and_then(|pin| circuit.output_pin_mut(pin)) {
            Some(out) => {
                out.drive(value);
                true
            }
            None => false,
        }
    }

    pub fn values(&self, circuit: &Circuit) -> Vec<TriState> {
        self.pins.iter().map(|p| circuit.output_value(*p)).collect()
    }
}
