use slotmap::new_key_type;
use std::fmt;

use crate::connection::ConnectorId;
use crate::types::{Point, TriState};

new_key_type! {
    /// Handle to an [`InputPin`] stored in a [`crate::connection::Circuit`].
    pub struct InputPinId;
    /// Handle to an [`OutputPin`] stored in a [`crate::connection::Circuit`].
    pub struct OutputPinId;
}

/// Radius around a pin centre that counts as a hit, in virtual pixels.
pub const PIN_RADIUS: f64 = 5.0;

/// Signal sink. Fed by at most one connector at a time.
#[derive(Debug, Clone)]
pub struct InputPin {
    name: String,
    value: TriState,
    connected: bool,
    line: Option<ConnectorId>,
    location: Point,
}

impl InputPin {
    pub fn new(name: impl Into<String>, location: Point) -> Self {
        InputPin {
            name: name.into(),
            value: TriState::Unknown,
            connected: false,
            line: None,
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> TriState {
        self.value
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Connected and carrying a known value; the precondition for a gate to fire.
    pub fn is_ready(&self) -> bool {
        self.connected && self.value.is_known()
    }

    /// The connector currently terminating here. May be stale; look it up before use.
    pub fn line(&self) -> Option<ConnectorId> {
        self.line
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn set_location(&mut self, location: Point) {
        self.location = location;
    }

    /// Whether `point` is on the pin. The rim counts.
    pub fn hit_test(&self, point: Point) -> bool {
        self.location.within(point, PIN_RADIUS)
    }

    /// Whether a wire end dropped at `point` is caught. The rim does not count.
    pub fn catches(&self, point: Point) -> bool {
        self.location.strictly_within(point, PIN_RADIUS)
    }

    /// Overwrite the signal, as a delivery from the feeding output does.
    pub fn receive(&mut self, value: TriState, connected: bool) {
        self.value = value;
        self.connected = connected;
    }

    pub(crate) fn attach(&mut self, line: ConnectorId, value: TriState, connected: bool) {
        self.line = Some(line);
        self.connected = connected;
        self.value = if connected { value } else { TriState::Unknown };
    }

    /// Forget the feeding connector and fall back to `Unknown`.
    pub(crate) fn detach(&mut self) {
        self.line = None;
        self.value = TriState::Unknown;
        self.connected = false;
    }
}

impl fmt::Display for InputPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)?;
        if !self.connected {
            write!(f, " (unconnected)")?;
        }
        Ok(())
    }
}

/// Signal source. Owns every connector dragged out of it.
#[derive(Debug, Clone)]
pub struct OutputPin {
    name: String,
    value: TriState,
    connected: bool,
    connectors: Vec<ConnectorId>,
    location: Point,
}

impl OutputPin {
    pub fn new(name: impl Into<String>, location: Point) -> Self {
        OutputPin {
            name: name.into(),
            value: TriState::Unknown,
            connected: false,
            connectors: Vec::new(),
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> TriState {
        self.value
    }

    pub fn set_value(&mut self, value: TriState) {
        self.value = value;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Set a known value and mark the pin connected.
    pub fn drive(&mut self, value: bool) {
        self.value = TriState::from_bool(value);
        self.connected = true;
    }

    /// Owned connectors, oldest first.
    pub fn connectors(&self) -> &[ConnectorId] {
        &self.connectors
    }

    /// The most recently created connector, which stays free until caught.
    pub fn newest_connector(&self) -> Option<ConnectorId> {
        self.connectors.last().copied()
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn set_location(&mut self, location: Point) {
        self.location = location;
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.location.within(point, PIN_RADIUS)
    }

    pub(crate) fn push_connector(&mut self, connector: ConnectorId) {
        self.connectors.push(connector);
    }
}

impl fmt::Display for OutputPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)?;
        if !self.connected {
            write!(f, " (unconnected)")?;
        }
        write!(f, " [{} connectors]", self.connectors.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_pin_creation() {
        let pin = InputPin::new("and.a", Point::new(10.0, 20.0));
        assert_eq!(pin.name(), "and.a");
        assert_eq!(pin.value(), TriState::Unknown);
        assert!(!pin.is_connected());
        assert!(!pin.is_ready());
        assert!(pin.line().is_none());
    }

    #[test]
    fn test_input_pin_hit_test() {
        let pin = InputPin::new("a", Point::new(100.0, 150.0));
        assert!(pin.hit_test(Point::new(96.0, 150.0)));
        assert!(pin.hit_test(Point::new(95.0, 150.0)));
        assert!(pin.hit_test(Point::new(100.0, 155.0)));
        assert!(!pin.hit_test(Point::new(94.0, 150.0)));
    }

    #[test]
    fn test_input_pin_catch_excludes_rim() {
        let pin = InputPin::new("a", Point::new(100.0, 150.0));
        assert!(pin.catches(Point::new(96.0, 150.0)));
        assert!(!pin.catches(Point::new(95.0, 150.0)));
    }

    #[test]
    fn test_output_pin_hit_test_includes_rim() {
        let pin = OutputPin::new("y", Point::new(100.0, 150.0));
        assert!(pin.hit_test(Point::new(105.0, 150.0)));
        assert!(!pin.hit_test(Point::new(105.5, 150.0)));
    }

    #[test]
    fn test_input_pin_ready_needs_known_value() {
        let mut pin = InputPin::new("a", Point::default());
        pin.receive(TriState::Unknown, true);
        assert!(!pin.is_ready());
        pin.receive(TriState::False, true);
        assert!(pin.is_ready());
        pin.receive(TriState::True, false);
        assert!(!pin.is_ready());
    }

    #[test]
    fn test_output_pin_drive() {
        let mut pin = OutputPin::new("beam.out", Point::default());
        assert!(!pin.is_connected());
        pin.drive(true);
        assert_eq!(pin.value(), TriState::True);
        assert!(pin.is_connected());
        assert!(pin.newest_connector().is_none());
    }
}
