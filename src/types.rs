use serde::{Deserialize, Serialize};
use std::fmt;

/// Signal carried by a pin. `Unknown` means nothing has been delivered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    #[default]
    Unknown,
    False,
    True,
}

impl TriState {
    pub fn to_str(&self) -> &'static str {
        match self {
            TriState::Unknown => "Unknown",
            TriState::False => "False",
            TriState::True => "True",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            TriState::Unknown => 'X',
            TriState::False => '0',
            TriState::True => '1',
        }
    }

    pub fn from_bool(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            TriState::Unknown => None,
            TriState::False => Some(false),
            TriState::True => Some(true),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TriState::Unknown)
    }

    pub fn is_true(&self) -> bool {
        matches!(self, TriState::True)
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        TriState::from_bool(value)
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Position in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn distance_squared(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Inside or on a circle of `radius` centred on `self`.
    pub fn within(&self, other: Point, radius: f64) -> bool {
        self.distance_squared(other) <= radius * radius
    }

    /// Strictly inside a circle of `radius` centred on `self`.
    pub fn strictly_within(&self, other: Point, radius: f64) -> bool {
        self.distance_squared(other) < radius * radius
    }
}

impl From<[f64; 2]> for Point {
    fn from(value: [f64; 2]) -> Self {
        Point::new(value[0], value[1])
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.0}, {:.0})", self.x, self.y)
    }
}
