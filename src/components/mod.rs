pub mod beam;
pub mod gate;
pub mod kicker;
pub mod sensor;
