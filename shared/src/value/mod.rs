pub mod coerce;
pub mod typed_value;
