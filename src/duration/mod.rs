//! Human-readable duration strings such as `1d7h30m` or `1.5s`.

mod parser;
mod units;

pub use parser::{parse_duration, parse_duration_ms};
pub use units::{unit_scale, UnitDefinition, UNIT_TABLE};
