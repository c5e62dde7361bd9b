//! Duration string parsing.
//!
//! A duration string is a run of segments with no separator between them,
//! e.g. `1d7h30m` or `1.5s`. Each segment is a number followed by a unit
//! symbol; unit characters are absorbed until the next digit starts a new
//! segment. A segment with no unit counts as seconds.

use tracing::trace;

use super::units::unit_scale;
use crate::error::{PostlimitError, Result};

/// Where the scanner is within the current segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    ReadingInteger,
    ReadingDecimal,
    ReadingUnit,
}

/// Accumulator for the segment currently being read.
#[derive(Debug)]
struct Segment {
    integer: f64,
    decimal: f64,
    divisor: f64,
    unit: String,
}

impl Segment {
    fn new() -> Self {
        Self {
            integer: 0.0,
            decimal: 0.0,
            divisor: 1.0,
            unit: String::new(),
        }
    }

    fn push_integer(&mut self, digit: u32) {
        self.integer = self.integer * 10.0 + f64::from(digit);
    }

    fn push_decimal(&mut self, digit: u32) {
        self.divisor *= 10.0;
        self.decimal += f64::from(digit) / self.divisor;
    }

    /// Value of the segment in milliseconds.
    fn millis(&self) -> Result<f64> {
        let scale = unit_scale(&self.unit)
            .ok_or_else(|| PostlimitError::InvalidUnit(self.unit.clone()))?;
        Ok((self.integer + self.decimal) * scale)
    }
}

/// Parse a duration string and express it in `output_unit`.
///
/// An empty string is zero. Fails with [`PostlimitError::InvalidUnit`] when
/// `output_unit` or any unit inside `spec` is not recognized.
///
/// ```
/// use postlimit::duration::parse_duration;
///
/// assert_eq!(parse_duration("1d7h", "s").unwrap(), 111600.0);
/// assert_eq!(parse_duration("1.5s", "ms").unwrap(), 1500.0);
/// ```
pub fn parse_duration(spec: &str, output_unit: &str) -> Result<f64> {
    let output_scale = unit_scale(output_unit)
        .ok_or_else(|| PostlimitError::InvalidUnit(output_unit.to_string()))?;

    let mut total = 0.0;
    let mut segment = Segment::new();
    let mut state = ScanState::ReadingInteger;

    for ch in spec.chars() {
        match ch.to_digit(10) {
            Some(digit) => match state {
                ScanState::ReadingDecimal => segment.push_decimal(digit),
                ScanState::ReadingUnit => {
                    total += segment.millis()?;
                    segment = Segment::new();
                    segment.push_integer(digit);
                    state = ScanState::ReadingInteger;
                }
                ScanState::ReadingInteger => segment.push_integer(digit),
            },
            None if ch == '.' => state = ScanState::ReadingDecimal,
            None => {
                segment.unit.push(ch);
                state = ScanState::ReadingUnit;
            }
        }
    }
    total += segment.millis()?;

    trace!(spec = %spec, total_ms = total, output_unit = %output_unit, "Parsed duration");

    Ok(total / output_scale)
}

/// Parse a duration string into milliseconds.
pub fn parse_duration_ms(spec: &str) -> Result<f64> {
    parse_duration(spec, "ms")
}
