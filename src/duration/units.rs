//! Unit symbols accepted in duration strings.

/// A unit symbol and how many milliseconds one instance of it represents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDefinition {
    /// Symbol as written after the number. The empty symbol means seconds.
    pub symbol: &'static str,
    /// Scale factor in milliseconds
    pub millis: f64,
}

/// Every recognized unit, scaled to milliseconds.
pub static UNIT_TABLE: &[UnitDefinition] = &[
    UnitDefinition { symbol: "", millis: 1_000.0 },
    UnitDefinition { symbol: "ms", millis: 1.0 },
    UnitDefinition { symbol: "s", millis: 1_000.0 },
    UnitDefinition { symbol: "m", millis: 60_000.0 },
    UnitDefinition { symbol: "h", millis: 3_600_000.0 },
    UnitDefinition { symbol: "d", millis: 86_400_000.0 },
];

/// Look up the millisecond scale of a unit symbol.
pub fn unit_scale(symbol: &str) -> Option<f64> {
    UNIT_TABLE
        .iter()
        .find(|unit| unit.symbol == symbol)
        .map(|unit| unit.millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_symbol_is_seconds() {
        assert_eq!(unit_scale(""), unit_scale("s"));
        assert_eq!(unit_scale(""), Some(1_000.0));
    }

    #[test]
    fn test_known_scales() {
        assert_eq!(unit_scale("ms"), Some(1.0));
        assert_eq!(unit_scale("m"), Some(60_000.0));
        assert_eq!(unit_scale("h"), Some(3_600_000.0));
        assert_eq!(unit_scale("d"), Some(86_400_000.0));
    }

    #[test]
    fn test_unknown_symbols() {
        assert_eq!(unit_scale("w"), None);
        assert_eq!(unit_scale("S"), None);
        assert_eq!(unit_scale("sec"), None);
    }

    #[test]
    fn test_symbols_are_unique() {
        for (i, a) in UNIT_TABLE.iter().enumerate() {
            for b in &UNIT_TABLE[i + 1..] {
                assert_ne!(a.symbol, b.symbol);
            }
        }
    }
}
