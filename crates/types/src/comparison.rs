//! Threshold comparison used by metric-based exit conditions.

use std::fmt;
use std::str::FromStr;

/// Direction of a threshold test.
///
/// Configuration spells these as `">"` and `"<"`; nothing else is accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// The metric must rise above the threshold.
    GreaterThan,

    /// The metric must fall below the threshold.
    #[default]
    LessThan,
}

impl Comparison {
    /// Check whether `value` satisfies the comparison against `threshold`.
    ///
    /// NaN never satisfies either direction.
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::GreaterThan => value > threshold,
            Comparison::LessThan => value < threshold,
        }
    }

    /// The most favourable value of a series for this comparison.
    ///
    /// Maximum for `>`, minimum for `<`. Returns `None` for an empty series.
    pub fn extreme<I>(self, values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter();
        let first = values.next()?;
        Some(match self {
            Comparison::GreaterThan => values.fold(first, f64::max),
            Comparison::LessThan => values.fold(first, f64::min),
        })
    }

    /// The configuration symbol for this comparison.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error returned when a comparison symbol is not `>` or `<`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Comparison only accepts > or <, but {0:?} was passed")]
pub struct ParseComparisonError(pub String);

impl FromStr for Comparison {
    type Err = ParseComparisonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Comparison::GreaterThan),
            "<" => Ok(Comparison::LessThan),
            other => Err(ParseComparisonError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols() {
        assert_eq!(">".parse::<Comparison>(), Ok(Comparison::GreaterThan));
        assert_eq!("<".parse::<Comparison>(), Ok(Comparison::LessThan));
    }

    #[test]
    fn test_parse_rejects_anything_else() {
        for bad in [">=", "<=", "=", "", " >", "gt"] {
            let err = bad.parse::<Comparison>().unwrap_err();
            assert_eq!(err.0, bad);
        }
    }

    #[test]
    fn test_holds_is_strict() {
        assert!(Comparison::GreaterThan.holds(6.0, 5.0));
        assert!(!Comparison::GreaterThan.holds(5.0, 5.0));
        assert!(Comparison::LessThan.holds(4.0, 5.0));
        assert!(!Comparison::LessThan.holds(5.0, 5.0));
        assert!(!Comparison::LessThan.holds(f64::NAN, 5.0));
    }

    #[test]
    fn test_extreme_picks_direction() {
        let values = [3.0, -1.0, 7.5, 2.0];
        assert_eq!(Comparison::GreaterThan.extreme(values), Some(7.5));
        assert_eq!(Comparison::LessThan.extreme(values), Some(-1.0));
        assert_eq!(Comparison::LessThan.extreme(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_default_is_less_than() {
        assert_eq!(Comparison::default(), Comparison::LessThan);
        assert_eq!(Comparison::default().to_string(), "<");
    }
}
