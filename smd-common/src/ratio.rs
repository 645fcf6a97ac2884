//! Guarded ratio arithmetic
//!
//! Share-of-total and weighted averages over impression counts. A zero
//! denominator yields [`Ratio::Undefined`] instead of NaN or infinity, and
//! serializes as JSON `null`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Result of a division that may have no meaningful value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    /// Finite quotient
    Defined(f64),
    /// Denominator was zero (or the quotient was not finite)
    Undefined,
}

impl Ratio {
    /// Divide `numerator` by `denominator`
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return Ratio::Undefined;
        }
        Self::of_value(numerator / denominator)
    }

    /// `part` as a percentage of `total`
    ///
    /// ```
    /// use smd_common::Ratio;
    ///
    /// assert_eq!(Ratio::percentage(25, 200), Ratio::Defined(12.5));
    /// assert_eq!(Ratio::percentage(0, 0), Ratio::Undefined);
    /// ```
    pub fn percentage(part: u64, total: u64) -> Self {
        match Self::of(part as f64, total as f64) {
            Ratio::Defined(v) => Ratio::Defined(v * 100.0),
            Ratio::Undefined => Ratio::Undefined,
        }
    }

    /// Weighted mean from a pre-multiplied sum and the total weight
    pub fn weighted_mean(weighted_sum: u64, total_weight: u64) -> Self {
        Self::of(weighted_sum as f64, total_weight as f64)
    }

    /// The quotient, if defined
    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(*v),
            Ratio::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Ratio::Undefined)
    }

    fn of_value(value: f64) -> Self {
        if value.is_finite() {
            Ratio::Defined(value)
        } else {
            Ratio::Undefined
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Ratio::Defined(v) => serializer.serialize_f64(*v),
            Ratio::Undefined => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?
            .map_or(Ratio::Undefined, Ratio::of_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_denominator_is_undefined() {
        assert_eq!(Ratio::of(5.0, 0.0), Ratio::Undefined);
        assert_eq!(Ratio::of(0.0, 0.0), Ratio::Undefined);
        assert_eq!(Ratio::weighted_mean(0, 0), Ratio::Undefined);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(Ratio::percentage(1, 4), Ratio::Defined(25.0));
        assert_eq!(Ratio::percentage(0, 4), Ratio::Defined(0.0));
        assert_eq!(Ratio::percentage(3, 0), Ratio::Undefined);
    }

    #[test]
    fn test_weighted_mean() {
        // severities 2 (x10) and 8 (x5) => (20 + 40) / 15 = 4.0
        assert_eq!(Ratio::weighted_mean(60, 15), Ratio::Defined(4.0));
    }

    #[test]
    fn test_serializes_undefined_as_null() {
        let json = serde_json::to_string(&vec![Ratio::Defined(1.5), Ratio::Undefined]).unwrap();
        assert_eq!(json, "[1.5,null]");
    }

    #[test]
    fn test_deserializes_null_as_undefined() {
        let parsed: Vec<Ratio> = serde_json::from_str("[2.0,null]").unwrap();
        assert_eq!(parsed, vec![Ratio::Defined(2.0), Ratio::Undefined]);
        assert!(parsed[1].is_undefined());
        assert_eq!(parsed[0].value(), Some(2.0));
    }
}
