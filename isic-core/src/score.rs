//! Aggregate task score

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The two headline numbers of a scoring run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Score over every scored image
    pub overall: f64,
    /// Score over the validation subset
    pub validation: f64,
}

impl Score {
    /// Create a score
    pub fn new(overall: f64, validation: f64) -> Self {
        Self {
            overall,
            validation,
        }
    }

    /// Mapping form with keys `overall` and `validation`
    pub fn to_dict(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("overall".to_string(), self.overall),
            ("validation".to_string(), self.validation),
        ])
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Overall: {}\nValidation: {}",
            format_float(self.overall),
            format_float(self.validation)
        )
    }
}

/// Render a float the way score reports always have: `1.0`, `0.5`, `1e-05`
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => formatted,
        };
    }

    let formatted = value.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        format!("{formatted}.0")
    }
}
