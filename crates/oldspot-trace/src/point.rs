//! A single segment of an operating trace.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Names of the quantities recognized by the wearout models.
///
/// Trace files may carry additional columns; they are parsed and stored but
/// only the quantities named here influence any model.
pub mod quantity {
    /// Supply voltage (V).
    pub const VDD: &str = "vdd";
    /// Junction temperature (K).
    pub const TEMPERATURE: &str = "temperature";
    /// Clock frequency (Hz after loading; trace files record MHz).
    pub const FREQUENCY: &str = "frequency";
    /// Activity factor. A direct 0..1 duty fraction for generic units, a
    /// switching-event count for logic units.
    pub const ACTIVITY: &str = "activity";
    /// Power draw (W).
    pub const POWER: &str = "power";
    /// Maximum power the unit can draw (W).
    pub const PEAK_POWER: &str = "peak_power";
    /// Interconnect current (A).
    pub const CURRENT: &str = "current";
    /// Interconnect current density (A/m^2).
    pub const CURRENT_DENSITY: &str = "current_density";
}

/// One piecewise-constant segment of an operating trace.
///
/// `time` is the absolute end time of the segment in seconds, strictly
/// increasing within a trace. `duration` is the span the segment covers
/// (`time` minus the previous sample's time; the first segment covers
/// `time` itself).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Absolute sample time (s).
    pub time: f64,
    /// Span covered by this sample (s).
    pub duration: f64,
    /// Recorded quantities by name.
    pub data: HashMap<String, f64>,
}

impl DataPoint {
    /// Create a data point with no recorded quantities.
    pub fn new(time: f64, duration: f64) -> Self {
        Self {
            time,
            duration,
            data: HashMap::new(),
        }
    }

    /// Look up a quantity, if it was recorded.
    pub fn get(&self, quantity: &str) -> Option<f64> {
        self.data.get(quantity).copied()
    }

    /// Look up a quantity that the loader guarantees to be present.
    ///
    /// Panics if the quantity is missing; the trace loader fills every point
    /// with defaults for the quantities the models require.
    pub fn value(&self, quantity: &str) -> f64 {
        match self.data.get(quantity) {
            Some(value) => *value,
            None => panic!("trace sample at t={} has no {quantity:?} value", self.time),
        }
    }

    /// Record a quantity, replacing any existing value.
    pub fn set(&mut self, quantity: &str, value: f64) {
        self.data.insert(quantity.to_string(), value);
    }

    /// Record a quantity only if it is not already present.
    pub fn fill_default(&mut self, quantity: &str, value: f64) {
        self.data.entry(quantity.to_string()).or_insert(value);
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.data.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "{}:{{", self.time)?;
        for (i, (name, value)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{name}:{value}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_default_does_not_overwrite() {
        let mut point = DataPoint::new(1.0, 1.0);
        point.set(quantity::VDD, 0.9);
        point.fill_default(quantity::VDD, 1.0);
        point.fill_default(quantity::TEMPERATURE, 350.0);
        assert_eq!(point.value(quantity::VDD), 0.9);
        assert_eq!(point.value(quantity::TEMPERATURE), 350.0);
    }

    #[test]
    fn get_missing_quantity_is_none() {
        let point = DataPoint::new(1.0, 1.0);
        assert_eq!(point.get(quantity::CURRENT), None);
    }

    #[test]
    #[should_panic(expected = "no \"vdd\" value")]
    fn value_panics_on_missing_quantity() {
        DataPoint::new(1.0, 1.0).value(quantity::VDD);
    }
}
