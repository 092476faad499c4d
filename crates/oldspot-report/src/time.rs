//! Display units for times to failure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Units for displaying times to failure. Simulation-internal times are
/// always seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    #[default]
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    /// Convert a time in seconds to this unit. Months are four weeks and
    /// years twelve such months, keeping every unit an exact divisor chain
    /// of the next.
    pub fn from_seconds(&self, time: f64) -> f64 {
        let mut time = time;
        if *self == TimeUnit::Seconds {
            return time;
        }
        time /= 60.0;
        if *self == TimeUnit::Minutes {
            return time;
        }
        time /= 60.0;
        if *self == TimeUnit::Hours {
            return time;
        }
        time /= 24.0;
        if *self == TimeUnit::Days {
            return time;
        }
        time /= 7.0;
        if *self == TimeUnit::Weeks {
            return time;
        }
        time /= 4.0;
        if *self == TimeUnit::Months {
            return time;
        }
        time / 12.0
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
        };
        f.write_str(name)
    }
}
