//! Operating-point traces.
//!
//! A trace is an ordered sequence of [`DataPoint`]s describing the operating
//! conditions of one architectural unit over time: supply voltage,
//! temperature, clock frequency, activity, power draw, and so on. Traces are
//! read from delimited text files whose first row names the recorded
//! quantities and whose first column is the absolute sample time in seconds.

pub mod diag;
pub mod error;
pub mod parser;
pub mod point;

pub use error::{Result, TraceError};
pub use parser::{parse_trace, parse_trace_str};
pub use point::{quantity, DataPoint};
