//! Delimited trace file parsing.

use std::fs;
use std::path::Path;

use crate::error::{Result, TraceError};
use crate::point::DataPoint;

/// Parse a trace file.
///
/// The first row is a header: the time column (whose name is ignored)
/// followed by the names of the recorded quantities. Every following row
/// holds the sample time in seconds and one value per quantity. The
/// duration of each sample is the difference between its time and the
/// previous sample's (the first sample's duration equals its time).
pub fn parse_trace(path: impl AsRef<Path>, delimiter: char) -> Result<Vec<DataPoint>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_trace_str(&contents, delimiter, &path.display().to_string())
}

/// Parse trace contents that have already been read into memory.
///
/// `origin` names the source in diagnostics (usually the file path).
pub fn parse_trace_str(contents: &str, delimiter: char, origin: &str) -> Result<Vec<DataPoint>> {
    let mut lines = contents.lines().enumerate();

    let quantities: Vec<&str> = match lines.next() {
        Some((_, header)) if !header.trim().is_empty() => {
            header.split(delimiter).skip(1).collect()
        }
        _ => {
            return Err(TraceError::MissingHeader {
                path: origin.to_string(),
            })
        }
    };

    let mut trace = Vec::new();
    let mut prev_time = 0.0;
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() != quantities.len() + 1 {
            return Err(TraceError::FieldCount {
                path: origin.to_string(),
                line: index + 1,
                expected: quantities.len() + 1,
                found: fields.len(),
            });
        }

        let parse = |token: &str| -> Result<f64> {
            token.trim().parse().map_err(|_| TraceError::InvalidNumber {
                path: origin.to_string(),
                line: index + 1,
                token: token.to_string(),
            })
        };

        let time = parse(fields[0])?;
        let mut point = DataPoint::new(time, time - prev_time);
        for (quantity, token) in quantities.iter().zip(&fields[1..]) {
            point.set(quantity, parse(token)?);
        }
        trace.push(point);
        prev_time = time;
    }

    Ok(trace)
}
