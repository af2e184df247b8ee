//! frame.rs
//! Serial line codec: `SENSOR:<id>,<temp:.1>,<humidity:.1>,<timestamp>\r\n`.

use crate::error::FrameError;
use crate::sensor::reading::SensorReading;

pub const FRAME_PREFIX: &str = "SENSOR:";
pub const FRAME_TERMINATOR: &str = "\r\n";

pub fn encode_frame(reading: &SensorReading) -> String {
    format!(
        "{}{},{:.1},{:.1},{}{}",
        FRAME_PREFIX,
        reading.sensor_id,
        reading.temperature,
        reading.humidity,
        reading.timestamp,
        FRAME_TERMINATOR
    )
}

/// Parses one complete frame, terminator included.
pub fn decode_frame(line: &str) -> Result<SensorReading, FrameError> {
    let body = line
        .strip_suffix(FRAME_TERMINATOR)
        .ok_or(FrameError::MissingTerminator)?;
    let body = body
        .strip_prefix(FRAME_PREFIX)
        .ok_or(FrameError::MissingPrefix)?;

    let fields: Vec<&str> = body.split(',').collect();
    if fields.len() != 4 {
        return Err(FrameError::FieldCount(fields.len()));
    }

    Ok(SensorReading {
        sensor_id: parse_integer("sensor_id", fields[0], false)?,
        temperature: parse_decimal("temperature", fields[1])?,
        humidity: parse_decimal("humidity", fields[2])?,
        timestamp: parse_integer("timestamp", fields[3], true)?,
    })
}

fn invalid(field: &'static str, value: &str) -> FrameError {
    FrameError::InvalidField {
        field,
        value: value.to_string(),
    }
}

// Digits as `Display` writes them: no `+`, no leading zeros, `-` only when signed.
fn is_canonical_integer(value: &str, signed: bool) -> bool {
    let digits = match value.strip_prefix('-') {
        Some(rest) if signed => rest,
        Some(_) => return false,
        None => value,
    };
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}

fn parse_integer<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
    signed: bool,
) -> Result<T, FrameError> {
    if !is_canonical_integer(value, signed) || value == "-0" {
        return Err(invalid(field, value));
    }
    value.parse().map_err(|_| invalid(field, value))
}

// Exactly one digit after the point, as written by `encode_frame`.
fn parse_decimal(field: &'static str, value: &str) -> Result<f64, FrameError> {
    let well_formed = matches!(value.split_once('.'), Some((int, frac))
        if is_canonical_integer(int, true)
            && frac.len() == 1
            && frac.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        return Err(invalid(field, value));
    }
    value.parse().map_err(|_| invalid(field, value))
}
