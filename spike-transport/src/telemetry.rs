//! Telemetry line decoding
//!
//! Only one channel of the hub's multiplexed stream is understood: the force
//! sensor entry of sensor-update messages. Everything else, including lines
//! that fail to parse, decodes to `None`. A live serial stream routinely
//! produces torn or garbled lines, so failures are logged at debug level and
//! never surface as errors.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::protocol::{message, port, TOUCHED};
use crate::types::ForceReading;

/// Raw telemetry message as sent by the hub
#[derive(Debug, Deserialize)]
struct TelemetryMessage {
    /// Message kind
    m: i64,
    /// Payload entries, `[port, [value, flag]]` for sensor updates
    #[serde(default)]
    p: Option<Vec<Value>>,
}

/// Why a line produced no reading
#[derive(Debug, Clone, PartialEq)]
enum Skip {
    /// Not UTF-8 or not a JSON message with an integer `m`
    Malformed(String),
    /// A different message kind
    OtherKind(i64),
    /// Sensor update without a payload list
    MissingPayload,
    /// No entry for the watched port
    PortAbsent,
    /// Entry for the watched port with an unexpected shape
    BadEntry,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::Malformed(reason) => write!(f, "malformed: {}", reason),
            Skip::OtherKind(kind) => write!(f, "message kind {}", kind),
            Skip::MissingPayload => write!(f, "no payload"),
            Skip::PortAbsent => write!(f, "port not present"),
            Skip::BadEntry => write!(f, "unexpected reading shape"),
        }
    }
}

/// Selects which message kind and port carry the force sensor
///
/// The defaults match the hub program's observed output; both values are
/// kept here so a firmware change only touches construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFilter {
    /// Message kind carrying sensor values
    pub message_kind: i64,
    /// Port index of the force sensor within the payload
    pub port: i64,
}

impl Default for TelemetryFilter {
    fn default() -> Self {
        Self {
            message_kind: message::SENSOR_UPDATE,
            port: port::FORCE_SENSOR,
        }
    }
}

impl TelemetryFilter {
    /// Decode one complete line into a force reading
    pub fn decode(&self, line: &[u8]) -> Option<ForceReading> {
        match self.try_decode(line) {
            Ok(reading) => Some(reading),
            Err(Skip::OtherKind(_)) | Err(Skip::PortAbsent) => None,
            Err(skip) => {
                debug!(
                    "Could not parse telemetry ({}): {}",
                    skip,
                    String::from_utf8_lossy(line)
                );
                None
            }
        }
    }

    fn try_decode(&self, line: &[u8]) -> Result<ForceReading, Skip> {
        let text = std::str::from_utf8(line).map_err(|e| Skip::Malformed(e.to_string()))?;
        let msg: TelemetryMessage =
            serde_json::from_str(text).map_err(|e| Skip::Malformed(e.to_string()))?;

        if msg.m != self.message_kind {
            return Err(Skip::OtherKind(msg.m));
        }

        let payload = msg.p.ok_or(Skip::MissingPayload)?;

        // The first entry for the port wins; a malformed one discards the line.
        // Indices compare numerically, so `63.0` matches port 63.
        let port = self.port as f64;
        let entry = payload
            .iter()
            .filter_map(Value::as_array)
            .find(|entry| entry.first().and_then(Value::as_f64) == Some(port))
            .ok_or(Skip::PortAbsent)?;

        parse_reading(entry).ok_or(Skip::BadEntry)
    }
}

/// Parse `[port, [force, touched]]`
fn parse_reading(entry: &[Value]) -> Option<ForceReading> {
    let values = entry.get(1)?.as_array()?;
    let force = values.first()?.as_f64()?;
    let touched = match values.get(1)? {
        Value::Bool(b) => *b,
        v => v.as_f64()? == TOUCHED as f64,
    };
    Some(ForceReading { force, touched })
}

/// Decode a line with the default filter (sensor updates, port 63)
pub fn decode_force_reading(line: &[u8]) -> Option<ForceReading> {
    TelemetryFilter::default().decode(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_force_sensor() {
        let reading = decode_force_reading(br#"{"m":0,"p":[[63,[5.5,1]]]}"#).unwrap();
        assert_eq!(reading.force, 5.5);
        assert!(reading.touched);
    }

    #[test]
    fn test_untouched_and_integer_force() {
        let reading = decode_force_reading(br#"{"m":0,"p":[[63,[3,0]]]}"#).unwrap();
        assert_eq!(reading.force, 3.0);
        assert!(!reading.touched);
    }

    #[test]
    fn test_wrong_port() {
        assert_eq!(decode_force_reading(br#"{"m":0,"p":[[99,[5.5,1]]]}"#), None);
    }

    #[test]
    fn test_other_message_kind() {
        assert_eq!(decode_force_reading(br#"{"m":1,"p":[[63,[5.5,1]]]}"#), None);
        assert_eq!(decode_force_reading(br#"{"m":2}"#), None);
    }

    #[test]
    fn test_finds_port_among_others() {
        let line = br#"{"m":0,"p":[[0,[1,2,3]],"noise",[63,[7.25,0]],[63,[1,1]]]}"#;
        let reading = decode_force_reading(line).unwrap();
        assert_eq!(reading.force, 7.25);
        assert!(!reading.touched);
    }

    #[test]
    fn test_garbage_never_panics() {
        let lines: &[&[u8]] = &[
            b"",
            b"\xff\xfe\x00",
            b"not json",
            b"{\"m\":0",
            b"[]",
            b"{\"p\":[[63,[1,1]]]}",
            b"{\"m\":\"0\",\"p\":[[63,[1,1]]]}",
            b"{\"m\":0}",
            b"{\"m\":0,\"p\":5}",
            b"{\"m\":0,\"p\":[[63]]}",
            b"{\"m\":0,\"p\":[[63,5]]}",
            b"{\"m\":0,\"p\":[[63,[]]]}",
            b"{\"m\":0,\"p\":[[63,[\"x\",1]]]}",
            b"{\"m\":0,\"p\":[[63,[4.0]]]}",
        ];
        for line in lines {
            assert_eq!(decode_force_reading(line), None, "{:?}", line);
        }
    }

    #[test]
    fn test_custom_filter() {
        let filter = TelemetryFilter {
            message_kind: 4,
            port: 10,
        };
        let reading = filter.decode(br#"{"m":4,"p":[[10,[2.0,1]]]}"#).unwrap();
        assert_eq!(reading.force, 2.0);
        assert_eq!(filter.decode(br#"{"m":0,"p":[[63,[2.0,1]]]}"#), None);
    }

    #[test]
    fn test_float_port_index() {
        let reading = decode_force_reading(br#"{"m":0,"p":[[63.0,[5.5,1]]]}"#).unwrap();
        assert_eq!(reading.force, 5.5);
        assert!(reading.touched);
        assert_eq!(decode_force_reading(br#"{"m":0,"p":[[63.5,[5.5,1]]]}"#), None);
        assert_eq!(decode_force_reading(br#"{"m":0,"p":[["63",[5.5,1]]]}"#), None);
    }

    #[test]
    fn test_touched_accepts_bool() {
        let reading = decode_force_reading(br#"{"m":0,"p":[[63,[0.5,true]]]}"#).unwrap();
        assert!(reading.touched);
    }
}
