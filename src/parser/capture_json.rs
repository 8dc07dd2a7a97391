//! JSON capture export parser.
//!
//! Accepts an object holding either arrival timestamps in nanoseconds
//! (`timesReceivedInNanoseconds`) or A-MPDU reference numbers
//! (`ampduReferences`, `null` for unaggregated frames).

use super::signal::{GroupedSignal, Signal, SignalSequence, TimedSignal};
use crate::utils::config::{GROUP_FIELD_NAMES, TIMESTAMP_FIELD_NAMES};
use crate::utils::error::{AggregationError, ParseError};
use log::debug;
use serde_json::{Map, Value};

/// Parse a JSON capture export into signals
///
/// **Public** - entry point for `.json` inputs
///
/// # Errors
/// * `ParseError::InvalidFormat` - not an object, or no signal array present
/// * `ParseError::Signal` - both arrays present, an empty array, or an entry of the wrong type
pub fn parse_capture_json(raw: &Value) -> Result<SignalSequence, ParseError> {
    let obj = raw.as_object().ok_or_else(|| {
        ParseError::InvalidFormat("Capture export must be a JSON object".to_string())
    })?;

    let timestamps = find_array(obj, TIMESTAMP_FIELD_NAMES)?;
    let group_ids = find_array(obj, GROUP_FIELD_NAMES)?;

    let signals = match (timestamps, group_ids) {
        (Some(values), None) => {
            debug!("Capture export holds {} timestamps", values.len());
            parse_timestamps(values)?
        }
        (None, Some(values)) => {
            debug!("Capture export holds {} group identifiers", values.len());
            parse_group_ids(values)?
        }
        (Some(_), Some(_)) => {
            return Err(AggregationError::MalformedSignal(
                "capture export holds both timestamps and group identifiers".to_string(),
            )
            .into())
        }
        (None, None) => {
            return Err(ParseError::InvalidFormat(format!(
                "Expected one of {:?} or {:?}",
                TIMESTAMP_FIELD_NAMES, GROUP_FIELD_NAMES
            )))
        }
    };

    Ok(SignalSequence::from_signals(signals)?)
}

/// Find the first present field among `names` and require it to be an array
fn find_array<'a>(
    obj: &'a Map<String, Value>,
    names: &[&str],
) -> Result<Option<&'a Vec<Value>>, ParseError> {
    let Some((name, value)) = names
        .iter()
        .find_map(|name| obj.get(*name).map(|value| (name, value)))
    else {
        return Ok(None);
    };

    value.as_array().map(Some).ok_or_else(|| {
        ParseError::InvalidFormat(format!("Field '{}' must be an array", name))
    })
}

fn parse_timestamps(values: &[Value]) -> Result<Vec<Signal>, ParseError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| -> Result<Signal, ParseError> {
            let nanos = value.as_f64().ok_or_else(|| {
                AggregationError::MalformedSignal(format!(
                    "timestamp {} is not a number: {}",
                    index, value
                ))
            })?;
            Ok(Signal::Timed(TimedSignal::from_nanos(nanos)?))
        })
        .collect()
}

fn parse_group_ids(values: &[Value]) -> Result<Vec<Signal>, ParseError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| -> Result<Signal, ParseError> {
            if value.is_null() {
                return Ok(Signal::Grouped(GroupedSignal::ungrouped()));
            }
            let id = value.as_i64().ok_or_else(|| {
                AggregationError::MalformedSignal(format!(
                    "group identifier {} is not an integer: {}",
                    index, value
                ))
            })?;
            Ok(Signal::Grouped(GroupedSignal::new(Some(id))))
        })
        .collect()
}
