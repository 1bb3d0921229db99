//! Control sample: one tick of normalized wheel, pedal and button readings

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single named channel reading.
///
/// Axes are normalized to `[-1, 1]` by the input mapper before they reach
/// DriveLink. Buttons are plain booleans. Integer and text values are carried
/// through untouched so that extra channels reach the vehicle as they were
/// produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelValue {
    Button(bool),
    Integer(i64),
    Axis(f64),
    Text(String),
}

impl ChannelValue {
    /// Numeric view of the value. Buttons and text have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ChannelValue::Axis(v) => Some(*v),
            ChannelValue::Integer(v) => Some(*v as f64),
            ChannelValue::Button(_) | ChannelValue::Text(_) => None,
        }
    }

    /// Pressed state. Integer channels count as pressed when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ChannelValue::Button(b) => Some(*b),
            ChannelValue::Integer(v) => Some(*v != 0),
            ChannelValue::Axis(_) | ChannelValue::Text(_) => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ChannelValue::Integer(v) => Some(*v),
            ChannelValue::Axis(v) if v.is_finite() => Some(v.trunc() as i64),
            _ => None,
        }
    }
}

impl From<f64> for ChannelValue {
    fn from(value: f64) -> Self {
        ChannelValue::Axis(value)
    }
}

impl From<f32> for ChannelValue {
    fn from(value: f32) -> Self {
        ChannelValue::Axis(f64::from(value))
    }
}

impl From<bool> for ChannelValue {
    fn from(value: bool) -> Self {
        ChannelValue::Button(value)
    }
}

impl From<i64> for ChannelValue {
    fn from(value: i64) -> Self {
        ChannelValue::Integer(value)
    }
}

impl From<i32> for ChannelValue {
    fn from(value: i32) -> Self {
        ChannelValue::Integer(i64::from(value))
    }
}

impl From<&str> for ChannelValue {
    fn from(value: &str) -> Self {
        ChannelValue::Text(value.to_string())
    }
}

impl From<String> for ChannelValue {
    fn from(value: String) -> Self {
        ChannelValue::Text(value)
    }
}

/// Normalized input snapshot for one tick.
///
/// Serializes as a flat JSON object of channel name to value, which is also
/// the format accepted from replay files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlSample {
    channels: BTreeMap<String, ChannelValue>,
}

impl ControlSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style channel setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ChannelValue>) -> Self {
        self.channels.insert(name.into(), value.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ChannelValue>) {
        self.channels.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ChannelValue> {
        self.channels.get(name)
    }

    /// Axis value, if the channel is present and numeric.
    pub fn axis(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ChannelValue::as_f64)
    }

    /// Button state; absent or non-boolean channels read as released.
    pub fn button(&self, name: &str) -> bool {
        self.get(name)
            .and_then(ChannelValue::as_bool)
            .unwrap_or(false)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChannelValue)> {
        self.channels.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn into_channels(self) -> BTreeMap<String, ChannelValue> {
        self.channels
    }
}

impl FromIterator<(String, ChannelValue)> for ControlSample {
    fn from_iter<I: IntoIterator<Item = (String, ChannelValue)>>(iter: I) -> Self {
        Self {
            channels: iter.into_iter().collect(),
        }
    }
}
