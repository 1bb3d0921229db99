//! Command frame sent to the vehicle

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::channels;
use crate::gear::Gear;
use crate::sample::{ChannelValue, ControlSample};

/// The data handed to an output driver for one tick.
///
/// A frame starts as a copy of the control sample; driving modes may add
/// derived fields such as `simulated_speed`. Channels are kept sorted by name
/// so the JSON encoding is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandFrame {
    channels: BTreeMap<String, ChannelValue>,
}

impl CommandFrame {
    pub fn new() -> Self {
        Self::default()
    }

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

    pub fn axis(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ChannelValue::as_f64)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ChannelValue::as_i64)
    }

    pub fn button(&self, name: &str) -> bool {
        self.get(name)
            .and_then(ChannelValue::as_bool)
            .unwrap_or(false)
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

    /// Attach the car simulation outputs.
    pub fn set_simulation(&mut self, speed: f64, gear: Gear, power: f64) {
        self.set(channels::SIMULATED_SPEED, speed);
        self.set(channels::SIMULATED_GEAR, gear.value());
        self.set(channels::SIMULATED_POWER, power);
    }
}

impl From<ControlSample> for CommandFrame {
    fn from(sample: ControlSample) -> Self {
        Self {
            channels: sample.into_channels(),
        }
    }
}

impl From<&ControlSample> for CommandFrame {
    fn from(sample: &ControlSample) -> Self {
        Self::from(sample.clone())
    }
}
