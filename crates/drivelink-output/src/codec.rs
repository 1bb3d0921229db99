//! UDP wire frame for embedded receivers
//!
//! Five bytes, little-endian:
//!
//! | offset | size | type | field     | range        |
//! |--------|------|------|-----------|--------------|
//! | 0      | 2    | u16  | power     | 0..=1000     |
//! | 2      | 1    | u8   | direction | 0, 1, 2      |
//! | 3      | 2    | i16  | steering  | -1000..=1000 |

use drivelink_types::{CommandFrame, channels};

use crate::error::OutputError;

pub const UDP_FRAME_LEN: usize = 5;
pub const MAX_POWER: u16 = 1000;
pub const MAX_STEERING: i16 = 1000;
pub const MAX_DIRECTION: u8 = 2;

/// Motor command carried in one datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UdpCommand {
    pub power: u16,
    /// 0 = stop, 1 = forward, 2 = reverse.
    pub direction: u8,
    pub steering: i16,
}

impl UdpCommand {
    /// Scale frame channels into wire ranges.
    ///
    /// Values are truncated toward zero and clamped; missing or non-numeric
    /// channels read as zero.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_frame(frame: &CommandFrame) -> Self {
        let throttle = finite_axis(frame, channels::THROTTLE);
        let steering = finite_axis(frame, channels::STEERING);
        let direction = frame.integer(channels::DIRECTION).unwrap_or(0);

        // clamped to the target range before the cast, so nothing is lost
        Self {
            power: (throttle * 1000.0).trunc().clamp(0.0, f64::from(MAX_POWER)) as u16,
            direction: direction.clamp(0, i64::from(MAX_DIRECTION)) as u8,
            steering: (steering * 1000.0)
                .trunc()
                .clamp(-f64::from(MAX_STEERING), f64::from(MAX_STEERING))
                as i16,
        }
    }

    pub fn encode(&self) -> [u8; UDP_FRAME_LEN] {
        let [p0, p1] = self.power.to_le_bytes();
        let [s0, s1] = self.steering.to_le_bytes();
        [p0, p1, self.direction, s0, s1]
    }

    /// Parse a datagram as the receiver would.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::InvalidFrame`] unless `bytes` is exactly
    /// [`UDP_FRAME_LEN`] long.
    pub fn decode(bytes: &[u8]) -> Result<Self, OutputError> {
        let &[p0, p1, direction, s0, s1] = bytes else {
            return Err(OutputError::InvalidFrame {
                expected: UDP_FRAME_LEN,
                actual: bytes.len(),
            });
        };
        Ok(Self {
            power: u16::from_le_bytes([p0, p1]),
            direction,
            steering: i16::from_le_bytes([s0, s1]),
        })
    }
}

fn finite_axis(frame: &CommandFrame, channel: &str) -> f64 {
    frame
        .axis(channel)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
