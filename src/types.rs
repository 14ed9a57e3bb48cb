use crate::answers::{Sf45ResponseDistanceData, SF45_FIXED_POINT_SCALE};
use crate::internals::*;

/// A point in the sensor frame, in meters.
///
/// `z` points forward, `x` to the side the angle grows towards, and `y` is
/// always 0 because the head sweeps a single plane.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One decoded range measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSample {
    /// Distance to the first return, in meters.
    pub first_distance: f32,
    /// Distance to the last return, in meters.
    pub last_distance: f32,
    /// Head angle in degrees, signed around the forward direction.
    pub angle: f32,
    /// First return projected onto the scan plane.
    pub position: Position,
}

impl DistanceSample {
    /// Builds a sample from distances in meters and an angle in degrees.
    pub fn new(first_distance: f32, last_distance: f32, angle: f32) -> DistanceSample {
        let rad = angle.to_radians();
        DistanceSample {
            first_distance,
            last_distance,
            angle,
            position: Position {
                x: rad.sin() * first_distance,
                y: 0.0,
                z: rad.cos() * first_distance,
            },
        }
    }
}

impl From<Sf45ResponseDistanceData> for DistanceSample {
    /// Scales the fixed-point answer into meters and degrees.
    fn from(raw: Sf45ResponseDistanceData) -> DistanceSample {
        DistanceSample::new(
            raw.first_cm as f32 / SF45_FIXED_POINT_SCALE,
            raw.last_cm as f32 / SF45_FIXED_POINT_SCALE,
            raw.angle_cdeg as f32 / SF45_FIXED_POINT_SCALE,
        )
    }
}

/// A validated frame interpreted by opcode.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// The device identity string.
    ProductName(String),
    /// A distance sample streamed while scanning.
    Distance(DistanceSample),
    /// A frame whose opcode is not modeled. Not an error.
    Unknown { opcode: u8, data_len: usize },
}

/// How 16-bit writes declare their payload length.
///
/// A 16-bit write carries an opcode and two value bytes. Some host software
/// declares a payload of four bytes for it instead of three; whether the
/// firmware expects a padding byte there is unconfirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Int16Framing {
    /// Payload length 3: opcode and the two value bytes.
    Exact,
    /// Payload length 4: opcode, the two value bytes and one zero padding byte.
    Padded,
}

impl Default for Int16Framing {
    fn default() -> Self {
        DEFAULT_INT16_FRAMING
    }
}

/// Parameters written to the device when a session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Lower sweep limit in degrees.
    pub low_angle: f32,
    /// Upper sweep limit in degrees.
    pub high_angle: f32,
    /// Update rate code (see device manual; 4 = 400 Hz).
    pub update_rate: u8,
    /// Sweep cycle speed code (5 = fastest).
    pub cycle_speed: i16,
    /// Bitmask selecting the fields of each distance answer.
    pub distance_output: i32,
}

impl SessionConfig {
    /// Creates a config with the default parameters but a custom sweep.
    ///
    /// # Arguments
    ///
    /// * `low_angle` - Lower sweep limit in degrees.
    /// * `high_angle` - Upper sweep limit in degrees.
    pub fn with_sweep(low_angle: f32, high_angle: f32) -> SessionConfig {
        SessionConfig {
            low_angle,
            high_angle,
            ..SessionConfig::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            low_angle: SF45_DEFAULT_LOW_ANGLE,
            high_angle: SF45_DEFAULT_HIGH_ANGLE,
            update_rate: SF45_DEFAULT_UPDATE_RATE,
            cycle_speed: SF45_DEFAULT_CYCLE_SPEED,
            distance_output: SF45_DEFAULT_DISTANCE_OUTPUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn straight_ahead_sample_lies_on_z() {
        let sample = DistanceSample::from(Sf45ResponseDistanceData {
            first_cm: 500,
            last_cm: 500,
            angle_cdeg: 0,
        });
        assert_eq!(sample.first_distance, 5.0);
        assert_eq!(sample.last_distance, 5.0);
        assert!(approx(sample.position.x, 0.0));
        assert_eq!(sample.position.y, 0.0);
        assert!(approx(sample.position.z, 5.0));
    }

    #[test]
    fn negative_angle_swings_to_negative_x() {
        let sample = DistanceSample::from(Sf45ResponseDistanceData {
            first_cm: 200,
            last_cm: 350,
            angle_cdeg: -9000,
        });
        assert_eq!(sample.angle, -90.0);
        assert_eq!(sample.last_distance, 3.5);
        assert!(approx(sample.position.x, -2.0));
        assert!(approx(sample.position.z, 0.0));
    }

    #[test]
    fn default_session_config() {
        let config = SessionConfig::default();
        assert_eq!(config.low_angle, -90.0);
        assert_eq!(config.high_angle, 90.0);
        assert_eq!(config.update_rate, 4);
        assert_eq!(config.cycle_speed, 5);
        assert_eq!(config.distance_output, 0x109);

        let narrow = SessionConfig::with_sweep(-30.0, 45.0);
        assert_eq!(narrow.high_angle, 45.0);
        assert_eq!(narrow.update_rate, config.update_rate);
    }
}
