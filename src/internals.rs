use crate::types::Int16Framing;

/// Baud rate the SF45 ships configured for.
pub const SF45_DEFAULT_BAUD_RATE: u32 = 921_600;

/// Default initial capacity of the pending distance queue.
pub const SF45_DEFAULT_QUEUE_DEPTH: usize = 1024;

/// Default lower scan limit, in degrees.
pub const SF45_DEFAULT_LOW_ANGLE: f32 = -90.0;

/// Default upper scan limit, in degrees.
pub const SF45_DEFAULT_HIGH_ANGLE: f32 = 90.0;

/// Update rate code 4 selects 400 samples per second.
pub const SF45_DEFAULT_UPDATE_RATE: u8 = 4;

/// Cycle speed 5 is the fastest sweep.
pub const SF45_DEFAULT_CYCLE_SPEED: i16 = 5;

/// First return raw, last return raw and angle.
pub const SF45_DEFAULT_DISTANCE_OUTPUT: i32 = 0x109;

/// Framing used for 16-bit writes unless a device is told otherwise.
pub const DEFAULT_INT16_FRAMING: Int16Framing = Int16Framing::Exact;
