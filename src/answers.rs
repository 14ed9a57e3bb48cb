/// Answer opcode carrying the product name.
pub const SF45_ANS_PRODUCT_NAME: u8 = 0;

/// Length of the product name field, NUL padded.
pub const SF45_PRODUCT_NAME_LEN: usize = 16;

/// Answer opcode carrying one distance sample in centimeters.
pub const SF45_ANS_DISTANCE_DATA_CM: u8 = 44;

/// Layout of the distance data answer, all fields little-endian.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sf45ResponseDistanceData {
    /// Distance to the first return, in centimeters.
    pub first_cm: u16,
    /// Distance to the last return, in centimeters.
    pub last_cm: u16,
    /// Head angle relative to the forward direction, in hundredths of a degree.
    pub angle_cdeg: i16,
}

/// Size of `Sf45ResponseDistanceData` on the wire.
pub const SF45_DISTANCE_DATA_SIZE: usize = 6;

/// Divisor turning centimeters into meters and centidegrees into degrees.
pub const SF45_FIXED_POINT_SCALE: f32 = 100.0;
