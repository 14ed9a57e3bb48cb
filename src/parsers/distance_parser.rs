use crate::answers::*;
use crate::base::{Error, Result};
use crate::types::DistanceSample;
use byteorder::{ByteOrder, LittleEndian};
use log::trace;

/// Reads the fixed-point distance answer from the start of `data`.
///
/// Extra trailing bytes (fields enabled in the distance output bitmask beyond
/// the first three) are ignored.
pub fn parse_distance_data(data: &[u8]) -> Result<Sf45ResponseDistanceData> {
    if data.len() < SF45_DISTANCE_DATA_SIZE {
        return Err(Error::ProtocolError {
            description: format!(
                "distance data too short: expected {}, got {}",
                SF45_DISTANCE_DATA_SIZE,
                data.len()
            ),
        });
    }

    let raw = Sf45ResponseDistanceData {
        first_cm: LittleEndian::read_u16(&data[0..2]),
        last_cm: LittleEndian::read_u16(&data[2..4]),
        angle_cdeg: LittleEndian::read_i16(&data[4..6]),
    };
    trace!("Parsed distance data: {:?}", raw);
    Ok(raw)
}

/// Decodes a distance answer straight into a sample.
pub fn parse_distance_sample(data: &[u8]) -> Result<DistanceSample> {
    parse_distance_data(data).map(DistanceSample::from)
}
