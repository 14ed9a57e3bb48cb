use crate::base::Message;
use crate::types::{Int16Framing, SessionConfig};
use byteorder::{ByteOrder, LittleEndian};

// Read-only parameters

/// Opcode of the 16-byte product name.
pub const SF45_CMD_PRODUCT_NAME: u8 = 0;

// Read/write parameters

/// Opcode of the distance output bitmask (i32).
pub const SF45_CMD_DISTANCE_OUTPUT: u8 = 27;

/// Opcode of the stream selector (i32).
pub const SF45_CMD_STREAM: u8 = 30;

/// Opcode of the update rate code (u8).
pub const SF45_CMD_UPDATE_RATE: u8 = 66;

/// Opcode of the sweep cycle speed (i16).
pub const SF45_CMD_SCAN_SPEED: u8 = 85;

/// Opcode that starts (1) or stops (0) sweeping (u8).
pub const SF45_CMD_SCAN_ENABLE: u8 = 96;

/// Opcode that points the head at a fixed angle in degrees (f32).
pub const SF45_CMD_SCAN_POSITION: u8 = 97;

/// Opcode of the lower sweep limit in degrees (f32).
pub const SF45_CMD_SCAN_LOW_ANGLE: u8 = 98;

/// Opcode of the upper sweep limit in degrees (f32).
pub const SF45_CMD_SCAN_HIGH_ANGLE: u8 = 99;

// Stream selector values

/// Stream nothing.
pub const SF45_STREAM_NONE: i32 = 0;

/// Stream distance data in centimeters (answers with opcode 44).
pub const SF45_STREAM_DISTANCE_DATA_CM: i32 = 5;

/// Builds a read request for `opcode`.
pub fn get(opcode: u8) -> Message {
    Message::new(opcode)
}

/// Builds a one byte write.
pub fn write_u8(opcode: u8, value: u8) -> Message {
    Message::write(opcode, &[value])
}

/// Builds a two byte write, framed according to `framing`.
pub fn write_i16(opcode: u8, value: i16, framing: Int16Framing) -> Message {
    let mut payload = [0; 3];
    LittleEndian::write_i16(&mut payload[..2], value);
    match framing {
        Int16Framing::Exact => Message::write(opcode, &payload[..2]),
        Int16Framing::Padded => Message::write(opcode, &payload),
    }
}

/// Builds a four byte integer write.
pub fn write_i32(opcode: u8, value: i32) -> Message {
    let mut payload = [0; 4];
    LittleEndian::write_i32(&mut payload, value);
    Message::write(opcode, &payload)
}

/// Builds a four byte IEEE-754 write.
pub fn write_f32(opcode: u8, value: f32) -> Message {
    let mut payload = [0; 4];
    LittleEndian::write_f32(&mut payload, value);
    Message::write(opcode, &payload)
}

/// Starts or stops the sweep.
pub fn scan_enable(enabled: bool) -> Message {
    write_u8(SF45_CMD_SCAN_ENABLE, enabled as u8)
}

/// Parks the head at `degrees`.
pub fn scan_position(degrees: f32) -> Message {
    write_f32(SF45_CMD_SCAN_POSITION, degrees)
}

/// Selects what the device streams.
pub fn stream(selector: i32) -> Message {
    write_i32(SF45_CMD_STREAM, selector)
}

/// Commands that bring the device from any state into streaming `config`.
///
/// Streaming and sweeping are switched off before any parameter is written and
/// only switched back on at the very end, so the order of the result must be kept.
pub fn session_start(config: &SessionConfig, framing: Int16Framing) -> Vec<Message> {
    vec![
        stream(SF45_STREAM_NONE),
        scan_enable(false),
        get(SF45_CMD_PRODUCT_NAME),
        write_f32(SF45_CMD_SCAN_LOW_ANGLE, config.low_angle),
        write_f32(SF45_CMD_SCAN_HIGH_ANGLE, config.high_angle),
        write_u8(SF45_CMD_UPDATE_RATE, config.update_rate),
        write_i16(SF45_CMD_SCAN_SPEED, config.cycle_speed, framing),
        write_i32(SF45_CMD_DISTANCE_OUTPUT, config.distance_output),
        stream(SF45_STREAM_DISTANCE_DATA_CM),
        scan_enable(true),
    ]
}
