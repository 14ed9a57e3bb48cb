//! Turns validated frames into typed answers.

pub mod distance_parser;
pub mod product_parser;

use crate::answers::*;
use crate::base::{Error, Message, Result};
use crate::types::Answer;
use byteorder::{ByteOrder, LittleEndian};
use log::trace;

use self::distance_parser::parse_distance_sample;
use self::product_parser::parse_product_name;

/// Interprets a decoded message by opcode.
///
/// Unmodeled opcodes, and product name answers of the wrong size, come back as
/// `Answer::Unknown`. A distance answer too short to hold a sample is an error.
pub fn parse_answer(msg: &Message) -> Result<Answer> {
    let answer = match msg.opcode {
        SF45_ANS_PRODUCT_NAME => match parse_product_name(&msg.data) {
            Some(name) => Answer::ProductName(name),
            None => unknown(msg),
        },
        SF45_ANS_DISTANCE_DATA_CM => Answer::Distance(parse_distance_sample(&msg.data)?),
        _ => unknown(msg),
    };
    trace!("Opcode {} interpreted as {:?}", msg.opcode, answer);
    Ok(answer)
}

/// Interprets a raw frame (start byte through payload, checksum excluded).
///
/// This is the entry point for bytes that did not come through the decoder.
/// `payload_len` counts the opcode and data bytes. A zero-length payload has
/// nothing to interpret and yields `Ok(None)`; a frame shorter than its
/// header plus `payload_len` is a `ProtocolError`.
pub fn interpret_frame(frame: &[u8], payload_len: usize) -> Result<Option<Answer>> {
    if payload_len == 0 {
        return Ok(None);
    }
    if frame.len() < 3 + payload_len {
        return Err(Error::ProtocolError {
            description: format!(
                "frame of {} bytes cannot hold a {} byte payload",
                frame.len(),
                payload_len
            ),
        });
    }
    let flags = LittleEndian::read_u16(&frame[1..3]);
    let msg = Message {
        opcode: frame[3],
        write: (flags & 0x1) == 0x1,
        data: frame[4..3 + payload_len].to_vec(),
    };
    parse_answer(&msg).map(Some)
}

fn unknown(msg: &Message) -> Answer {
    Answer::Unknown {
        opcode: msg.opcode,
        data_len: msg.data.len(),
    }
}
