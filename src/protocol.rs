use crate::base::{
    Error, FrameBuffer, Message, ProtocolDecoder, ProtocolEncoder, Result, Transport,
};
use crate::checksum::Checksum;
use byteorder::{ByteOrder, LittleEndian};
use log::{error, trace, warn};

/// Start byte opening every frame.
pub const SF45_FRAME_START: u8 = 0xAA;

/// Largest payload (opcode + data) the 10-bit length field can describe.
pub const SF45_MAX_PAYLOAD_LEN: usize = 1023;

const SF45_FLAGS_WRITE: u16 = 0x1;
const SF45_FLAGS_LENGTH_SHIFT: u16 = 6;

/// Start byte + flags.
const SF45_HEADER_SIZE: usize = 3;
const SF45_CHECKSUM_SIZE: usize = 2;

/// Size of the largest frame the device can send.
pub const SF45_MAX_FRAME_SIZE: usize = SF45_HEADER_SIZE + SF45_MAX_PAYLOAD_LEN + SF45_CHECKSUM_SIZE;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DecodeStatus {
    WaitStart,
    WaitFlags,
    WaitPayload,
    WaitChecksum,
}

/// Counters of what the decoder has seen since it was created.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecodeStats {
    /// Frames that passed the checksum and were handed out.
    pub frames: u64,
    /// Frames dropped because the transmitted checksum did not match.
    pub checksum_errors: u64,
    /// Frames abandoned because the flags described an impossible length.
    pub framing_errors: u64,
}

/// The implementation of the SF45 serial protocol.
///
/// This struct handles encoding commands (`Message` -> bytes) and decoding responses (bytes -> `Message`).
/// The decoder keeps its partial frame between calls, so input may be split at any byte boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Sf45HostProtocol {
    status: DecodeStatus,
    frame: FrameBuffer,
    payload_len: usize,
    write_flag: bool,
    stats: DecodeStats,
}

impl Sf45HostProtocol {
    /// Creates a new `Sf45HostProtocol` instance in its initial state.
    pub fn new() -> Sf45HostProtocol {
        Sf45HostProtocol::with_frame_capacity(SF45_MAX_FRAME_SIZE)
    }

    fn with_frame_capacity(capacity: usize) -> Sf45HostProtocol {
        trace!("Creating new Sf45HostProtocol with frame capacity {}", capacity);
        Sf45HostProtocol {
            status: DecodeStatus::WaitStart,
            frame: FrameBuffer::with_capacity(capacity),
            payload_len: 0,
            write_flag: false,
            stats: DecodeStats::default(),
        }
    }

    /// Returns the decode counters.
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// Returns `true` when no partial frame is pending.
    pub fn is_idle(&self) -> bool {
        self.status == DecodeStatus::WaitStart
    }

    fn start_wait_start(&mut self) {
        trace!("Decoder state -> WaitStart");
        self.status = DecodeStatus::WaitStart;
        self.frame.clear();
        self.payload_len = 0;
        self.write_flag = false;
    }

    fn decode_start(&mut self, byte: u8) -> Result<()> {
        if byte != SF45_FRAME_START {
            trace!("Discarding byte {:02X} while waiting for start", byte);
            return Ok(());
        }
        trace!("Start byte found, decoder state -> WaitFlags");
        self.frame.clear();
        self.frame.push(byte)?;
        self.status = DecodeStatus::WaitFlags;
        Ok(())
    }

    fn decode_flags(&mut self, byte: u8) -> Result<()> {
        self.frame.push(byte)?;
        if self.frame.len() < SF45_HEADER_SIZE {
            return Ok(());
        }

        let flags = LittleEndian::read_u16(&self.frame.as_slice()[1..SF45_HEADER_SIZE]);
        let payload_len = (flags >> SF45_FLAGS_LENGTH_SHIFT) as usize;
        let write_flag = (flags & SF45_FLAGS_WRITE) == SF45_FLAGS_WRITE;
        trace!(
            "Decoded flags {:04X}: payload_len={}, write={}",
            flags,
            payload_len,
            write_flag
        );

        if payload_len == 0 || payload_len > SF45_MAX_PAYLOAD_LEN {
            error!("Packet size invalid: {}", payload_len);
            self.stats.framing_errors += 1;
            self.start_wait_start();
        } else {
            self.payload_len = payload_len;
            self.write_flag = write_flag;
            trace!("Decoder state -> WaitPayload");
            self.status = DecodeStatus::WaitPayload;
        }
        Ok(())
    }

    fn decode_payload(&mut self, byte: u8) -> Result<()> {
        self.frame.push(byte)?;
        if self.frame.len() == SF45_HEADER_SIZE + self.payload_len {
            trace!("Payload complete, decoder state -> WaitChecksum");
            self.status = DecodeStatus::WaitChecksum;
        }
        Ok(())
    }

    fn decode_checksum(&mut self, byte: u8) -> Result<Option<Message>> {
        self.frame.push(byte)?;
        if self.frame.len() < SF45_HEADER_SIZE + self.payload_len + SF45_CHECKSUM_SIZE {
            return Ok(None);
        }

        let answer = match verify_frame(self.frame.as_slice(), self.write_flag) {
            Ok(msg) => {
                self.stats.frames += 1;
                Some(msg)
            }
            Err(e) => {
                warn!("Packet dropped: {}", e);
                self.stats.checksum_errors += 1;
                None
            }
        };

        self.start_wait_start();
        Ok(answer)
    }
}

/// Checks the trailing checksum of a complete frame and extracts its message.
fn verify_frame(bytes: &[u8], write: bool) -> Result<Message> {
    let body_len = bytes.len() - SF45_CHECKSUM_SIZE;
    let received = LittleEndian::read_u16(&bytes[body_len..]);
    let mut checksum = Checksum::new();
    checksum.push_slice(&bytes[..body_len]);
    let calculated = checksum.checksum();
    trace!(
        "Checksums: received {:04X}, calculated {:04X}",
        received,
        calculated
    );

    if received != calculated {
        return Err(Error::ChecksumMismatch {
            received,
            calculated,
        });
    }
    Ok(Message {
        opcode: bytes[SF45_HEADER_SIZE],
        write,
        data: bytes[SF45_HEADER_SIZE + 1..body_len].to_vec(),
    })
}

impl Default for Sf45HostProtocol {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolDecoder for Sf45HostProtocol {
    /// Decodes bytes from the input buffer according to the SF45 framing.
    ///
    /// Stops right after the first complete, checksum-valid frame so the caller
    /// can hand it on; the remaining bytes are picked up by the next call.
    /// Framing and checksum faults are logged and counted, never returned. A
    /// frame that outgrows the receive buffer is dropped the same way, counted
    /// as a framing error, and the returned count includes the offending byte.
    fn decode(&mut self, buf: &[u8]) -> Result<(usize, Option<Message>)> {
        trace!(
            "decode called with {} bytes, current state: {:?}",
            buf.len(),
            self.status
        );

        for (i, &byte) in buf.iter().enumerate() {
            let step = match self.status {
                DecodeStatus::WaitStart => self.decode_start(byte).map(|_| None),
                DecodeStatus::WaitFlags => self.decode_flags(byte).map(|_| None),
                DecodeStatus::WaitPayload => self.decode_payload(byte).map(|_| None),
                DecodeStatus::WaitChecksum => self.decode_checksum(byte),
            };

            match step {
                Ok(Some(msg)) => {
                    trace!(
                        "Decoded message: opcode={}, write={}, data_len={}",
                        msg.opcode,
                        msg.write,
                        msg.data.len()
                    );
                    return Ok((i + 1, Some(msg)));
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Decoder dropped frame at byte {}: {}", i, e);
                    self.stats.framing_errors += 1;
                    self.reset_decoder();
                    return Ok((i + 1, None));
                }
            }
        }

        trace!("decode consumed all {} bytes without a complete frame", buf.len());
        Ok((buf.len(), None))
    }

    /// Resets the decoder's internal state, dropping any partial frame.
    fn reset_decoder(&mut self) {
        trace!("Resetting decoder state");
        self.start_wait_start();
    }
}

impl ProtocolEncoder for Sf45HostProtocol {
    /// Encodes a `Message` into the provided byte buffer.
    ///
    /// Writes the start byte, the flags word, the opcode, the value bytes and the checksum.
    fn encode(&mut self, msg: &Message, bytes: &mut [u8]) -> Result<usize> {
        trace!(
            "Encoding message: opcode={}, write={}, data_len={}",
            msg.opcode,
            msg.write,
            msg.data.len()
        );
        let total_len = self.estimate_encoded_size(msg)?;

        if total_len > bytes.len() {
            error!(
                "Buffer too small: required {}, available {}",
                total_len,
                bytes.len()
            );
            return Err(Error::OperationFail {
                description: "buffer too small for frame".to_owned(),
            });
        }

        let payload_len = msg.payload_len();
        let mut flags = (payload_len as u16) << SF45_FLAGS_LENGTH_SHIFT;
        if msg.write {
            flags |= SF45_FLAGS_WRITE;
        }

        bytes[0] = SF45_FRAME_START;
        LittleEndian::write_u16(&mut bytes[1..SF45_HEADER_SIZE], flags);
        bytes[SF45_HEADER_SIZE] = msg.opcode;
        let body_len = SF45_HEADER_SIZE + payload_len;
        bytes[SF45_HEADER_SIZE + 1..body_len].copy_from_slice(&msg.data);

        let mut checksum = Checksum::new();
        checksum.push_slice(&bytes[..body_len]);
        let calculated = checksum.checksum();
        LittleEndian::write_u16(&mut bytes[body_len..total_len], calculated);
        trace!(
            "Encoded frame: flags={:04X}, checksum={:04X}, {:?}",
            flags,
            calculated,
            &bytes[..total_len]
        );

        Ok(total_len)
    }

    /// Returns the exact frame size for `msg`, or an error if the payload cannot be framed.
    fn estimate_encoded_size(&mut self, msg: &Message) -> Result<usize> {
        if msg.payload_len() > SF45_MAX_PAYLOAD_LEN {
            return Err(Error::OperationFail {
                description: format!(
                    "payload too big: {} bytes (max {})",
                    msg.payload_len(),
                    SF45_MAX_PAYLOAD_LEN
                ),
            });
        }
        Ok(SF45_HEADER_SIZE + msg.payload_len() + SF45_CHECKSUM_SIZE)
    }

    /// Encodes a `Message` and writes it directly to a transport.
    fn write_to(&mut self, msg: &Message, dest: &mut impl Transport) -> Result<usize> {
        let buf = encode_frame(self, msg)?;
        trace!("Writing {} bytes to transport...", buf.len());
        match dest.write_all(&buf) {
            Ok(()) => Ok(buf.len()),
            Err(err) => {
                error!("IO error during write_all: {}", err);
                Err(err)
            }
        }
    }

    /// The encoder is stateless.
    fn reset_encoder(&mut self) {
        trace!("Resetting encoder state (no-op)");
    }
}

/// Encodes `msg` into a freshly allocated frame.
pub fn encode_frame<P: ProtocolEncoder>(protocol: &mut P, msg: &Message) -> Result<Vec<u8>> {
    let size = protocol.estimate_encoded_size(msg)?;
    let mut buf = vec![0; size];
    let written = protocol.encode(msg, &mut buf)?;
    buf.truncate(written);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::checksum;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn encode(msg: &Message) -> Vec<u8> {
        encode_frame(&mut Sf45HostProtocol::new(), msg).unwrap()
    }

    /// Feeds `chunks` one after another and collects every decoded message.
    fn decode_chunks<'a>(
        protocol: &mut Sf45HostProtocol,
        chunks: impl IntoIterator<Item = &'a [u8]>,
    ) -> Vec<Message> {
        let mut out = Vec::new();
        for chunk in chunks {
            let mut offset = 0;
            while offset < chunk.len() {
                let (consumed, msg) = protocol.decode(&chunk[offset..]).unwrap();
                offset += consumed;
                out.extend(msg);
            }
        }
        out
    }

    fn decode_all(bytes: &[u8]) -> Vec<Message> {
        decode_chunks(&mut Sf45HostProtocol::new(), [bytes])
    }

    #[test]
    fn protocol_encode_get() {
        let frame = encode(&Message::new(0));
        assert_eq!(&frame[..4], &[0xAA, 0x40, 0x00, 0x00]);
        let crc = checksum(&frame, 0, 4);
        assert_eq!(&frame[4..], &crc.to_le_bytes());
    }

    #[test]
    fn protocol_encode_write_flag_and_length() {
        let frame = encode(&Message::write(96, &[1]));
        // payload_len 2 << 6 | write
        assert_eq!(&frame[..5], &[0xAA, 0x81, 0x00, 96, 1]);
        assert_eq!(frame.len(), 7);
    }

    #[test]
    fn protocol_encode_rejects_oversized_payload() {
        let msg = Message::write(1, &[0; SF45_MAX_PAYLOAD_LEN]);
        assert!(matches!(
            encode_frame(&mut Sf45HostProtocol::new(), &msg),
            Err(Error::OperationFail { .. })
        ));

        let msg = Message::write(1, &[0; SF45_MAX_PAYLOAD_LEN - 1]);
        let frame = encode(&msg);
        assert_eq!(frame.len(), SF45_MAX_FRAME_SIZE);
        assert_eq!(decode_all(&frame), vec![msg]);
    }

    #[test]
    fn decode_recovers_every_value_shape() {
        let messages = [
            Message::new(0),
            Message::write(66, &[4]),
            Message::write(85, &5i16.to_le_bytes()),
            Message::write(27, &0x109i32.to_le_bytes()),
            Message::write(98, &(-90.0f32).to_le_bytes()),
        ];
        for msg in messages.iter() {
            assert_eq!(decode_all(&encode(msg)), vec![msg.clone()]);
        }
    }

    #[test]
    fn decode_product_name_frame() {
        // opcode + 16 name bytes, read response
        let mut frame = vec![0xAA];
        frame.extend_from_slice(&((17u16 << 6).to_le_bytes()));
        frame.push(0);
        frame.extend_from_slice(b"SF45/B-50m\0\0\0\0\0\0");
        let crc = checksum(&frame, 0, frame.len());
        frame.extend_from_slice(&crc.to_le_bytes());

        let decoded = decode_all(&frame);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].opcode, 0);
        assert!(!decoded[0].write);
        assert_eq!(&decoded[0].data[..10], b"SF45/B-50m");
    }

    #[test]
    fn decode_is_independent_of_chunking() {
        let mut stream = Vec::new();
        stream.extend(encode(&Message::write(44, &[0xF4, 0x01, 0xF4, 0x01, 0, 0])));
        stream.extend(encode(&Message::new(0)));
        stream.extend(encode(&Message::write(97, &12.5f32.to_le_bytes())));
        let whole = decode_all(&stream);
        assert_eq!(whole.len(), 3);

        let bytewise = decode_chunks(
            &mut Sf45HostProtocol::new(),
            stream.chunks(1).collect::<Vec<_>>(),
        );
        assert_eq!(bytewise, whole);

        for split in 0..=stream.len() {
            let (a, b) = stream.split_at(split);
            let halves = decode_chunks(&mut Sf45HostProtocol::new(), [a, b]);
            assert_eq!(halves, whole, "split at {}", split);
        }

        let mut rng = StdRng::seed_from_u64(45);
        for _ in 0..100 {
            let mut chunks = Vec::new();
            let mut rest = stream.as_slice();
            while !rest.is_empty() {
                let n = rng.gen_range(0..=rest.len().min(9));
                let (head, tail) = rest.split_at(n);
                chunks.push(head);
                rest = tail;
            }
            let decoded = decode_chunks(&mut Sf45HostProtocol::new(), chunks);
            assert_eq!(decoded, whole);
        }
    }

    #[test]
    fn decode_skips_noise_before_start() {
        let msg = Message::write(30, &5i32.to_le_bytes());
        let mut stream = vec![0x00, 0x13, 0x55];
        stream.extend(encode(&msg));
        assert_eq!(decode_all(&stream), vec![msg]);
    }

    #[test]
    fn invalid_length_resets_without_harming_next_frame() {
        let msg = Message::write(66, &[4]);
        let mut protocol = Sf45HostProtocol::new();

        // Flags with a zero payload length, then a valid frame right behind.
        let mut stream = vec![0xAA, 0x01, 0x00];
        stream.extend(encode(&msg));
        let decoded = decode_chunks(&mut protocol, [stream.as_slice()]);

        assert_eq!(decoded, vec![msg]);
        assert_eq!(protocol.stats().framing_errors, 1);
        assert_eq!(protocol.stats().frames, 1);
        assert!(protocol.is_idle());
    }

    #[test]
    fn checksum_mismatch_drops_only_that_frame() {
        let bad = Message::write(96, &[1]);
        let good = Message::write(96, &[0]);
        let mut corrupted = encode(&bad);
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0xFF;

        let mut stream = corrupted;
        stream.extend(encode(&good));

        let mut protocol = Sf45HostProtocol::new();
        let decoded = decode_chunks(&mut protocol, [stream.as_slice()]);
        assert_eq!(decoded, vec![good]);
        assert_eq!(protocol.stats().checksum_errors, 1);
        assert_eq!(protocol.stats().frames, 1);
    }

    #[test]
    fn decode_empty_input_keeps_state() {
        let mut protocol = Sf45HostProtocol::new();
        assert_eq!(protocol.decode(&[]).unwrap(), (0, None));
        assert_eq!(protocol.decode(&[0xAA, 0x40]).unwrap(), (2, None));
        assert!(!protocol.is_idle());
        assert_eq!(protocol.decode(&[]).unwrap(), (0, None));
        assert!(!protocol.is_idle());

        protocol.reset_decoder();
        assert!(protocol.is_idle());
    }

    #[test]
    fn corrupted_checksum_reports_both_values() {
        let mut frame = encode(&Message::new(0));
        let calculated = LittleEndian::read_u16(&frame[4..6]);
        frame[4] ^= 0x01;
        let received = LittleEndian::read_u16(&frame[4..6]);

        match verify_frame(&frame, false) {
            Err(e @ Error::ChecksumMismatch { .. }) => {
                assert_eq!(
                    e.to_string(),
                    format!(
                        "checksum mismatch: received {:04X}, calculated {:04X}",
                        received, calculated
                    )
                );
            }
            other => panic!("expected checksum mismatch, got {:?}", other),
        }
        assert_eq!(verify_frame(&encode(&Message::new(0)), false).unwrap(), Message::new(0));
    }

    #[test]
    fn oversized_frame_is_dropped_and_counted() {
        // Room for header and opcode only, so the first checksum byte overflows.
        let mut protocol = Sf45HostProtocol::with_frame_capacity(4);
        let frame = encode(&Message::new(0));
        assert_eq!(frame.len(), 6);

        assert_eq!(protocol.decode(&frame).unwrap(), (5, None));
        assert!(protocol.is_idle());
        assert_eq!(protocol.stats().framing_errors, 1);
        assert_eq!(protocol.stats().frames, 0);

        // The leftover checksum byte is skipped as noise.
        assert_eq!(protocol.decode(&frame[5..]).unwrap(), (1, None));
        assert!(protocol.is_idle());
    }
}
