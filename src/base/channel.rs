use crate::base::error::Result;
use crate::base::message::Message;
use crate::base::traits::{ProtocolDecoder, ProtocolEncoder, Transport};
use log::{error, trace};
use std::cmp::min;

const DEFAULT_CHANNEL_READ_CHUNK_SIZE: usize = 1200;

/// Channel encode and decode message with protocol, and send and receive bytes via transport
///
/// # Examples
/// ```ignore
/// let mut channel = Channel::new(
///     Sf45HostProtocol::new(),
///     serial_port
/// );
///
/// channel.write(&Message::new(0)).unwrap();
/// let mut answers = Vec::new();
/// channel.poll(&mut answers).unwrap();
/// ```
#[derive(Debug)]
pub struct Channel<P, T> {
    protocol: P,
    transport: T,
    read_chunk: Vec<u8>,
}

impl<P, T> Channel<P, T>
where
    P: ProtocolDecoder + ProtocolEncoder,
    T: Transport,
{
    /// Create a new `Channel` to read and write messages
    pub fn new(protocol: P, transport: T) -> Channel<P, T> {
        Channel::with_read_chunk_size(protocol, transport, DEFAULT_CHANNEL_READ_CHUNK_SIZE)
    }

    /// Create a new `Channel` that drains the transport in chunks of at most `read_chunk_size` bytes
    pub fn with_read_chunk_size(
        protocol: P,
        transport: T,
        read_chunk_size: usize,
    ) -> Channel<P, T> {
        trace!("Creating new Channel with read chunk {}", read_chunk_size);
        let mut chn = Channel {
            protocol,
            transport,
            read_chunk: vec![0; read_chunk_size.max(1)],
        };

        chn.reset();
        chn
    }

    /// Reset the protocol encoder and decoder, dropping any partially received frame
    pub fn reset(&mut self) {
        trace!("Resetting Channel protocol encoder and decoder");
        self.protocol.reset_encoder();
        self.protocol.reset_decoder();
    }

    /// Returns the protocol, e.g. to inspect decoder statistics
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Read every byte the transport has ready and decode it into `out`.
    ///
    /// Never waits for more data. Complete messages are appended in arrival
    /// order as soon as they are decoded, so they survive a transport error
    /// later in the same call; a trailing partial frame stays in the decoder.
    /// Returns the number of messages appended.
    pub fn poll(&mut self, out: &mut Vec<Message>) -> Result<usize> {
        let before = out.len();

        loop {
            let available = self.transport.bytes_available()?;
            if available == 0 {
                break;
            }
            let len = min(available, self.read_chunk.len());
            self.transport.read_exact(&mut self.read_chunk[..len])?;
            trace!("Read {} of {} available bytes", len, available);

            let mut offset = 0;
            while offset < len {
                match self.protocol.decode(&self.read_chunk[offset..len]) {
                    Ok((consumed, msg)) => {
                        offset += consumed;
                        out.extend(msg);
                    }
                    Err(e) => {
                        error!("Protocol decode error: {}", e);
                        return Err(e);
                    }
                }
            }
        }

        trace!("Channel poll decoded {} messages", out.len() - before);
        Ok(out.len() - before)
    }

    /// Write message to channel
    ///
    /// # Example
    /// ```ignore
    /// channel.write(&Message::write(96, &[1])).unwrap();
    /// ```
    pub fn write(&mut self, msg: &Message) -> Result<usize> {
        trace!(
            "Channel write called: opcode={}, write={}, data_len={}",
            msg.opcode,
            msg.write,
            msg.data.len()
        );
        self.protocol.write_to(msg, &mut self.transport)
    }
}
