/// Represents a command or response message exchanged with the SF45 device.
///
/// On the wire this is the payload of one frame: the opcode byte followed by `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// The parameter or command identifier.
    pub opcode: u8,

    /// `true` when the frame sets the parameter, `false` when it queries it.
    pub write: bool,

    /// Value bytes following the opcode.
    pub data: Vec<u8>,
}

impl Message {
    /// Creates a read (get) message with no value bytes.
    ///
    /// # Arguments
    ///
    /// * `opcode` - The parameter to query.
    pub fn new(opcode: u8) -> Message {
        Message {
            opcode,
            write: false,
            data: Vec::new(),
        }
    }

    /// Creates a write message carrying raw value bytes.
    ///
    /// # Arguments
    ///
    /// * `opcode` - The parameter to set.
    /// * `data` - A slice containing the encoded value.
    #[inline]
    pub fn write(opcode: u8, data: &[u8]) -> Message {
        Message {
            opcode,
            write: true,
            data: data.to_vec(),
        }
    }

    /// Number of payload bytes this message occupies on the wire (opcode + data).
    #[inline]
    pub fn payload_len(&self) -> usize {
        1 + self.data.len()
    }
}
