use crate::base::error::{Error, Result};

/// A bounded byte buffer used to reassemble one frame at a time.
///
/// The storage is allocated once and reused for every frame; `len` is the
/// write cursor. Appending past the capacity fails with `Error::BufferOverflow`
/// instead of overwriting earlier bytes.
///
/// # Example
///
/// ```rust
/// # use sf45::base::FrameBuffer;
/// let mut buffer = FrameBuffer::with_capacity(4);
/// buffer.push(0xAA).unwrap();
/// assert_eq!(buffer.len(), 1);
/// assert_eq!(buffer.as_slice(), &[0xAA]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    buf: Vec<u8>,
    len: usize,
}

impl FrameBuffer {
    /// Creates a new `FrameBuffer` that can hold up to `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> FrameBuffer {
        FrameBuffer {
            buf: vec![0; capacity],
            len: 0,
        }
    }

    /// Returns the number of bytes currently stored in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the total capacity of the buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Rewinds the write cursor; the storage is kept for the next frame.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Appends one byte.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferOverflow` when the buffer is already full. The
    /// stored bytes are left untouched in that case.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.len >= self.buf.len() {
            return Err(Error::BufferOverflow {
                capacity: self.buf.len(),
            });
        }
        self.buf[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Returns the bytes written since the last `clear`.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::FrameBuffer;
    use crate::base::Error;

    #[test]
    fn push_and_clear_reuse_storage() {
        let mut buffer = FrameBuffer::with_capacity(3);
        buffer.push(1).unwrap();
        buffer.push(2).unwrap();
        assert_eq!(buffer.as_slice(), &[1, 2]);

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 3);

        buffer.push(9).unwrap();
        assert_eq!(buffer.as_slice(), &[9]);
    }

    #[test]
    fn push_past_capacity_fails_without_overwriting() {
        let mut buffer = FrameBuffer::with_capacity(2);
        buffer.push(1).unwrap();
        buffer.push(2).unwrap();

        match buffer.push(3) {
            Err(Error::BufferOverflow { capacity }) => assert_eq!(capacity, 2),
            other => panic!("expected overflow, got {:?}", other),
        }
        assert_eq!(buffer.as_slice(), &[1, 2]);
    }
}
