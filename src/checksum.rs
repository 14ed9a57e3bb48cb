/// Calculates the 16-bit CRC that closes every SF45 frame.
///
/// This is the table-free CRC-16/CCITT form used by the device firmware, with
/// the accumulator starting at 0. Bytes can be fed in several slices; the
/// result is the same as feeding them in one go.
pub struct Checksum {
    current: u16,
}

impl Checksum {
    /// Creates a new `Checksum` instance, initialized to 0.
    #[inline]
    pub fn new() -> Checksum {
        Checksum { current: 0 }
    }

    /// Includes a slice of bytes in the checksum calculation.
    ///
    /// # Arguments
    ///
    /// * `data` - The bytes to mix into the current checksum.
    #[inline]
    pub fn push_slice(&mut self, data: &[u8]) {
        for &b in data {
            let mut code = (self.current >> 8) ^ b as u16;
            code ^= code >> 4;
            self.current = (self.current << 8) ^ code;
            code <<= 5;
            self.current ^= code;
            code <<= 7;
            self.current ^= code;
        }
    }

    /// Returns the calculated checksum value.
    #[inline]
    pub fn checksum(&self) -> u16 {
        self.current
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the checksum of `data[offset..end]`.
///
/// `end` is an exclusive index into `data`, not a count of bytes after `offset`.
pub fn checksum(data: &[u8], offset: usize, end: usize) -> u16 {
    let mut checksum = Checksum::new();
    checksum.push_slice(&data[offset..end]);
    checksum.checksum()
}

#[cfg(test)]
mod tests {
    use super::{checksum, Checksum};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn empty_range_is_zero() {
        assert_eq!(checksum(&[], 0, 0), 0);
        assert_eq!(checksum(&[1, 2, 3], 2, 2), 0);
    }

    #[test]
    fn matches_ccitt_check_value() {
        // CRC-16/XMODEM (poly 0x1021, init 0) check value.
        assert_eq!(checksum(b"123456789", 0, 9), 0x31C3);
    }

    #[test]
    fn get_product_frame_checksum() {
        let frame = [0xAA, 0x40, 0x00, 0x00];
        let crc = checksum(&frame, 0, frame.len());
        let mut incremental = Checksum::new();
        incremental.push_slice(&frame[..2]);
        incremental.push_slice(&frame[2..]);
        assert_eq!(incremental.checksum(), crc);
    }

    #[test]
    fn offset_skips_leading_bytes() {
        let data = [0xFF, 0xFE, 0x10, 0x20, 0x30];
        assert_eq!(checksum(&data, 2, 5), checksum(&[0x10, 0x20, 0x30], 0, 3));
    }

    #[test]
    fn deterministic_and_detects_every_single_bit_flip() {
        let mut rng = StdRng::seed_from_u64(0x5F45);

        for _ in 0..200 {
            let len = rng.gen_range(1..=64);
            let mut data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let reference = checksum(&data, 0, len);
            assert_eq!(checksum(&data, 0, len), reference);

            for byte in 0..len {
                for bit in 0..8 {
                    data[byte] ^= 1 << bit;
                    assert_ne!(
                        checksum(&data, 0, len),
                        reference,
                        "flip of bit {} in byte {} went undetected",
                        bit,
                        byte
                    );
                    data[byte] ^= 1 << bit;
                }
            }
        }
    }
}
