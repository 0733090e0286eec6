//! Frame checksum
//!
//! CRC-32/MPEG-2: polynomial 0x04C11DB7, init 0xFFFFFFFF, no input or
//! output reflection, no final XOR. Used for both the transport header
//! CRC and the protocol packet CRC.

use crc::{Crc, CRC_32_MPEG_2};

const MPEG2: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

/// Compute the CRC-32/MPEG-2 of a byte span
pub fn checksum(bytes: &[u8]) -> u32 {
    MPEG2.checksum(bytes)
}
