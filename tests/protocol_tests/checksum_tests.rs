//! Checksum Tests
//!
//! CRC-32/MPEG-2 reference vectors.

use pro_os_connect::protocol::checksum;

#[test]
fn test_empty_input_is_initial_register() {
    assert_eq!(checksum(&[]), 0xFFFF_FFFF);
}

#[test]
fn test_standard_check_value() {
    assert_eq!(checksum(b"123456789"), 0x0376_E6E7);
}

#[test]
fn test_single_zero_byte() {
    assert_eq!(checksum(&[0x00]), 0x4E08_BFB4);
}

#[test]
fn test_four_zero_bytes() {
    assert_eq!(checksum(&[0x00; 4]), 0xC704_DD7B);
}

#[test]
fn test_ascii_sentence() {
    assert_eq!(
        checksum(b"The quick brown fox jumps over the lazy dog"),
        0xBA62_119E
    );
}

#[test]
fn test_deterministic() {
    let data: Vec<u8> = (0..=255).collect();
    assert_eq!(checksum(&data), checksum(&data));
}

#[test]
fn test_single_bit_change_alters_checksum() {
    let data = b"framing".to_vec();
    let original = checksum(&data);

    for bit in 0..data.len() * 8 {
        let mut flipped = data.clone();
        flipped[bit / 8] ^= 1 << (bit % 8);
        assert_ne!(checksum(&flipped), original, "bit {} not detected", bit);
    }
}
