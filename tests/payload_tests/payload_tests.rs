//! Tests for per-command payload layouts
//!
//! These tests verify:
//! - The 36-byte telemetry record, including the signed run flag
//! - NUL-terminated text
//! - ISO-8601 clock values
//! - Little-endian integers

use chrono::{NaiveDate, NaiveDateTime};
use pro_os_connect::payload::{
    decode_text, decode_time, decode_u32, encode_text, encode_time, encode_u32, Telemetry,
    TELEMETRY_SIZE,
};
use pro_os_connect::ProOsError;

fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

// =============================================================================
// Telemetry
// =============================================================================

#[test]
fn test_telemetry_literal_buffer() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // timestamp
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // alarms
    bytes.extend_from_slice(&[0x64, 0x00, 0x00, 0x00]); // setpoint
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // flow rate
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // combined pressure
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // pre pressure
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // inlet pressure
    bytes.extend_from_slice(&[0x00, 0x00]); // pump level
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00]); // rcb rpb rib ccb cpb
    bytes.push(0x01); // is_running
    assert_eq!(bytes.len(), TELEMETRY_SIZE);

    let telemetry = Telemetry::decode(&bytes).unwrap();

    assert_eq!(
        telemetry,
        Telemetry {
            setpoint: 100,
            is_running: 1,
            ..Telemetry::default()
        }
    );
    assert!(telemetry.running());
}

#[test]
fn test_telemetry_field_order() {
    let mut bytes = Vec::new();
    for value in 1u32..=7 {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes.extend_from_slice(&0x0102u16.to_le_bytes());
    bytes.extend_from_slice(&[10, 11, 12, 13, 14]);
    bytes.push(0xFF);

    let telemetry = Telemetry::decode(&bytes).unwrap();

    assert_eq!(telemetry.timestamp, 1);
    assert_eq!(telemetry.alarms, 2);
    assert_eq!(telemetry.setpoint, 3);
    assert_eq!(telemetry.flow_rate, 4);
    assert_eq!(telemetry.combined_pressure, 5);
    assert_eq!(telemetry.pre_pressure, 6);
    assert_eq!(telemetry.inlet_pressure, 7);
    assert_eq!(telemetry.pump_level, 0x0102);
    assert_eq!(
        (telemetry.rcb, telemetry.rpb, telemetry.rib, telemetry.ccb, telemetry.cpb),
        (10, 11, 12, 13, 14)
    );
    assert_eq!(telemetry.is_running, -1);
    assert!(telemetry.running());
}

#[test]
fn test_telemetry_encode_matches_layout() {
    let telemetry = Telemetry {
        timestamp: 0x0A0B_0C0D,
        pump_level: 0x1234,
        is_running: 1,
        ..Telemetry::default()
    };

    let bytes = telemetry.encode().unwrap();
    assert_eq!(bytes.len(), TELEMETRY_SIZE);
    assert_eq!(&bytes[..4], &[0x0D, 0x0C, 0x0B, 0x0A]);
    assert_eq!(&bytes[28..30], &[0x34, 0x12]);
    assert_eq!(bytes[35], 0x01);
    assert_eq!(Telemetry::decode(&bytes).unwrap(), telemetry);
}

#[test]
fn test_telemetry_wrong_size_rejected() {
    for len in [0, 34, 35, 37] {
        let err = Telemetry::decode(&vec![0u8; len]).unwrap_err();
        assert!(matches!(err, ProOsError::Payload(_)), "len {}", len);
    }
}

// =============================================================================
// Text
// =============================================================================

#[test]
fn test_text_strips_trailing_nuls() {
    assert_eq!(decode_text(b"PRO-1234\0").unwrap(), "PRO-1234");
    assert_eq!(decode_text(b"v2.0.1\0\0\0\0").unwrap(), "v2.0.1");
    assert_eq!(decode_text(b"no terminator").unwrap(), "no terminator");
    assert_eq!(decode_text(b"").unwrap(), "");
}

#[test]
fn test_text_rejects_invalid_utf8() {
    assert!(matches!(
        decode_text(&[0xC3, 0x28, 0x00]),
        Err(ProOsError::Payload(_))
    ));
}

#[test]
fn test_encode_text_appends_terminator() {
    assert_eq!(encode_text("abc"), b"abc\0");
    assert_eq!(encode_text(""), b"\0");
}

// =============================================================================
// Clock
// =============================================================================

#[test]
fn test_decode_time_variants() {
    let expected = datetime(2024, 5, 1, 12, 30, 15);

    assert_eq!(decode_time(b"2024-05-01T12:30:15\0").unwrap(), expected);
    assert_eq!(decode_time(b"2024-05-01 12:30:15").unwrap(), expected);
    assert_eq!(decode_time(b"2024-05-01T12:30:15+02:00\0").unwrap(), expected);
    assert_eq!(
        decode_time(b"2024-05-01T12:30:15.250000\0").unwrap(),
        expected + chrono::Duration::milliseconds(250)
    );
}

#[test]
fn test_decode_time_without_seconds() {
    let expected = datetime(2024, 5, 1, 12, 30, 0);

    assert_eq!(decode_time(b"2024-05-01T12:30\0").unwrap(), expected);
    assert_eq!(decode_time(b"2024-05-01 12:30").unwrap(), expected);
}

#[test]
fn test_decode_time_rejects_garbage() {
    assert!(matches!(
        decode_time(b"yesterday\0"),
        Err(ProOsError::Payload(_))
    ));
}

#[test]
fn test_encode_time_whole_seconds() {
    assert_eq!(
        encode_time(&datetime(2023, 12, 31, 23, 59, 59)),
        b"2023-12-31T23:59:59\0"
    );
}

#[test]
fn test_encode_time_with_micros() {
    let time = datetime(2023, 1, 2, 3, 4, 5) + chrono::Duration::microseconds(123_456);
    assert_eq!(encode_time(&time), b"2023-01-02T03:04:05.123456\0");
}

#[test]
fn test_time_round_trip_through_text() {
    let time = datetime(2030, 7, 4, 8, 0, 0);
    assert_eq!(decode_time(&encode_time(&time)).unwrap(), time);
}

// =============================================================================
// Integers
// =============================================================================

#[test]
fn test_u32_little_endian() {
    assert_eq!(encode_u32(100), vec![0x64, 0x00, 0x00, 0x00]);
    assert_eq!(decode_u32(&[0x02, 0x01, 0x00, 0x00]).unwrap(), 0x0102);
}

#[test]
fn test_u32_ignores_extra_bytes() {
    assert_eq!(decode_u32(&[0x01, 0x00, 0x00, 0x00, 0xFF]).unwrap(), 1);
}

#[test]
fn test_u32_too_short() {
    assert!(matches!(decode_u32(&[0x01, 0x00]), Err(ProOsError::Payload(_))));
}
