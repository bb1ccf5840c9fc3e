//! Codec Tests
//!
//! Tests for length prefix and sentence encoding/decoding.

use std::io::Cursor;
use rosapi::protocol::{
    decode_length, encode_length, encode_sentence, prefix_width, read_length, read_word,
    write_sentence,
};
use rosapi::RosError;

// =============================================================================
// Length Encoding Tests
// =============================================================================

#[test]
fn test_encode_concrete_examples() {
    assert_eq!(encode_length(0), vec![0x00]);
    assert_eq!(encode_length(0x7F), vec![0x7F]);
    assert_eq!(encode_length(130), vec![0x80, 0x82]);
    assert_eq!(encode_length(0x3FFF), vec![0xBF, 0xFF]);
    assert_eq!(encode_length(0x4000), vec![0xC0, 0x40, 0x00]);
    assert_eq!(encode_length(0x1F_FFFF), vec![0xDF, 0xFF, 0xFF]);
    assert_eq!(encode_length(0x20_0000), vec![0xE0, 0x20, 0x00, 0x00]);
    assert_eq!(encode_length(0x0FFF_FFFF), vec![0xEF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(encode_length(0x1000_0000), vec![0xF0, 0x10, 0x00, 0x00, 0x00]);
    assert_eq!(encode_length(u32::MAX), vec![0xF0, 0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn test_prefix_width_at_boundaries() {
    let cases: [(u32, usize); 10] = [
        (0, 1),
        (0x7F, 1),
        (0x80, 2),
        (0x3FFF, 2),
        (0x4000, 3),
        (0x1F_FFFF, 3),
        (0x20_0000, 4),
        (0x0FFF_FFFF, 4),
        (0x1000_0000, 5),
        (u32::MAX, 5),
    ];

    for (len, width) in cases {
        let encoded = encode_length(len);
        assert_eq!(encoded.len(), width, "width of 0x{:x}", len);
        assert_eq!(prefix_width(encoded[0]).unwrap(), width, "leading byte of 0x{:x}", len);
    }
}

// =============================================================================
// Length Decoding Tests
// =============================================================================

#[test]
fn test_decode_boundaries() {
    for len in [
        0u32, 1, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x20_0000, 0x0FFF_FFFF, 0x1000_0000,
        u32::MAX,
    ] {
        let encoded = encode_length(len);
        assert_eq!(
            decode_length(&encoded).unwrap(),
            Some((len, encoded.len())),
            "round trip of 0x{:x}",
            len
        );
    }
}

#[test]
fn test_decode_sampled_range() {
    // Step through the whole u32 range with a stride that hits every width
    let mut len: u64 = 0;
    while len <= u32::MAX as u64 {
        let value = len as u32;
        let encoded = encode_length(value);
        let (decoded, consumed) = decode_length(&encoded).unwrap().unwrap();
        assert_eq!(decoded, value);
        assert_eq!(consumed, encoded.len());
        len += 458_647;
    }
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let mut bytes = encode_length(0x1234);
    bytes.extend_from_slice(b"payload");
    assert_eq!(decode_length(&bytes).unwrap(), Some((0x1234, 2)));

    let mut bytes = encode_length(0x4321);
    bytes.extend_from_slice(b"payload");
    assert_eq!(decode_length(&bytes).unwrap(), Some((0x4321, 3)));
}

#[test]
fn test_decode_incomplete_prefix() {
    assert_eq!(decode_length(&[0xE0, 0x20]).unwrap(), None);
    assert_eq!(decode_length(&[0xF0, 0x10, 0x00, 0x00]).unwrap(), None);
}

#[test]
fn test_decode_reserved_byte() {
    assert!(matches!(decode_length(&[0xF8]), Err(RosError::Protocol(_))));
    assert!(matches!(decode_length(&[0xFF, 0, 0, 0, 0]), Err(RosError::Protocol(_))));
}

#[test]
fn test_five_byte_form_ignores_low_bits_of_leading_byte() {
    // 0xF0..=0xF7 all introduce the 5-byte form; only the next four bytes count
    for first in 0xF0u8..=0xF7 {
        assert_eq!(prefix_width(first).unwrap(), 5, "leading byte 0x{:02x}", first);
        assert_eq!(
            decode_length(&[first, 0x12, 0x34, 0x56, 0x78]).unwrap(),
            Some((0x1234_5678, 5))
        );
    }
}

// =============================================================================
// Stream-based I/O Tests
// =============================================================================

#[test]
fn test_read_length_from_stream() {
    let mut bytes = Vec::new();
    for len in [5u32, 200, 0x5000, 0x30_0000, 0x2000_0000] {
        bytes.extend_from_slice(&encode_length(len));
    }

    let mut cursor = Cursor::new(bytes);
    assert_eq!(read_length(&mut cursor).unwrap(), 5);
    assert_eq!(read_length(&mut cursor).unwrap(), 200);
    assert_eq!(read_length(&mut cursor).unwrap(), 0x5000);
    assert_eq!(read_length(&mut cursor).unwrap(), 0x30_0000);
    assert_eq!(read_length(&mut cursor).unwrap(), 0x2000_0000);
}

#[test]
fn test_read_length_truncated_prefix() {
    let mut cursor = Cursor::new(vec![0xC0, 0x01]);
    match read_length(&mut cursor) {
        Err(RosError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("Expected EOF, got {:?}", other),
    }
}

#[test]
fn test_read_word_long_payload() {
    let payload = "x".repeat(300);
    let bytes = encode_sentence([payload.as_str()]).unwrap();
    assert_eq!(&bytes[..2], &[0x81u8, 0x2C][..]);

    let mut cursor = Cursor::new(bytes.to_vec());
    let word = read_word(&mut cursor, 1024).unwrap();
    assert_eq!(word.len(), 300);
    assert!(read_word(&mut cursor, 1024).unwrap().is_empty());
}

#[test]
fn test_read_word_binary_data() {
    let binary: Vec<u8> = (0..=255).collect();
    let bytes = encode_sentence([binary.as_slice()]).unwrap();

    let mut cursor = Cursor::new(bytes.to_vec());
    let word = read_word(&mut cursor, 1024).unwrap();
    assert_eq!(&word[..], binary.as_slice());
}

#[test]
fn test_read_word_over_limit() {
    let bytes = encode_sentence(["0123456789"]).unwrap();
    let mut cursor = Cursor::new(bytes.to_vec());
    assert!(matches!(read_word(&mut cursor, 4), Err(RosError::Protocol(_))));
}

#[test]
fn test_encode_sentence_layout() {
    let bytes = encode_sentence(["/login", "=name=admin"]).unwrap();

    let mut expected = vec![6u8];
    expected.extend_from_slice(b"/login");
    expected.push(11);
    expected.extend_from_slice(b"=name=admin");
    expected.push(0);

    assert_eq!(&bytes[..], expected.as_slice());
}

#[test]
fn test_write_sentence_to_stream() {
    let mut out: Vec<u8> = Vec::new();
    write_sentence(&mut out, ["/system/resource/print"]).unwrap();

    assert_eq!(out[0] as usize, "/system/resource/print".len());
    assert_eq!(*out.last().unwrap(), 0);
}

#[test]
fn test_empty_sentence_is_single_zero() {
    let bytes = encode_sentence(Vec::<&str>::new()).unwrap();
    assert_eq!(&bytes[..], &[0u8][..]);
}
