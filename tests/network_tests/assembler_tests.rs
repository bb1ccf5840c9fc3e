//! Assembler Tests
//!
//! These tests verify:
//! - Sentence boundaries versus batch boundaries
//! - Draining of the `!done` that follows a `!trap`
//! - End-of-file handling
//! - Framing violations

#[path = "../common/mod.rs"]
mod common;

use std::io::Cursor;

use bytes::Bytes;
use common::{script, sentence};
use rosapi::network::{read_batch, SentenceAssembler, WordStream};
use rosapi::protocol::Marker;
use rosapi::RosError;

// =============================================================================
// Helper Functions
// =============================================================================

fn stream_of(bytes: Vec<u8>) -> WordStream<Cursor<Vec<u8>>> {
    WordStream::new(Cursor::new(bytes), 1024 * 1024)
}

fn markers(batch: &rosapi::protocol::Batch) -> Vec<Marker> {
    batch.sentences().iter().map(|s| s.marker).collect()
}

// =============================================================================
// Multi-Sentence Tests
// =============================================================================

#[test]
fn test_empty_word_closes_only_the_sentence() {
    let mut stream = stream_of(script(&[
        &["!re", "=name=ether1"],
        &["!re", "=name=ether2"],
        &["!re", "=name=wlan1"],
        &["!done"],
    ]));

    let batch = read_batch(&mut stream).unwrap();
    assert_eq!(
        markers(&batch),
        vec![Marker::Re, Marker::Re, Marker::Re, Marker::Done]
    );
    assert_eq!(batch.sentences()[2].words, vec![Bytes::from_static(b"=name=wlan1")]);
}

#[test]
fn test_consecutive_batches_do_not_bleed() {
    let mut stream = stream_of(script(&[
        &["!re", "=name=a"],
        &["!done"],
        &["!re", "=name=b"],
        &["!re", "=name=c"],
        &["!done"],
    ]));

    let first = read_batch(&mut stream).unwrap();
    let second = read_batch(&mut stream).unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 3);
    assert_eq!(second.sentences()[0].words[0], Bytes::from_static(b"=name=b"));
}

#[test]
fn test_re_without_attributes_is_kept() {
    let mut stream = stream_of(script(&[&["!re"], &["!done"]]));

    let batch = read_batch(&mut stream).unwrap();
    assert_eq!(markers(&batch), vec![Marker::Re, Marker::Done]);
    assert!(batch.sentences()[0].words.is_empty());
}

#[test]
fn test_stray_empty_words_are_ignored() {
    let mut bytes = vec![0u8, 0u8];
    bytes.extend(script(&[&["!done"]]));
    let mut stream = stream_of(bytes);

    let batch = read_batch(&mut stream).unwrap();
    assert_eq!(markers(&batch), vec![Marker::Done]);
}

// =============================================================================
// Trap Handling Tests
// =============================================================================

#[test]
fn test_trap_then_done_is_one_batch() {
    let mut stream = stream_of(script(&[
        &["!trap", "=message=failure: already have user with this name"],
        &["!done"],
        &["!re", "=name=next"],
        &["!done"],
    ]));

    let batch = read_batch(&mut stream).unwrap();
    assert_eq!(markers(&batch), vec![Marker::Trap, Marker::Done]);

    let next = read_batch(&mut stream).unwrap();
    assert_eq!(markers(&next), vec![Marker::Re, Marker::Done]);
}

#[test]
fn test_trap_then_eof_ends_at_trap() {
    let mut stream = stream_of(sentence(&["!trap", "=message=bad"]));

    let batch = read_batch(&mut stream).unwrap();
    assert_eq!(markers(&batch), vec![Marker::Trap]);
    assert!(batch.terminal().is_some());
}

#[test]
fn test_fatal_cut_off_by_eof() {
    // Router closed the socket before the terminator
    let mut bytes = sentence(&["!fatal", "not logged in"]);
    bytes.pop();
    let mut stream = stream_of(bytes);

    let batch = read_batch(&mut stream).unwrap();
    assert_eq!(markers(&batch), vec![Marker::Fatal]);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_eof_mid_batch_is_io_error() {
    let mut stream = stream_of(script(&[&["!re", "=name=a"]]));

    match read_batch(&mut stream) {
        Err(RosError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("Expected EOF, got {:?}", other),
    }
}

#[test]
fn test_unknown_marker_is_protocol_error() {
    let mut stream = stream_of(script(&[&["!bogus"], &["!done"]]));
    assert!(matches!(read_batch(&mut stream), Err(RosError::Protocol(_))));
}

#[test]
fn test_attribute_before_marker_is_protocol_error() {
    let mut stream = stream_of(script(&[&["=name=orphan"], &["!done"]]));
    assert!(matches!(read_batch(&mut stream), Err(RosError::Protocol(_))));
}

#[test]
fn test_oversized_word_is_protocol_error() {
    let long = format!("=comment={}", "x".repeat(64));
    let mut stream = WordStream::new(
        Cursor::new(script(&[&["!re", long.as_str()], &["!done"]])),
        32,
    );
    assert!(matches!(read_batch(&mut stream), Err(RosError::Protocol(_))));
}

// =============================================================================
// Push-based Assembler Tests
// =============================================================================

#[test]
fn test_marker_without_terminator_closes_previous_sentence() {
    let mut assembler = SentenceAssembler::new();

    assert!(assembler.push(Bytes::from_static(b"!re")).unwrap().is_none());
    assert!(assembler.push(Bytes::from_static(b"=name=a")).unwrap().is_none());
    assert!(assembler.push(Bytes::from_static(b"!re")).unwrap().is_none());
    assert_eq!(assembler.pending(), 1);

    assert!(assembler.push(Bytes::new()).unwrap().is_none());
    assert!(assembler.push(Bytes::from_static(b"!done")).unwrap().is_none());

    let batch = assembler.push(Bytes::new()).unwrap().unwrap();
    assert_eq!(batch.len(), 3);
}

#[test]
fn test_unterminated_done_followed_by_marker() {
    let mut assembler = SentenceAssembler::new();

    assembler.push(Bytes::from_static(b"!done")).unwrap();
    assert!(matches!(
        assembler.push(Bytes::from_static(b"!re")),
        Err(RosError::Protocol(_))
    ));
}
