//! Protocol codec
//!
//! Length prefix and word encoding for the wire protocol.
//!
//! ## Length Prefix
//! ```text
//! ┌────────────────────────┬───────┬──────────────────────────────┐
//! │ Length                 │ Bytes │ Leading byte                 │
//! ├────────────────────────┼───────┼──────────────────────────────┤
//! │ 0x00 ..= 0x7F          │ 1     │ 0xxxxxxx (the length itself) │
//! │ 0x80 ..= 0x3FFF        │ 2     │ 10xxxxxx                     │
//! │ 0x4000 ..= 0x1FFFFF    │ 3     │ 110xxxxx                     │
//! │ 0x200000 ..= 0xFFFFFFF │ 4     │ 1110xxxx                     │
//! │ 0x10000000 ..          │ 5     │ 11110xxx + big-endian u32    │
//! └────────────────────────┴───────┴──────────────────────────────┘
//! ```
//!
//! Bytes following the leading byte carry the remaining bits, most
//! significant first. A zero length is the sentence terminator. The encoder
//! always writes `0xF0` for the 5-byte form; the decoder ignores the low three
//! bits of that leading byte.

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, RosError};

/// Longest possible length prefix
pub const MAX_PREFIX_SIZE: usize = 5;

// =============================================================================
// Length Encoding/Decoding
// =============================================================================

/// Append the length prefix for `len` to `buf`
pub fn put_length(buf: &mut BytesMut, len: u32) {
    if len < 0x80 {
        buf.put_u8(len as u8);
    } else if len < 0x4000 {
        buf.put_u8((len >> 8) as u8 | 0x80);
        buf.put_u8(len as u8);
    } else if len < 0x20_0000 {
        buf.put_u8((len >> 16) as u8 | 0xC0);
        buf.put_u8((len >> 8) as u8);
        buf.put_u8(len as u8);
    } else if len < 0x1000_0000 {
        buf.put_u8((len >> 24) as u8 | 0xE0);
        buf.put_u8((len >> 16) as u8);
        buf.put_u8((len >> 8) as u8);
        buf.put_u8(len as u8);
    } else {
        buf.put_u8(0xF0);
        buf.put_u32(len);
    }
}

/// Encode a length prefix
pub fn encode_length(len: u32) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(MAX_PREFIX_SIZE);
    put_length(&mut buf, len);
    buf.to_vec()
}

/// Total prefix width implied by the leading byte
///
/// Masks are tested narrowest first. Leading bytes `0xF8..=0xFF` are
/// reserved control bytes and never start a length.
pub fn prefix_width(first: u8) -> Result<usize> {
    if first & 0x80 == 0x00 {
        Ok(1)
    } else if first & 0xC0 == 0x80 {
        Ok(2)
    } else if first & 0xE0 == 0xC0 {
        Ok(3)
    } else if first & 0xF0 == 0xE0 {
        Ok(4)
    } else if first & 0xF8 == 0xF0 {
        Ok(5)
    } else {
        Err(RosError::Protocol(format!(
            "Invalid length prefix: reserved control byte 0x{:02x}",
            first
        )))
    }
}

/// Recover the length from a complete prefix
fn length_from_prefix(prefix: &[u8]) -> u32 {
    match prefix.len() {
        1 => prefix[0] as u32,
        2 => ((prefix[0] as u32 & 0x3F) << 8) | prefix[1] as u32,
        3 => ((prefix[0] as u32 & 0x1F) << 16) | ((prefix[1] as u32) << 8) | prefix[2] as u32,
        4 => {
            ((prefix[0] as u32 & 0x0F) << 24)
                | ((prefix[1] as u32) << 16)
                | ((prefix[2] as u32) << 8)
                | prefix[3] as u32
        }
        _ => u32::from_be_bytes([prefix[1], prefix[2], prefix[3], prefix[4]]),
    }
}

/// Decode a length prefix from the start of `bytes`
///
/// Returns the length and the number of prefix bytes consumed, or `None`
/// if `bytes` does not yet hold the whole prefix.
pub fn decode_length(bytes: &[u8]) -> Result<Option<(u32, usize)>> {
    let Some(&first) = bytes.first() else {
        return Ok(None);
    };

    let width = prefix_width(first)?;
    if bytes.len() < width {
        return Ok(None);
    }

    Ok(Some((length_from_prefix(&bytes[..width]), width)))
}

// =============================================================================
// Word / Sentence Encoding
// =============================================================================

/// Append one length-prefixed word to `buf`
pub fn put_word(buf: &mut BytesMut, word: &[u8]) -> Result<()> {
    let len = u32::try_from(word.len()).map_err(|_| {
        RosError::Protocol(format!("Word too large to encode: {} bytes", word.len()))
    })?;
    buf.reserve(MAX_PREFIX_SIZE + word.len());
    put_length(buf, len);
    buf.put_slice(word);
    Ok(())
}

/// Encode a full sentence: every word followed by the empty terminator word
pub fn encode_sentence<I, W>(words: I) -> Result<BytesMut>
where
    I: IntoIterator<Item = W>,
    W: AsRef<[u8]>,
{
    let mut buf = BytesMut::new();
    for word in words {
        put_word(&mut buf, word.as_ref())?;
    }
    put_length(&mut buf, 0);
    Ok(buf)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a length prefix from a stream
///
/// Blocks until the whole prefix is read or an error occurs
pub fn read_length<R: Read>(reader: &mut R) -> Result<u32> {
    let mut prefix = [0u8; MAX_PREFIX_SIZE];
    reader.read_exact(&mut prefix[..1])?;

    let width = prefix_width(prefix[0])?;
    if width > 1 {
        reader.read_exact(&mut prefix[1..width])?;
    }

    Ok(length_from_prefix(&prefix[..width]))
}

/// Read one complete word from a stream
///
/// Words larger than `max_size` are rejected before any payload is read.
pub fn read_word<R: Read>(reader: &mut R, max_size: u32) -> Result<Bytes> {
    let len = read_length(reader)?;
    if len > max_size {
        return Err(RosError::Protocol(format!(
            "Word too large: {} bytes (max {})",
            len, max_size
        )));
    }

    if len == 0 {
        return Ok(Bytes::new());
    }

    let mut word = vec![0u8; len as usize];
    reader.read_exact(&mut word)?;
    Ok(Bytes::from(word))
}

/// Write a complete sentence to a stream
pub fn write_sentence<W, I, T>(writer: &mut W, words: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let bytes = encode_sentence(words)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
