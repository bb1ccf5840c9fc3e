//! Response definitions
//!
//! Turns a reply batch into attribute maps or a typed failure.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::error::{Result, RosError};
use super::{Batch, Marker, Sentence};

/// Key/value pairs of one sentence, values decoded as UTF-8 (lossy)
pub type Attributes = BTreeMap<String, String>;

/// Key/value pairs of one sentence with the values exactly as received
pub type RawAttributes = BTreeMap<String, Bytes>;

/// A successful reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// One map per `!re` sentence, in arrival order
    pub rows: Vec<Attributes>,

    /// Same rows as `rows`, values untouched
    ///
    /// Routers store text such as comments in whatever code page they were
    /// written with; send these bytes back when writing a value unchanged.
    pub raw_rows: Vec<RawAttributes>,

    /// Attributes carried by the `!done` sentence itself
    pub done: Attributes,
}

impl Reply {
    /// Value returned by the command, e.g. the `.id` of an added item
    pub fn ret(&self) -> Option<&str> {
        self.done.get("ret").map(String::as_str)
    }

    /// Undecoded value of `key` in row `index`
    pub fn raw_value(&self, index: usize, key: &str) -> Option<&[u8]> {
        self.raw_rows.get(index)?.get(key).map(|v| &v[..])
    }
}

/// A command rejected by the router
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trap {
    /// Human-readable reason, empty if the router sent none
    pub message: String,

    /// Numeric error category, as sent
    pub category: Option<String>,

    /// Every attribute of the `!trap` sentence
    pub attributes: Attributes,
}

impl Trap {
    fn from_attributes(attributes: Attributes) -> Self {
        Self {
            message: attributes.get("message").cloned().unwrap_or_default(),
            category: attributes.get("category").cloned(),
            attributes,
        }
    }
}

impl From<Trap> for RosError {
    fn from(trap: Trap) -> Self {
        RosError::Operation {
            message: trap.message,
            category: trap.category,
        }
    }
}

/// Result of one command that reached the router
///
/// A trap is a normal outcome, not an error: the connection stays usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done(Reply),
    Trap(Trap),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    /// Rows of a successful reply; empty for a trap
    pub fn rows(&self) -> &[Attributes] {
        match self {
            Outcome::Done(reply) => &reply.rows,
            Outcome::Trap(_) => &[],
        }
    }

    pub fn trap(&self) -> Option<&Trap> {
        match self {
            Outcome::Done(_) => None,
            Outcome::Trap(trap) => Some(trap),
        }
    }

    /// Convert a trap into [`RosError::Operation`]
    pub fn into_result(self) -> Result<Reply> {
        match self {
            Outcome::Done(reply) => Ok(reply),
            Outcome::Trap(trap) => Err(trap.into()),
        }
    }

    pub fn into_rows(self) -> Result<Vec<Attributes>> {
        self.into_result().map(|reply| reply.rows)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Byte offsets of key and value inside an attribute word
fn split_attribute(word: &[u8]) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
    if !matches!(word.first(), Some(b'=' | b'?')) {
        return None;
    }

    let (key, value) = match word[1..].iter().position(|&b| b == b'=') {
        Some(split) => (1..split + 1, split + 2..word.len()),
        None => (1..word.len(), word.len()..word.len()),
    };

    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Split an attribute word into key and value
///
/// Accepts `=key=value` and `?key=value`; the value may itself contain `=`.
/// A word with no second `=` yields an empty value. Anything else is not an
/// attribute. Invalid UTF-8 is replaced; use [`parse_raw_attribute`] to keep
/// the value bytes.
pub fn parse_attribute(word: &[u8]) -> Option<(String, String)> {
    let (key, value) = split_attribute(word)?;
    Some((
        String::from_utf8_lossy(&word[key]).into_owned(),
        String::from_utf8_lossy(&word[value]).into_owned(),
    ))
}

/// Like [`parse_attribute`], but the value shares the word's buffer unchanged
pub fn parse_raw_attribute(word: &Bytes) -> Option<(String, Bytes)> {
    let (key, value) = split_attribute(word)?;
    Some((
        String::from_utf8_lossy(&word[key]).into_owned(),
        word.slice(value),
    ))
}

/// Collect the attribute words of a sentence, discarding everything else
pub fn parse_attributes(words: &[Bytes]) -> Attributes {
    words.iter().filter_map(|w| parse_attribute(w)).collect()
}

/// Collect the attribute words of a sentence without decoding the values
pub fn parse_raw_attributes(words: &[Bytes]) -> RawAttributes {
    words.iter().filter_map(parse_raw_attribute).collect()
}

/// Reason text of a `!fatal` sentence, which is sent as a bare word
fn fatal_reason(sentence: &Sentence) -> String {
    let reason: Vec<String> = sentence
        .words
        .iter()
        .map(|w| match parse_attribute(w) {
            Some((_, value)) => value,
            None => String::from_utf8_lossy(w).into_owned(),
        })
        .collect();
    reason.join(" ")
}

/// Parse a complete reply batch
///
/// Rows come from `!re` sentences. The first `!trap` decides the outcome
/// regardless of any rows before it. `!fatal` is a connection error.
pub fn parse_batch(batch: &Batch) -> Result<Outcome> {
    if batch.terminal().is_none() {
        return Err(RosError::Protocol(
            "Reply batch ended without a terminal sentence".to_string(),
        ));
    }

    let mut rows = Vec::new();
    let mut raw_rows = Vec::new();
    let mut done = Attributes::new();
    let mut trap = None;

    for sentence in batch.sentences() {
        match sentence.marker {
            Marker::Re => {
                rows.push(parse_attributes(&sentence.words));
                raw_rows.push(parse_raw_attributes(&sentence.words));
            }
            Marker::Empty => {}
            Marker::Done => done = parse_attributes(&sentence.words),
            Marker::Trap => {
                if trap.is_none() {
                    trap = Some(Trap::from_attributes(parse_attributes(&sentence.words)));
                }
            }
            Marker::Fatal => {
                return Err(RosError::Connection(format!(
                    "Router closed the session: {}",
                    fatal_reason(sentence)
                )))
            }
        }
    }

    match trap {
        Some(trap) => Ok(Outcome::Trap(trap)),
        None => Ok(Outcome::Done(Reply { rows, raw_rows, done })),
    }
}
