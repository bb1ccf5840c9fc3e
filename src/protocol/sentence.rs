//! Sentence definitions
//!
//! Incoming sentences and the reply batch they form.

use bytes::Bytes;

use crate::error::{Result, RosError};

/// Reply sentence kinds, identified by the sentence's first word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `!re` - one result row
    Re,

    /// `!done` - command finished
    Done,

    /// `!trap` - command failed
    Trap,

    /// `!fatal` - router is closing the connection
    Fatal,

    /// `!empty` - command produced no rows
    Empty,
}

impl Marker {
    /// Parse a marker word
    ///
    /// Returns `Ok(None)` for words that are not markers at all, and an error
    /// for `!`-prefixed words this client does not know.
    pub fn parse(word: &[u8]) -> Result<Option<Marker>> {
        match word {
            b"!re" => Ok(Some(Marker::Re)),
            b"!done" => Ok(Some(Marker::Done)),
            b"!trap" => Ok(Some(Marker::Trap)),
            b"!fatal" => Ok(Some(Marker::Fatal)),
            b"!empty" => Ok(Some(Marker::Empty)),
            [b'!', ..] => Err(RosError::Protocol(format!(
                "Unexpected reply marker: {}",
                String::from_utf8_lossy(word)
            ))),
            _ => Ok(None),
        }
    }

    /// Wire form of this marker
    pub fn as_str(&self) -> &'static str {
        match self {
            Marker::Re => "!re",
            Marker::Done => "!done",
            Marker::Trap => "!trap",
            Marker::Fatal => "!fatal",
            Marker::Empty => "!empty",
        }
    }

    /// Whether a sentence of this kind can end a reply batch
    pub fn is_terminal(&self) -> bool {
        matches!(self, Marker::Done | Marker::Trap | Marker::Fatal)
    }
}

/// A complete reply sentence: its marker and the words that followed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub marker: Marker,
    pub words: Vec<Bytes>,
}

impl Sentence {
    pub fn new(marker: Marker) -> Self {
        Self {
            marker,
            words: Vec::new(),
        }
    }
}

/// All sentences produced by one command, ending in a terminal sentence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    sentences: Vec<Sentence>,
}

impl Batch {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// The last sentence, if it is terminal
    pub fn terminal(&self) -> Option<&Sentence> {
        self.sentences.last().filter(|s| s.marker.is_terminal())
    }
}
