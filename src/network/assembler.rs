//! Sentence Assembler
//!
//! Groups words into sentences and sentences into one reply batch.
//!
//! An empty word closes the sentence being accumulated and nothing else. The
//! batch is complete only once a terminal sentence has been closed, so a
//! reply with many `!re` rows is read in full.

use std::io::{ErrorKind, Read, Write};

use bytes::Bytes;

use crate::error::{Result, RosError};
use crate::protocol::{Batch, Marker, Sentence};
use super::WordStream;

/// Incremental sentence/batch state machine
#[derive(Debug, Default)]
pub struct SentenceAssembler {
    /// Closed sentences of the batch being built
    sentences: Vec<Sentence>,

    /// Sentence currently accumulating words
    current: Option<Sentence>,

    /// Set once a `!trap` sentence has been closed
    trapped: bool,
}

impl SentenceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one word
    ///
    /// Returns the finished batch once the terminal sentence is closed. After
    /// a `!trap` the assembler keeps going until the `!done` that the router
    /// sends after it, so that word does not leak into the next reply.
    pub fn push(&mut self, word: Bytes) -> Result<Option<Batch>> {
        if word.is_empty() {
            return Ok(self.close_sentence());
        }

        if let Some(marker) = Marker::parse(&word)? {
            // A marker without a preceding empty word still closes the open sentence
            if self.close_sentence().is_some() {
                return Err(RosError::Protocol(format!(
                    "Unterminated final sentence followed by {}",
                    marker.as_str()
                )));
            }
            self.current = Some(Sentence::new(marker));
            return Ok(None);
        }

        match self.current.as_mut() {
            Some(sentence) => {
                sentence.words.push(word);
                Ok(None)
            }
            None => Err(RosError::Protocol(format!(
                "Word outside of any sentence: {}",
                String::from_utf8_lossy(&word)
            ))),
        }
    }

    /// Close the open sentence; hand out the batch if it was the last one
    fn close_sentence(&mut self) -> Option<Batch> {
        let sentence = self.current.take()?;
        let marker = sentence.marker;
        self.sentences.push(sentence);

        let complete = match marker {
            Marker::Done | Marker::Fatal => true,
            Marker::Trap => {
                self.trapped = true;
                false
            }
            Marker::Re | Marker::Empty => false,
        };

        if complete {
            Some(self.take_batch())
        } else {
            None
        }
    }

    fn take_batch(&mut self) -> Batch {
        self.trapped = false;
        Batch::new(std::mem::take(&mut self.sentences))
    }

    /// Whether end-of-file here still leaves a usable batch
    ///
    /// True right after a closed `!trap`, or inside a `!fatal` sentence whose
    /// terminator was cut off by the router closing the connection.
    fn can_end_at_eof(&self) -> bool {
        match &self.current {
            None => self.trapped,
            Some(sentence) => sentence.marker == Marker::Fatal,
        }
    }

    /// Finish the batch at end-of-file
    fn finish_at_eof(&mut self) -> Batch {
        if let Some(sentence) = self.current.take() {
            self.sentences.push(sentence);
        }
        self.take_batch()
    }

    /// Number of closed sentences so far
    pub fn pending(&self) -> usize {
        self.sentences.len()
    }
}

/// Read one complete reply batch from the stream
///
/// If the transport reaches end-of-file right after a closed `!trap`
/// sentence or inside a `!fatal` one, the batch ends there.
pub fn read_batch<T: Read + Write>(stream: &mut WordStream<T>) -> Result<Batch> {
    let mut assembler = SentenceAssembler::new();

    loop {
        let word = match stream.receive_word() {
            Ok(word) => word,
            Err(RosError::Io(ref e))
                if e.kind() == ErrorKind::UnexpectedEof && assembler.can_end_at_eof() =>
            {
                tracing::trace!("Transport closed after a terminal sentence");
                return Ok(assembler.finish_at_eof());
            }
            Err(e) => return Err(e),
        };

        tracing::trace!("<<< {}", String::from_utf8_lossy(&word));

        if let Some(batch) = assembler.push(word)? {
            return Ok(batch);
        }
    }
}
