//! Command definitions
//!
//! An outgoing command sentence: the slash-delimited menu path followed by
//! parameter and query words.

use crate::error::{Result, RosError};

/// Build a `<sigil><key>=<value>` word
fn pair_word(sigil: u8, key: &str, value: &[u8]) -> Vec<u8> {
    let mut word = Vec::with_capacity(key.len() + value.len() + 2);
    word.push(sigil);
    word.extend_from_slice(key.as_bytes());
    word.push(b'=');
    word.extend_from_slice(value);
    word
}

/// An outgoing command sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Menu path, e.g. `/ip/hotspot/user/print`
    path: String,

    /// Parameter (`=`) and query (`?`) words in send order
    words: Vec<Vec<u8>>,
}

impl Command {
    /// Create a command with no parameters
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            words: Vec::new(),
        }
    }

    /// Build a command from `(key, value)` attribute and filter pairs
    pub fn with_params(path: &str, attributes: &[(&str, &str)], filters: &[(&str, &str)]) -> Self {
        let mut command = Self::new(path);
        for (key, value) in attributes {
            command = command.attribute(*key, *value);
        }
        for (key, value) in filters {
            command = command.filter(*key, *value);
        }
        command
    }

    /// Add a `=key=value` parameter word
    ///
    /// The value is sent byte for byte, so text read back through
    /// [`Reply::raw_rows`](super::Reply::raw_rows) can be written unchanged.
    pub fn attribute(mut self, key: impl AsRef<str>, value: impl AsRef<[u8]>) -> Self {
        self.words
            .push(pair_word(b'=', key.as_ref(), value.as_ref()));
        self
    }

    /// Add a valueless parameter such as `stats` or `once`
    pub fn flag(mut self, name: impl AsRef<str>) -> Self {
        self.words.push(pair_word(b'=', name.as_ref(), &[]));
        self
    }

    /// Add a `?key=value` query filter word
    pub fn filter(mut self, key: impl AsRef<str>, value: impl AsRef<[u8]>) -> Self {
        self.words
            .push(pair_word(b'?', key.as_ref(), value.as_ref()));
        self
    }

    /// Add a raw query operator word, e.g. `#|` for "or" of the last two filters
    pub fn filter_op(mut self, op: impl AsRef<str>) -> Self {
        self.words.push(format!("?{}", op.as_ref()).into_bytes());
        self
    }

    /// Restrict the returned properties
    pub fn proplist(self, properties: &[&str]) -> Self {
        let list = properties.join(",");
        self.attribute(".proplist", list)
    }

    /// Menu path of this command
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Check that the path can be sent as the first word
    ///
    /// An empty path would go out as a zero-length word, which the router
    /// reads as a sentence terminator.
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(RosError::Protocol(format!(
                "Command path must start with '/': {:?}",
                self.path
            )));
        }
        Ok(())
    }

    /// Words of the sentence, path first, without the terminating empty word
    pub fn words(&self) -> impl Iterator<Item = &[u8]> {
        std::iter::once(self.path.as_bytes()).chain(self.words.iter().map(Vec::as_slice))
    }
}
