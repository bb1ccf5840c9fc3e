//! Word Stream
//!
//! Sends and receives whole words over a byte transport.

use std::io::{BufReader, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use bytes::{Bytes, BytesMut};

use crate::error::Result;
use crate::protocol::{put_length, put_word, read_word};

/// Word-level view of a transport
///
/// Reads are buffered; writes go straight to the transport and are flushed
/// per call, so a word or sentence is either fully written or the call fails.
pub struct WordStream<T: Read + Write> {
    /// Transport (buffered for reads)
    inner: BufReader<T>,

    /// Largest word accepted from the peer
    max_word_size: u32,
}

impl<T: Read + Write> WordStream<T> {
    /// Wrap a connected transport
    pub fn new(transport: T, max_word_size: u32) -> Self {
        Self {
            inner: BufReader::new(transport),
            max_word_size,
        }
    }

    /// Write one length-prefixed word
    pub fn send_word(&mut self, word: &[u8]) -> Result<()> {
        let mut buf = BytesMut::new();
        put_word(&mut buf, word)?;
        self.write_all(&buf)
    }

    /// Write every word followed by the empty terminator in a single write
    pub fn send_sentence<I, W>(&mut self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        let mut buf = BytesMut::new();
        for word in words {
            put_word(&mut buf, word.as_ref())?;
        }
        put_length(&mut buf, 0);
        self.write_all(&buf)
    }

    /// Block until one complete word is read
    ///
    /// An empty result is the sentence terminator.
    pub fn receive_word(&mut self) -> Result<Bytes> {
        read_word(&mut self.inner, self.max_word_size)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let transport = self.inner.get_mut();
        transport.write_all(bytes)?;
        transport.flush()?;
        Ok(())
    }

    /// Borrow the underlying transport
    pub fn get_ref(&self) -> &T {
        self.inner.get_ref()
    }

    /// Mutably borrow the underlying transport
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    /// Consume the stream and return the transport; buffered bytes are lost
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl WordStream<TcpStream> {
    /// Configure read and write timeouts on the socket
    pub fn set_timeouts(&self, read: Duration, write: Duration) -> Result<()> {
        let socket = self.inner.get_ref();
        socket.set_read_timeout(Some(read))?;
        socket.set_write_timeout(Some(write))?;
        Ok(())
    }

    /// Peer address for logging
    pub fn peer_addr(&self) -> String {
        self.inner
            .get_ref()
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}
