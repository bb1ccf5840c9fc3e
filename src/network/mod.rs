//! Network Module
//!
//! Word-level transport and reply assembly.
//!
//! ## Architecture
//! - `WordStream` owns the transport and moves whole words
//! - `read_batch` drains one complete reply per command
//! - Strictly half-duplex: one command in flight per stream

mod assembler;
mod stream;

pub use assembler::{read_batch, SentenceAssembler};
pub use stream::WordStream;
