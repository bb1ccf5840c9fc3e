//! Protocol Module
//!
//! Defines the RouterOS API wire protocol.
//!
//! ## Word Format
//! ```text
//! ┌──────────────────┬─────────────────────────────┐
//! │ Len (1..=5)      │         Raw bytes           │
//! └──────────────────┴─────────────────────────────┘
//! ```
//!
//! ### Command Sentence
//! ```text
//! /ip/hotspot/user/print   =.proplist=.id,name   ?name=guest   <empty>
//! └──── path ──────────┘   └─ parameter word ─┘   └─ filter ─┘
//! ```
//!
//! ### Reply Batch
//! ```text
//! !re   =.id=*1 =name=guest   <empty>
//! !re   =.id=*2 =name=staff   <empty>
//! !done                       <empty>
//! ```
//!
//! ### Markers
//! - `!re`:    one result row
//! - `!done`:  command finished
//! - `!trap`:  command failed (followed by `!done`)
//! - `!fatal`: connection is being closed
//! - `!empty`: no rows

mod codec;
mod command;
mod response;
mod sentence;

pub use codec::{
    decode_length, encode_length, encode_sentence, prefix_width, put_length, put_word,
    read_length, read_word, write_sentence, MAX_PREFIX_SIZE,
};
pub use command::Command;
pub use response::{
    parse_attribute, parse_attributes, parse_batch, parse_raw_attribute, parse_raw_attributes,
    Attributes, Outcome, RawAttributes, Reply, Trap,
};
pub use sentence::{Batch, Marker, Sentence};
