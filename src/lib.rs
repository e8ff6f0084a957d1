//! Incremental classification of mutable character sequences.
//!
//! A [`Classifier`] owns a character buffer that grows and shrinks only at
//! the tail. Every named predicate keeps a bitmask over the buffer, shifted
//! on each append/pop, so questions like "is this a number right now" are
//! answered from mask state without rescanning the text:
//!
//! ```text
//!   append(ch) ──▶ predicate bits ──▶ masks (m <<= 1 | bit)
//!                                        │
//!   isnumber / convert / segments ◀──────┘
//! ```
//!
//! [`DateClassifier`] layers month-word and digit-group tracking on top and
//! detects calendar dates ("12/31/2020", "Dec. 31st, 2020"), including a
//! tokenizer that never splits a detected date apart.
//!
//! ```
//! use datelex::{Classifier, DateClassifier, Value};
//!
//! assert!(Classifier::from_text("$1,234.56").isnumber());
//! assert!(DateClassifier::from_text("signed on Dec. 31st, 2020").isdate());
//! assert_eq!(Classifier::from_text("-123").convert(), Value::Integer(-123));
//! ```

#[macro_use]
mod macros;

mod chars;
mod classify;
mod date;
mod error;
mod mask;
mod trie;
mod value;

pub use classify::Classifier;
pub use date::{DateClassifier, DatePolicy, TokenIter, TokenValue, is_leap_year};
pub use error::Error;
pub use trie::{NodeId, Trie};
pub use value::Value;
