//! Character-level Huffman coding over text.
//!
//! The core turns a text into a string of `0`/`1` characters plus the
//! frequency table needed to rebuild the tree, and turns that pair back into
//! the original text. Persisting the pair is left to [`keys`].

pub mod cli;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod keys;
pub mod tree;

pub use codec::{Encoded, decode, encode, encode_with};
pub use error::{CodecError, Result};
pub use frequency::{FrequencyTable, count_symbols};
pub use tree::{CodeTable, HuffmanTree, Node};
