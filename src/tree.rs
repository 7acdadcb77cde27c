use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;

use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;

/// Code string over `{0, 1}` for every character of a tree.
pub type CodeTable = BTreeMap<char, String>;

/// Code given to the only symbol of a single-leaf tree.
const SINGLE_SYMBOL_CODE: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: char,
        freq: usize,
    },
    Internal {
        freq: usize,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn freq(&self) -> usize {
        match self {
            Node::Leaf { freq, .. } | Node::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn merge(left: Node, right: Node) -> Result<Self> {
        let freq = left
            .freq()
            .checked_add(right.freq())
            .ok_or(CodecError::FrequencyOverflow)?;

        Ok(Node::Internal {
            freq,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

/// Heap entry. `seq` breaks frequency ties: leaves are numbered in ascending
/// character order, merged nodes after them in creation order.
#[derive(Debug)]
struct Queued {
    node: Node,
    seq: usize,
}

impl Eq for Queued {}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap pops the lowest frequency first
        (other.node.freq(), other.seq).cmp(&(self.node.freq(), self.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes. The
    /// first node popped becomes the `0` child, the second the `1` child.
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        let mut pqueue = BinaryHeap::with_capacity(table.len());
        for (seq, (&symbol, &freq)) in table.iter().enumerate() {
            if freq == 0 {
                return Err(CodecError::ZeroFrequency { symbol });
            }
            pqueue.push(Queued {
                node: Node::Leaf { symbol, freq },
                seq,
            });
        }

        let mut seq = pqueue.len();
        loop {
            let Some(first) = pqueue.pop() else {
                return Err(CodecError::EmptyTable);
            };
            let Some(second) = pqueue.pop() else {
                log::debug!(
                    "built huffman tree over {} symbols, weight {}",
                    table.len(),
                    first.node.freq()
                );
                return Ok(Self { root: first.node });
            };

            pqueue.push(Queued {
                node: Node::merge(first.node, second.node)?,
                seq,
            });
            seq += 1;
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn code_table(&self) -> CodeTable {
        let mut codes = CodeTable::new();
        match &self.root {
            Node::Leaf { symbol, .. } => {
                codes.insert(*symbol, SINGLE_SYMBOL_CODE.to_string());
            }
            Node::Internal { .. } => fill(&self.root, String::new(), &mut codes),
        }

        codes
    }

    /// Walks `encoded` from the root, emitting a symbol at every leaf.
    ///
    /// A single-leaf tree has no edges to walk: its symbol is repeated once
    /// per unit of stored frequency and the bits only need to be valid.
    pub fn decode(&self, encoded: &str) -> Result<String> {
        let (root_left, root_right) = match &self.root {
            Node::Leaf { symbol, freq } => return repeat_symbol(encoded, *symbol, *freq),
            Node::Internal { left, right, .. } => (left, right),
        };

        let mut decoded = String::new();
        let (mut left, mut right) = (root_left, root_right);
        let mut at_root = true;

        for (position, bit_char) in encoded.chars().enumerate() {
            let next = match bit_char {
                '0' => left,
                '1' => right,
                bit => return Err(CodecError::InvalidBit { bit, position }),
            };

            match &**next {
                Node::Leaf { symbol, .. } => {
                    decoded.push(*symbol);
                    (left, right) = (root_left, root_right);
                    at_root = true;
                }
                Node::Internal {
                    left: next_left,
                    right: next_right,
                    ..
                } => {
                    (left, right) = (next_left, next_right);
                    at_root = false;
                }
            }
        }

        if !at_root {
            return Err(CodecError::TruncatedBitStream {
                consumed: encoded.chars().count(),
            });
        }

        Ok(decoded)
    }
}

/// One line per leaf: symbol, code and frequency, in depth-first order.
impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Node::Leaf { .. } => write_node(f, &self.root, SINGLE_SYMBOL_CODE.to_string()),
            Node::Internal { .. } => write_node(f, &self.root, String::new()),
        }
    }
}

fn repeat_symbol(encoded: &str, symbol: char, count: usize) -> Result<String> {
    if let Some((position, bit)) = encoded.chars().enumerate().find(|(_, b)| !is_bit(*b)) {
        return Err(CodecError::InvalidBit { bit, position });
    }

    let mut decoded = String::new();
    count
        .checked_mul(symbol.len_utf8())
        .and_then(|len| decoded.try_reserve_exact(len).ok())
        .ok_or(CodecError::OutputTooLarge { symbol, count })?;
    decoded.extend(std::iter::repeat_n(symbol, count));

    Ok(decoded)
}

fn is_bit(c: char) -> bool {
    c == '0' || c == '1'
}

fn fill(node: &Node, code: String, codes: &mut CodeTable) {
    match node {
        Node::Leaf { symbol, .. } => {
            let _ = codes.insert(*symbol, code);
        }
        Node::Internal { left, right, .. } => {
            fill(left, format!("{code}0"), codes);
            fill(right, format!("{code}1"), codes);
        }
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, code: String) -> fmt::Result {
    match node {
        Node::Leaf { symbol, freq } => writeln!(f, "{symbol:?}\t{code}\t(freq: {freq})"),
        Node::Internal { left, right, .. } => {
            write_node(f, left, format!("{code}0"))?;
            write_node(f, right, format!("{code}1"))
        }
    }
}
