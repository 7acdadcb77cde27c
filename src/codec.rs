use crate::error::{CodecError, Result};
use crate::frequency::{self, FrequencyTable, count_symbols};
use crate::tree::{CodeTable, HuffmanTree};

/// Output of [`encode`]: the bit-string and the table that rebuilds its tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    pub bits: String,
    pub table: FrequencyTable,
}

/// Encodes `text`. Empty text encodes to an empty bit-string and table.
pub fn encode(text: &str) -> Result<Encoded> {
    let table = count_symbols(text);
    if table.is_empty() {
        return Ok(Encoded::default());
    }

    let tree = HuffmanTree::build(&table)?;
    let codes = tree.code_table();
    let bits = encode_with(text, &codes)?;
    log::info!(
        "encoded {} chars over {} symbols into {} bits",
        frequency::total(&table),
        table.len(),
        bits.len()
    );

    Ok(Encoded { bits, table })
}

/// Concatenates the code of every character of `text`, in order.
pub fn encode_with(text: &str, codes: &CodeTable) -> Result<String> {
    let mut encoded = String::new();
    for symbol in text.chars() {
        let Some(code) = codes.get(&symbol) else {
            return Err(CodecError::MissingCodeEntry { symbol });
        };
        encoded += code;
    }

    Ok(encoded)
}

/// Rebuilds the tree from `table` and decodes `bits` against it.
pub fn decode(bits: &str, table: &FrequencyTable) -> Result<String> {
    if table.is_empty() {
        if !bits.is_empty() {
            return Err(CodecError::MissingTable { len: bits.len() });
        }
        return Ok(String::new());
    }

    let tree = HuffmanTree::build(table)?;
    let decoded = tree.decode(bits)?;
    log::info!("decoded {} bits into {} chars", bits.len(), decoded.chars().count());

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abracadabra_round_trip() {
        let encoded = encode("abracadabra").unwrap();
        assert!(encoded.bits.len() >= 11);
        assert_eq!(frequency::total(&encoded.table), 11);
        assert_eq!(decode(&encoded.bits, &encoded.table).unwrap(), "abracadabra");
    }

    #[test]
    fn huffman_coding_sentence_round_trip() {
        let text = "huffman coding & decoding";
        let encoded = encode(text).unwrap();
        assert_eq!(decode(&encoded.bits, &encoded.table).unwrap(), text);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let encoded = encode("").unwrap();
        assert_eq!(encoded, Encoded::default());
        assert_eq!(decode("", &FrequencyTable::new()).unwrap(), "");
    }

    #[test]
    fn bits_without_table_are_rejected() {
        assert_eq!(
            decode("0101", &FrequencyTable::new()),
            Err(CodecError::MissingTable { len: 4 })
        );
    }

    #[test]
    fn single_symbol_text() {
        let encoded = encode("aaa").unwrap();
        assert_eq!(encoded.bits, "111");
        assert_eq!(encoded.table, [('a', 3)].into_iter().collect());
        assert_eq!(decode("1", &encoded.table).unwrap(), "aaa");
    }

    #[test]
    fn mismatched_table_is_rejected() {
        let codes: CodeTable = [('a', "0".to_string()), ('b', "1".to_string())]
            .into_iter()
            .collect();
        assert_eq!(
            encode_with("abc", &codes),
            Err(CodecError::MissingCodeEntry { symbol: 'c' })
        );
    }

    #[test]
    fn truncated_bits_are_rejected() {
        // four equally frequent symbols: every code is two bits long
        let encoded = encode("dcba").unwrap();
        assert_eq!(encoded.bits.len(), 8);
        let truncated = &encoded.bits[..7];
        assert_eq!(
            decode(truncated, &encoded.table),
            Err(CodecError::TruncatedBitStream { consumed: 7 })
        );
    }
}
