//! File-level commands behind the `huffkey` binary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::codec;
use crate::frequency::{FrequencyTable, count_symbols};
use crate::keys::{KeyRecord, KeyStore};
use crate::tree::HuffmanTree;

/// Encodes `file` and writes the bit-string to `output` (default: `file`).
///
/// The key record is stored before anything is overwritten, so a failed
/// append leaves the text in place.
pub fn encode_file(file: &Path, output: Option<&Path>, store: &KeyStore) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    if text.is_empty() {
        log::warn!("{} is empty, nothing to encode", file.display());
        return Ok(());
    }

    let encoded = codec::encode(&text)?;
    let record = KeyRecord {
        bits: encoded.bits,
        table: encoded.table,
    };
    store.append(&record)?;

    let target = output.unwrap_or(file);
    fs::write(target, &record.bits).with_context(|| format!("write {}", target.display()))?;

    Ok(())
}

/// Restores the text of `file` from the key record matching its bit-string.
pub fn decode_file(file: &Path, output: Option<&Path>, store: &KeyStore) -> Result<()> {
    let contents = fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    let bits = contents.trim();

    let decoded = if bits.is_empty() {
        // empty text never gets a record
        codec::decode(bits, &FrequencyTable::new())?
    } else {
        let Some(record) = store.find(bits)? else {
            anyhow::bail!(
                "no key record for {} in {}",
                file.display(),
                store.path().display()
            );
        };
        codec::decode(&record.bits, &record.table)
            .with_context(|| format!("decode {}", file.display()))?
    };

    let target = output.unwrap_or(file);
    fs::write(target, decoded).with_context(|| format!("write {}", target.display()))?;

    Ok(())
}

/// Code listing for `file`, one line per character; `None` when it is empty.
pub fn codes(file: &Path) -> Result<Option<String>> {
    let text = fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    let table = count_symbols(&text);
    if table.is_empty() {
        return Ok(None);
    }

    Ok(Some(HuffmanTree::build(&table)?.to_string()))
}
