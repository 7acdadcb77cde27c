//! Key file: one `<bits>:<table>` record per line, with the table rendered
//! as `{a=3, b=1}`. A later run finds the record for a bit-string and
//! rebuilds the tree from its table.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::{Chars, FromStr};

use anyhow::{self, Context, Result, bail, ensure};

use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    pub bits: String,
    pub table: FrequencyTable,
}

impl fmt::Display for KeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{{", self.bits)?;
        for (i, (symbol, count)) in self.table.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match symbol {
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                '\\' => f.write_str("\\\\")?,
                c => write!(f, "{c}")?,
            }
            write!(f, "={count}")?;
        }
        f.write_str("}")
    }
}

impl FromStr for KeyRecord {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let Some((bits, table)) = line.split_once(':') else {
            bail!("missing ':' between bit-string and table");
        };
        ensure!(
            bits.chars().all(|c| c == '0' || c == '1'),
            "bit-string holds characters other than 0 and 1"
        );

        Ok(Self {
            bits: bits.to_string(),
            table: parse_table(table)?,
        })
    }
}

fn parse_table(rendered: &str) -> Result<FrequencyTable> {
    let Some(body) = rendered
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        bail!("table must be wrapped in braces: {rendered:?}");
    };

    let mut table = FrequencyTable::new();
    if body.is_empty() {
        return Ok(table);
    }

    let mut chars = body.chars();
    loop {
        let symbol = read_symbol(&mut chars)?;
        ensure!(chars.next() == Some('='), "expected '=' after {symbol:?}");

        let mut digits = String::new();
        let mut next = chars.next();
        while let Some(c) = next.filter(char::is_ascii_digit) {
            digits.push(c);
            next = chars.next();
        }
        let count: usize = digits
            .parse()
            .with_context(|| format!("invalid count for {symbol:?}"))?;
        ensure!(count > 0, "zero count for {symbol:?}");
        ensure!(
            table.insert(symbol, count).is_none(),
            "duplicate entry for {symbol:?}"
        );

        match next {
            None => return Ok(table),
            Some(',') => ensure!(chars.next() == Some(' '), "expected ' ' after ','"),
            Some(c) => bail!("unexpected {c:?} after count of {symbol:?}"),
        }
    }
}

fn read_symbol(chars: &mut Chars<'_>) -> Result<char> {
    match chars.next() {
        Some('\\') => match chars.next() {
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('\\') => Ok('\\'),
            other => bail!("invalid escape: {other:?}"),
        },
        Some(c) => Ok(c),
        None => bail!("unexpected end of table"),
    }
}

/// Append-only log of key records on disk.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &KeyRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open key file {}", self.path.display()))?;
        writeln!(file, "{record}").context("write key record")?;
        log::debug!(
            "stored key record for {} bits in {}",
            record.bits.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Latest record whose bit-string is exactly `bits`.
    pub fn find(&self, bits: &str) -> Result<Option<KeyRecord>> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("read key file {}", self.path.display()))?;

        let lines: Vec<&str> = contents.lines().collect();
        for (linenum, line) in lines.into_iter().enumerate().rev() {
            if line.split_once(':').map(|(b, _)| b) != Some(bits) {
                continue;
            }
            let record = line
                .parse()
                .with_context(|| format!("malformed key record on line {}", linenum + 1))?;
            return Ok(Some(record));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(char, usize)]) -> FrequencyTable {
        entries.iter().copied().collect()
    }

    #[test]
    fn renders_like_a_map() {
        let record = KeyRecord {
            bits: "0110".to_string(),
            table: table(&[('b', 1), ('a', 3)]),
        };
        assert_eq!(record.to_string(), "0110:{a=3, b=1}");
    }

    #[test]
    fn parses_rendered_record() {
        let record: KeyRecord = "0110:{a=3, b=1}".parse().unwrap();
        assert_eq!(record.bits, "0110");
        assert_eq!(record.table, table(&[('a', 3), ('b', 1)]));
    }

    #[test]
    fn separators_as_symbols_survive() {
        let record = KeyRecord {
            bits: "01".to_string(),
            table: table(&[(',', 2), ('=', 1), (' ', 4), ('}', 1), (':', 7)]),
        };
        let parsed: KeyRecord = record.to_string().parse().unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn control_characters_are_escaped() {
        let record = KeyRecord {
            bits: String::new(),
            table: table(&[('\n', 1), ('\\', 2), ('\t', 3)]),
        };
        let line = record.to_string();
        assert!(!line.contains('\n'));
        assert_eq!(line.parse::<KeyRecord>().unwrap(), record);
    }

    #[test]
    fn empty_table() {
        let record: KeyRecord = ":{}".parse().unwrap();
        assert!(record.bits.is_empty());
        assert!(record.table.is_empty());
    }

    #[test]
    fn malformed_tables_are_rejected() {
        for line in [
            "0101",
            "0101:a=1",
            "0101:{a1}",
            "0101:{a=}",
            "0101:{a=0}",
            "0101:{a=1,b=2}",
            "0101:{a=1, a=2}",
            "0101:{a=1x}",
            "0101:{\\q=1}",
            "01x1:{a=1}",
        ] {
            assert!(line.parse::<KeyRecord>().is_err(), "accepted {line:?}");
        }
    }
}
