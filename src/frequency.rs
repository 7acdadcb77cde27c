use std::collections::BTreeMap;

/// Occurrence count per character. Ordered so that everything derived from
/// it (tree shape, rendering) is reproducible.
pub type FrequencyTable = BTreeMap<char, usize>;

pub fn count_symbols(text: &str) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for symbol in text.chars() {
        *table.entry(symbol).or_default() += 1;
    }

    table
}

/// Number of characters the table accounts for.
pub fn total(table: &FrequencyTable) -> usize {
    table.values().sum()
}
