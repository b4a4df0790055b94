use serde::Serialize;
use std::collections::BTreeMap;

/// Occurrence counts of feature values (lemmas or POS tags) for one document.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_features<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = FrequencyTable::new();
        for value in features {
            table.record(value.as_ref());
        }
        table
    }

    pub fn record(&mut self, value: &str) {
        match self.counts.get_mut(value) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(value.to_string(), 1);
            }
        }
        self.total += 1;
    }

    /// Occurrences of `value`; zero when absent.
    pub fn count(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.counts.contains_key(value)
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of recorded occurrences across all values.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Distinct values in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(value, count)| (value.as_str(), *count))
    }
}
