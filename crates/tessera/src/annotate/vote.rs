//! Majority voting over label multisets.

use indexmap::IndexMap;

/// Frequency counter with a deterministic winner.
///
/// Labels are counted in insertion order. The winner is the label with the
/// highest count; on a tie the label seen first wins. Callers feed votes in
/// a deterministic order (rows ascending), so the outcome never depends on
/// hash iteration order.
#[derive(Debug, Default)]
pub struct VoteCounter {
    counts: IndexMap<String, usize>,
}

impl VoteCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }

    /// Record one vote for a label.
    pub fn add(&mut self, label: impl Into<String>) {
        *self.counts.entry(label.into()).or_insert(0) += 1;
    }

    /// Record one vote per label in the iterator.
    pub fn extend<I, L>(&mut self, labels: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        for label in labels {
            self.add(label);
        }
    }

    /// Total number of votes recorded.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Whether no votes have been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The winning label, or `None` for an empty counter.
    pub fn winner(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (label, &count) in &self.counts {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((label.as_str(), count)),
            }
        }
        best.map(|(label, _)| label)
    }

    /// Consume the counter and return the winning label.
    pub fn into_winner(self) -> Option<String> {
        self.winner().map(String::from)
    }
}
