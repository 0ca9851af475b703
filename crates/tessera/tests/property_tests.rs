//! Property-based tests for majority voting.

use proptest::prelude::*;

use tessera::VoteCounter;

/// Vote multisets as (label, count) pairs with distinct labels.
fn vote_multiset() -> impl Strategy<Value = Vec<(String, usize)>> {
    proptest::collection::hash_map("[A-Z][0-9]{1,3}", 1usize..6, 1..5)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    /// A label with a strict majority wins regardless of vote order.
    #[test]
    fn strict_majority_always_wins(
        multiset in vote_multiset(),
        shuffle_seed in any::<u64>(),
    ) {
        // Give the first label a strictly larger count than every other.
        let max_other = multiset.iter().skip(1).map(|(_, c)| *c).max().unwrap_or(0);
        let mut votes: Vec<String> = Vec::new();
        for (i, (label, count)) in multiset.iter().enumerate() {
            let count = if i == 0 { max_other + 1 } else { *count };
            votes.extend(std::iter::repeat_n(label.clone(), count));
        }
        let majority = multiset[0].0.clone();

        // Deterministic shuffle from the seed.
        let mut state = shuffle_seed | 1;
        for i in (1..votes.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            votes.swap(i, j);
        }

        let mut counter = VoteCounter::new();
        counter.extend(votes);
        prop_assert_eq!(counter.winner(), Some(majority.as_str()));
    }

    /// The winner is always a label that actually received votes.
    #[test]
    fn winner_comes_from_the_multiset(multiset in vote_multiset()) {
        let mut counter = VoteCounter::new();
        for (label, count) in &multiset {
            for _ in 0..*count {
                counter.add(label.clone());
            }
        }

        let winner = counter.winner().map(String::from);
        prop_assert!(winner.is_some());
        let winner = winner.unwrap();
        prop_assert!(multiset.iter().any(|(label, _)| *label == winner));
    }

    /// Feeding the same votes in the same order twice gives the same winner.
    #[test]
    fn identical_order_is_idempotent(multiset in vote_multiset()) {
        let votes: Vec<String> = multiset
            .iter()
            .flat_map(|(label, count)| std::iter::repeat_n(label.clone(), *count))
            .collect();

        let mut first = VoteCounter::new();
        first.extend(votes.clone());
        let mut second = VoteCounter::new();
        second.extend(votes);

        prop_assert_eq!(first.winner(), second.winner());
    }
}
