//! Board dealing: paired tokens in a fair shuffle.

use rand::seq::SliceRandom;

/// Builds a board from the first `pairs` symbols of `symbols`: each symbol
/// appears exactly twice, positions uniformly shuffled (Fisher–Yates via
/// `SliceRandom::shuffle`).
pub fn build(symbols: &[String], pairs: usize) -> Vec<String> {
    let mut board = Vec::with_capacity(pairs * 2);
    for symbol in symbols.iter().take(pairs) {
        board.push(symbol.clone());
        board.push(symbol.clone());
    }
    board.shuffle(&mut rand::rng());
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn symbols(n: usize) -> Vec<String> {
        ('A'..).take(n).map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_build_length_is_twice_pair_count() {
        for pairs in [1, 2, 8] {
            assert_eq!(build(&symbols(8), pairs).len(), pairs * 2);
        }
    }

    #[test]
    fn test_build_every_symbol_appears_exactly_twice() {
        let board = build(&symbols(8), 8);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in &board {
            *counts.entry(token.as_str()).or_default() += 1;
        }
        assert_eq!(counts.len(), 8);
        assert!(counts.values().all(|&c| c == 2));
    }

    #[test]
    fn test_build_takes_only_requested_pairs() {
        let board = build(&symbols(8), 3);
        assert_eq!(board.len(), 6);
        assert!(board.iter().all(|t| ["A", "B", "C"].contains(&t.as_str())));
    }

    #[test]
    fn test_build_orderings_are_not_deterministic() {
        // 16 cards have 16! orderings; 20 identical deals in a row would
        // mean the shuffle is broken, not that we got unlucky.
        let set = symbols(8);
        let first = build(&set, 8);
        let all_same = (0..20).all(|_| build(&set, 8) == first);
        assert!(!all_same, "repeated deals should differ");
    }
}
