//! Binary order-1 Markov process used by the reconstruction tests.
//!
//! After a `0`, the next symbol is `0` or `1` with equal probability. After a `1`, the next
//! symbol is `0` with probability 2/3 and `1` with probability 1/3. The stationary
//! distribution is `(4/7, 3/7)`.
//!
//! The process has exactly two causal states: "the last symbol was 0" and "the last symbol
//! was 1".

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Probability of emitting `0` after the given symbol.
pub fn zero_probability(last: u8) -> f64 {
    if last == 0 { 0.5 } else { 2.0 / 3.0 }
}

/// Sample `length` symbols of the process, starting after a virtual `0`.
pub fn sample_sequence(length: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut last = 0u8;
    let mut sequence = Vec::with_capacity(length);
    for _ in 0..length {
        last = if rng.random_bool(zero_probability(last)) {
            0
        } else {
            1
        };
        sequence.push(last);
    }
    sequence
}

/// Integer transition weights `w[from][to]`; every row sums to six.
const WEIGHTS: [[usize; 2]; 2] = [[3, 3], [4, 2]];
/// Integer stationary weights; `(4, 3)` is a fixed point of `WEIGHTS / 6`.
const STATIONARY: [usize; 2] = [4, 3];

/// Build a sequence whose windows of length `order + 1` occur *exactly* as often as the
/// process predicts (up to a common factor).
///
/// The sequence is an Eulerian circuit of the weighted de Bruijn graph whose vertices are
/// words of length `order` and whose edge `u -> v` (with multiplicity) is the word of length
/// `order + 1` spelled by the pair. The multiplicities are balanced because `STATIONARY` is
/// the stationary distribution of `WEIGHTS`. The circuit is closed by repeating its first
/// `order + 1` symbols, so windows of length `order + 2` whose last `order + 1` symbols are
/// used cover every circuit edge exactly once.
pub fn exact_sequence(order: usize) -> Vec<u8> {
    assert!((1..16).contains(&order));
    let vertices = 1usize << order;
    let mask = vertices - 1;

    // remaining[u][e] = multiplicity of the word `u` followed by `e` (oldest symbol first).
    let mut remaining = vec![[0usize; 2]; vertices];
    for (word, edges) in remaining.iter_mut().enumerate() {
        for (symbol, edge) in edges.iter_mut().enumerate() {
            *edge = word_weight((word << 1) | symbol, order + 1);
        }
    }

    // Hierholzer's algorithm.
    let mut stack = vec![0usize];
    let mut circuit = Vec::new();
    while let Some(&vertex) = stack.last() {
        if let Some(symbol) = (0..2).find(|it| remaining[vertex][*it] > 0) {
            remaining[vertex][symbol] -= 1;
            stack.push(((vertex << 1) | symbol) & mask);
        } else {
            circuit.push(vertex);
            stack.pop();
        }
    }
    circuit.reverse();

    let mut sequence: Vec<u8> = circuit[1..].iter().map(|it| (it & 1) as u8).collect();
    let closing = sequence[..order + 1].to_vec();
    sequence.extend(closing);
    sequence
}

/// Weight of a binary word of the given length (most significant bit = oldest symbol).
fn word_weight(word: usize, length: usize) -> usize {
    let symbol = |i: usize| (word >> (length - 1 - i)) & 1;
    let mut weight = STATIONARY[symbol(0)];
    for i in 1..length {
        weight *= WEIGHTS[symbol(i - 1)][symbol(i)];
    }
    weight
}

#[cfg(test)]
mod tests {
    use super::{exact_sequence, sample_sequence};
    use std::collections::HashMap;

    #[test]
    fn exact_sequence_has_exact_statistics() {
        let sequence = exact_sequence(4);
        // 7 * 6^4 circuit edges plus the closing symbols.
        assert_eq!(sequence.len(), 9072 + 5);

        let mut counts: HashMap<&[u8], usize> = HashMap::new();
        for window in sequence.windows(6) {
            *counts.entry(&window[1..]).or_default() += 1;
        }
        assert_eq!(counts.len(), 32);
        assert_eq!(counts[&[0u8, 0, 0, 0, 0][..]], 4 * 3 * 3 * 3 * 3);
        assert_eq!(counts[&[1u8, 1, 1, 1, 1][..]], 3 * 2 * 2 * 2 * 2);
        assert_eq!(counts[&[0u8, 1, 0, 1, 0][..]], 4 * 3 * 4 * 3 * 4);
    }

    #[test]
    fn sampled_sequence_is_deterministic() {
        assert_eq!(sample_sequence(1000, 7), sample_sequence(1000, 7));
        assert_ne!(sample_sequence(1000, 7), sample_sequence(1000, 8));
    }
}
