#![forbid(unsafe_code)]

//! Positional diff of two key sequences.
//!
//! This is deliberately not an edit-distance diff. Consumers only need to
//! know where an unchanged prefix ends (to tell an append from an edit) and
//! whether a single row was inserted or removed there. One lockstep pass,
//! O(max(len_old, len_new)) at worst.

/// Where two key sequences diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDiff {
    /// First index at which the sequences differ.
    pub index: usize,
    /// More than one row was inserted or removed at `index` (or the change
    /// is not a single insertion/removal at all).
    pub multiple: bool,
}

/// First index where `prev` and `next` differ.
///
/// If one is a strict prefix of the other this is the shorter length.
/// `None` only when both are identical.
#[must_use]
pub fn first_divergence<K: PartialEq>(prev: &[K], next: &[K]) -> Option<usize> {
    let shared = prev.len().min(next.len());
    match (0..shared).find(|&i| prev[i] != next[i]) {
        Some(i) => Some(i),
        None if prev.len() == next.len() => None,
        None => Some(shared),
    }
}

/// First divergence plus whether it looks like a single-row insert/remove.
#[must_use]
pub fn find_list_diff<K: PartialEq>(prev: &[K], next: &[K]) -> Option<ListDiff> {
    let index = first_divergence(prev, next)?;
    let (short, long) = if prev.len() < next.len() {
        (prev, next)
    } else {
        (next, prev)
    };
    let single_step = long.len() - short.len() == 1;
    // A single insert/remove at `index` shifts the rest of `long` by one.
    let shifted = short.get(index) == long.get(index + 1);
    Some(ListDiff {
        index,
        multiple: !single_step || !shifted,
    })
}

/// Search order that alternates around `start` within `[min, max]`:
/// `start, start+1, start-1, start+2, …`, continuing on whichever side
/// still has room once the other is exhausted.
///
/// `step` ranges over `0..=(max - min)`.
#[must_use]
pub fn index_by_start_loc(min: usize, max: usize, start: usize, step: usize) -> usize {
    let before = start - min;
    let after = max - start;
    let balanced = before.min(after) * 2;
    if step <= balanced {
        let half = step / 2;
        if step % 2 == 1 {
            start + half + 1
        } else {
            start - half
        }
    } else if before > after {
        start - (step - after)
    } else {
        start + (step - before)
    }
}
