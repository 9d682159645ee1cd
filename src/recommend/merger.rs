//! Reconcile an oracle ordering with the original candidate list.

use super::Candidate;
use std::collections::{HashMap, HashSet};

/// Reorder `original` following `ranked_ids`.
///
/// Ids are taken in order; the first occurrence of an id pulls the matching
/// candidate forward, repeats and unknown ids are ignored. Candidates the
/// ordering never mentioned follow in their original relative order. The
/// result is always a permutation of `original`.
pub fn merge_ranked(original: Vec<Candidate>, ranked_ids: &[String]) -> Vec<Candidate> {
    let mut first_index: HashMap<&str, usize> = HashMap::with_capacity(original.len());
    for (i, candidate) in original.iter().enumerate() {
        first_index.entry(candidate.id.as_str()).or_insert(i);
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(ranked_ids.len());
    let mut order: Vec<usize> = Vec::with_capacity(original.len());
    let mut emitted = vec![false; original.len()];

    for id in ranked_ids {
        if !seen.insert(id.as_str()) {
            continue;
        }
        if let Some(&i) = first_index.get(id.as_str()) {
            emitted[i] = true;
            order.push(i);
        }
    }
    order.extend((0..original.len()).filter(|i| !emitted[*i]));

    let mut slots: Vec<Option<Candidate>> = original.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}
