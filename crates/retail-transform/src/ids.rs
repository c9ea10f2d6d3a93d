//! Surrogate identifier reconciliation.
//!
//! Raw extracts carry unreliable identifiers: missing, fractional, textual or
//! duplicated. [`reconcile_ids`] turns a column of such candidates into one
//! unique positive integer per row, keeping every legitimate id it can.
//!
//! The claimed set is an explicit value threaded through a fold so that the
//! assignment for row `n` depends only on rows `0..n` and the reserved ids.

use std::collections::BTreeSet;

use retail_common::parse_exact_int;

/// Identifiers already taken during one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimedIds {
    /// Valid ids present anywhere in the raw column. Never synthesized.
    reserved: BTreeSet<i64>,
    /// Ids already assigned to an output row.
    issued: BTreeSet<i64>,
    /// Lowest id that may still be free for synthesis.
    cursor: i64,
}

impl ClaimedIds {
    /// Starts a pass with `reserved` ids protected and synthesis from `start`.
    pub fn seeded(reserved: impl IntoIterator<Item = i64>, start: i64) -> Self {
        Self {
            reserved: reserved.into_iter().collect(),
            issued: BTreeSet::new(),
            cursor: start.max(1),
        }
    }

    /// Assigns an id to the next row.
    ///
    /// A valid candidate not yet issued is kept; anything else receives the
    /// smallest id at or above the cursor that is neither reserved nor issued.
    pub fn claim(mut self, candidate: Option<i64>) -> (i64, Self) {
        let id = match candidate {
            Some(id) if id > 0 && !self.issued.contains(&id) => id,
            _ => self.next_free(),
        };
        self.issued.insert(id);
        (id, self)
    }

    pub fn issued(&self) -> &BTreeSet<i64> {
        &self.issued
    }

    fn next_free(&mut self) -> i64 {
        while self.reserved.contains(&self.cursor) || self.issued.contains(&self.cursor) {
            self.cursor += 1;
        }
        self.cursor
    }
}

/// Reads a raw cell as an id candidate: an exact positive integer.
pub fn id_candidate(raw: Option<&str>) -> Option<i64> {
    raw.and_then(parse_exact_int).filter(|id| *id > 0)
}

/// Reconciles a raw id column in row order.
pub fn reconcile_ids(raw: &[Option<String>], start: i64) -> Vec<i64> {
    let candidates: Vec<Option<i64>> = raw.iter().map(|v| id_candidate(v.as_deref())).collect();
    let claimed = ClaimedIds::seeded(candidates.iter().flatten().copied(), start);
    let (ids, _) = candidates
        .into_iter()
        .fold((Vec::with_capacity(raw.len()), claimed), |(mut ids, claimed), candidate| {
            let (id, claimed) = claimed.claim(candidate);
            ids.push(id);
            (ids, claimed)
        });
    ids
}
