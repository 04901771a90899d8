/// A quantity to mint split into rounds of at most `per_round_cap`.
///
/// A cap of zero means "no cap": everything goes out in a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundPlan {
    total: u64,
    per_round_cap: u64,
}

impl RoundPlan {
    /// Creates a plan for `total` items with the given per-round cap.
    pub const fn new(total: u64, per_round_cap: u64) -> Self {
        Self { total, per_round_cap }
    }

    /// Returns the total quantity covered by the plan.
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the largest round size, the cap or the whole total when uncapped.
    pub const fn effective_cap(&self) -> u64 {
        if self.per_round_cap == 0 {
            self.total
        } else {
            self.per_round_cap
        }
    }

    /// Returns `ceil(total / effective_cap)`, zero for an empty plan.
    pub const fn round_count(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        self.total.div_ceil(self.effective_cap())
    }

    /// Iterates the round sizes in order; the last round takes the remainder.
    pub const fn rounds(&self) -> Rounds {
        Rounds { remaining: self.total, cap: self.effective_cap() }
    }
}

/// Iterator over the round sizes of a [`RoundPlan`].
#[derive(Debug, Clone)]
pub struct Rounds {
    remaining: u64,
    cap: u64,
}

impl Iterator for Rounds {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let size = self.cap.min(self.remaining);
        self.remaining -= size;
        Some(size)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = RoundPlan::new(self.remaining, self.cap).round_count();
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        (count, Some(count))
    }
}

impl ExactSizeIterator for Rounds {}
