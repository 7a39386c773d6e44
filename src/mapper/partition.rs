//! Static work partitioning
//!
//! Splits `[0, len)` into contiguous, near-equal blocks. The first
//! `len % workers` blocks receive one extra element.

use std::ops::Range;

/// A half-open index range owned by exactly one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub worker: usize,
    pub start: usize,
    pub end: usize,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Effective worker count for an input of `len` elements
pub fn effective_workers(configured: usize, len: usize) -> usize {
    configured.max(1).min(len)
}

/// Partition `[0, len)` across at most `workers` workers.
///
/// Returns an empty vector for an empty input. Never produces an empty
/// partition, and never more partitions than elements.
pub fn partition(len: usize, workers: usize) -> Vec<Partition> {
    let workers = effective_workers(workers, len);
    if workers == 0 {
        return Vec::new();
    }

    let block = len / workers;
    let remainder = len % workers;

    let mut partitions = Vec::with_capacity(workers);
    let mut start = 0;

    for worker in 0..workers {
        let size = block + usize::from(worker < remainder);
        let end = start + size;
        partitions.push(Partition { worker, start, end });
        start = end;
    }

    partitions
}
