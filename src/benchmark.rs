//! Sequential baseline versus parallel map timing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{ErrorCode, ParmapError, Result};
use crate::mapper::ParallelMapper;

/// Run `f` once and return its result with the elapsed wall time
pub fn measure<R, F>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    pub elements: usize,
    pub workers: usize,
    pub sequential_ms: f64,
    pub parallel_ms: f64,
    /// Sequential time over parallel time; absent when the parallel run was
    /// too fast to measure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speedup: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl BenchReport {
    pub fn new(elements: usize, workers: usize, sequential: Duration, parallel: Duration) -> Self {
        let sequential_ms = sequential.as_secs_f64() * 1_000.0;
        let parallel_ms = parallel.as_secs_f64() * 1_000.0;
        let speedup = (parallel_ms > 0.0).then(|| sequential_ms / parallel_ms);

        Self {
            elements,
            workers,
            sequential_ms,
            parallel_ms,
            speedup,
            recorded_at: Utc::now(),
        }
    }

    /// Human-readable summary, one fact per line
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Processing {} elements with {} threads",
            self.elements, self.workers
        )?;
        writeln!(f, "Sequential time: {:.2}ms", self.sequential_ms)?;
        writeln!(f, "Parallel time: {:.2}ms", self.parallel_ms)?;
        if let Some(speedup) = self.speedup {
            writeln!(f, "Speedup: {:.2}x", speedup)?;
        }
        Ok(())
    }
}

/// Time `transform` over `input` sequentially and through `mapper`.
///
/// Fails with a validation error if the two outputs differ.
pub fn compare<T, R, F>(mapper: &ParallelMapper, input: &[T], transform: F) -> Result<BenchReport>
where
    T: Sync,
    R: Send + PartialEq,
    F: Fn(&T) -> R + Sync,
{
    let (sequential, sequential_time) =
        measure(|| input.iter().map(&transform).collect::<Vec<R>>());
    let (parallel, parallel_time) = measure(|| mapper.map(input, &transform));

    if let Some(index) = first_mismatch(&sequential, &parallel) {
        return Err(ParmapError::validation_with_code(
            ErrorCode::VALIDATION_OUTPUT_MISMATCH,
            format!("parallel output differs from sequential output at element {index}"),
            Some("output".to_string()),
        ));
    }

    let report = BenchReport::new(
        input.len(),
        mapper.worker_count(),
        sequential_time,
        parallel_time,
    );
    debug!(
        elements = report.elements,
        workers = report.workers,
        sequential_ms = report.sequential_ms,
        parallel_ms = report.parallel_ms,
        "benchmark finished"
    );
    Ok(report)
}

fn first_mismatch<R: PartialEq>(left: &[R], right: &[R]) -> Option<usize> {
    if left.len() != right.len() {
        return Some(left.len().min(right.len()));
    }
    left.iter().zip(right).position(|(a, b)| a != b)
}
