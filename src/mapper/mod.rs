//! Order-preserving parallel map
//!
//! [`ParallelMapper`] splits an input slice into contiguous partitions, runs
//! one scoped worker thread per partition and joins them all before
//! returning. Each worker writes only to its own slice of the pre-sized
//! output, so output order always equals input order.
//!
//! A failing element raises a shared flag that the other workers check
//! between elements. Exactly one failure (the first recorded) reaches the
//! caller, and no partial output is ever returned.
//!
//! ```
//! use parmap::ParallelMapper;
//!
//! let mapper = ParallelMapper::with_workers(4);
//! let squares = mapper.map(&[0, 1, 10], |x| i64::from(*x) * i64::from(*x));
//! assert_eq!(squares, vec![0, 1, 100]);
//! ```

mod failure;
mod partition;


pub use failure::MapError;
pub use partition::{effective_workers, partition, Partition};

use failure::{Failure, FailureCause, FailureRegister};
use std::convert::Infallible;
use std::io;
use std::mem;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, Scope};
use tracing::{debug, trace, warn};

use crate::config::Config;

/// Worker count reported by the platform, or 1 when it cannot tell
pub fn available_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Fixed-budget fork-join mapper.
///
/// Holds nothing but its worker count, so one instance can be shared and
/// reused for any number of calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelMapper {
    workers: usize,
}

impl Default for ParallelMapper {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ParallelMapper {
    /// Create a mapper. `None` uses the platform's concurrency hint; zero is
    /// raised to one.
    pub fn new(workers: Option<usize>) -> Self {
        let workers = workers.unwrap_or_else(available_workers).max(1);
        Self { workers }
    }

    pub fn with_workers(workers: usize) -> Self {
        Self::new(Some(workers))
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.workers)
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Apply an infallible transform to every element.
    ///
    /// If the transform panics, every worker is still joined and the original
    /// panic is then resumed on the calling thread.
    pub fn map<T, R, F>(&self, input: &[T], transform: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        match self.run(input, |item| Ok::<R, Infallible>(transform(item))) {
            Ok(output) => output,
            Err(failure) => match failure.cause {
                FailureCause::Panic(payload) => panic::resume_unwind(payload),
                FailureCause::Error(never) => match never {},
            },
        }
    }

    /// Apply a fallible transform to every element.
    ///
    /// Returns the complete output, or the first recorded failure together
    /// with the index of the element that produced it. A panicking transform
    /// is reported as [`MapError::Panicked`].
    pub fn try_map<T, R, E, F>(&self, input: &[T], transform: F) -> Result<Vec<R>, MapError<E>>
    where
        T: Sync,
        R: Send,
        E: Send,
        F: Fn(&T) -> Result<R, E> + Sync,
    {
        self.run(input, transform).map_err(Failure::into_map_error)
    }

    fn run<T, R, E, F>(&self, input: &[T], transform: F) -> Result<Vec<R>, Failure<E>>
    where
        T: Sync,
        R: Send,
        E: Send,
        F: Fn(&T) -> Result<R, E> + Sync,
    {
        self.run_with(input, transform, &ThreadSpawner)
    }

    fn run_with<T, R, E, F, S>(
        &self,
        input: &[T],
        transform: F,
        spawner: &S,
    ) -> Result<Vec<R>, Failure<E>>
    where
        T: Sync,
        R: Send,
        E: Send,
        F: Fn(&T) -> Result<R, E> + Sync,
        S: SpawnWorker,
    {
        let len = input.len();
        if len == 0 {
            return Ok(Vec::new());
        }

        let register = FailureRegister::new();
        let mut slots: Vec<Option<R>> = Vec::with_capacity(len);
        slots.resize_with(len, || None);

        let workers = effective_workers(self.workers, len);
        if workers <= 1 {
            trace!(elements = len, "mapping sequentially on the calling thread");
            run_partition(0, input, &mut slots, &transform, &register);
        } else {
            let partitions = partition(len, workers);
            debug!(
                elements = len,
                workers,
                partitions = partitions.len(),
                "dispatching parallel map"
            );

            let unspawned = dispatch(
                &partitions,
                input,
                &mut slots,
                &transform,
                &register,
                spawner,
            );
            for part in unspawned {
                if register.is_raised() {
                    break;
                }
                run_partition(
                    part.start,
                    &input[part.range()],
                    &mut slots[part.range()],
                    &transform,
                    &register,
                );
            }
        }

        if let Some(failure) = register.into_first() {
            debug!(index = failure.index, "parallel map failed");
            return Err(failure);
        }

        let output: Vec<R> = slots.into_iter().flatten().collect();
        debug_assert_eq!(output.len(), len);
        Ok(output)
    }
}

/// Work handed to a worker thread: one partition's share of the map
type Job<'scope> = Box<dyn FnOnce() + Send + 'scope>;

/// Starts a scoped worker for one partition.
///
/// On `Err` the job must not have run; its partition is then mapped inline.
trait SpawnWorker {
    fn spawn<'scope, 'env>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        part: &Partition,
        job: Job<'scope>,
    ) -> io::Result<()>;
}

/// Spawns a named OS thread per partition
struct ThreadSpawner;

impl SpawnWorker for ThreadSpawner {
    fn spawn<'scope, 'env>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        part: &Partition,
        job: Job<'scope>,
    ) -> io::Result<()> {
        thread::Builder::new()
            .name(format!("parmap-worker-{}", part.worker))
            .spawn_scoped(scope, job)
            .map(drop)
    }
}

/// Spawn one scoped worker per partition and join them all.
///
/// Returns the partitions whose worker thread could not be spawned; the
/// caller runs those inline once the scope has ended.
fn dispatch<T, R, E, F, S>(
    partitions: &[Partition],
    input: &[T],
    slots: &mut [Option<R>],
    transform: &F,
    register: &FailureRegister<E>,
    spawner: &S,
) -> Vec<Partition>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync,
    S: SpawnWorker,
{
    let mut unspawned = Vec::new();

    thread::scope(|scope| {
        let mut remaining = slots;
        for part in partitions {
            let (chunk, rest) = mem::take(&mut remaining).split_at_mut(part.len());
            remaining = rest;

            let items = &input[part.range()];
            let start = part.start;
            let job: Job<'_> =
                Box::new(move || run_partition(start, items, chunk, transform, register));

            if let Err(err) = spawner.spawn(scope, part, job) {
                warn!(
                    worker = part.worker,
                    error = %err,
                    "failed to spawn worker, partition will run inline"
                );
                unspawned.push(*part);
            }
        }
    });

    unspawned
}

/// Transform `items` into `slots` in index order, stopping at the first
/// failure here or as soon as another worker has raised the flag.
fn run_partition<T, R, E, F>(
    start: usize,
    items: &[T],
    slots: &mut [Option<R>],
    transform: &F,
    register: &FailureRegister<E>,
) where
    F: Fn(&T) -> Result<R, E>,
{
    trace!(start, len = items.len(), "partition started");

    for (offset, (item, slot)) in items.iter().zip(slots.iter_mut()).enumerate() {
        if register.is_raised() {
            trace!(start, stopped_at = start + offset, "partition stopped early");
            return;
        }

        let cause = match panic::catch_unwind(AssertUnwindSafe(|| transform(item))) {
            Ok(Ok(value)) => {
                *slot = Some(value);
                continue;
            }
            Ok(Err(err)) => FailureCause::Error(err),
            Err(payload) => FailureCause::Panic(payload),
        };

        let index = start + offset;
        if register.record(Failure { index, cause }) {
            warn!(index, "transform failed, stopping remaining workers");
        }
        return;
    }

    trace!(start, len = items.len(), "partition finished");
}
