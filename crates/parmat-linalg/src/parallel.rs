//! Row-partitioned parallel execution.
//!
//! Every matrix operation in this crate produces its result one output row
//! at a time. A [`RowPartitioner`] hands those rows out to workers using
//! rayon's work-stealing pool: each worker receives a disjoint `&mut` slice
//! of the destination storage, so no two workers ever touch the same row
//! and no locking is needed. The call returns only after every row has been
//! processed.

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::{debug, trace};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{MatrixError, Result};

/// How many workers may process rows at the same time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    /// All rows on the calling thread, in order.
    Sequential,
    /// Rayon's global pool picks the number of workers (bounded by host
    /// concurrency, or `RAYON_NUM_THREADS` when set).
    Default,
    /// A dedicated pool with exactly this many workers.
    Fixed(NonZeroUsize),
}

impl Parallelism {
    /// Creates a fixed-degree policy.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidDegree`] when `threads` is zero.
    pub fn fixed(threads: usize) -> Result<Self> {
        NonZeroUsize::new(threads)
            .map(Self::Fixed)
            .ok_or(MatrixError::InvalidDegree { threads })
    }

    /// Limits a fixed degree to `rows` workers (at least one).
    ///
    /// Workers beyond the row count would never receive a row, but a
    /// dedicated pool still spawns a thread for each of them.
    #[must_use]
    pub fn capped(self, rows: usize) -> Self {
        match self {
            Self::Fixed(threads) => {
                let limit = NonZeroUsize::new(rows).unwrap_or(NonZeroUsize::MIN);
                Self::Fixed(threads.min(limit))
            }
            other => other,
        }
    }
}

/// Configuration for row partitioning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Minimum row count to enable parallelism; smaller matrices run
    /// sequentially even under a parallel policy.
    pub parallel_threshold: usize,
    /// Minimum number of consecutive rows a single task processes.
    pub min_rows_per_task: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 1,
            min_rows_per_task: 1,
        }
    }
}

/// Distributes the rows of a result matrix over workers.
///
/// A fixed-degree partitioner owns its worker pool, so building one and
/// reusing it across many operations avoids respawning threads.
#[derive(Clone, Debug)]
pub struct RowPartitioner {
    policy: Parallelism,
    config: ParallelConfig,
    pool: Option<Arc<ThreadPool>>,
}

impl RowPartitioner {
    /// Creates a partitioner for the given policy.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ThreadPool`] when the workers of a
    /// fixed-degree pool cannot be spawned.
    pub fn new(policy: Parallelism, config: ParallelConfig) -> Result<Self> {
        let pool = match policy {
            Parallelism::Fixed(threads) => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads.get())
                    .thread_name(|i| format!("parmat-row-{i}"))
                    .build()?;
                debug!("built fixed-degree row pool with {threads} workers");
                Some(Arc::new(pool))
            }
            Parallelism::Sequential | Parallelism::Default => None,
        };

        Ok(Self {
            policy,
            config,
            pool,
        })
    }

    /// Processes every row on the calling thread.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            policy: Parallelism::Sequential,
            config: ParallelConfig::default(),
            pool: None,
        }
    }

    /// Processes rows on rayon's global pool.
    #[must_use]
    pub fn parallel() -> Self {
        Self {
            policy: Parallelism::Default,
            config: ParallelConfig::default(),
            pool: None,
        }
    }

    /// Processes rows on a dedicated pool of `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidDegree`] when `threads` is zero, or
    /// [`MatrixError::ThreadPool`] when the pool cannot be built.
    pub fn fixed(threads: usize) -> Result<Self> {
        Self::new(Parallelism::fixed(threads)?, ParallelConfig::default())
    }

    /// Returns the policy.
    #[must_use]
    pub fn policy(&self) -> Parallelism {
        self.policy
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// Runs `op` once for every row of `storage`.
    ///
    /// `storage` is a row-major buffer of `row_width` items per row. `op`
    /// receives the row index and exclusive access to that row. The first
    /// error returned by any row is propagated; remaining rows may or may
    /// not have run, and the caller must discard the buffer.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `op`.
    pub fn for_each_row<T, F>(&self, storage: &mut [T], row_width: usize, op: F) -> Result<()>
    where
        T: Send,
        F: Fn(usize, &mut [T]) -> Result<()> + Send + Sync,
    {
        if storage.is_empty() {
            return Ok(());
        }
        debug_assert!(row_width > 0 && storage.len() % row_width == 0);
        let rows = storage.len() / row_width;

        if self.policy == Parallelism::Sequential || rows < self.config.parallel_threshold {
            trace!("processing {rows} rows sequentially");
            return storage
                .chunks_mut(row_width)
                .enumerate()
                .try_for_each(|(row, data)| op(row, data));
        }

        let min_len = self.config.min_rows_per_task.max(1);
        match &self.pool {
            Some(pool) => {
                trace!(
                    "processing {rows} rows on {} dedicated workers",
                    pool.current_num_threads()
                );
                pool.install(move || par_rows(storage, row_width, min_len, &op))
            }
            None => {
                trace!("processing {rows} rows on the global pool");
                par_rows(storage, row_width, min_len, &op)
            }
        }
    }
}

fn par_rows<T, F>(storage: &mut [T], row_width: usize, min_len: usize, op: &F) -> Result<()>
where
    T: Send,
    F: Fn(usize, &mut [T]) -> Result<()> + Sync,
{
    storage
        .par_chunks_mut(row_width)
        .enumerate()
        .with_min_len(min_len)
        .try_for_each(|(row, data)| op(row, data))
}

impl Default for RowPartitioner {
    fn default() -> Self {
        Self::parallel()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn fill_row_indices(partitioner: &RowPartitioner, rows: usize, width: usize) -> Vec<usize> {
        let mut storage = vec![usize::MAX; rows * width];
        partitioner
            .for_each_row(&mut storage, width, |row, data| {
                for cell in data.iter_mut() {
                    assert_eq!(*cell, usize::MAX, "row visited twice");
                    *cell = row;
                }
                Ok(())
            })
            .unwrap();
        storage
    }

    fn expected(rows: usize, width: usize) -> Vec<usize> {
        (0..rows).flat_map(|r| std::iter::repeat(r).take(width)).collect()
    }

    #[test]
    fn test_every_row_visited_once() {
        for partitioner in [
            RowPartitioner::sequential(),
            RowPartitioner::parallel(),
            RowPartitioner::fixed(1).unwrap(),
            RowPartitioner::fixed(3).unwrap(),
        ] {
            assert_eq!(fill_row_indices(&partitioner, 17, 3), expected(17, 3));
        }
    }

    #[test]
    fn test_empty_storage() {
        let mut storage: Vec<u8> = Vec::new();
        RowPartitioner::parallel()
            .for_each_row(&mut storage, 0, |_, _| panic!("no rows to visit"))
            .unwrap();
    }

    #[test]
    fn test_zero_degree_rejected() {
        assert_eq!(
            Parallelism::fixed(0),
            Err(MatrixError::InvalidDegree { threads: 0 })
        );
        assert!(matches!(
            RowPartitioner::fixed(0),
            Err(MatrixError::InvalidDegree { threads: 0 })
        ));
    }

    #[test]
    fn test_fixed_degree_caps_workers() {
        let partitioner = RowPartitioner::fixed(2).unwrap();
        assert_eq!(partitioner.policy(), Parallelism::fixed(2).unwrap());

        let observed = AtomicUsize::new(0);
        let mut storage = vec![0u32; 64];
        partitioner
            .for_each_row(&mut storage, 1, |_, _| {
                observed.fetch_max(rayon::current_num_threads(), Ordering::Relaxed);
                Ok(())
            })
            .unwrap();
        assert_eq!(observed.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_capped_degree() {
        let eight = Parallelism::fixed(8).unwrap();
        assert_eq!(eight.capped(3), Parallelism::fixed(3).unwrap());
        assert_eq!(eight.capped(100), eight);
        assert_eq!(eight.capped(0), Parallelism::fixed(1).unwrap());
        assert_eq!(Parallelism::Default.capped(2), Parallelism::Default);
        assert_eq!(Parallelism::Sequential.capped(0), Parallelism::Sequential);
    }

    #[test]
    fn test_error_propagates() {
        let mut storage = vec![0u8; 10];
        for partitioner in [RowPartitioner::sequential(), RowPartitioner::parallel()] {
            let result = partitioner.for_each_row(&mut storage, 2, |row, _| {
                if row == 3 {
                    Err(MatrixError::OutOfBounds { x: row, y: 0, len: 5 })
                } else {
                    Ok(())
                }
            });
            assert_eq!(result, Err(MatrixError::OutOfBounds { x: 3, y: 0, len: 5 }));
        }
    }

    #[test]
    fn test_threshold_runs_sequentially() {
        let config = ParallelConfig {
            parallel_threshold: 100,
            min_rows_per_task: 4,
        };
        let partitioner = RowPartitioner::new(Parallelism::Default, config).unwrap();
        assert_eq!(partitioner.config().parallel_threshold, 100);

        let caller = std::thread::current().id();
        let mut storage = vec![0u8; 8];
        partitioner
            .for_each_row(&mut storage, 1, |_, _| {
                assert_eq!(std::thread::current().id(), caller);
                Ok(())
            })
            .unwrap();
    }
}
