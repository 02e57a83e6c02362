use crate::{AnalysisError, TableKind};
use num_integer::Integer;
use rayon::prelude::*;
use std::fmt::Display;
use std::ops::Range;
use tracing::{debug, instrument, trace};

/// Worker configuration of the [maximum differential probability](crate::VectorialBooleanFunctionImpl::maximum_differential_probability) search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifferentialSearchConfig {
    workers: usize,
}

impl DifferentialSearchConfig {
    /// Configuration with a fixed number of workers.
    ///
    /// # Returns
    /// An error if `workers` is zero.
    pub fn new(workers: usize) -> Result<Self, AnalysisError> {
        if workers == 0 {
            return Err(AnalysisError::InvalidWorkerCount);
        }
        Ok(DifferentialSearchConfig { workers })
    }

    /// Number of workers, each handling one contiguous range of input differences.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// One worker per available CPU.
impl Default for DifferentialSearchConfig {
    fn default() -> Self {
        DifferentialSearchConfig {
            workers: std::thread::available_parallelism()
                .map(|workers| workers.get())
                .unwrap_or(1),
        }
    }
}

/// Maximum Differential Probability of a function $F$ over GF(2)^n:
///
/// $$MDP(F) = \frac{1}{2^n} \max_{a \neq 0, b} \\#\\{x \mid F(x) \oplus F(x \oplus a) = b\\}$$
///
/// The numerator is kept exact, it is also the differential uniformity of $F$.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifferentialProbability {
    max_count: u64,
    field_extension: usize,
}

impl DifferentialProbability {
    /// Largest entry of the difference distribution table outside the row $a = 0$.
    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    /// Denominator $2^n$.
    pub fn field_size(&self) -> u64 {
        1 << self.field_extension
    }

    /// Probability as a floating point number, in $(0, 1]$.
    pub fn value(&self) -> f64 {
        self.max_count as f64 / self.field_size() as f64
    }
}

impl Display for DifferentialProbability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/2^{}", self.max_count, self.field_extension)
    }
}

/// Splits the non-zero differences $[1, 2^n)$ into at most `workers` contiguous, disjoint ranges.
pub(crate) fn partition_differences(field_size: usize, workers: usize) -> Vec<Range<usize>> {
    let differences_count = field_size.saturating_sub(1);
    if differences_count == 0 {
        return Vec::new();
    }
    let chunk_len = Integer::div_ceil(&differences_count, &workers.max(1));
    (1..field_size)
        .step_by(chunk_len)
        .map(|begin| begin..(begin + chunk_len).min(field_size))
        .collect()
}

/// Largest histogram count over the input differences of `differences`.
fn local_maximum(truth_table: &[u32], differences: Range<usize>) -> Result<u64, AnalysisError> {
    let field_size = truth_table.len();
    let mut histogram = vec![0u64; field_size];
    let mut maximum = 0u64;
    trace!(
        begin = differences.start,
        end = differences.end,
        "worker started"
    );
    for a in differences {
        histogram.fill(0);
        for x in 0..field_size {
            let b = (truth_table[x] ^ truth_table[x ^ a]) as usize;
            let Some(count) = histogram.get_mut(b) else {
                let index = if truth_table[x] as usize >= field_size {
                    x
                } else {
                    x ^ a
                };
                return Err(AnalysisError::InvalidTableValue {
                    kind: TableKind::TruthTable,
                    index,
                    value: truth_table[index] as i64,
                });
            };
            *count += 1;
            maximum = maximum.max(*count);
        }
    }
    Ok(maximum)
}

/// Runs one [local_maximum] per partition on `pool`, the first failing partition fails the whole search.
fn parallel_maximum(
    pool: &rayon::ThreadPool,
    truth_table: &[u32],
    partitions: Vec<Range<usize>>,
) -> Result<u64, AnalysisError> {
    pool.install(|| {
        partitions
            .into_par_iter()
            .map(|differences| local_maximum(truth_table, differences))
            .try_reduce(|| 0, |a, b| Ok(a.max(b)))
    })
}

/// Exhaustive parallel search of the Maximum Differential Probability of a vectorial truth table.
///
/// Each worker owns a private histogram and a disjoint range of input differences,
/// local maxima are combined once all workers are done. The result does not depend
/// on the worker count.
///
/// # Returns
/// The [DifferentialProbability], or an error if the table is empty or not of length $2^n$,
/// a value is not in $[0, 2^n)$, or the worker pool cannot be built.
#[instrument(level = "debug", skip(truth_table), fields(field_size = truth_table.len()))]
pub(crate) fn maximum_differential_probability(
    truth_table: &[u32],
    config: &DifferentialSearchConfig,
) -> Result<DifferentialProbability, AnalysisError> {
    if truth_table.is_empty() {
        return Err(AnalysisError::EmptyTable(TableKind::TruthTable));
    }
    let field_size = truth_table.len();
    let field_extension = crate::utils::variables_count_for_length(field_size).ok_or(
        AnalysisError::InvalidTableLength {
            kind: TableKind::TruthTable,
            actual: field_size,
            expected: field_size.next_power_of_two(),
        },
    )?;
    if let Some((index, value)) = truth_table
        .iter()
        .enumerate()
        .find(|(_, value)| **value as usize >= field_size)
    {
        return Err(AnalysisError::InvalidTableValue {
            kind: TableKind::TruthTable,
            index,
            value: *value as i64,
        });
    }
    let partitions = partition_differences(field_size, config.workers());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers())
        .build()
        .map_err(|error| AnalysisError::WorkerPoolFailure(error.to_string()))?;
    let max_count = parallel_maximum(&pool, truth_table, partitions)?;
    debug!(max_count, field_extension, "differential search done");
    Ok(DifferentialProbability {
        max_count,
        field_extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // x^3 over GF(2^3) with modulus x^3 + x + 1
    const CUBE_TRUTH_TABLE: [u32; 8] = [0, 1, 3, 4, 5, 6, 7, 2];

    #[test]
    fn test_config() {
        assert_eq!(
            DifferentialSearchConfig::new(0),
            Err(AnalysisError::InvalidWorkerCount)
        );
        assert_eq!(DifferentialSearchConfig::new(3).unwrap().workers(), 3);
        assert!(DifferentialSearchConfig::default().workers() >= 1);
    }

    #[test]
    fn test_partition_differences() {
        assert_eq!(partition_differences(8, 2), vec![1..5, 5..8]);
        assert_eq!(partition_differences(8, 1), vec![1..8]);
        assert_eq!(partition_differences(8, 3), vec![1..4, 4..7, 7..8]);
        assert_eq!(partition_differences(4, 16), vec![1..2, 2..3, 3..4]);
        assert!(partition_differences(1, 4).is_empty());

        let partitions = partition_differences(1 << 10, 7);
        assert!(partitions.len() <= 7);
        assert_eq!(partitions.first().map(|r| r.start), Some(1));
        assert_eq!(partitions.last().map(|r| r.end), Some(1 << 10));
        assert!(partitions.windows(2).all(|w| w[0].end == w[1].start));
    }

    #[test]
    fn test_local_maximum() {
        assert_eq!(local_maximum(&CUBE_TRUTH_TABLE, 1..8), Ok(2));
        assert_eq!(local_maximum(&CUBE_TRUTH_TABLE, 3..4), Ok(2));
        assert_eq!(local_maximum(&CUBE_TRUTH_TABLE, 3..3), Ok(0));
        assert_eq!(
            local_maximum(&[0, 9, 2, 3], 1..4),
            Err(AnalysisError::InvalidTableValue {
                kind: TableKind::TruthTable,
                index: 1,
                value: 9
            })
        );
    }

    #[test]
    fn test_maximum_differential_probability() {
        let config = DifferentialSearchConfig::new(2).unwrap();
        let mdp = maximum_differential_probability(&CUBE_TRUTH_TABLE, &config).unwrap();
        assert_eq!(mdp.max_count(), 2);
        assert_eq!(mdp.field_size(), 8);
        assert_eq!(mdp.value(), 0.25);
        assert_eq!(mdp.to_string(), "2/2^3");

        let identity: Vec<u32> = (0..8).collect();
        let mdp = maximum_differential_probability(&identity, &config).unwrap();
        assert_eq!(mdp.max_count(), 8);
        assert_eq!(mdp.value(), 1.0);

        assert_eq!(
            maximum_differential_probability(&[], &config),
            Err(AnalysisError::EmptyTable(TableKind::TruthTable))
        );
        assert!(maximum_differential_probability(&[0, 1, 2], &config).is_err());
    }

    #[test]
    fn test_maximum_differential_probability_rejects_out_of_range_values() {
        // every difference reaches the value 9 at index 3
        assert_eq!(
            maximum_differential_probability(
                &[0, 1, 2, 9],
                &DifferentialSearchConfig::new(3).unwrap()
            ),
            Err(AnalysisError::InvalidTableValue {
                kind: TableKind::TruthTable,
                index: 3,
                value: 9
            })
        );
        // no XOR leaves [0, 4), the values themselves do
        assert_eq!(
            maximum_differential_probability(
                &[4, 5, 6, 7],
                &DifferentialSearchConfig::new(2).unwrap()
            ),
            Err(AnalysisError::InvalidTableValue {
                kind: TableKind::TruthTable,
                index: 0,
                value: 4
            })
        );
    }

    #[test]
    fn test_parallel_maximum_fails_if_one_partition_fails() {
        // difference 1 always gives 1, difference 2 gives 8 ^ 2 = 10 at x = 0
        let truth_table = [8, 9, 2, 3, 4, 5, 6, 7];
        assert_eq!(local_maximum(&truth_table, 1..2), Ok(8));
        let invalid_value = AnalysisError::InvalidTableValue {
            kind: TableKind::TruthTable,
            index: 0,
            value: 8,
        };
        assert_eq!(local_maximum(&truth_table, 2..3), Err(invalid_value.clone()));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap();
        assert_eq!(
            parallel_maximum(&pool, &truth_table, vec![1..2, 2..3]),
            Err(invalid_value.clone())
        );
        assert_eq!(
            parallel_maximum(&pool, &truth_table, vec![2..3, 1..2, 1..2]),
            Err(invalid_value)
        );
        assert_eq!(parallel_maximum(&pool, &CUBE_TRUTH_TABLE, vec![1..4, 4..8]), Ok(2));
    }

    #[test]
    fn test_maximum_differential_probability_worker_independent() {
        // x^7 over GF(2^4) with modulus x^4 + x + 1
        let truth_table = [0, 1, 11, 13, 9, 14, 6, 7, 12, 5, 8, 3, 15, 2, 4, 10];
        for workers in 1..=20 {
            let config = DifferentialSearchConfig::new(workers).unwrap();
            let mdp = maximum_differential_probability(&truth_table, &config).unwrap();
            assert_eq!(mdp.max_count(), 4);
        }
    }
}
