/// Strict avalanche counts of a vectorial Boolean function $F$ over GF(2)^n.
///
/// For each input bit $i$, the counts are taken over the derivatives $F(x) \oplus F(x \oplus e_i)$.
/// Ideally every univariate count equals $2^{n-1}$ and every multivariate count $n \cdot 2^{n-1}$.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateDistributionError {
    /// `multivariate[i]`: number of output bits flipped by flipping input bit $i$, summed over all inputs.
    pub multivariate: Vec<u64>,
    /// `univariate[f][i]`: number of inputs for which flipping input bit $i$ flips output bit $f$.
    pub univariate: Vec<Vec<u64>>,
}

/// Percentage deviation of a [RateDistributionError] from its ideal averages.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeDeviation {
    /// `multivariate[i]`: $100 \cdot |c_i - n 2^{n-1}| / (n 2^{n-1})$.
    pub multivariate: Vec<f64>,
    /// `univariate[f][i]`: $100 \cdot |c_{f,i} - 2^{n-1}| / 2^{n-1}$.
    pub univariate: Vec<Vec<f64>>,
}

impl RateDistributionError {
    /// Counts flipped output bits over the whole truth table of a function with `field_extension` variables.
    pub(crate) fn from_truth_table(truth_table: &[u32], field_extension: usize) -> Self {
        let mut multivariate = vec![0u64; field_extension];
        let mut univariate = vec![vec![0u64; field_extension]; field_extension];
        for (x, y) in truth_table.iter().enumerate() {
            for i in 0..field_extension {
                let delta = y ^ truth_table[x ^ (1 << i)];
                multivariate[i] += delta.count_ones() as u64;
                univariate
                    .iter_mut()
                    .enumerate()
                    .filter(|(f, _)| (delta >> f) & 1 == 1)
                    .for_each(|(_, counts)| counts[i] += 1);
            }
        }
        RateDistributionError {
            multivariate,
            univariate,
        }
    }

    /// Field extension $n$ the counts were taken for.
    pub fn field_extension(&self) -> usize {
        self.multivariate.len()
    }

    /// Returns `true` if every vector has one entry per variable.
    pub(crate) fn has_shape(&self, field_extension: usize) -> bool {
        self.multivariate.len() == field_extension
            && self.univariate.len() == field_extension
            && self.univariate.iter().all(|counts| counts.len() == field_extension)
    }

    /// Returns `true` if every univariate count equals $2^{n-1}$, ie the strict avalanche criterion holds.
    pub fn satisfies_strict_avalanche_criterion(&self) -> bool {
        let average = 1u64 << self.field_extension().saturating_sub(1);
        self.univariate.iter().flatten().all(|count| *count == average)
    }

    /// Relative deviation, in percent, of every count from its ideal average.
    pub fn relative_deviation(&self) -> RelativeDeviation {
        let n = self.field_extension();
        let average = (1u64 << n.saturating_sub(1)) as f64;
        let deviation = |count: u64, ideal: f64| 100.0 * (count as f64 - ideal).abs() / ideal;
        RelativeDeviation {
            multivariate: self
                .multivariate
                .iter()
                .map(|count| deviation(*count, n as f64 * average))
                .collect(),
            univariate: self
                .univariate
                .iter()
                .map(|counts| counts.iter().map(|count| deviation(*count, average)).collect())
                .collect(),
        }
    }
}
