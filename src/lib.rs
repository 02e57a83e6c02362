//! # Vectorial Boolean function analysis library

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code, unused_must_use)]
#![forbid(
    missing_docs,
    unreachable_pub,
    unused_import_braces,
    unused_extern_crates
)]

mod analysis_error;
mod anf_polynom;
mod anf_transform;
mod differential;
mod polynomial_over_f2;
mod rate_distribution;
pub mod table_io;
mod utils;
mod vectorial_boolean_function;
mod walsh_transform;

pub use crate::analysis_error::{AnalysisError, ErrorKind, TableKind};
pub use crate::anf_polynom::AnfPolynomial;
pub use crate::anf_transform::fast_mobius_transform;
pub use crate::differential::{DifferentialProbability, DifferentialSearchConfig};
pub use crate::polynomial_over_f2::{PolynomialOverF2, MAX_POLYNOMIAL_DEGREE};
pub use crate::rate_distribution::{RateDistributionError, RelativeDeviation};
pub use crate::vectorial_boolean_function::{VectorialBooleanFunction, MAX_FIELD_EXTENSION};
pub use crate::walsh_transform::fast_walsh_hadamard_transform;
use gen_combinations::CombinationIterator;
use std::fmt::Debug;
use tracing::{debug, instrument, trace};

/// Cryptographic metrics of a vectorial Boolean function $F: GF(2)^n \to GF(2)^n$,
/// computed from its three precomputed tables.
///
/// Implementors only provide read-only access to the tables, every metric is a default method.
/// Output coordinate $f$ is the Boolean function $x \mapsto$ bit $f$ of $F(x)$, all per-coordinate
/// results are indexed by $f$.
///
/// Unless stated otherwise, metrics require the three tables to be populated and
/// return [AnalysisError::EmptyTable] otherwise.
pub trait VectorialBooleanFunctionImpl: Debug {
    /// Field extension $n$, which is both the input and the output bit count.
    fn field_extension(&self) -> usize;

    /// Truth table, entry $x$ holding $F(x)$. Empty until created or loaded.
    fn truth_table(&self) -> &[u32];

    /// Algebraic Normal Form table, bit $f$ of entry $u$ being the coefficient of the monomial
    /// $\prod_{i \in u} x_i$ in coordinate $f$. Empty until created or loaded.
    fn anf_table(&self) -> &[u32];

    /// Walsh spectrum table, `walsh_spectrum_table()[f][a]` being $W_f(a)$. Empty until created or loaded.
    fn walsh_spectrum_table(&self) -> &[Vec<i32>];

    /// Number of field elements, $2^n$.
    fn field_size(&self) -> usize {
        1 << self.field_extension()
    }

    /// Checks that the truth, ANF and Walsh spectrum tables are all populated.
    ///
    /// # Returns
    /// [AnalysisError::EmptyTable] naming the first empty table.
    fn ensure_tables_populated(&self) -> Result<(), AnalysisError> {
        if self.truth_table().is_empty() {
            return Err(AnalysisError::EmptyTable(TableKind::TruthTable));
        }
        if self.anf_table().is_empty() {
            return Err(AnalysisError::EmptyTable(TableKind::AnfTable));
        }
        if self.walsh_spectrum_table().first().map_or(true, Vec::is_empty) {
            return Err(AnalysisError::EmptyTable(TableKind::WalshSpectrumTable));
        }
        Ok(())
    }

    /// Algebraic Normal Form of output coordinate `coordinate`.
    ///
    /// Only the ANF table is required.
    ///
    /// # Returns
    /// The polynomial, or an error if the ANF table is empty or the coordinate is not below $n$.
    fn coordinate_anf(&self, coordinate: usize) -> Result<AnfPolynomial, AnalysisError> {
        if self.anf_table().is_empty() {
            return Err(AnalysisError::EmptyTable(TableKind::AnfTable));
        }
        if coordinate >= self.field_extension() {
            return Err(AnalysisError::CoordinateOutOfRange(
                coordinate,
                self.field_extension(),
            ));
        }
        Ok(AnfPolynomial::from_anf_table_coordinate(
            self.anf_table(),
            coordinate,
            self.field_extension(),
        ))
    }

    /// Algebraic degree of every output coordinate.
    ///
    /// The degree of a coordinate is the largest Hamming weight of a monomial whose coefficient is set in that coordinate,
    /// 0 if no coefficient is set.
    #[instrument(level = "debug", skip_all)]
    fn algebraic_degree(&self) -> Result<Vec<usize>, AnalysisError> {
        self.ensure_tables_populated()?;
        let mut degrees = vec![0usize; self.field_extension()];
        for (monomial, coefficients) in self
            .anf_table()
            .iter()
            .enumerate()
            .filter(|(_, coefficients)| **coefficients != 0)
        {
            let monomial_degree = monomial.count_ones() as usize;
            degrees
                .iter_mut()
                .enumerate()
                .filter(|(coordinate, _)| (coefficients >> coordinate) & 1 == 1)
                .for_each(|(_, degree)| *degree = (*degree).max(monomial_degree));
        }
        Ok(degrees)
    }

    /// Largest algebraic degree among the output coordinates.
    fn max_algebraic_degree(&self) -> Result<usize, AnalysisError> {
        Ok(self.algebraic_degree()?.into_iter().max().unwrap_or(0))
    }

    /// Disbalance of every output coordinate, ie $W_f(0)$.
    ///
    /// It is $2^n - 2 \cdot wt(f)$, where $wt(f)$ is the number of inputs for which bit $f$ of the output is set.
    #[instrument(level = "debug", skip_all)]
    fn disbalance(&self) -> Result<Vec<i32>, AnalysisError> {
        self.ensure_tables_populated()?;
        Ok(self
            .walsh_spectrum_table()
            .iter()
            .map(|spectrum| spectrum[0])
            .collect())
    }

    /// Returns `true` for every balanced output coordinate, ie with a zero disbalance.
    fn is_balanced(&self) -> Result<Vec<bool>, AnalysisError> {
        Ok(self
            .disbalance()?
            .into_iter()
            .map(|disbalance| disbalance == 0)
            .collect())
    }

    /// Nonlinearity of every output coordinate.
    ///
    /// Nonlinearity is the Hamming distance between the coordinate and the closest affine function:
    ///
    /// $$NL(f) = \frac{2^n - \max_a |W_f(a)|}{2}$$
    #[instrument(level = "debug", skip_all)]
    fn nonlinearity(&self) -> Result<Vec<u32>, AnalysisError> {
        self.ensure_tables_populated()?;
        let field_size = self.field_size() as u32;
        Ok(self
            .walsh_spectrum_table()
            .iter()
            .map(|spectrum| {
                field_size.saturating_sub(
                    spectrum
                        .iter()
                        .map(|value| value.unsigned_abs())
                        .max()
                        .unwrap_or(0),
                ) >> 1
            })
            .collect())
    }

    /// Correlation immunity order of every output coordinate.
    ///
    /// A coordinate is correlation immune of order $m$ if $W_f(a) = 0$ for every $a$ with $1 \leq wt(a) \leq m$.
    /// Weight classes are scanned in increasing order, the scan of a coordinate stops at the first class
    /// with a non-zero coefficient. A constant coordinate has order $n$.
    ///
    /// <https://iacr.org/archive/asiacrypt2002/25010483/25010483.pdf>
    #[instrument(level = "debug", skip_all)]
    fn correlation_immunity(&self) -> Result<Vec<usize>, AnalysisError> {
        self.ensure_tables_populated()?;
        let field_extension = self.field_extension();
        let variables = (0..field_extension).collect::<Vec<usize>>();
        Ok(self
            .walsh_spectrum_table()
            .iter()
            .enumerate()
            .map(|(coordinate, spectrum)| {
                let order = (1..=field_extension)
                    .take_while(|weight| {
                        trace!(coordinate, weight, "scanning weight class");
                        CombinationIterator::new(&variables, *weight).all(|combination| {
                            let mut frequency = 0usize;
                            for &variable in combination {
                                frequency |= 1 << variable;
                            }
                            spectrum[frequency] == 0
                        })
                    })
                    .count();
                debug!(coordinate, order, "correlation immunity");
                order
            })
            .collect())
    }

    /// Resiliency order of every output coordinate.
    ///
    /// A coordinate is resilient of order $m$ if it is balanced and correlation immune of order $m$.
    ///
    /// # Returns
    /// The orders, `None` for unbalanced coordinates.
    #[instrument(level = "debug", skip_all)]
    fn resiliency_order(&self) -> Result<Vec<Option<usize>>, AnalysisError> {
        Ok(self
            .is_balanced()?
            .into_iter()
            .zip(self.correlation_immunity()?)
            .map(|(balanced, order)| balanced.then_some(order))
            .collect())
    }

    /// Strict avalanche counts of the function, see [RateDistributionError].
    #[instrument(level = "debug", skip_all)]
    fn rate_distribution_error(&self) -> Result<RateDistributionError, AnalysisError> {
        self.ensure_tables_populated()?;
        Ok(RateDistributionError::from_truth_table(
            self.truth_table(),
            self.field_extension(),
        ))
    }

    /// Percentage deviation of `rate_distribution_error` from its ideal averages.
    ///
    /// # Returns
    /// The deviation, or an error if the tables are not populated or the vectors do not hold $n$ entries each.
    #[instrument(level = "debug", skip_all)]
    fn relative_deviation_of_rde(
        &self,
        rate_distribution_error: &RateDistributionError,
    ) -> Result<RelativeDeviation, AnalysisError> {
        self.ensure_tables_populated()?;
        if !rate_distribution_error.has_shape(self.field_extension()) {
            return Err(AnalysisError::RateDistributionErrorShape(
                self.field_extension(),
            ));
        }
        Ok(rate_distribution_error.relative_deviation())
    }

    /// Maximum Differential Probability, searched exhaustively with `config.workers()` workers.
    ///
    /// The search itself only reads the truth table. The result does not depend on the worker count.
    ///
    /// # Example
    /// ```rust
    /// use vectorial_boolean_function::{DifferentialSearchConfig, PolynomialOverF2, VectorialBooleanFunction, VectorialBooleanFunctionImpl};
    ///
    /// // x^3 over GF(2^3) is almost perfect nonlinear
    /// let mut cube = VectorialBooleanFunction::new(3, PolynomialOverF2::new(0b1011)).unwrap();
    /// cube.create_truth_table().unwrap();
    /// cube.create_anf_table().unwrap();
    /// cube.create_walsh_spectrum_table().unwrap();
    /// let mdp = cube.maximum_differential_probability(&DifferentialSearchConfig::new(4).unwrap()).unwrap();
    /// assert_eq!(mdp.max_count(), 2);
    /// assert_eq!(mdp.value(), 0.25);
    /// ```
    fn maximum_differential_probability(
        &self,
        config: &DifferentialSearchConfig,
    ) -> Result<DifferentialProbability, AnalysisError> {
        self.ensure_tables_populated()?;
        differential::maximum_differential_probability(self.truth_table(), config)
    }
}
