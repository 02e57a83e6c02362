use itertools::Itertools;
use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt::Display;

const MAX_SMALL_VARIABLES_COUNT: usize = 6;

#[derive(Debug, Clone, Eq, PartialEq)]
enum PolynomialFormat {
    Small(u64),
    Big(BigUint),
}

/// Algebraic Normal Form of one output coordinate of a vectorial Boolean function.
///
/// Bit $u$ of the polynomial is set when the monomial $\prod_{i \in u} x_i$ is present.
/// Functions with 6 or fewer variables are stored in an `u64`, bigger ones in a `BigUint`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AnfPolynomial {
    polynomial: PolynomialFormat,
    num_variables: usize,
}

impl AnfPolynomial {
    /// Extracts output coordinate `coordinate` from a vectorial ANF table of length $2^{num\\_variables}$.
    pub(crate) fn from_anf_table_coordinate(
        anf_table: &[u32],
        coordinate: usize,
        num_variables: usize,
    ) -> Self {
        let monomials = anf_table
            .iter()
            .enumerate()
            .filter(|(_, coefficients)| (*coefficients >> coordinate) & 1 == 1)
            .map(|(monomial, _)| monomial);
        let polynomial = if num_variables <= MAX_SMALL_VARIABLES_COUNT {
            PolynomialFormat::Small(monomials.fold(0u64, |acc, monomial| acc | (1 << monomial)))
        } else {
            let mut big = BigUint::zero();
            monomials.for_each(|monomial| big.set_bit(monomial as u64, true));
            PolynomialFormat::Big(big)
        };
        AnfPolynomial {
            polynomial,
            num_variables,
        }
    }

    /// Number of input variables.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Polynomial bits as `u64`, `None` if the function has more than 6 variables.
    pub fn get_polynomial_small(&self) -> Option<u64> {
        match self.polynomial {
            PolynomialFormat::Small(p) => Some(p),
            PolynomialFormat::Big(_) => None,
        }
    }

    /// Polynomial bits as `BigUint`.
    pub fn get_polynomial_big(&self) -> BigUint {
        match &self.polynomial {
            PolynomialFormat::Small(p) => BigUint::from(*p),
            PolynomialFormat::Big(p) => p.clone(),
        }
    }

    /// Returns `true` if a monomial is present.
    ///
    /// `monomial` is read as a set of variables, bit $i$ standing for $x_i$.
    pub fn has_monomial(&self, monomial: u32) -> bool {
        match &self.polynomial {
            PolynomialFormat::Small(p) => monomial < u64::BITS && p & (1 << monomial) != 0,
            PolynomialFormat::Big(p) => p.bit(monomial as u64),
        }
    }

    /// Degree of the polynomial, ie the largest variable count among its monomials.
    pub fn get_degree(&self) -> usize {
        let max_monomial: u32 = (1 << self.num_variables) - 1;
        (0..=max_monomial)
            .filter(|monomial| self.has_monomial(*monomial))
            .map(|monomial| monomial.count_ones() as usize)
            .max()
            .unwrap_or(0)
    }

    /// Monomial and number of variables in the monomial
    fn bit_monomial_to_string(&self, monomial: u32) -> (String, usize) {
        if monomial == 0 {
            return (String::from("1"), 0);
        }
        let variables: Vec<String> = (0..self.num_variables)
            .filter(|i| monomial & (1 << i) != 0)
            .map(|i| format!("x{}", i))
            .collect();
        (variables.join("*"), variables.len())
    }
}

impl Display for AnfPolynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let max_monomial: u32 = (1 << self.num_variables) - 1;
        let mut monomials: Vec<(String, usize)> = (0..=max_monomial)
            .filter(|monomial| self.has_monomial(*monomial))
            .map(|monomial| self.bit_monomial_to_string(monomial))
            .collect();
        if monomials.is_empty() {
            return write!(f, "0");
        }
        monomials.sort_by(|a, b| b.1.cmp(&a.1));
        write!(f, "{}", monomials.iter().map(|(monomial, _)| monomial).join(" + "))
    }
}

impl From<&AnfPolynomial> for BigUint {
    fn from(value: &AnfPolynomial) -> Self {
        value.get_polynomial_big()
    }
}
