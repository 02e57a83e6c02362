use crate::utils::fast_binary_dot_product;
use crate::AnalysisError;
use itertools::Itertools;
use std::fmt::Display;
use std::ops::{Add, AddAssign, Mul, Rem, Shl, Shr, Sub};

/// Maximum degree a [PolynomialOverF2] can hold.
pub const MAX_POLYNOMIAL_DEGREE: u32 = u64::BITS - 1;

/// Polynomial with coefficients in GF(2), stored as a 64-bit vector.
///
/// Bit $i$ is the coefficient of $x^i$, so `0b1011` is $x^3 + x + 1$.
///
/// # Example
/// ```rust
/// use vectorial_boolean_function::PolynomialOverF2;
///
/// let modulus = PolynomialOverF2::new(0b1011); // x^3 + x + 1
/// let x = PolynomialOverF2::new(0b10);
/// assert_eq!(x.power(3, &modulus).unwrap(), PolynomialOverF2::new(0b11));
/// assert_eq!(modulus.to_string(), "x^3 + x + 1");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PolynomialOverF2 {
    coefficients: u64,
}

impl PolynomialOverF2 {
    /// Creates a polynomial from its coefficient bit vector.
    pub const fn new(coefficients: u64) -> Self {
        PolynomialOverF2 { coefficients }
    }

    /// The zero polynomial.
    pub const fn zero() -> Self {
        Self::new(0)
    }

    /// The constant polynomial $1$.
    pub const fn one() -> Self {
        Self::new(1)
    }

    /// Coefficient bit vector, which is also the integer value of the field element.
    pub const fn coefficients(&self) -> u64 {
        self.coefficients
    }

    /// Returns `true` for the zero polynomial.
    pub const fn is_zero(&self) -> bool {
        self.coefficients == 0
    }

    /// Degree of the polynomial, `None` for the zero polynomial.
    pub const fn degree(&self) -> Option<u32> {
        degree_of(self.coefficients)
    }

    /// Number of non-zero coefficients.
    pub const fn weight(&self) -> u32 {
        self.coefficients.count_ones()
    }

    /// Coefficient of $x^i$, `false` beyond the representation width.
    pub fn coefficient(&self, i: u32) -> bool {
        i <= MAX_POLYNOMIAL_DEGREE && self.coefficients & (1 << i) != 0
    }

    /// Coefficients from $x^0$ upwards, padded with zeros up to `min_len` entries.
    pub fn to_coefficient_vector(&self, min_len: usize) -> Vec<bool> {
        let len = self
            .degree()
            .map(|d| d as usize + 1)
            .unwrap_or(0)
            .max(min_len);
        (0..len).map(|i| self.coefficient(i as u32)).collect()
    }

    /// GF(2) inner product of the coefficient vectors.
    pub fn scalar_product(&self, other: &Self) -> bool {
        fast_binary_dot_product(self.coefficients, other.coefficients) & 1 == 1
    }

    /// Evaluates the polynomial at a point of GF(2).
    pub fn evaluate(&self, x: bool) -> bool {
        if x {
            self.weight() & 1 == 1
        } else {
            self.coefficient(0)
        }
    }

    /// Carry-less product.
    ///
    /// # Returns
    /// The product, or [AnalysisError::PolynomialDegreeOverflow] if its degree exceeds [MAX_POLYNOMIAL_DEGREE].
    pub fn checked_mul(&self, other: &Self) -> Result<Self, AnalysisError> {
        let (Some(self_degree), Some(other_degree)) = (self.degree(), other.degree()) else {
            return Ok(Self::zero());
        };
        if self_degree + other_degree > MAX_POLYNOMIAL_DEGREE {
            return Err(AnalysisError::PolynomialDegreeOverflow(
                self_degree + other_degree,
                MAX_POLYNOMIAL_DEGREE,
            ));
        }
        let mut product = 0u64;
        let mut remaining = other.coefficients;
        while remaining != 0 {
            product ^= self.coefficients << remaining.trailing_zeros();
            remaining &= remaining - 1;
        }
        Ok(Self::new(product))
    }

    /// Remainder of the division by `modulus`, of degree strictly lower than the modulus degree.
    ///
    /// # Returns
    /// The remainder, or [AnalysisError::ZeroModulus] if `modulus` is zero.
    pub fn reduce(&self, modulus: &Self) -> Result<Self, AnalysisError> {
        let modulus_degree = modulus.degree().ok_or(AnalysisError::ZeroModulus)?;
        let mut remainder = self.coefficients;
        while let Some(degree) = degree_of(remainder).filter(|d| *d >= modulus_degree) {
            remainder ^= modulus.coefficients << (degree - modulus_degree);
        }
        Ok(Self::new(remainder))
    }

    /// Computes $self^{exponent} \bmod modulus$ by square-and-multiply.
    ///
    /// Every intermediate product is reduced, so the method only fails if the modulus is zero
    /// or has a degree above 32 and two reduced operands overflow the representation.
    pub fn power(&self, exponent: u64, modulus: &Self) -> Result<Self, AnalysisError> {
        let mut result = Self::one().reduce(modulus)?;
        let mut base = self.reduce(modulus)?;
        let mut exponent = exponent;
        while exponent != 0 {
            if exponent & 1 == 1 {
                result = result.checked_mul(&base)?.reduce(modulus)?;
            }
            exponent >>= 1;
            if exponent != 0 {
                base = base.checked_mul(&base)?.reduce(modulus)?;
            }
        }
        Ok(result)
    }

    /// Polynomial division, not supported.
    ///
    /// # Returns
    /// Always [AnalysisError::DivisionUnsupported].
    pub fn checked_div(&self, _divisor: &Self) -> Result<Self, AnalysisError> {
        Err(AnalysisError::DivisionUnsupported)
    }
}

const fn degree_of(coefficients: u64) -> Option<u32> {
    if coefficients == 0 {
        None
    } else {
        Some(MAX_POLYNOMIAL_DEGREE - coefficients.leading_zeros())
    }
}

impl From<u64> for PolynomialOverF2 {
    fn from(coefficients: u64) -> Self {
        Self::new(coefficients)
    }
}

/// Addition in GF(2)\[x\], which is XOR.
impl Add for PolynomialOverF2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.coefficients ^ rhs.coefficients)
    }
}

impl AddAssign for PolynomialOverF2 {
    fn add_assign(&mut self, rhs: Self) {
        self.coefficients ^= rhs.coefficients;
    }
}

/// Subtraction is the same as addition in characteristic 2.
impl Sub for PolynomialOverF2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + rhs
    }
}

/// Carry-less multiplication.
///
/// # Panics
/// If the product degree exceeds [MAX_POLYNOMIAL_DEGREE], use [PolynomialOverF2::checked_mul] to get an error instead.
impl Mul for PolynomialOverF2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        match self.checked_mul(&rhs) {
            Ok(product) => product,
            Err(error) => panic!("{}", error),
        }
    }
}

/// Modular reduction.
///
/// # Panics
/// If the modulus is zero, use [PolynomialOverF2::reduce] to get an error instead.
impl Rem for PolynomialOverF2 {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self::Output {
        match self.reduce(&rhs) {
            Ok(remainder) => remainder,
            Err(error) => panic!("{}", error),
        }
    }
}

/// Multiplication by $x^{rhs}$, coefficients shifted past [MAX_POLYNOMIAL_DEGREE] are dropped.
impl Shl<u32> for PolynomialOverF2 {
    type Output = Self;

    fn shl(self, rhs: u32) -> Self::Output {
        Self::new(self.coefficients.checked_shl(rhs).unwrap_or(0))
    }
}

/// Division by $x^{rhs}$, discarding the remainder.
impl Shr<u32> for PolynomialOverF2 {
    type Output = Self;

    fn shr(self, rhs: u32) -> Self::Output {
        Self::new(self.coefficients.checked_shr(rhs).unwrap_or(0))
    }
}

impl Display for PolynomialOverF2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(degree) = self.degree() else {
            return write!(f, "0");
        };
        let monomials = (0..=degree)
            .rev()
            .filter(|i| self.coefficient(*i))
            .map(|i| match i {
                0 => String::from("1"),
                1 => String::from("x"),
                _ => format!("x^{}", i),
            })
            .join(" + ");
        write!(f, "{}", monomials)
    }
}
