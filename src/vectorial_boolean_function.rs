use crate::anf_transform::mobius_butterflies;
use crate::walsh_transform::walsh_spectrum_table;
use crate::{AnalysisError, PolynomialOverF2, TableKind, VectorialBooleanFunctionImpl};
use hackfn::hackfn;
use tracing::{debug, instrument};

/// Largest supported field extension $n$, so that every table fits in memory and every Walsh value in an `i32`.
pub const MAX_FIELD_EXTENSION: usize = 30;

/// Power function $F(x) = x^{power}$ over $GF(2^n) = GF(2)[x] / (generator)$, and its analysis tables.
///
/// The three tables start empty. Each one is populated exactly once, either by its `create_*` method
/// or by its `load_*` method, and is never modified afterwards. Metrics are computed through the
/// [VectorialBooleanFunctionImpl] trait.
///
/// # Example
/// ```rust
/// use vectorial_boolean_function::{PolynomialOverF2, VectorialBooleanFunction, VectorialBooleanFunctionImpl};
///
/// // x^3 over GF(2^3) with modulus x^3 + x + 1
/// let mut cube = VectorialBooleanFunction::new(3, PolynomialOverF2::new(0b1011)).unwrap();
/// cube.create_truth_table().unwrap();
/// assert_eq!(cube.truth_table(), &[0, 1, 3, 4, 5, 6, 7, 2]);
///
/// // Direct evaluation, also available as call syntax
/// let x = PolynomialOverF2::new(0b10);
/// assert_eq!(cube.evaluate(x).unwrap(), PolynomialOverF2::new(0b11));
/// assert_eq!(cube(x).unwrap(), PolynomialOverF2::new(0b11));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorialBooleanFunction {
    power: u64,
    generator: PolynomialOverF2,
    field_extension: usize,
    truth_table: Vec<u32>,
    anf_table: Vec<u32>,
    walsh_spectrum_table: Vec<Vec<i32>>,
}

#[hackfn]
impl VectorialBooleanFunction {
    fn call(&self, element: PolynomialOverF2) -> Result<PolynomialOverF2, AnalysisError> {
        self.evaluate(element)
    }
}

impl VectorialBooleanFunction {
    /// Creates the function $x^{power}$ over the field defined by `generator`, with empty tables.
    ///
    /// The generator is expected to be irreducible, this is not checked.
    ///
    /// # Returns
    /// An error if the generator is zero, or if its degree is not in $[1, 30]$.
    pub fn new(power: u64, generator: PolynomialOverF2) -> Result<Self, AnalysisError> {
        let field_extension = generator.degree().ok_or(AnalysisError::ZeroModulus)? as usize;
        if field_extension == 0 || field_extension > MAX_FIELD_EXTENSION {
            return Err(AnalysisError::InvalidFieldExtension {
                actual: field_extension,
                max: MAX_FIELD_EXTENSION,
            });
        }
        Ok(VectorialBooleanFunction {
            power,
            generator,
            field_extension,
            truth_table: Vec::new(),
            anf_table: Vec::new(),
            walsh_spectrum_table: Vec::new(),
        })
    }

    /// Exponent of the power function.
    pub fn power(&self) -> u64 {
        self.power
    }

    /// Modulus polynomial defining the field.
    pub fn generator(&self) -> PolynomialOverF2 {
        self.generator
    }

    /// Computes $element^{power} \bmod generator$.
    pub fn evaluate(&self, element: PolynomialOverF2) -> Result<PolynomialOverF2, AnalysisError> {
        element.power(self.power, &self.generator)
    }

    /// Evaluates the function on every field element.
    ///
    /// # Returns
    /// An error if the truth table is already populated.
    #[instrument(
        level = "debug",
        skip(self),
        fields(power = self.power, field_extension = self.field_extension)
    )]
    pub fn create_truth_table(&mut self) -> Result<(), AnalysisError> {
        ensure_empty(self.truth_table.is_empty(), TableKind::TruthTable)?;
        let truth_table = (0..self.field_size() as u64)
            .map(|x| {
                self.evaluate(PolynomialOverF2::new(x))
                    .map(|y| y.coefficients() as u32) // degree < n <= 30
            })
            .collect::<Result<Vec<u32>, AnalysisError>>()?;
        self.truth_table = truth_table;
        debug!("truth table created");
        Ok(())
    }

    /// Computes the Algebraic Normal Form table with the [Möbius transform](crate::fast_mobius_transform).
    ///
    /// # Returns
    /// An error if the truth table is empty, or if the ANF table is already populated.
    #[instrument(level = "debug", skip(self), fields(field_extension = self.field_extension))]
    pub fn create_anf_table(&mut self) -> Result<(), AnalysisError> {
        ensure_populated(!self.truth_table.is_empty(), TableKind::TruthTable)?;
        ensure_empty(self.anf_table.is_empty(), TableKind::AnfTable)?;
        let mut anf_table = self.truth_table.clone();
        mobius_butterflies(&mut anf_table, self.field_extension);
        self.anf_table = anf_table;
        debug!("ANF table created");
        Ok(())
    }

    /// Computes the Walsh spectrum of every output coordinate with the [Fast Walsh-Hadamard Transform](crate::fast_walsh_hadamard_transform).
    ///
    /// # Returns
    /// An error if the truth table is empty, or if the Walsh spectrum table is already populated.
    #[instrument(level = "debug", skip(self), fields(field_extension = self.field_extension))]
    pub fn create_walsh_spectrum_table(&mut self) -> Result<(), AnalysisError> {
        ensure_populated(!self.truth_table.is_empty(), TableKind::TruthTable)?;
        ensure_empty(self.walsh_spectrum_table.is_empty(), TableKind::WalshSpectrumTable)?;
        self.walsh_spectrum_table = walsh_spectrum_table(&self.truth_table, self.field_extension);
        debug!("Walsh spectrum table created");
        Ok(())
    }

    /// Populates the truth table from `(index, value)` rows, given in index order.
    ///
    /// # Returns
    /// An error if the table is already populated, if the rows are out of order, if there are not exactly $2^n$ rows,
    /// or if a value is not in $[0, 2^n)$ and the `unsafe_disable_safety_checks` feature is not enabled.
    pub fn load_truth_table<I>(&mut self, rows: I) -> Result<(), AnalysisError>
    where
        I: IntoIterator<Item = (usize, u32)>,
    {
        ensure_empty(self.truth_table.is_empty(), TableKind::TruthTable)?;
        self.truth_table = self.collect_rows(rows, TableKind::TruthTable)?;
        Ok(())
    }

    /// Populates the ANF table from `(monomial, coefficients)` rows, given in index order.
    ///
    /// The rows are not checked to be the Möbius transform of the truth table.
    ///
    /// # Returns
    /// Same errors as [VectorialBooleanFunction::load_truth_table].
    pub fn load_anf_table<I>(&mut self, rows: I) -> Result<(), AnalysisError>
    where
        I: IntoIterator<Item = (usize, u32)>,
    {
        ensure_empty(self.anf_table.is_empty(), TableKind::AnfTable)?;
        self.anf_table = self.collect_rows(rows, TableKind::AnfTable)?;
        Ok(())
    }

    /// Populates the Walsh spectrum table from `(frequency, coefficients)` rows, given in index order,
    /// each row holding one coefficient per output coordinate.
    ///
    /// # Returns
    /// An error if the table is already populated, if the rows are out of order, if there are not exactly $2^n$ rows,
    /// if a row has not exactly $n$ columns, or if a value is not in $[-2^n, 2^n]$
    /// and the `unsafe_disable_safety_checks` feature is not enabled.
    pub fn load_walsh_spectrum_table<I>(&mut self, rows: I) -> Result<(), AnalysisError>
    where
        I: IntoIterator<Item = (usize, Vec<i32>)>,
    {
        const KIND: TableKind = TableKind::WalshSpectrumTable;
        ensure_empty(self.walsh_spectrum_table.is_empty(), KIND)?;
        let field_size = self.field_size();
        let mut columns: Vec<Vec<i32>> = vec![Vec::with_capacity(field_size); self.field_extension];
        for (row, (index, coefficients)) in rows.into_iter().enumerate() {
            check_row_index(KIND, row, index, field_size)?;
            if coefficients.len() != self.field_extension {
                return Err(AnalysisError::InvalidColumnCount {
                    kind: KIND,
                    index,
                    actual: coefficients.len(),
                    expected: self.field_extension,
                });
            }
            for (column, coefficient) in columns.iter_mut().zip(coefficients) {
                #[cfg(not(feature = "unsafe_disable_safety_checks"))]
                if coefficient.unsigned_abs() as usize > field_size {
                    return Err(AnalysisError::InvalidTableValue {
                        kind: KIND,
                        index,
                        value: coefficient as i64,
                    });
                }
                column.push(coefficient);
            }
        }
        let loaded_rows = columns.first().map(Vec::len).unwrap_or(0);
        check_table_length(KIND, loaded_rows, field_size)?;
        self.walsh_spectrum_table = columns;
        Ok(())
    }

    fn collect_rows<I>(&self, rows: I, kind: TableKind) -> Result<Vec<u32>, AnalysisError>
    where
        I: IntoIterator<Item = (usize, u32)>,
    {
        let field_size = self.field_size();
        let mut table = Vec::with_capacity(field_size);
        for (row, (index, value)) in rows.into_iter().enumerate() {
            check_row_index(kind, row, index, field_size)?;
            #[cfg(not(feature = "unsafe_disable_safety_checks"))]
            if value as usize >= field_size {
                return Err(AnalysisError::InvalidTableValue {
                    kind,
                    index,
                    value: value as i64,
                });
            }
            table.push(value);
        }
        check_table_length(kind, table.len(), field_size)?;
        Ok(table)
    }
}

impl VectorialBooleanFunctionImpl for VectorialBooleanFunction {
    #[inline]
    fn field_extension(&self) -> usize {
        self.field_extension
    }

    fn truth_table(&self) -> &[u32] {
        &self.truth_table
    }

    fn anf_table(&self) -> &[u32] {
        &self.anf_table
    }

    fn walsh_spectrum_table(&self) -> &[Vec<i32>] {
        &self.walsh_spectrum_table
    }
}

fn ensure_empty(is_empty: bool, kind: TableKind) -> Result<(), AnalysisError> {
    if !is_empty {
        return Err(AnalysisError::TableAlreadyPopulated(kind));
    }
    Ok(())
}

fn ensure_populated(is_populated: bool, kind: TableKind) -> Result<(), AnalysisError> {
    if !is_populated {
        return Err(AnalysisError::EmptyTable(kind));
    }
    Ok(())
}

fn check_row_index(
    kind: TableKind,
    row: usize,
    index: usize,
    field_size: usize,
) -> Result<(), AnalysisError> {
    if index != row {
        return Err(AnalysisError::InvalidTableIndex {
            kind,
            row,
            actual: index,
        });
    }
    if row >= field_size {
        return Err(AnalysisError::InvalidTableLength {
            kind,
            actual: row + 1,
            expected: field_size,
        });
    }
    Ok(())
}

fn check_table_length(
    kind: TableKind,
    actual: usize,
    expected: usize,
) -> Result<(), AnalysisError> {
    if actual != expected {
        return Err(AnalysisError::InvalidTableLength {
            kind,
            actual,
            expected,
        });
    }
    Ok(())
}
