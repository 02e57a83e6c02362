use std::fmt::{Display, Formatter};
use thiserror::Error;

/// The three tables held by a [crate::VectorialBooleanFunction].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Values $f(x)$ indexed by input $x$.
    TruthTable,
    /// Algebraic Normal Form coefficients indexed by monomial.
    AnfTable,
    /// Walsh coefficients, one column per output coordinate.
    WalshSpectrumTable,
}

impl Display for TableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::TruthTable => write!(f, "truth table"),
            TableKind::AnfTable => write!(f, "ANF table"),
            TableKind::WalshSpectrumTable => write!(f, "Walsh spectrum table"),
        }
    }
}

/// Coarse classification of an [AnalysisError].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An operand or loaded value is malformed.
    InvalidArgument,
    /// A required table is missing, or a table was populated twice.
    PreconditionError,
    /// The operation has no defined semantics.
    Unsupported,
    /// The parallel differential search could not run.
    WorkerFailure,
    /// Reading or writing a persisted table failed.
    Io,
}

/// Errors returned by the analysis library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Reduction modulo the zero polynomial.
    #[error("Modulus polynomial must not be zero")]
    ZeroModulus,
    /// Carry-less product does not fit in the polynomial representation.
    #[error("Polynomial product degree {0} exceeds maximum degree {1}")]
    PolynomialDegreeOverflow(u32, u32),
    /// Generator degree is not a supported field extension.
    #[error("Field extension must be in 1..={max}, got {actual}")]
    InvalidFieldExtension {
        /// Degree of the rejected generator.
        actual: usize,
        /// Largest supported field extension.
        max: usize,
    },
    /// Output coordinate index is not below the field extension.
    #[error("Too big output coordinate {0}, must be < {1}")]
    CoordinateOutOfRange(usize, usize),
    /// Transform input or loaded table has the wrong length.
    #[error("Invalid {kind} length {actual}, expected {expected}")]
    InvalidTableLength {
        /// Table being built.
        kind: TableKind,
        /// Length received.
        actual: usize,
        /// Length required.
        expected: usize,
    },
    /// Loaded rows are not in index order.
    #[error("Invalid {kind} index {actual} at row {row}, rows must be in index order")]
    InvalidTableIndex {
        /// Table being loaded.
        kind: TableKind,
        /// Zero-based row position.
        row: usize,
        /// Index found on that row.
        actual: usize,
    },
    /// Loaded value is out of the range allowed for its table.
    #[error("Invalid {kind} value {value} at index {index}")]
    InvalidTableValue {
        /// Table being loaded.
        kind: TableKind,
        /// Index of the offending value.
        index: usize,
        /// Offending value.
        value: i64,
    },
    /// Loaded Walsh row does not carry one column per output coordinate.
    #[error("Invalid {kind} column count {actual} at index {index}, expected {expected}")]
    InvalidColumnCount {
        /// Table being loaded.
        kind: TableKind,
        /// Index of the offending row.
        index: usize,
        /// Columns found.
        actual: usize,
        /// Columns required.
        expected: usize,
    },
    /// A persisted row could not be parsed.
    #[error("Cannot parse {kind} line {line}: {reason}")]
    TableParseError {
        /// Table being read.
        kind: TableKind,
        /// One-based line number.
        line: usize,
        /// Parser message.
        reason: String,
    },
    /// Reading or writing a persisted table failed.
    #[error("I/O error on {kind}: {reason}")]
    TableIoError {
        /// Table being read or written.
        kind: TableKind,
        /// Underlying I/O error message.
        reason: String,
    },
    /// A required table has not been populated yet.
    #[error("{0} is empty, load it or create it first")]
    EmptyTable(TableKind),
    /// A table was populated a second time.
    #[error("{0} is already populated")]
    TableAlreadyPopulated(TableKind),
    /// Rate distribution error vectors do not match the field extension.
    #[error("Rate distribution error shape does not match field extension {0}")]
    RateDistributionErrorShape(usize),
    /// Polynomial division is not defined by this library.
    #[error("Division is not supported for polynomials over GF(2)")]
    DivisionUnsupported,
    /// Differential search needs at least one worker.
    #[error("Differential search worker count must be >= 1")]
    InvalidWorkerCount,
    /// The differential search thread pool could not be created.
    #[error("Differential search worker pool failed: {0}")]
    WorkerPoolFailure(String),
}

impl AnalysisError {
    /// Returns the [ErrorKind] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::EmptyTable(_) | AnalysisError::TableAlreadyPopulated(_) => {
                ErrorKind::PreconditionError
            }
            AnalysisError::DivisionUnsupported => ErrorKind::Unsupported,
            AnalysisError::WorkerPoolFailure(_) => ErrorKind::WorkerFailure,
            AnalysisError::TableIoError { .. } => ErrorKind::Io,
            _ => ErrorKind::InvalidArgument,
        }
    }
}
