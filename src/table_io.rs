//! Tab-separated text persistence of the analysis tables.
//!
//! Every line holds one row, `index<TAB>value`. Walsh spectrum rows hold one value per output coordinate,
//! `frequency<TAB>W_0(frequency)<TAB>W_1(frequency)...`. Readers skip blank lines and a leading UTF-8 byte order mark,
//! the rows they return are meant for the `load_*` methods of [VectorialBooleanFunction](crate::VectorialBooleanFunction),
//! which check their order and length.
//!
//! # Example
//! ```rust
//! use vectorial_boolean_function::{table_io, PolynomialOverF2, VectorialBooleanFunction, VectorialBooleanFunctionImpl};
//!
//! let mut cube = VectorialBooleanFunction::new(3, PolynomialOverF2::new(0b1011)).unwrap();
//! cube.create_truth_table().unwrap();
//!
//! let mut stored = Vec::new();
//! table_io::write_truth_table(&mut stored, cube.truth_table()).unwrap();
//!
//! let mut loaded = VectorialBooleanFunction::new(3, PolynomialOverF2::new(0b1011)).unwrap();
//! loaded.load_truth_table(table_io::read_truth_table(stored.as_slice()).unwrap()).unwrap();
//! assert_eq!(loaded.truth_table(), cube.truth_table());
//! ```

use crate::{AnalysisError, TableKind};
use itertools::Itertools;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reads `(input, output)` truth table rows.
pub fn read_truth_table<R: BufRead>(reader: R) -> Result<Vec<(usize, u32)>, AnalysisError> {
    read_single_value_rows(reader, TableKind::TruthTable)
}

/// Reads `(monomial, coefficients)` ANF table rows.
pub fn read_anf_table<R: BufRead>(reader: R) -> Result<Vec<(usize, u32)>, AnalysisError> {
    read_single_value_rows(reader, TableKind::AnfTable)
}

/// Reads `(frequency, coefficients)` Walsh spectrum table rows, with one coefficient per output coordinate.
///
/// Column counts are not checked here, the loader compares them with the field extension.
pub fn read_walsh_spectrum_table<R: BufRead>(
    reader: R,
) -> Result<Vec<(usize, Vec<i32>)>, AnalysisError> {
    read_rows(reader, TableKind::WalshSpectrumTable)
}

/// Writes a truth table, one `input<TAB>output` row per entry.
pub fn write_truth_table<W: Write>(writer: W, truth_table: &[u32]) -> Result<(), AnalysisError> {
    write_single_value_rows(writer, truth_table, TableKind::TruthTable)
}

/// Writes an ANF table, one `monomial<TAB>coefficients` row per entry.
pub fn write_anf_table<W: Write>(writer: W, anf_table: &[u32]) -> Result<(), AnalysisError> {
    write_single_value_rows(writer, anf_table, TableKind::AnfTable)
}

/// Writes a Walsh spectrum table given as one spectrum per output coordinate,
/// transposed into one row per frequency.
pub fn write_walsh_spectrum_table<W: Write>(
    mut writer: W,
    walsh_spectrum_table: &[Vec<i32>],
) -> Result<(), AnalysisError> {
    const KIND: TableKind = TableKind::WalshSpectrumTable;
    let rows_count = walsh_spectrum_table.first().map(Vec::len).unwrap_or(0);
    for frequency in 0..rows_count {
        let coefficients = walsh_spectrum_table
            .iter()
            .map(|spectrum| spectrum[frequency])
            .join("\t");
        writeln!(writer, "{}\t{}", frequency, coefficients).map_err(|error| io_error(KIND, error))?;
    }
    writer.flush().map_err(|error| io_error(KIND, error))
}

fn read_single_value_rows<R: BufRead>(
    reader: R,
    kind: TableKind,
) -> Result<Vec<(usize, u32)>, AnalysisError> {
    read_rows::<R, u32>(reader, kind)?
        .into_iter()
        .map(|(index, values)| match values.as_slice() {
            [value] => Ok((index, *value)),
            _ => Err(AnalysisError::InvalidColumnCount {
                kind,
                index,
                actual: values.len(),
                expected: 1,
            }),
        })
        .collect()
}

fn read_rows<R, T>(reader: R, kind: TableKind) -> Result<Vec<(usize, Vec<T>)>, AnalysisError>
where
    R: BufRead,
    T: FromStr,
    T::Err: Display,
{
    let mut rows = Vec::new();
    for (line_index, line) in reader.lines().enumerate() {
        let line = line.map_err(|error| io_error(kind, error))?;
        let line = match line_index {
            0 => line.trim_start_matches(BYTE_ORDER_MARK),
            _ => line.as_str(),
        }
        .trim();
        if line.is_empty() {
            continue;
        }
        let parse_error = |reason: String| AnalysisError::TableParseError {
            kind,
            line: line_index + 1,
            reason,
        };
        let mut fields = line.split('\t').map(str::trim);
        let index = fields
            .next()
            .unwrap_or_default()
            .parse::<usize>()
            .map_err(|error| parse_error(format!("invalid index: {}", error)))?;
        let values = fields
            .map(|field| {
                field
                    .parse::<T>()
                    .map_err(|error| parse_error(format!("invalid value {:?}: {}", field, error)))
            })
            .collect::<Result<Vec<T>, AnalysisError>>()?;
        if values.is_empty() {
            return Err(parse_error(String::from("missing value")));
        }
        rows.push((index, values));
    }
    Ok(rows)
}

fn write_single_value_rows<W: Write>(
    mut writer: W,
    table: &[u32],
    kind: TableKind,
) -> Result<(), AnalysisError> {
    for (index, value) in table.iter().enumerate() {
        writeln!(writer, "{}\t{}", index, value).map_err(|error| io_error(kind, error))?;
    }
    writer.flush().map_err(|error| io_error(kind, error))
}

fn io_error(kind: TableKind, error: std::io::Error) -> AnalysisError {
    AnalysisError::TableIoError {
        kind,
        reason: error.to_string(),
    }
}
