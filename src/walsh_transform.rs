use crate::utils::variables_count_for_length;
use crate::{AnalysisError, TableKind};

/// In-place Fast Walsh-Hadamard Transform of a signed sequence of length $2^n$.
///
/// Each butterfly replaces the pair $(A, B)$ with $(A + B, A - B)$.
/// Starting from the $\pm 1$ form $(-1)^{f(x)}$ of a Boolean function $f$,
/// the result at index $a$ is the Walsh coefficient
///
/// $$W_f(a) = \sum_{x=0}^{2^n-1} (-1)^{f(x) \oplus a \cdot x}$$
///
/// # Returns
/// An error if the length is not a power of two.
///
/// # Example
/// ```rust
/// use vectorial_boolean_function::fast_walsh_hadamard_transform;
///
/// // f(x0, x1) = x0
/// let mut values = vec![1, -1, 1, -1];
/// fast_walsh_hadamard_transform(&mut values).unwrap();
/// assert_eq!(values, vec![0, 4, 0, 0]);
/// ```
pub fn fast_walsh_hadamard_transform(values: &mut [i32]) -> Result<(), AnalysisError> {
    let variables_count = variables_count_for_length(values.len()).ok_or(
        AnalysisError::InvalidTableLength {
            kind: TableKind::WalshSpectrumTable,
            actual: values.len(),
            expected: values.len().next_power_of_two(),
        },
    )?;
    hadamard_butterflies(values, variables_count);
    Ok(())
}

fn hadamard_butterflies(values: &mut [i32], variables_count: usize) {
    for step in (0..variables_count).map(|i| 1usize << i) {
        for block in values.chunks_exact_mut(step << 1) {
            let (low, high) = block.split_at_mut(step);
            for (a, b) in low.iter_mut().zip(high.iter_mut()) {
                let (sum, difference) = (*a + *b, *a - *b);
                *a = sum;
                *b = difference;
            }
        }
    }
}

/// Walsh spectrum of output coordinate `coordinate` of a vectorial truth table.
pub(crate) fn coordinate_walsh_spectrum(
    truth_table: &[u32],
    coordinate: usize,
    variables_count: usize,
) -> Vec<i32> {
    let mut spectrum: Vec<i32> = truth_table
        .iter()
        .map(|y| if (y >> coordinate) & 1 == 0 { 1 } else { -1 })
        .collect();
    hadamard_butterflies(&mut spectrum, variables_count);
    spectrum
}

/// One Walsh spectrum per output coordinate.
pub(crate) fn walsh_spectrum_table(truth_table: &[u32], field_extension: usize) -> Vec<Vec<i32>> {
    (0..field_extension)
        .map(|coordinate| coordinate_walsh_spectrum(truth_table, coordinate, field_extension))
        .collect()
}
