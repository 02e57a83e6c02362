use crate::utils::variables_count_for_length;
use crate::{AnalysisError, TableKind};

/// In-place Möbius transform of a vectorial truth table, giving its Algebraic Normal Form.
///
/// Index $u$ of the output is read as a monomial (bit $i$ set means $x_i$ is present),
/// and bit $f$ of the value is the coefficient of that monomial in output coordinate $f$.
/// The transform is an involution, applying it twice gives back the input.
///
/// # Parameters
/// - `values`: Truth table of length $2^n$, transformed in place.
///
/// # Returns
/// An error if the length is not a power of two.
///
/// # Example
/// ```rust
/// use vectorial_boolean_function::fast_mobius_transform;
///
/// // f(x0, x1) = x0 * x1 on output bit 0
/// let mut table = vec![0, 0, 0, 1];
/// fast_mobius_transform(&mut table).unwrap();
/// assert_eq!(table, vec![0, 0, 0, 1]);
///
/// // f(x0, x1) = x0 | x1 = x0 + x1 + x0 * x1
/// let mut table = vec![0, 1, 1, 1];
/// fast_mobius_transform(&mut table).unwrap();
/// assert_eq!(table, vec![0, 1, 1, 1]);
/// ```
pub fn fast_mobius_transform(values: &mut [u32]) -> Result<(), AnalysisError> {
    let variables_count = variables_count_for_length(values.len()).ok_or(
        AnalysisError::InvalidTableLength {
            kind: TableKind::AnfTable,
            actual: values.len(),
            expected: values.len().next_power_of_two(),
        },
    )?;
    mobius_butterflies(values, variables_count);
    Ok(())
}

/// Bakoev-style butterflies: for each variable, the upper half of every block absorbs the lower half.
pub(crate) fn mobius_butterflies(values: &mut [u32], variables_count: usize) {
    for step in (0..variables_count).map(|i| 1usize << i) {
        for block in values.chunks_exact_mut(step << 1) {
            let (low, high) = block.split_at_mut(step);
            high.iter_mut()
                .zip(low.iter())
                .for_each(|(upper, lower)| *upper ^= *lower);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fast_boolean_anf_transform::fast_bool_anf_transform_unsigned;

    #[test]
    fn test_fast_mobius_transform() {
        // x^3 over GF(2^3) with modulus x^3 + x + 1
        let mut table = vec![0, 1, 3, 4, 5, 6, 7, 2];
        fast_mobius_transform(&mut table).unwrap();
        assert_eq!(table, vec![0, 1, 3, 6, 5, 2, 1, 0]);

        let mut table = vec![5; 8];
        fast_mobius_transform(&mut table).unwrap();
        assert_eq!(table, vec![5, 0, 0, 0, 0, 0, 0, 0]);

        let mut table = vec![0, 1, 2, 3, 4, 5, 6, 7];
        fast_mobius_transform(&mut table).unwrap();
        assert_eq!(table, vec![0, 1, 2, 0, 4, 0, 0, 0]);
    }

    #[test]
    fn test_fast_mobius_transform_involution() {
        let original = vec![3, 14, 7, 0, 9, 9, 1, 12, 15, 2, 4, 6, 11, 13, 8, 5];
        let mut table = original.clone();
        fast_mobius_transform(&mut table).unwrap();
        assert_ne!(table, original);
        fast_mobius_transform(&mut table).unwrap();
        assert_eq!(table, original);
    }

    #[test]
    fn test_fast_mobius_transform_wrong_length() {
        let mut table = vec![0, 1, 2];
        assert_eq!(
            fast_mobius_transform(&mut table),
            Err(AnalysisError::InvalidTableLength {
                kind: TableKind::AnfTable,
                actual: 3,
                expected: 4
            })
        );
        assert!(fast_mobius_transform(&mut []).is_err());
    }

    #[test]
    fn test_matches_scalar_anf_transform() {
        let table: Vec<u32> = vec![
            0x1e, 0x3a, 0x07, 0x21, 0x2c, 0x11, 0x30, 0x05, 0x0f, 0x3f, 0x18, 0x26, 0x09, 0x33,
            0x14, 0x2a,
        ];
        let mut anf = table.clone();
        fast_mobius_transform(&mut anf).unwrap();

        for coordinate in 0..6 {
            let scalar_truth_table = table
                .iter()
                .enumerate()
                .filter(|(_, value)| (*value >> coordinate) & 1 == 1)
                .fold(0u64, |acc, (x, _)| acc | (1 << x));
            let scalar_anf = anf
                .iter()
                .enumerate()
                .filter(|(_, value)| (*value >> coordinate) & 1 == 1)
                .fold(0u64, |acc, (u, _)| acc | (1 << u));
            assert_eq!(fast_bool_anf_transform_unsigned(scalar_truth_table, 4), scalar_anf);
        }
    }
}
