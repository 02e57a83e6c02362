/// Number of ones in `a & b`, its parity is the GF(2) inner product.
#[inline]
pub(crate) fn fast_binary_dot_product(a: u64, b: u64) -> u32 {
    (a & b).count_ones()
}

/// Variables count `n` such that `len == 2^n`, `None` if `len` isn't a power of two.
#[inline]
pub(crate) fn variables_count_for_length(len: usize) -> Option<usize> {
    if len.count_ones() != 1 {
        return None;
    }
    Some(len.trailing_zeros() as usize)
}
