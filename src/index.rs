//! Mixed-radix index arithmetic.
//!
//! Coordinates are ordered row-major: the first axis is the most significant
//! digit, so `[1, 2, 0]` over dims `[2, 3, 2]` is `1*6 + 2*2 + 0 = 10`.

/// Flat row-major index of a coordinate tuple.
///
/// # Example
/// ```
/// use qcsim::index::mixed_radix_index;
/// assert_eq!(mixed_radix_index(&[1, 2, 0], &[2, 3, 2]), 10);
/// ```
pub fn mixed_radix_index(indices: &[usize], dims: &[usize]) -> usize {
    debug_assert_eq!(indices.len(), dims.len(), "indices and dims must have the same length");
    indices
        .iter()
        .zip(dims.iter())
        .fold(0usize, |acc, (&idx, &dim)| acc * dim + idx)
}

/// Decompose a flat index into a coordinate tuple (inverse of [`mixed_radix_index`]).
///
/// # Example
/// ```
/// use qcsim::index::linear_to_indices;
/// assert_eq!(linear_to_indices(10, &[2, 3, 2]), vec![1, 2, 0]);
/// ```
pub fn linear_to_indices(mut index: usize, dims: &[usize]) -> Vec<usize> {
    let mut multi = vec![0usize; dims.len()];
    for i in (0..dims.len()).rev() {
        multi[i] = index % dims[i];
        index /= dims[i];
    }
    multi
}

/// Iterate over every coordinate tuple of a register in row-major order.
///
/// # Example
/// ```
/// use qcsim::index::iter_basis;
/// let states: Vec<_> = iter_basis(&[2, 3]).collect();
/// assert_eq!(states.len(), 6);
/// assert_eq!(states[4], vec![1, 1]);
/// ```
pub fn iter_basis(dims: &[usize]) -> impl Iterator<Item = Vec<usize>> + '_ {
    let total: usize = dims.iter().product();
    (0..total).map(move |i| linear_to_indices(i, dims))
}

/// Concatenate the digits of a coordinate tuple, e.g. `[1, 0, 2]` → `"102"`.
pub fn basis_label(indices: &[usize]) -> String {
    indices.iter().map(|x| x.to_string()).collect()
}

/// Big-endian bit decomposition of `x` into `n` bits.
///
/// # Example
/// ```
/// use qcsim::index::bits;
/// assert_eq!(bits(6, 4), vec![0, 1, 1, 0]);
/// ```
pub fn bits(x: usize, n: usize) -> Vec<usize> {
    (0..n).rev().map(|i| (x >> i) & 1).collect()
}

/// Inverse of [`bits`].
pub fn unbits(xs: &[usize]) -> usize {
    xs.iter().fold(0usize, |acc, &x| acc * 2 + x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_radix_index_qubit_qutrit_qubit() {
        let dims = [2, 3, 2];
        assert_eq!(mixed_radix_index(&[0, 0, 0], &dims), 0);
        assert_eq!(mixed_radix_index(&[0, 0, 1], &dims), 1);
        assert_eq!(mixed_radix_index(&[0, 2, 0], &dims), 4);
        assert_eq!(mixed_radix_index(&[1, 0, 0], &dims), 6);
        assert_eq!(mixed_radix_index(&[1, 2, 1], &dims), 11);
    }

    #[test]
    fn test_linear_to_indices_inverts_mixed_radix() {
        let dims = [3, 2, 4];
        let total: usize = dims.iter().product();
        for i in 0..total {
            assert_eq!(mixed_radix_index(&linear_to_indices(i, &dims), &dims), i);
        }
    }

    #[test]
    fn test_iter_basis_order() {
        let states: Vec<_> = iter_basis(&[2, 2]).collect();
        assert_eq!(states, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
        assert_eq!(iter_basis(&[3, 3, 3]).count(), 27);
    }

    #[test]
    fn test_basis_label() {
        assert_eq!(basis_label(&[1, 0, 2]), "102");
        assert_eq!(basis_label(&[]), "");
    }

    #[test]
    fn test_bits_unbits() {
        assert_eq!(bits(0, 3), vec![0, 0, 0]);
        assert_eq!(bits(5, 3), vec![1, 0, 1]);
        assert_eq!(unbits(&[1, 0, 1]), 5);
        for x in 0..16 {
            assert_eq!(unbits(&bits(x, 4)), x);
        }
    }
}
