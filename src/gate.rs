use std::fmt;

use ndarray::{Array2, ArrayBase, ArrayD, Data, Dimension, Ix2, IxDyn};
use num_complex::Complex64;

use crate::error::{QcError, Result};
use crate::index::mixed_radix_index;
use crate::linalg::is_unitary;

/// Check that a tensor shape is a valid doubled-rank gate shape.
///
/// The rank must be even and non-zero, and the first half of the axis
/// dimensions must equal the second half, in order.
///
/// # Example
/// ```
/// use qcsim::gate::verify_gate;
/// assert!(verify_gate(&[2, 3, 2, 3]).is_ok());
/// assert!(verify_gate(&[2, 3, 3, 2]).is_err());
/// assert!(verify_gate(&[2, 2, 2]).is_err());
/// ```
pub fn verify_gate(shape: &[usize]) -> Result<()> {
    if shape.is_empty() {
        return Err(QcError::malformed_gate("gate must act on at least one axis"));
    }
    if shape.len() % 2 != 0 {
        return Err(QcError::malformed_gate(format!("rank {} is odd", shape.len())));
    }
    let (input, output) = shape.split_at(shape.len() / 2);
    if input != output {
        return Err(QcError::malformed_gate(format!(
            "input dims {:?} differ from output dims {:?}",
            input, output
        )));
    }
    Ok(())
}

/// Reshape a row-major `[out, in]` matrix into the input-first doubled-rank layout.
fn matrix_to_tensor<S>(dims: &[usize], matrix: &ArrayBase<S, Ix2>) -> ArrayD<Complex64>
where
    S: Data<Elem = Complex64>,
{
    let m = dims.len();
    let shape = [dims, dims].concat();
    ArrayD::from_shape_fn(IxDyn(&shape), |ix| {
        let ix = ix.slice();
        let input = mixed_radix_index(&ix[..m], dims);
        let output = mixed_radix_index(&ix[m..], dims);
        matrix[[output, input]]
    })
}

/// An operator on one or more qudits, stored as a doubled-rank tensor.
///
/// For a gate on sites of dimensions `[d_0, ..., d_{m-1}]` the tensor has shape
/// `[d_0, ..., d_{m-1}, d_0, ..., d_{m-1}]`. The first half are input indices and
/// the second half output indices: `tensor[i..., o...] = ⟨o|U|i⟩`.
/// Use [`Gate::from_matrix`] to build one from the usual row-major `[out, in]` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    tensor: ArrayD<Complex64>,
    label: String,
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl Gate {
    /// Wrap a doubled-rank tensor, verifying its shape.
    pub fn from_tensor(tensor: ArrayD<Complex64>, label: impl Into<String>) -> Result<Self> {
        verify_gate(tensor.shape())?;
        Ok(Self::from_parts(tensor, label.into()))
    }

    /// Build a gate from a row-major `[out, in]` matrix acting on sites of dimension `dims`.
    ///
    /// # Example
    /// ```
    /// use ndarray::array;
    /// use num_complex::Complex64;
    /// use qcsim::Gate;
    ///
    /// let zero = Complex64::new(0.0, 0.0);
    /// let one = Complex64::new(1.0, 0.0);
    /// let x = Gate::from_matrix(&[2], &array![[zero, one], [one, zero]], "X").unwrap();
    /// assert_eq!(x.dims(), &[2]);
    /// assert_eq!(x.tensor().shape(), &[2, 2]);
    /// ```
    pub fn from_matrix<S>(
        dims: &[usize],
        matrix: &ArrayBase<S, Ix2>,
        label: impl Into<String>,
    ) -> Result<Self>
    where
        S: Data<Elem = Complex64>,
    {
        let d: usize = dims.iter().product();
        if matrix.dim() != (d, d) {
            return Err(QcError::malformed_gate(format!(
                "matrix is {}x{}, sites {:?} need {}x{}",
                matrix.nrows(),
                matrix.ncols(),
                dims,
                d,
                d
            )));
        }
        Self::from_tensor(matrix_to_tensor(dims, matrix), label)
    }

    /// Crate-internal counterpart of [`Gate::from_matrix`] for matrices whose size
    /// is right by construction.
    pub(crate) fn from_square(dims: &[usize], matrix: &Array2<Complex64>, label: &str) -> Self {
        debug_assert_eq!(matrix.nrows(), dims.iter().product::<usize>());
        Self::from_parts(matrix_to_tensor(dims, matrix), label.to_string())
    }

    /// Crate-internal constructor for tensors whose shape is valid by construction.
    pub(crate) fn from_parts(tensor: ArrayD<Complex64>, label: String) -> Self {
        Gate {
            tensor: tensor.as_standard_layout().into_owned(),
            label,
        }
    }

    /// Per-site dimensions the gate acts on.
    pub fn dims(&self) -> &[usize] {
        let shape = self.tensor.shape();
        &shape[..shape.len() / 2]
    }

    /// Number of sites (axes) the gate acts on.
    pub fn num_sites(&self) -> usize {
        self.tensor.ndim() / 2
    }

    /// Side length of the gate's matrix form.
    pub fn dim(&self) -> usize {
        self.dims().iter().product()
    }

    pub fn tensor(&self) -> &ArrayD<Complex64> {
        &self.tensor
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Row-major `[out, in]` matrix form.
    pub fn matrix(&self) -> Array2<Complex64> {
        let d = self.dim();
        // flat[i * d + o] = ⟨o|U|i⟩
        let flat: Vec<Complex64> = self.tensor.iter().copied().collect();
        Array2::from_shape_fn((d, d), |(o, i)| flat[i * d + o])
    }

    /// Adjoint (conjugate transpose). For unitary gates this is the inverse.
    pub fn dagger(&self) -> Self {
        let n = self.num_sites();
        let swap_halves: Vec<usize> = (n..2 * n).chain(0..n).collect();
        let tensor = self
            .tensor
            .view()
            .permuted_axes(IxDyn(&swap_halves))
            .mapv(|z| z.conj());
        Self::from_parts(tensor, format!("{}†", self.label))
    }

    /// Multiply every entry by `factor`.
    pub fn scaled(&self, factor: Complex64) -> Self {
        Self::from_parts(self.tensor.mapv(|z| z * factor), self.label.clone())
    }

    pub fn is_unitary(&self, tol: f64) -> bool {
        is_unitary(&self.matrix(), tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_from_matrix_is_input_first() {
        // |0> -> |1> only: <1|U|0> = 1
        let m = array![[c(0.0, 0.0), c(0.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]];
        let g = Gate::from_matrix(&[2], &m, "raise").unwrap();
        // tensor[in, out]
        assert_eq!(g.tensor()[&[0, 1][..]], c(1.0, 0.0));
        assert_eq!(g.tensor()[&[1, 0][..]], c(0.0, 0.0));
        assert_eq!(g.matrix(), m);
    }

    #[test]
    fn test_matrix_roundtrip_mixed_dims() {
        let d = 6;
        let m = Array2::from_shape_fn((d, d), |(i, j)| c(i as f64, j as f64));
        let g = Gate::from_matrix(&[2, 3], &m, "M").unwrap();
        assert_eq!(g.dims(), &[2, 3]);
        assert_eq!(g.tensor().shape(), &[2, 3, 2, 3]);
        assert_eq!(g.matrix(), m);
    }

    #[test]
    fn test_from_matrix_wrong_size() {
        let m = Array2::<Complex64>::eye(3);
        let err = Gate::from_matrix(&[2], &m, "bad").unwrap_err();
        assert!(matches!(err, QcError::MalformedGate { .. }));
    }

    #[test]
    fn test_from_tensor_rejects_uneven_halves() {
        let t = ArrayD::<Complex64>::zeros(IxDyn(&[2, 3, 3, 2]));
        assert!(Gate::from_tensor(t, "bad").is_err());
        let t = ArrayD::<Complex64>::zeros(IxDyn(&[2, 2, 2]));
        assert!(Gate::from_tensor(t, "odd").is_err());
    }

    #[test]
    fn test_dagger_matches_conjugate_transpose() {
        let m = array![[c(1.0, 0.0), c(0.0, 2.0)], [c(3.0, -1.0), c(0.0, 1.0)]];
        let g = Gate::from_matrix(&[2], &m, "A").unwrap();
        let dag = g.dagger();
        assert_eq!(dag.label(), "A†");
        assert_eq!(dag.matrix(), m.t().mapv(|z| z.conj()));
    }

    #[test]
    fn test_display_uses_label() {
        let g = Gate::from_matrix(&[2], &Array2::<Complex64>::eye(2), "I").unwrap();
        assert_eq!(g.to_string(), "I");
    }
}
