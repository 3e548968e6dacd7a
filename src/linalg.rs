//! Dense complex vector and matrix helpers.
//!
//! Everything here is a pure function over `ndarray` values. Fractional
//! matrix powers go through `nalgebra`'s Schur decomposition.

use nalgebra::{linalg::Schur, DMatrix};
use ndarray::{Array, Array1, Array2, ArrayBase, Data, Dimension, Ix1, Ix2};
use num_complex::Complex64;

use crate::error::{QcError, Result};
use crate::index::{iter_basis, linear_to_indices, mixed_radix_index};

#[inline]
pub(crate) fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Euclidean (Frobenius, for matrices) norm.
pub fn vnorm<S, D>(x: &ArrayBase<S, D>) -> f64
where
    S: Data<Elem = Complex64>,
    D: Dimension,
{
    x.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// Scale `x` to unit norm. A zero array is returned unchanged.
pub fn vnormalize<S, D>(x: &ArrayBase<S, D>) -> Array<Complex64, D>
where
    S: Data<Elem = Complex64>,
    D: Dimension,
{
    let norm = vnorm(x);
    if norm == 0.0 {
        return x.to_owned();
    }
    x.mapv(|z| z / norm)
}

/// Unit-modulus complex number with the same argument as `z`.
pub fn cnormalize(z: Complex64) -> Complex64 {
    z / z.norm()
}

/// Conjugate transpose.
pub fn dagger<S>(m: &ArrayBase<S, Ix2>) -> Array2<Complex64>
where
    S: Data<Elem = Complex64>,
{
    m.t().mapv(|z| z.conj())
}

/// Replace entries with magnitude below `tol` by exact zeros.
pub fn round_to_zero<S, D>(x: &ArrayBase<S, D>, tol: f64) -> Array<Complex64, D>
where
    S: Data<Elem = Complex64>,
    D: Dimension,
{
    x.mapv(|z| if z.norm() < tol { Complex64::new(0.0, 0.0) } else { z })
}

/// Global phase of `x`, read off its first entry that survives [`round_to_zero`].
///
/// Returns `None` for an all-zero array.
pub fn global_phase<S, D>(x: &ArrayBase<S, D>, tol: f64) -> Option<Complex64>
where
    S: Data<Elem = Complex64>,
    D: Dimension,
{
    round_to_zero(x, tol)
        .iter()
        .find(|z| z.norm() > 0.0)
        .map(|&z| cnormalize(z))
}

/// Remove the global phase so that the first significant entry is real and positive.
///
/// # Example
/// ```
/// use ndarray::array;
/// use num_complex::Complex64;
/// use qcsim::linalg::canonicalize;
///
/// let v = array![Complex64::new(0.0, 0.6), Complex64::new(0.0, -0.8)];
/// let canon = canonicalize(&v, 1e-6);
/// assert!((canon[0] - Complex64::new(0.6, 0.0)).norm() < 1e-12);
/// assert!((canon[1] - Complex64::new(-0.8, 0.0)).norm() < 1e-12);
/// ```
pub fn canonicalize<S, D>(x: &ArrayBase<S, D>, tol: f64) -> Array<Complex64, D>
where
    S: Data<Elem = Complex64>,
    D: Dimension,
{
    match global_phase(x, tol) {
        Some(phase) => x.mapv(|z| z / phase),
        None => x.to_owned(),
    }
}

/// Elementwise closeness of two arrays of identical shape.
pub fn close<S1, S2, D>(a: &ArrayBase<S1, D>, b: &ArrayBase<S2, D>, tol: f64) -> bool
where
    S1: Data<Elem = Complex64>,
    S2: Data<Elem = Complex64>,
    D: Dimension,
{
    a.shape() == b.shape() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < tol)
}

/// Kronecker (tensor) product of two matrices.
pub fn kron<S1, S2>(a: &ArrayBase<S1, Ix2>, b: &ArrayBase<S2, Ix2>) -> Array2<Complex64>
where
    S1: Data<Elem = Complex64>,
    S2: Data<Elem = Complex64>,
{
    let (br, bc) = b.dim();
    let (ar, ac) = a.dim();
    Array2::from_shape_fn((ar * br, ac * bc), |(i, j)| {
        a[[i / br, j / bc]] * b[[i % br, j % bc]]
    })
}

/// Kronecker product of two vectors.
pub fn kron_vec<S1, S2>(a: &ArrayBase<S1, Ix1>, b: &ArrayBase<S2, Ix1>) -> Array1<Complex64>
where
    S1: Data<Elem = Complex64>,
    S2: Data<Elem = Complex64>,
{
    let n = b.len();
    Array1::from_shape_fn(a.len() * n, |i| a[i / n] * b[i % n])
}

/// Kronecker product of a sequence of matrices, left to right.
///
/// The empty product is the 1x1 identity.
pub fn kron_all(mats: &[Array2<Complex64>]) -> Array2<Complex64> {
    mats.iter()
        .fold(Array2::eye(1), |acc, m| kron(&acc, m))
}

/// `m ⊗ m ⊗ ... ⊗ m` with `n` factors.
pub fn tensor_power(m: &Array2<Complex64>, n: usize) -> Array2<Complex64> {
    (0..n).fold(Array2::eye(1), |acc, _| kron(&acc, m))
}

/// True when `m† m` is the identity within `tol`.
pub fn is_unitary<S>(m: &ArrayBase<S, Ix2>, tol: f64) -> bool
where
    S: Data<Elem = Complex64>,
{
    let (rows, cols) = m.dim();
    rows == cols && close(&dagger(m).dot(m), &Array2::<Complex64>::eye(rows), tol)
}

/// Real matrix power `m^exponent` through a unitary eigendecomposition.
///
/// The Schur form `m = Q T Q†` is diagonal exactly when `m` is normal, which
/// covers every unitary gate. Non-normal input, meaning an off-diagonal Schur entry
/// above `tol` times the largest entry, is rejected with
/// [`QcError::NotDiagonalizable`]. Eigenvalues are raised on the principal branch.
///
/// # Example
/// ```
/// use ndarray::array;
/// use num_complex::Complex64;
/// use qcsim::linalg::{close, mpow};
///
/// let zero = Complex64::new(0.0, 0.0);
/// let one = Complex64::new(1.0, 0.0);
/// let x = array![[zero, one], [one, zero]];
/// let root = mpow(&x, 0.5, 1e-9).unwrap();
/// assert!(close(&root.dot(&root), &x, 1e-9));
/// ```
pub fn mpow(m: &Array2<Complex64>, exponent: f64, tol: f64) -> Result<Array2<Complex64>> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(QcError::Shape(format!(
            "matrix power needs a square matrix, got {}x{}",
            rows, cols
        )));
    }
    let n = rows;
    let dm = DMatrix::from_fn(n, n, |i, j| m[[i, j]]);
    let (q, t) = Schur::try_new(dm, f64::EPSILON, 0)
        .ok_or(QcError::NotDiagonalizable)?
        .unpack();

    let scale = t.iter().map(|z| z.norm()).fold(1.0, f64::max);
    for i in 0..n {
        for j in (i + 1)..n {
            if t[(i, j)].norm() > tol * scale {
                return Err(QcError::NotDiagonalizable);
            }
        }
    }

    let lambda: Vec<Complex64> = (0..n).map(|k| t[(k, k)].powf(exponent)).collect();
    Ok(Array2::from_shape_fn((n, n), |(i, j)| {
        (0..n)
            .map(|k| q[(i, k)] * lambda[k] * q[(j, k)].conj())
            .sum()
    }))
}

/// Density matrix `|v⟩⟨v|`.
pub fn density<S>(v: &ArrayBase<S, Ix1>) -> Array2<Complex64>
where
    S: Data<Elem = Complex64>,
{
    let n = v.len();
    Array2::from_shape_fn((n, n), |(i, j)| v[i] * v[j].conj())
}

/// Ordered product of `mats`: the first matrix acts first, so `[A, B]` gives `B·A`.
///
/// # Errors
/// [`QcError::Shape`] for an empty list or matrices that do not chain.
pub fn run(mats: &[Array2<Complex64>]) -> Result<Array2<Complex64>> {
    let (first, rest) = mats
        .split_first()
        .ok_or_else(|| QcError::Shape("no matrices to multiply".to_string()))?;
    rest.iter().try_fold(first.clone(), |acc, m| {
        if m.ncols() != acc.nrows() {
            return Err(QcError::Shape(format!(
                "cannot apply a {:?} matrix after a {:?} one",
                m.dim(),
                acc.dim()
            )));
        }
        Ok(m.dot(&acc))
    })
}

/// Matrix inverse, via `nalgebra`'s LU decomposition.
pub fn inverse(m: &Array2<Complex64>) -> Result<Array2<Complex64>> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(QcError::Shape(format!(
            "inverse needs a square matrix, got {}x{}",
            rows, cols
        )));
    }
    let inv = DMatrix::from_fn(rows, cols, |i, j| m[[i, j]])
        .try_inverse()
        .ok_or(QcError::SingularMatrix)?;
    Ok(Array2::from_shape_fn((rows, cols), |(i, j)| inv[(i, j)]))
}

/// Evolve a density matrix through `mats` in order: `ρ → M ρ M⁻¹` with `M` the
/// [`run`] product.
///
/// The inverse is used rather than the adjoint, so non-unitary similarity
/// transforms work too.
pub fn density_run(rho: &Array2<Complex64>, mats: &[Array2<Complex64>]) -> Result<Array2<Complex64>> {
    let m = run(mats)?;
    if m.ncols() != rho.nrows() {
        return Err(QcError::Shape(format!(
            "{:?} operator cannot act on a {:?} density matrix",
            m.dim(),
            rho.dim()
        )));
    }
    Ok(m.dot(rho).dot(&inverse(&m)?))
}

/// Outcome probabilities of a measurement of `rho` in the basis whose columns are `basis`.
pub fn density_measure(rho: &Array2<Complex64>, basis: &Array2<Complex64>) -> Result<Array1<f64>> {
    let rotated = density_run(rho, &[dagger(basis)])?;
    Ok(rotated.diag().mapv(|z| z.re))
}

/// Density matrix `rho` written in the basis whose columns are `basis`: `B† ρ B`.
pub fn density_in_basis(basis: &Array2<Complex64>, rho: &Array2<Complex64>) -> Array2<Complex64> {
    dagger(basis).dot(rho).dot(basis)
}

/// Columns of `m` re-expressed in the basis whose columns are `basis`: `B† m`.
pub fn in_basis<S>(basis: &Array2<Complex64>, m: &ArrayBase<S, Ix2>) -> Array2<Complex64>
where
    S: Data<Elem = Complex64>,
{
    dagger(basis).dot(m)
}

/// Outcome probabilities of measuring the pure state `psi` in the basis whose
/// columns are `basis`: `|B† ψ|²` entrywise.
pub fn basis_probs<S>(psi: &ArrayBase<S, Ix1>, basis: &Array2<Complex64>) -> Array1<f64>
where
    S: Data<Elem = Complex64>,
{
    dagger(basis).dot(psi).mapv(|z| z.norm_sqr())
}

/// Trace out the subsystems listed in `traced` from a density matrix over `dims`.
///
/// The remaining subsystems keep their relative order.
pub fn partial_trace(
    rho: &Array2<Complex64>,
    dims: &[usize],
    traced: &[usize],
) -> Result<Array2<Complex64>> {
    let total: usize = dims.iter().product();
    if rho.dim() != (total, total) {
        return Err(QcError::Shape(format!(
            "density matrix is {:?}, register needs {}x{}",
            rho.dim(),
            total,
            total
        )));
    }
    if let Some(&axis) = traced.iter().find(|&&axis| axis >= dims.len()) {
        return Err(QcError::AxisOutOfRange {
            axis,
            num_axes: dims.len(),
        });
    }

    let kept: Vec<usize> = (0..dims.len()).filter(|a| !traced.contains(a)).collect();
    let kept_dims: Vec<usize> = kept.iter().map(|&a| dims[a]).collect();
    let traced_dims: Vec<usize> = traced.iter().map(|&a| dims[a]).collect();
    let kept_total: usize = kept_dims.iter().product();

    let compose = |kept_idx: &[usize], traced_idx: &[usize]| {
        let mut full = vec![0usize; dims.len()];
        for (&axis, &v) in kept.iter().zip(kept_idx) {
            full[axis] = v;
        }
        for (&axis, &v) in traced.iter().zip(traced_idx) {
            full[axis] = v;
        }
        mixed_radix_index(&full, dims)
    };

    let mut out = Array2::zeros((kept_total, kept_total));
    for r in 0..kept_total {
        let row_kept = linear_to_indices(r, &kept_dims);
        for rp in 0..kept_total {
            let col_kept = linear_to_indices(rp, &kept_dims);
            out[[r, rp]] = iter_basis(&traced_dims)
                .map(|t| rho[[compose(&row_kept, &t), compose(&col_kept, &t)]])
                .sum();
        }
    }
    Ok(out)
}

/// Shannon entropy in bits of a probability vector; zero entries contribute nothing.
pub fn entropy(probs: &[f64]) -> f64 {
    -probs
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| p * p.log2())
        .sum::<f64>()
}
