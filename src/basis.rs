//! Named kets and a few standard entangled states, as flat amplitude vectors.
//!
//! Multi-site vectors are ordered row-major, matching [`crate::State::to_vec`],
//! so they can be loaded with [`crate::State::from_amplitudes`].

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{QcError, Result};
use crate::index::mixed_radix_index;
use crate::linalg::{c, density};

/// |0⟩
pub fn ket0() -> Array1<Complex64> {
    Array1::from(vec![c(1.0, 0.0), c(0.0, 0.0)])
}

/// |1⟩
pub fn ket1() -> Array1<Complex64> {
    Array1::from(vec![c(0.0, 0.0), c(1.0, 0.0)])
}

/// |+⟩ = (|0⟩ + |1⟩)/√2
pub fn ket_plus() -> Array1<Complex64> {
    Array1::from(vec![c(FRAC_1_SQRT_2, 0.0), c(FRAC_1_SQRT_2, 0.0)])
}

/// |−⟩ = (|0⟩ − |1⟩)/√2
pub fn ket_minus() -> Array1<Complex64> {
    Array1::from(vec![c(FRAC_1_SQRT_2, 0.0), c(-FRAC_1_SQRT_2, 0.0)])
}

/// |i⟩ = (|0⟩ + i|1⟩)/√2
pub fn ket_i() -> Array1<Complex64> {
    Array1::from(vec![c(FRAC_1_SQRT_2, 0.0), c(0.0, FRAC_1_SQRT_2)])
}

/// |−i⟩ = (|0⟩ − i|1⟩)/√2
pub fn ket_minus_i() -> Array1<Complex64> {
    Array1::from(vec![c(FRAC_1_SQRT_2, 0.0), c(0.0, -FRAC_1_SQRT_2)])
}

/// The six single-qubit stabilizer states with their ket labels.
pub fn named_qubit_states() -> Vec<(Array1<Complex64>, &'static str)> {
    vec![
        (ket0(), "0"),
        (ket1(), "1"),
        (ket_plus(), "+"),
        (ket_minus(), "-"),
        (ket_i(), "i"),
        (ket_minus_i(), "-i"),
    ]
}

/// Computational basis vector `|levels⟩` over qudits of dimension `d`.
pub fn qudit_kets(d: usize, levels: &[usize]) -> Result<Array1<Complex64>> {
    let dims = vec![d; levels.len()];
    if let Some((axis, &level)) = levels.iter().enumerate().find(|(_, l)| **l >= d) {
        return Err(QcError::invalid_basis_state(format!(
            "level {} on site {} exceeds dimension {}",
            level, axis, d
        )));
    }
    let mut v = Array1::zeros(d.pow(levels.len() as u32));
    v[mixed_radix_index(levels, &dims)] = c(1.0, 0.0);
    Ok(v)
}

/// Qubit basis vector, e.g. `kets(&[0, 1, 1])` = |011⟩.
pub fn kets(bits: &[usize]) -> Result<Array1<Complex64>> {
    qudit_kets(2, bits)
}

/// Uniform superposition of the given basis vectors of `n` qudits of dimension `d`.
fn uniform_over(d: usize, n: usize, members: &[Vec<usize>]) -> Array1<Complex64> {
    let dims = vec![d; n];
    let amp = c(1.0 / (members.len() as f64).sqrt(), 0.0);
    let mut v = Array1::zeros(d.pow(n as u32));
    for levels in members {
        v[mixed_radix_index(levels, &dims)] = amp;
    }
    v
}

/// Bell pair (|00⟩ + |11⟩)/√2.
pub fn bell() -> Array1<Complex64> {
    uniform_over(2, 2, &[vec![0, 0], vec![1, 1]])
}

/// Bell pair mixed with classical correlation noise:
/// (1 − e)·|Φ⁺⟩⟨Φ⁺| + e·(|00⟩⟨00| + |11⟩⟨11|)/2.
///
/// `e = 0` is the pure Bell density and `e = 1` loses all coherence.
pub fn noisy_bell(e: f64) -> Array2<Complex64> {
    let mut rho = density(&bell()) * c(1.0 - e, 0.0);
    rho[[0, 0]] += e / 2.0;
    rho[[3, 3]] += e / 2.0;
    rho
}

/// n-qubit GHZ state (|0…0⟩ + |1…1⟩)/√2.
///
/// # Panics
/// Panics if `n == 0`.
pub fn ghz(n: usize) -> Array1<Complex64> {
    assert!(n > 0, "GHZ state needs at least one qubit");
    uniform_over(2, n, &[vec![0; n], vec![1; n]])
}

/// n-qubit W state: uniform superposition of all single-excitation basis states.
///
/// # Panics
/// Panics if `n == 0`.
pub fn w_state(n: usize) -> Array1<Complex64> {
    assert!(n > 0, "W state needs at least one qubit");
    let members: Vec<Vec<usize>> = (0..n)
        .map(|k| (0..n).map(|i| usize::from(i == k)).collect())
        .collect();
    uniform_over(2, n, &members)
}

/// Maximally entangled pair of qudits, Σ_k |kk⟩ / √d.
pub fn qudit_epr(d: usize) -> Array1<Complex64> {
    let members: Vec<Vec<usize>> = (0..d).map(|k| vec![k, k]).collect();
    uniform_over(d, 2, &members)
}

/// Primitive d-th root of unity e^{2πi/d}.
pub fn omega(d: usize) -> Complex64 {
    Complex64::from_polar(1.0, 2.0 * PI / d as f64)
}
