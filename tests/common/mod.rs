//! Shared test utilities for qcsim integration tests.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rand::Rng;

use qcsim::State;

#[allow(dead_code)]
pub const ATOL: f64 = 1e-10;

#[allow(dead_code)]
pub fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

// ==================== State Construction ====================

/// Normalized state with uniformly random complex amplitudes.
#[allow(dead_code)]
pub fn random_state<R: Rng>(dims: &[usize], rng: &mut R) -> State {
    let total: usize = dims.iter().product();
    let amps: Vec<Complex64> = (0..total)
        .map(|_| c(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let norm = amps.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    State::from_amplitudes(dims, amps.into_iter().map(|z| z / norm).collect()).unwrap()
}

/// Random unitary on a `d`-dimensional space, via Gram-Schmidt on random columns.
#[allow(dead_code)]
pub fn random_unitary<R: Rng>(d: usize, rng: &mut R) -> Array2<Complex64> {
    let mut cols: Vec<Array1<Complex64>> = Vec::with_capacity(d);
    while cols.len() < d {
        let mut v: Array1<Complex64> =
            (0..d).map(|_| c(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))).collect();
        for u in &cols {
            let proj: Complex64 = u.iter().zip(v.iter()).map(|(a, b)| a.conj() * b).sum();
            v = &v - &u.mapv(|z| z * proj);
        }
        let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        if norm > 1e-6 {
            cols.push(v.mapv(|z| z / norm));
        }
    }
    Array2::from_shape_fn((d, d), |(i, j)| cols[j][i])
}

// ==================== State Comparison ====================

/// Assert that two amplitude lists are elementwise close.
#[allow(dead_code)]
pub fn assert_states_close(a: &[Complex64], b: &[Complex64], tol: f64) {
    assert_eq!(a.len(), b.len(), "State dimensions differ");
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert!(
            (x - y).norm() < tol,
            "States differ at index {}: {} vs {}",
            i,
            x,
            y
        );
    }
}

#[allow(dead_code)]
pub fn total_probability(state: &State) -> f64 {
    state.probs().iter().sum()
}
