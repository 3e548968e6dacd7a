//! Probabilities, sampling and collapse over a [`State`].
//!
//! # Overview
//!
//! - [`probs`] - Joint probability distribution over all coordinate tuples
//! - [`marginal_probs`] - Distribution of a single axis
//! - [`sample`] - Sample full outcomes without collapsing the state
//! - [`collapse_axis`] - Project one axis onto an outcome and renormalize

use ndarray::{Array1, ArrayD, Axis};
use num_complex::Complex64;
use rand::Rng;

use crate::error::{QcError, Result};
use crate::index::linear_to_indices;
use crate::state::State;

/// Joint probability of every coordinate tuple, shaped like the state.
pub fn probs(state: &State) -> ArrayD<f64> {
    state.probs()
}

/// Marginal distribution of `axis`: the joint distribution summed over every other axis.
///
/// # Example
/// ```
/// use qcsim::{measure::marginal_probs, State};
///
/// let state = State::product_state(&[2, 3], &[1, 2]);
/// let p = marginal_probs(&state, 1).unwrap();
/// assert_eq!(p.to_vec(), vec![0.0, 0.0, 1.0]);
/// ```
pub fn marginal_probs(state: &State, axis: usize) -> Result<Array1<f64>> {
    if axis >= state.num_axes() {
        return Err(QcError::AxisOutOfRange {
            axis,
            num_axes: state.num_axes(),
        });
    }
    let mut p = state.probs();
    // Sum out trailing axes first so `axis` keeps its index until it is alone.
    for other in (0..state.num_axes()).rev().filter(|&a| a != axis) {
        p = p.sum_axis(Axis(other));
    }
    Ok(p.iter().copied().collect())
}

/// Sample an index from a probability distribution.
pub(crate) fn sample_from_probs<R: Rng + ?Sized>(probs: &[f64], rng: &mut R) -> usize {
    let total: f64 = probs.iter().sum();
    let r: f64 = rng.r#gen::<f64>() * total;
    let mut cumsum = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumsum += p;
        if r < cumsum {
            return i;
        }
    }
    // Floating-point shortfall: fall back to the last outcome with support.
    probs.iter().rposition(|&p| p > 0.0).unwrap_or(probs.len() - 1)
}

/// Sample full measurement outcomes without collapsing the state.
///
/// # Example
/// ```
/// use qcsim::{measure::sample, State};
/// use rand::SeedableRng;
///
/// let state = State::product_state(&[2, 3], &[1, 2]);
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// for shot in sample(&state, 5, &mut rng) {
///     assert_eq!(shot, vec![1, 2]);
/// }
/// ```
pub fn sample<R: Rng + ?Sized>(state: &State, nshots: usize, rng: &mut R) -> Vec<Vec<usize>> {
    let p: Vec<f64> = state.probs().iter().copied().collect();
    (0..nshots)
        .map(|_| linear_to_indices(sample_from_probs(&p, rng), &state.dims))
        .collect()
}

/// Sample an outcome of `axis` from its marginal distribution.
///
/// Returns the outcome together with its exact marginal probability.
pub fn sample_axis<R: Rng + ?Sized>(state: &State, axis: usize, rng: &mut R) -> Result<(usize, f64)> {
    let pdf = marginal_probs(state, axis)?;
    let p = pdf.to_vec();
    let outcome = sample_from_probs(&p, rng);
    Ok((outcome, p[outcome]))
}

/// Project `axis` onto `outcome` and rescale the survivors by `1/sqrt(probability)`.
///
/// Every amplitude whose coordinate on `axis` differs from `outcome` becomes zero.
/// The caller supplies the prior probability of the outcome and is responsible for
/// it being positive.
pub fn collapse_axis(state: &mut State, axis: usize, outcome: usize, probability: f64) {
    let scale = Complex64::new(1.0 / probability.sqrt(), 0.0);
    for (level, mut lane) in state.data.axis_iter_mut(Axis(axis)).enumerate() {
        if level == outcome {
            lane.mapv_inplace(|z| z * scale);
        } else {
            lane.fill(Complex64::new(0.0, 0.0));
        }
    }
}
