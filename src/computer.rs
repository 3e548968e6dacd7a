//! The state-vector engine.
//!
//! [`QuantumComputer`] owns a [`State`] and exposes the mutating operations:
//! gate application on an ordered list of axes, forced and sampled measurement,
//! and their batch forms. Single-step operations validate their arguments before
//! the state is touched, so a failed call leaves the amplitudes unchanged. The
//! batch forms run their steps in order and stop at the first failure, keeping
//! the steps that already succeeded.

use ndarray::{Array1, ArrayD};
use num_complex::Complex64;
use rand::Rng;
use tracing::{debug, warn};

use crate::apply::apply_gate;
use crate::config::SimConfig;
use crate::error::{QcError, Result};
use crate::gate::Gate;
use crate::measure::{collapse_axis, marginal_probs, sample_from_probs};
use crate::state::State;

/// Shape of a register: explicit per-axis dimensions or a number of qubits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Register {
    Qudits(Vec<usize>),
    Qubits(usize),
}

impl Register {
    /// Per-axis dimensions of the register.
    pub fn dims(&self) -> Vec<usize> {
        match self {
            Register::Qudits(dims) => dims.clone(),
            Register::Qubits(n) => vec![2; *n],
        }
    }
}

impl From<usize> for Register {
    fn from(n: usize) -> Self {
        Register::Qubits(n)
    }
}

impl From<Vec<usize>> for Register {
    fn from(dims: Vec<usize>) -> Self {
        Register::Qudits(dims)
    }
}

impl From<&[usize]> for Register {
    fn from(dims: &[usize]) -> Self {
        Register::Qudits(dims.to_vec())
    }
}

/// Ordered list of state axes a gate binds to. A single axis converts to a
/// one-element list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axes(pub Vec<usize>);

impl Axes {
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl From<usize> for Axes {
    fn from(axis: usize) -> Self {
        Axes(vec![axis])
    }
}

impl From<Vec<usize>> for Axes {
    fn from(axes: Vec<usize>) -> Self {
        Axes(axes)
    }
}

impl From<&[usize]> for Axes {
    fn from(axes: &[usize]) -> Self {
        Axes(axes.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Axes {
    fn from(axes: [usize; N]) -> Self {
        Axes(axes.to_vec())
    }
}

/// A simulated register of qudits.
///
/// # Example
/// ```
/// use qcsim::{catalog, QuantumComputer};
///
/// let mut qc = QuantumComputer::qubits(2).unwrap();
/// qc.gate(&catalog::h(), 0).unwrap();
/// qc.gate(&catalog::cnot(), [0, 1]).unwrap();
///
/// let p = qc.measure_as(0, 1, None).unwrap();
/// assert!((p - 0.5).abs() < 1e-12);
/// assert!((qc.probs()[&[1, 1][..]] - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct QuantumComputer {
    state: State,
    config: SimConfig,
}

impl QuantumComputer {
    /// Register in the all-zero basis state.
    ///
    /// # Errors
    /// [`QcError::InvalidRegister`] for an empty register or an axis of dimension below 2.
    pub fn new(register: impl Into<Register>) -> Result<Self> {
        Self::with_config(register, SimConfig::default())
    }

    pub fn with_config(register: impl Into<Register>, config: SimConfig) -> Result<Self> {
        let dims = register.into().dims();
        if dims.is_empty() {
            return Err(QcError::invalid_register("register has no axes"));
        }
        if let Some((axis, &d)) = dims.iter().enumerate().find(|(_, d)| **d < 2) {
            return Err(QcError::invalid_register(format!(
                "axis {} has dimension {}, need at least 2",
                axis, d
            )));
        }
        Ok(QuantumComputer {
            state: State::zero_state(&dims),
            config,
        })
    }

    /// `n` qubits in |0…0⟩.
    pub fn qubits(n: usize) -> Result<Self> {
        Self::new(Register::Qubits(n))
    }

    /// Mixed-dimension register in |0…0⟩.
    pub fn qudits(dims: &[usize]) -> Result<Self> {
        Self::new(Register::Qudits(dims.to_vec()))
    }

    pub fn dims(&self) -> &[usize] {
        &self.state.dims
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Joint outcome distribution, shaped like the register.
    pub fn probs(&self) -> ArrayD<f64> {
        self.state.probs()
    }

    /// Outcome distribution of a single axis.
    pub fn marginal(&self, axis: usize) -> Result<Array1<f64>> {
        marginal_probs(&self.state, axis)
    }

    /// Apply `gate` to the ordered axes `on`; the i-th axis binds to the gate's i-th site.
    pub fn gate(&mut self, gate: &Gate, on: impl Into<Axes>) -> Result<()> {
        let on = on.into();
        apply_gate(&mut self.state, gate, on.as_slice())
    }

    /// Force `axis` to collapse onto `outcome`.
    ///
    /// Without `probability` the marginal probability of the outcome is computed
    /// from the state. A supplied probability is used as given. Returns the
    /// probability used for renormalization.
    ///
    /// # Errors
    /// [`QcError::InvalidMeasurement`] when the probability is within the configured
    /// tolerance of zero or is not finite. The state is unchanged on error.
    pub fn measure_as(&mut self, axis: usize, outcome: usize, probability: Option<f64>) -> Result<f64> {
        let num_axes = self.state.num_axes();
        if axis >= num_axes {
            return Err(QcError::AxisOutOfRange { axis, num_axes });
        }
        let dim = self.state.dims[axis];
        if outcome >= dim {
            return Err(QcError::OutcomeOutOfRange { axis, outcome, dim });
        }

        let p = match probability {
            Some(p) => p,
            None => self.marginal(axis)?[outcome],
        };
        if !p.is_finite() || self.config.is_negligible(p) {
            return Err(QcError::InvalidMeasurement {
                axis,
                outcome,
                probability: p,
            });
        }

        self.collapse(axis, outcome, p);
        Ok(p)
    }

    fn collapse(&mut self, axis: usize, outcome: usize, p: f64) {
        collapse_axis(&mut self.state, axis, outcome, p);
        debug!(axis, outcome, probability = p, "collapsed axis");
    }

    /// Sample an outcome of `axis` from its marginal distribution and collapse onto it.
    ///
    /// Returns `(probability, outcome)`. The sampled outcome is collapsed with its
    /// exact marginal probability, however small; the tolerance only guards
    /// [`measure_as`](Self::measure_as).
    ///
    /// # Errors
    /// [`QcError::InvalidMeasurement`] only when the marginal carries no mass at all.
    pub fn measure<R: Rng + ?Sized>(&mut self, axis: usize, rng: &mut R) -> Result<(f64, usize)> {
        let pdf = self.marginal(axis)?.to_vec();
        let total: f64 = pdf.iter().sum();
        if (total - 1.0).abs() > self.config.tolerance {
            warn!(axis, total, "marginal distribution is not normalized");
        }
        let outcome = sample_from_probs(&pdf, rng);
        let p = pdf[outcome];
        if !(p > 0.0 && p.is_finite()) {
            return Err(QcError::InvalidMeasurement {
                axis,
                outcome,
                probability: p,
            });
        }
        self.collapse(axis, outcome, p);
        Ok((p, outcome))
    }

    /// Apply the same gate once per entry of `ons`, in order.
    ///
    /// Stops at the first failing entry; gates applied before it stay applied.
    pub fn multi_gate<A: Into<Axes>>(&mut self, gate: &Gate, ons: impl IntoIterator<Item = A>) -> Result<()> {
        for on in ons {
            self.gate(gate, on)?;
        }
        Ok(())
    }

    /// Force each `axes[i]` onto `outcomes[i]` in order, returning each probability.
    ///
    /// A length mismatch is reported before anything runs. Otherwise the first
    /// failing step ends the batch and the collapses before it are kept.
    pub fn multi_measure_as(&mut self, axes: &[usize], outcomes: &[usize]) -> Result<Vec<f64>> {
        if axes.len() != outcomes.len() {
            return Err(QcError::LengthMismatch {
                left: axes.len(),
                right: outcomes.len(),
            });
        }
        axes.iter()
            .zip(outcomes)
            .map(|(&axis, &outcome)| self.measure_as(axis, outcome, None))
            .collect()
    }

    /// Measure each axis in order, returning `(probability, outcome)` per axis.
    ///
    /// Stops at the first failing axis; earlier collapses are kept.
    pub fn multi_measure<R: Rng + ?Sized>(&mut self, axes: &[usize], rng: &mut R) -> Result<Vec<(f64, usize)>> {
        axes.iter().map(|&axis| self.measure(axis, rng)).collect()
    }

    /// Like [`multi_measure_as`](Self::multi_measure_as), folded into the joint probability.
    pub fn joint_measure_as(&mut self, axes: &[usize], outcomes: &[usize]) -> Result<f64> {
        Ok(self.multi_measure_as(axes, outcomes)?.iter().product())
    }

    /// Like [`multi_measure`](Self::multi_measure), folded into the joint probability
    /// and the list of outcomes.
    pub fn joint_measure<R: Rng + ?Sized>(&mut self, axes: &[usize], rng: &mut R) -> Result<(f64, Vec<usize>)> {
        let results = self.multi_measure(axes, rng)?;
        let joint = results.iter().map(|(p, _)| p).product();
        let outcomes = results.into_iter().map(|(_, k)| k).collect();
        Ok((joint, outcomes))
    }

    /// Replace the state with the uniform superposition of the given basis tuples.
    ///
    /// Duplicate tuples are not detected and leave the state unnormalized.
    pub fn equal_superposition(&mut self, states: &[Vec<usize>]) -> Result<()> {
        if states.is_empty() {
            return Err(QcError::invalid_basis_state("no basis states given"));
        }
        for coords in states {
            let in_range = coords.len() == self.state.num_axes()
                && coords.iter().zip(&self.state.dims).all(|(&k, &d)| k < d);
            if !in_range {
                return Err(QcError::invalid_basis_state(format!(
                    "{:?} is not a basis state of a register with dims {:?}",
                    coords, self.state.dims
                )));
            }
        }

        let amp = Complex64::new(1.0 / (states.len() as f64).sqrt(), 0.0);
        self.state.data.fill(Complex64::new(0.0, 0.0));
        for coords in states {
            self.state.data[coords.as_slice()] = amp;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_register_conversions() {
        assert_eq!(Register::from(3).dims(), vec![2, 2, 2]);
        assert_eq!(Register::from(vec![3, 2]).dims(), vec![3, 2]);
        assert_eq!(Axes::from(4).as_slice(), &[4]);
        assert_eq!(Axes::from([1, 0]).as_slice(), &[1, 0]);
    }

    #[test]
    fn test_invalid_registers() {
        assert!(matches!(
            QuantumComputer::qubits(0),
            Err(QcError::InvalidRegister { .. })
        ));
        assert!(matches!(
            QuantumComputer::qudits(&[2, 1]),
            Err(QcError::InvalidRegister { .. })
        ));
    }

    #[test]
    fn test_failed_measurement_leaves_state() {
        let mut qc = QuantumComputer::qubits(2).unwrap();
        let before = qc.state().clone();
        let err = qc.measure_as(1, 1, None).unwrap_err();
        assert!(matches!(err, QcError::InvalidMeasurement { axis: 1, outcome: 1, .. }));
        assert_eq!(qc.state(), &before);
        assert!(matches!(
            qc.measure_as(0, 2, None),
            Err(QcError::OutcomeOutOfRange { axis: 0, outcome: 2, dim: 2 })
        ));
    }

    #[test]
    fn test_failed_gate_leaves_state() {
        let mut qc = QuantumComputer::qudits(&[2, 3]).unwrap();
        let before = qc.state().clone();
        assert!(qc.gate(&catalog::x(), 1).is_err());
        assert_eq!(qc.state(), &before);
    }
}
