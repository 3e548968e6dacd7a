//! Preparing an arbitrary two-qubit state from |00⟩ with one CNOT.
//!
//! For a normalized `ψ` the decomposition finds angles `θ1`, `φ1`, `φ2` and a
//! single-qubit unitary `U` such that
//!
//! ```text
//! (I ⊗ U) · CNOT · (P(φ1) ⊗ P(φ2)) · (R(θ1) ⊗ R(π/4)) |00⟩ = ψ
//! ```
//!
//! Write `ψ = cos θ1 |0⟩|a⟩ + sin θ1 |1⟩|b⟩` with unit vectors `a`, `b`. Then
//! `θ1` fixes the control amplitudes, `⟨a|b⟩ = e^{iφ1} cos φ2` fixes the two
//! phases, and `U` maps the pair of target states produced by the CNOT onto `a`
//! and `b`.
//!
//! # Known limitation
//!
//! The closed form divides by `cos θ1`, `sin θ1`, `cos φ2` and `sin φ2`. Inputs
//! where one of those vanishes have no solution of this form: states with more
//! than one zero amplitude such as `(1, 0, 0, 0)`, `(0, 0, 1, 1)/√2` or the Bell
//! pair, and states whose halves are parallel such as `(1, 1, 1, 1)/2`. Those
//! inputs are reported as [`QcError::DegenerateSynthesis`] rather than returned as
//! NaN gates. Such states are reachable with single-qubit gates and at most one
//! CNOT applied directly.

use std::f64::consts::{FRAC_PI_4, SQRT_2};

use ndarray::{array, s, Array1, Array2};
use num_complex::Complex64;

use crate::basis::kets;
use crate::catalog::{cnot, i, p, r};
use crate::error::{QcError, Result};
use crate::linalg::{c, canonicalize, close, kron, vnorm, vnormalize};

/// Agreement required between the replayed circuit and the requested state.
pub const CHECK_TOLERANCE: f64 = 1e-6;

/// Angles and gates of a two-qubit preparation circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSynthesis {
    pub theta1: f64,
    pub phi1: f64,
    pub phi2: f64,
    /// Row-major `[out, in]` matrix of the final single-qubit gate on the target.
    pub unitary: Array2<Complex64>,
}

impl StateSynthesis {
    pub fn rotation(&self) -> Array2<Complex64> {
        r(self.theta1).matrix()
    }

    pub fn phase1(&self) -> Array2<Complex64> {
        p(self.phi1).matrix()
    }

    pub fn phase2(&self) -> Array2<Complex64> {
        p(self.phi2).matrix()
    }

    /// Run the circuit on |00⟩ with plain matrix algebra.
    pub fn prepare(&self) -> Result<Array1<Complex64>> {
        let start = kets(&[0, 0])?;
        let layers = [
            kron(&self.rotation(), &r(FRAC_PI_4).matrix()),
            kron(&self.phase1(), &self.phase2()),
            cnot().matrix(),
            kron(&i().matrix(), &self.unitary),
        ];
        Ok(layers.iter().fold(start, |psi, layer| layer.dot(&psi)))
    }
}

/// Decompose a two-qubit state into the preparation circuit described in the module docs.
///
/// `psi` is normalized first. With `canonical` the global phase of `U` is removed,
/// so [`StateSynthesis::prepare`] reproduces `psi` only up to a global phase.
///
/// # Errors
/// [`QcError::Shape`] if `psi` does not have four entries and
/// [`QcError::DegenerateSynthesis`] for the inputs listed under the known limitation.
///
/// # Example
/// ```
/// use ndarray::array;
/// use num_complex::Complex64;
/// use qcsim::linalg::{close, vnormalize};
/// use qcsim::synthesis::synthesize;
///
/// let psi = vnormalize(&array![0.3, 0.1, 0.3, 0.9].mapv(|x| Complex64::new(x, 0.0)));
/// let circuit = synthesize(&psi, false).unwrap();
/// assert!(close(&circuit.prepare().unwrap(), &psi, 1e-9));
///
/// let uniform = array![0.5, 0.5, 0.5, 0.5].mapv(|x| Complex64::new(x, 0.0));
/// assert!(synthesize(&uniform, false).is_err());
/// ```
pub fn synthesize(psi: &Array1<Complex64>, canonical: bool) -> Result<StateSynthesis> {
    if psi.len() != 4 {
        return Err(QcError::Shape(format!(
            "state synthesis needs 4 amplitudes, got {}",
            psi.len()
        )));
    }
    if vnorm(psi) == 0.0 {
        return Err(QcError::degenerate("zero vector"));
    }
    let psi = vnormalize(psi);

    let upper = psi.slice(s![0..2]);
    let lower = psi.slice(s![2..4]);
    let cos_t1 = vnorm(&upper);
    let sin_t1 = vnorm(&lower);
    if cos_t1 < CHECK_TOLERANCE || sin_t1 < CHECK_TOLERANCE {
        return Err(QcError::degenerate(
            "one half of the state vanishes; it is a product state",
        ));
    }
    let a = upper.mapv(|z| z / cos_t1);
    let b = lower.mapv(|z| z / sin_t1);
    let theta1 = cos_t1.clamp(-1.0, 1.0).acos();

    // ⟨a|b⟩ = e^{iφ1} cos φ2
    let inner: Complex64 = a.iter().zip(b.iter()).map(|(x, y)| x.conj() * y).sum();
    let cos_p2 = inner.norm();
    let phi2 = cos_p2.clamp(-1.0, 1.0).acos();
    if phi2.sin() < CHECK_TOLERANCE {
        return Err(QcError::degenerate(
            "both halves of the state are parallel; it is a product state",
        ));
    }
    if cos_p2 < CHECK_TOLERANCE {
        return Err(QcError::degenerate(
            "both halves of the state are orthogonal; the relative phase is undefined",
        ));
    }
    let phi1 = inner.arg();

    let coeff = (c(1.0, 0.0) - Complex64::from_polar(1.0, -2.0 * phi2))
        / (2.0 * SQRT_2 * phi2.sin().powi(2));
    let other = array![
        [c(1.0, 0.0), -Complex64::from_polar(1.0, phi2)],
        [-Complex64::from_polar(1.0, phi2 - phi1), Complex64::from_polar(1.0, -phi1)]
    ];
    let targets = Array2::from_shape_fn((2, 2), |(row, col)| if col == 0 { a[row] } else { b[row] });
    let mut unitary = targets.dot(&other.mapv(|z| z * coeff));
    if canonical {
        unitary = canonicalize(&unitary, CHECK_TOLERANCE);
    }

    let finite = [theta1, phi1, phi2].iter().all(|x| x.is_finite())
        && unitary.iter().all(|z| z.re.is_finite() && z.im.is_finite());
    if !finite {
        return Err(QcError::degenerate("decomposition is not finite"));
    }

    let synthesis = StateSynthesis {
        theta1,
        phi1,
        phi2,
        unitary,
    };
    let prepared = synthesis.prepare()?;
    let matches = if canonical {
        close(
            &canonicalize(&prepared, CHECK_TOLERANCE),
            &canonicalize(&psi, CHECK_TOLERANCE),
            CHECK_TOLERANCE,
        )
    } else {
        close(&prepared, &psi, CHECK_TOLERANCE)
    };
    if !matches {
        return Err(QcError::degenerate(
            "replayed circuit does not reproduce the requested state",
        ));
    }
    Ok(synthesis)
}
