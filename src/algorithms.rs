//! Composite routines built from the engine's public operations.

use std::f64::consts::PI;

use crate::catalog::{controlled, h, p, swap, x, z};
use crate::computer::QuantumComputer;
use crate::error::{QcError, Result};

/// Angle of the controlled phase between qubits `distance` apart in the QFT ladder.
fn ladder_angle(distance: usize) -> f64 {
    2.0 * PI / (1u64 << (distance + 1)) as f64
}

/// Quantum Fourier transform on the ordered qubits `qubits`; `qubits[0]` is the
/// most significant bit.
///
/// Hadamard and controlled-phase ladder followed by a bit reversal with SWAPs.
///
/// # Example
/// ```
/// use qcsim::{algorithms::qft, QuantumComputer};
///
/// let mut qc = QuantumComputer::qubits(3).unwrap();
/// qft(&mut qc, &[0, 1, 2]).unwrap();
/// for p in qc.probs().iter() {
///     assert!((p - 0.125).abs() < 1e-12);
/// }
/// ```
pub fn qft(qc: &mut QuantumComputer, qubits: &[usize]) -> Result<()> {
    for (i, &target) in qubits.iter().enumerate() {
        qc.gate(&h(), target)?;
        for (j, &ctrl) in qubits[i + 1..].iter().enumerate() {
            qc.gate(&controlled(&p(ladder_angle(j + 1))), [ctrl, target])?;
        }
    }
    let n = qubits.len();
    for i in 0..n / 2 {
        qc.gate(&swap(), [qubits[i], qubits[n - 1 - i]])?;
    }
    Ok(())
}

/// Exact inverse of [`qft`]: the adjoint of every gate, in reverse order.
pub fn inverse_qft(qc: &mut QuantumComputer, qubits: &[usize]) -> Result<()> {
    let n = qubits.len();
    for i in (0..n / 2).rev() {
        qc.gate(&swap(), [qubits[i], qubits[n - 1 - i]])?;
    }
    for (i, &target) in qubits.iter().enumerate().rev() {
        for (j, &ctrl) in qubits[i + 1..].iter().enumerate().rev() {
            qc.gate(&controlled(&p(-ladder_angle(j + 1))), [ctrl, target])?;
        }
        qc.gate(&h(), target)?;
    }
    Ok(())
}

/// Grover diffusion (inversion about the mean) on `qubits`.
///
/// The multi-controlled phase flip is built by lifting `Z` through
/// [`controlled`] once per extra qubit, so it touches only the named qubits.
pub fn diffusion(qc: &mut QuantumComputer, qubits: &[usize]) -> Result<()> {
    if qubits.is_empty() {
        return Err(QcError::invalid_register("diffusion needs at least one qubit"));
    }
    let flip = (1..qubits.len()).fold(z(), |gate, _| controlled(&gate));

    qc.multi_gate(&h(), qubits.iter().copied())?;
    qc.multi_gate(&x(), qubits.iter().copied())?;
    qc.gate(&flip, qubits)?;
    qc.multi_gate(&x(), qubits.iter().copied())?;
    qc.multi_gate(&h(), qubits.iter().copied())
}

/// Continued-fraction expansion of a non-negative `x`, at most `max_terms` terms.
///
/// Stops as soon as the remainder drops to `tol`. An exact rational never ends
/// in a spurious `1` term: `[.., a, 1]` is folded to `[.., a + 1]`.
///
/// # Example
/// ```
/// use qcsim::algorithms::{continued_fraction, continued_fraction_approx};
///
/// let terms = continued_fraction(0.75, 100, 1e-9);
/// assert_eq!(terms, vec![0, 1, 3]);
/// assert_eq!(continued_fraction_approx(&terms, 50), (3, 4));
/// ```
pub fn continued_fraction(mut x: f64, max_terms: usize, tol: f64) -> Vec<u64> {
    let mut terms = Vec::new();
    for _ in 0..max_terms {
        let k = x.trunc().max(0.0);
        terms.push(k as u64);
        x -= k;
        if x <= tol {
            if terms.len() >= 2 && terms.last() == Some(&1) {
                terms.pop();
                if let Some(last) = terms.last_mut() {
                    *last += 1;
                }
            }
            break;
        }
        x = 1.0 / x;
    }
    terms
}

/// Best rational approximation `(numerator, denominator)` from continued-fraction terms.
///
/// The expansion is cut before the first term after the integer part that exceeds
/// `thresh`; a large term means the remainder is numerical noise. Convergents are
/// built front to back, and the last one whose numerator and denominator fit in
/// `u64` is returned. No terms gives `(1, 0)`.
pub fn continued_fraction_approx(terms: &[u64], thresh: u64) -> (u64, u64) {
    let cut = terms
        .iter()
        .skip(1)
        .position(|&t| t > thresh)
        .map_or(terms.len(), |pos| pos + 1);

    // (h_{n-1}, h_{n-2}) and (k_{n-1}, k_{n-2})
    let (mut num, mut num_prev) = (1u64, 0u64);
    let (mut den, mut den_prev) = (0u64, 1u64);
    for &t in &terms[..cut] {
        let next_num = t.checked_mul(num).and_then(|v| v.checked_add(num_prev));
        let next_den = t.checked_mul(den).and_then(|v| v.checked_add(den_prev));
        match (next_num, next_den) {
            (Some(h), Some(k)) => {
                (num, num_prev) = (h, num);
                (den, den_prev) = (k, den);
            }
            _ => break,
        }
    }
    (num, den)
}

/// Period estimate from a phase-estimation readout `measured` on `num_bits` bits.
///
/// Returns the denominator of the best rational approximation of
/// `measured / 2^num_bits`, expanded with remainder tolerance `tol`.
///
/// # Errors
/// [`QcError::InvalidParameter`] when `num_bits` is 64 or more, or `measured`
/// does not fit in `num_bits` bits.
pub fn estimate_period(measured: u64, num_bits: u32, thresh: u64, tol: f64) -> Result<u64> {
    let size = 1u64
        .checked_shl(num_bits)
        .ok_or_else(|| QcError::invalid_parameter(format!("{} bits do not fit in u64", num_bits)))?;
    if measured >= size {
        return Err(QcError::invalid_parameter(format!(
            "readout {} does not fit in {} bits",
            measured, num_bits
        )));
    }
    let terms = continued_fraction(measured as f64 / size as f64, 100, tol);
    Ok(continued_fraction_approx(&terms, thresh).1)
}
