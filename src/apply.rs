//! Gate application by tensor contraction.
//!
//! A gate on `m` sites is contracted against `m` chosen axes of the state.
//! The contraction moves those axes to the front, treats the state as a
//! `(d_on, d_rest)` matrix, multiplies by the gate's `[out, in]` matrix and
//! moves the axes back. Axes not named keep their position and see the identity,
//! so the full `I ⊗ U ⊗ I` operator is never materialized.

use ndarray::{Array2, ArrayD, IxDyn};
use num_complex::Complex64;
use tracing::trace;

use crate::error::{QcError, Result};
use crate::gate::{verify_gate, Gate};
use crate::state::State;

/// Check that `on` is a valid binding of the gate's slots to the state's axes.
///
/// The i-th axis in `on` binds to the i-th slot of the gate.
pub fn check_binding(dims: &[usize], gate: &Gate, on: &[usize]) -> Result<()> {
    verify_gate(gate.tensor().shape())?;
    if on.len() != gate.num_sites() {
        return Err(QcError::ArityMismatch {
            expected: gate.num_sites(),
            actual: on.len(),
        });
    }
    for (slot, &axis) in on.iter().enumerate() {
        if axis >= dims.len() {
            return Err(QcError::AxisOutOfRange {
                axis,
                num_axes: dims.len(),
            });
        }
        if on[..slot].contains(&axis) {
            return Err(QcError::DuplicateAxis { axis });
        }
        let expected = gate.dims()[slot];
        if dims[axis] != expected {
            return Err(QcError::DimensionMismatch {
                axis,
                expected,
                actual: dims[axis],
            });
        }
    }
    Ok(())
}

/// Axis permutation that brings `on` to the front, followed by the remaining axes
/// in their original order.
fn front_permutation(num_axes: usize, on: &[usize]) -> Vec<usize> {
    on.iter()
        .copied()
        .chain((0..num_axes).filter(|axis| !on.contains(axis)))
        .collect()
}

fn invert_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0usize; perm.len()];
    for (pos, &axis) in perm.iter().enumerate() {
        inv[axis] = pos;
    }
    inv
}

/// Apply `gate` to the axes `on` of `state`, in place.
///
/// # Example
/// ```
/// use qcsim::{apply::apply_gate, catalog, State};
///
/// let mut state = State::zero_state(&[2, 2]);
/// apply_gate(&mut state, &catalog::x(), &[1]).unwrap();
/// assert_eq!(state.to_vec()[1].re, 1.0); // |01>
/// ```
pub fn apply_gate(state: &mut State, gate: &Gate, on: &[usize]) -> Result<()> {
    check_binding(&state.dims, gate, on)?;
    trace!(gate = %gate, ?on, "applying gate");

    let perm = front_permutation(state.dims.len(), on);
    let permuted_dims: Vec<usize> = perm.iter().map(|&axis| state.dims[axis]).collect();
    let d_on = gate.dim();
    let d_rest = state.total_dim() / d_on;

    let moved: Vec<Complex64> = state
        .data
        .view()
        .permuted_axes(IxDyn(&perm))
        .iter()
        .copied()
        .collect();
    let psi = Array2::from_shape_vec((d_on, d_rest), moved)?;
    let out = gate.matrix().dot(&psi);

    let out: Vec<Complex64> = out.iter().copied().collect();
    let out = ArrayD::from_shape_vec(IxDyn(&permuted_dims), out)?;
    state.data = out
        .permuted_axes(IxDyn(&invert_permutation(&perm)))
        .as_standard_layout()
        .into_owned();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_front_permutation() {
        assert_eq!(front_permutation(4, &[2, 0]), vec![2, 0, 1, 3]);
        assert_eq!(front_permutation(3, &[1]), vec![1, 0, 2]);
        assert_eq!(front_permutation(2, &[0, 1]), vec![0, 1]);
    }

    #[test]
    fn test_invert_permutation_roundtrip() {
        let perm = vec![2, 0, 3, 1];
        let inv = invert_permutation(&perm);
        for (pos, &axis) in perm.iter().enumerate() {
            assert_eq!(inv[axis], pos);
        }
    }

    #[test]
    fn test_check_binding_errors() {
        let cnot = catalog::cnot();
        assert!(matches!(
            check_binding(&[2, 2], &cnot, &[0]),
            Err(QcError::ArityMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            check_binding(&[2, 2], &cnot, &[0, 2]),
            Err(QcError::AxisOutOfRange { axis: 2, num_axes: 2 })
        ));
        assert!(matches!(
            check_binding(&[2, 2], &cnot, &[1, 1]),
            Err(QcError::DuplicateAxis { axis: 1 })
        ));
        assert!(matches!(
            check_binding(&[2, 3], &cnot, &[0, 1]),
            Err(QcError::DimensionMismatch { axis: 1, expected: 2, actual: 3 })
        ));
        assert!(check_binding(&[2, 3, 2], &cnot, &[2, 0]).is_ok());
    }

    #[test]
    fn test_apply_preserves_untouched_axis_order() {
        // X on the middle qutrit-sized slot must not disturb the outer qubits.
        let mut state = State::product_state(&[2, 3, 2], &[1, 0, 1]);
        apply_gate(&mut state, &catalog::shift(3), &[1]).unwrap();
        assert_eq!(state.amplitude(&[1, 1, 1]), Some(Complex64::new(1.0, 0.0)));
        assert_eq!(state.dims, vec![2, 3, 2]);
    }
}
