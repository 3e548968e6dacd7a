mod common;

use std::f64::consts::FRAC_1_SQRT_2;

use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use qcsim::apply::apply_gate;
use qcsim::catalog::{self, controlled};
use qcsim::linalg::kron_all;
use qcsim::{Gate, QcError, QuantumComputer, State};

use common::{assert_states_close, c, random_state, random_unitary, total_probability, ATOL};

/// Amplitudes after applying the padded operator `I ⊗ .. ⊗ U ⊗ .. ⊗ I` explicitly.
fn dense_apply(state: &State, u: &Array2<num_complex::Complex64>, axis: usize) -> Vec<num_complex::Complex64> {
    let factors: Vec<Array2<num_complex::Complex64>> = state
        .dims
        .iter()
        .enumerate()
        .map(|(a, &d)| if a == axis { u.clone() } else { Array2::eye(d) })
        .collect();
    let psi: ndarray::Array1<_> = state.to_vec().into_iter().collect();
    kron_all(&factors).dot(&psi).to_vec()
}

#[test]
fn test_bell_pair() {
    let mut qc = QuantumComputer::qubits(2).unwrap();
    qc.gate(&catalog::h(), 0).unwrap();
    qc.gate(&catalog::cnot(), [0, 1]).unwrap();
    let expected = [
        c(FRAC_1_SQRT_2, 0.0),
        c(0.0, 0.0),
        c(0.0, 0.0),
        c(FRAC_1_SQRT_2, 0.0),
    ];
    assert_states_close(&qc.state().to_vec(), &expected, ATOL);
}

#[test]
fn test_controlled_x_on_basis_states() {
    let cx = controlled(&catalog::x());

    let mut state = State::product_state(&[2, 2], &[1, 0]);
    apply_gate(&mut state, &cx, &[0, 1]).unwrap();
    assert_eq!(state, State::product_state(&[2, 2], &[1, 1]));

    let mut state = State::zero_state(&[2, 2]);
    apply_gate(&mut state, &cx, &[0, 1]).unwrap();
    assert_eq!(state, State::zero_state(&[2, 2]));
}

#[test]
fn test_axis_order_binds_gate_slots() {
    // control on axis 2, target on axis 0
    let mut state = State::product_state(&[2, 2, 2], &[0, 0, 1]);
    apply_gate(&mut state, &catalog::cnot(), &[2, 0]).unwrap();
    assert_eq!(state, State::product_state(&[2, 2, 2], &[1, 0, 1]));
}

#[test]
fn test_single_axis_matches_dense_operator() {
    let mut rng = StdRng::seed_from_u64(7);
    let dims = [2, 3, 2];
    for axis in 0..dims.len() {
        let state = random_state(&dims, &mut rng);
        let u = random_unitary(dims[axis], &mut rng);
        let gate = Gate::from_matrix(&[dims[axis]], &u, "U").unwrap();

        let expected = dense_apply(&state, &u, axis);
        let mut actual = state.clone();
        apply_gate(&mut actual, &gate, &[axis]).unwrap();
        assert_states_close(&actual.to_vec(), &expected, 1e-10);
    }
}

#[test]
fn test_two_qudit_gate_matches_matrix() {
    // CSUM on adjacent qutrits equals the 9x9 matrix acting on the flattened pair.
    let mut rng = StdRng::seed_from_u64(3);
    let state = random_state(&[3, 3], &mut rng);
    let gate = catalog::csum(3);
    let psi: ndarray::Array1<_> = state.to_vec().into_iter().collect();
    let expected = gate.matrix().dot(&psi).to_vec();

    let mut actual = state;
    apply_gate(&mut actual, &gate, &[0, 1]).unwrap();
    assert_states_close(&actual.to_vec(), &expected, 1e-10);
}

#[test]
fn test_gate_then_dagger_roundtrip() {
    let mut rng = StdRng::seed_from_u64(11);
    let singles = [
        catalog::x(),
        catalog::y(),
        catalog::z(),
        catalog::h(),
        catalog::s(),
        catalog::t(),
        catalog::r(0.4),
        catalog::p(1.1),
    ];
    for gate in &singles {
        let original = random_state(&[2, 2], &mut rng);
        let mut state = original.clone();
        apply_gate(&mut state, gate, &[1]).unwrap();
        apply_gate(&mut state, &gate.dagger(), &[1]).unwrap();
        assert_states_close(&state.to_vec(), &original.to_vec(), 1e-10);
    }

    let u = Gate::from_matrix(&[2], &random_unitary(2, &mut rng), "U").unwrap();
    let doubles = [catalog::cnot(), catalog::swap(), controlled(&u), controlled(&controlled(&catalog::h()))];
    for gate in &doubles {
        let original = random_state(&[2, 2, 2], &mut rng);
        let on: Vec<usize> = [2, 0, 1][..gate.num_sites()].to_vec();
        let mut state = original.clone();
        apply_gate(&mut state, gate, &on).unwrap();
        apply_gate(&mut state, &gate.dagger(), &on).unwrap();
        assert_states_close(&state.to_vec(), &original.to_vec(), 1e-10);
    }
}

#[test]
fn test_unitary_sequence_preserves_norm() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut qc = QuantumComputer::qudits(&[2, 3, 2]).unwrap();
    qc.gate(&catalog::h(), 0).unwrap();
    qc.gate(&catalog::fourier(3), 1).unwrap();
    qc.gate(&catalog::cnot(), [0, 2]).unwrap();
    qc.gate(&Gate::from_matrix(&[3], &random_unitary(3, &mut rng), "U").unwrap(), 1).unwrap();
    qc.gate(&catalog::t(), 2).unwrap();
    assert_abs_diff_eq!(total_probability(qc.state()), 1.0, epsilon = 1e-12);
}

#[test]
fn test_errors_are_explicit() {
    let mut qc = QuantumComputer::qudits(&[2, 3]).unwrap();
    assert!(matches!(
        qc.gate(&catalog::h(), 1),
        Err(QcError::DimensionMismatch { axis: 1, expected: 2, actual: 3 })
    ));
    assert!(matches!(
        qc.gate(&catalog::cnot(), 0),
        Err(QcError::ArityMismatch { expected: 2, actual: 1 })
    ));
    assert!(matches!(
        qc.gate(&catalog::h(), 5),
        Err(QcError::AxisOutOfRange { axis: 5, num_axes: 2 })
    ));
}

#[test]
fn test_malformed_matrix_rejected() {
    let m = array![[c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)]];
    assert!(matches!(
        Gate::from_matrix(&[2], &m, "bad"),
        Err(QcError::MalformedGate { .. })
    ));
}
