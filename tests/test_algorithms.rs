mod common;

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use qcsim::algorithms::{
    continued_fraction, continued_fraction_approx, diffusion, estimate_period, inverse_qft, qft,
};
use qcsim::catalog::{self, phase_oracle};
use qcsim::index::bits;
use qcsim::{QcError, QuantumComputer, DEFAULT_TOLERANCE};

use common::{assert_states_close, random_state};

/// Computer holding `state`, prepared by a unitary whose first column is `state`.
fn computer_in(state: &qcsim::State) -> QuantumComputer {
    let n = state.num_axes();
    let d = state.total_dim();
    let mut cols = vec![ndarray::Array1::from(state.to_vec())];
    for k in 0..d {
        let mut v = ndarray::Array1::<num_complex::Complex64>::zeros(d);
        v[k] = num_complex::Complex64::new(1.0, 0.0);
        for u in &cols {
            let proj: num_complex::Complex64 = u.iter().zip(v.iter()).map(|(a, b)| a.conj() * b).sum();
            v = &v - &u.mapv(|z| z * proj);
        }
        let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        if norm > 1e-6 && cols.len() < d {
            cols.push(v.mapv(|z| z / norm));
        }
    }
    let u = ndarray::Array2::from_shape_fn((d, d), |(i, j)| cols[j][i]);
    let prep = qcsim::Gate::from_matrix(&vec![2; n], &u, "prep").unwrap();
    let mut qc = QuantumComputer::qubits(n).unwrap();
    qc.gate(&prep, (0..n).collect::<Vec<_>>()).unwrap();
    qc
}

#[test]
fn test_qft_of_zero_is_uniform() {
    let mut qc = QuantumComputer::qubits(3).unwrap();
    qft(&mut qc, &[0, 1, 2]).unwrap();
    for z in qc.state().to_vec() {
        assert_abs_diff_eq!(z.re, 1.0 / 8f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(z.im, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_qft_matches_fourier_matrix() {
    let n = 3;
    let f = catalog::fourier(8).matrix();
    for x in 0..8 {
        let mut qc = QuantumComputer::qubits(n).unwrap();
        for (axis, bit) in bits(x, n).into_iter().enumerate() {
            if bit == 1 {
                qc.gate(&catalog::x(), axis).unwrap();
            }
        }
        qft(&mut qc, &[0, 1, 2]).unwrap();
        let expected: Vec<_> = f.column(x).to_vec();
        assert_states_close(&qc.state().to_vec(), &expected, 1e-12);
    }
}

#[test]
fn test_qft_roundtrip() {
    let mut rng = StdRng::seed_from_u64(21);
    for k in 1..=3 {
        let original = random_state(&vec![2; k], &mut rng);
        let mut qc = computer_in(&original);
        assert_states_close(&qc.state().to_vec(), &original.to_vec(), 1e-10);

        let axes: Vec<usize> = (0..k).collect();
        qft(&mut qc, &axes).unwrap();
        inverse_qft(&mut qc, &axes).unwrap();
        assert_states_close(&qc.state().to_vec(), &original.to_vec(), 1e-10);
    }
}

#[test]
fn test_qft_on_subset_leaves_other_axes() {
    let mut qc = QuantumComputer::qubits(3).unwrap();
    qc.gate(&catalog::x(), 1).unwrap();
    qft(&mut qc, &[2, 0]).unwrap();
    let marginal = qc.marginal(1).unwrap();
    assert_abs_diff_eq!(marginal[1], 1.0, epsilon = 1e-12);
}

#[test]
fn test_grover_two_qubits_is_exact() {
    let mut qc = QuantumComputer::qubits(2).unwrap();
    qc.multi_gate(&catalog::h(), [0usize, 1]).unwrap();
    qc.gate(&phase_oracle(&[0, 0, 0, 1]).unwrap(), [0, 1]).unwrap();
    diffusion(&mut qc, &[0, 1]).unwrap();
    assert_abs_diff_eq!(qc.probs()[&[1, 1][..]], 1.0, epsilon = 1e-12);
}

#[test]
fn test_grover_three_qubits_with_ancilla() {
    // marked item 5 = |101>; axis 3 is an untouched qutrit ancilla
    let mut qc = QuantumComputer::qudits(&[2, 2, 2, 3]).unwrap();
    let qubits = [0usize, 1, 2];
    let mut f = vec![0u8; 8];
    f[5] = 1;
    let oracle = phase_oracle(&f).unwrap();
    qc.multi_gate(&catalog::h(), qubits).unwrap();
    for _ in 0..2 {
        qc.gate(&oracle, qubits).unwrap();
        diffusion(&mut qc, &qubits).unwrap();
    }
    assert!(qc.probs()[&[1, 0, 1, 0][..]] > 0.9);
    assert_abs_diff_eq!(qc.marginal(3).unwrap()[0], 1.0, epsilon = 1e-12);
}

#[test]
fn test_diffusion_needs_qubits() {
    let mut qc = QuantumComputer::qubits(1).unwrap();
    assert!(diffusion(&mut qc, &[]).is_err());
}

#[test]
fn test_continued_fraction_exact() {
    let terms = continued_fraction(0.75, 100, DEFAULT_TOLERANCE);
    assert_eq!(terms, vec![0, 1, 3]);
    assert_eq!(continued_fraction_approx(&terms, 50), (3, 4));
    assert_eq!(continued_fraction(2.0 / 3.0, 100, DEFAULT_TOLERANCE), vec![0, 1, 2]);
}

#[test]
fn test_continued_fraction_folds_trailing_one() {
    assert_eq!(continued_fraction(1.0 - 1e-10, 100, DEFAULT_TOLERANCE), vec![1]);
}

#[test]
fn test_continued_fraction_respects_max_terms() {
    let terms = continued_fraction(std::f64::consts::PI, 4, DEFAULT_TOLERANCE);
    assert_eq!(terms, vec![3, 7, 15, 1]);
    assert_eq!(continued_fraction_approx(&terms[..2], 50), (22, 7));
    // 15 > 10 cuts the expansion back to 22/7
    assert_eq!(continued_fraction_approx(&terms, 10), (22, 7));
}

#[test]
fn test_estimate_period() {
    assert_eq!(estimate_period(192, 8, 50, DEFAULT_TOLERANCE).unwrap(), 4);
    assert_eq!(estimate_period(85, 8, 50, DEFAULT_TOLERANCE).unwrap(), 3);
    assert_eq!(estimate_period(128, 8, 50, DEFAULT_TOLERANCE).unwrap(), 2);
}

#[test]
fn test_estimate_period_rejects_oversized_registers() {
    assert!(matches!(
        estimate_period(1, 64, 50, DEFAULT_TOLERANCE),
        Err(QcError::InvalidParameter { .. })
    ));
    assert!(matches!(
        estimate_period(256, 8, 50, DEFAULT_TOLERANCE),
        Err(QcError::InvalidParameter { .. })
    ));
    assert_eq!(estimate_period(1, 63, 50, DEFAULT_TOLERANCE).unwrap(), 1);
}

#[test]
fn test_approx_of_irrational_stays_in_range() {
    // float noise gives ~100 terms whose convergents outgrow u64
    let golden = 0.6180339887498949;
    let terms = continued_fraction(golden, 100, DEFAULT_TOLERANCE);
    assert!(terms.len() > 60);
    let (num, den) = continued_fraction_approx(&terms, 50);
    assert!(den > 0);
    assert_abs_diff_eq!(num as f64 / den as f64, golden, epsilon = 1e-12);
}

#[test]
fn test_continued_fraction_tolerance_is_a_knob() {
    let third = 1.0 / 3.0 + 1e-4;
    assert_eq!(continued_fraction(third, 100, 1e-2), vec![0, 3]);
    assert!(continued_fraction(third, 100, 1e-9).len() > 2);
}
