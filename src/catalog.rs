//! Gate constructors.
//!
//! Every function here returns a [`Gate`] whose tensor satisfies
//! [`crate::gate::verify_gate`]. Qubit gates are written as row-major `[out, in]`
//! matrices and reshaped into the engine's input-first layout.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};
use std::iter::once;

use ndarray::{array, Array1, Array2, ArrayD, Dimension, IxDyn};
use num_complex::Complex64;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::basis::omega;
use crate::config::DEFAULT_TOLERANCE;
use crate::error::{QcError, Result};
use crate::gate::Gate;
use crate::index::bits;
use crate::linalg::{c, mpow};

/// Exact base-`n` logarithm of `x`.
///
/// # Errors
/// [`QcError::InvalidDimsForLog`] when `x` is not a power of `n`.
///
/// # Example
/// ```
/// use qcsim::catalog::logn;
/// assert_eq!(logn(16, 4).unwrap(), 2);
/// assert!(logn(8, 4).is_err());
/// ```
pub fn logn(x: usize, n: usize) -> Result<usize> {
    let err = QcError::InvalidDimsForLog { value: x, base: n };
    if x == 0 || n < 2 {
        return Err(err);
    }
    let val = ((x as f64).ln() / (n as f64).ln()).round() as u32;
    match n.checked_pow(val) {
        Some(power) if power == x => Ok(val as usize),
        _ => Err(err),
    }
}

/// Build a qubit gate from a flat row-major `2^q x 2^q` matrix of `4^q` entries.
///
/// The first qubit is the most significant bit of the row and column index,
/// so `CNOT` is written with the control first.
pub fn qubit_gate(entries: &[Complex64], label: impl Into<String>) -> Result<Gate> {
    let qubits = logn(entries.len(), 4)?;
    let d = 1usize << qubits;
    let matrix = Array2::from_shape_vec((d, d), entries.to_vec())?;
    Gate::from_matrix(&vec![2; qubits], &matrix, label)
}

fn qubit(matrix: Array2<Complex64>, label: &str) -> Gate {
    let qubits = matrix.nrows().trailing_zeros() as usize;
    Gate::from_square(&vec![2; qubits], &matrix, label)
}

/// Identity on sites of the given dimensions.
pub fn identity(dims: &[usize]) -> Gate {
    let d: usize = dims.iter().product();
    Gate::from_square(dims, &Array2::eye(d), "I")
}

/// Single-qubit identity.
pub fn i() -> Gate {
    identity(&[2])
}

pub fn x() -> Gate {
    qubit(array![[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]], "X")
}

pub fn y() -> Gate {
    qubit(array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]], "Y")
}

pub fn z() -> Gate {
    qubit(array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]], "Z")
}

pub fn h() -> Gate {
    let s = c(FRAC_1_SQRT_2, 0.0);
    qubit(array![[s, s], [s, -s]], "H")
}

/// S = diag(1, i)
pub fn s() -> Gate {
    qubit(array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(0.0, 1.0)]], "S")
}

/// T = diag(1, e^{iπ/4})
pub fn t() -> Gate {
    qubit(
        array![
            [c(1.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), Complex64::from_polar(1.0, FRAC_PI_4)]
        ],
        "T",
    )
}

/// Real rotation by `theta`: [[cos θ, −sin θ], [sin θ, cos θ]].
pub fn r(theta: f64) -> Gate {
    let (sin, cos) = theta.sin_cos();
    qubit(
        array![[c(cos, 0.0), c(-sin, 0.0)], [c(sin, 0.0), c(cos, 0.0)]],
        &format!("R({:.4})", theta),
    )
}

/// Phase gate diag(1, e^{iθ}).
pub fn p(theta: f64) -> Gate {
    qubit(
        array![
            [c(1.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), Complex64::from_polar(1.0, theta)]
        ],
        &format!("P({:.4})", theta),
    )
}

pub fn swap() -> Gate {
    let mut m = Array2::zeros((4, 4));
    m[[0, 0]] = c(1.0, 0.0);
    m[[1, 2]] = c(1.0, 0.0);
    m[[2, 1]] = c(1.0, 0.0);
    m[[3, 3]] = c(1.0, 0.0);
    qubit(m, "SWAP")
}

/// CNOT with the control on the first axis.
pub fn cnot() -> Gate {
    controlled(&x()).with_label("CNOT")
}

/// Square root of NOT, computed as the principal matrix square root of X.
pub fn sqrt_not() -> Result<Gate> {
    Ok(qubit(mpow(&x().matrix(), 0.5, DEFAULT_TOLERANCE)?, "√NOT"))
}

/// Lift `gate` to a controlled gate with a new qubit control as its first site.
///
/// The result acts as the identity when the control is 0 and as `gate` on the
/// remaining sites when the control is 1.
///
/// # Example
/// ```
/// use qcsim::catalog::{controlled, z};
///
/// let cz = controlled(&z());
/// assert_eq!(cz.dims(), &[2, 2]);
/// assert_eq!(cz.label(), "C(Z)");
/// ```
pub fn controlled(gate: &Gate) -> Gate {
    let dims = gate.dims();
    let m = dims.len();
    let shape: Vec<usize> = once(2)
        .chain(dims.iter().copied())
        .chain(once(2))
        .chain(dims.iter().copied())
        .collect();
    let tensor = ArrayD::from_shape_fn(IxDyn(&shape), |ix| {
        let ix = ix.slice();
        let (ctrl_in, target_in) = (ix[0], &ix[1..=m]);
        let (ctrl_out, target_out) = (ix[m + 1], &ix[m + 2..]);
        if ctrl_in != ctrl_out {
            c(0.0, 0.0)
        } else if ctrl_in == 0 {
            if target_in == target_out {
                c(1.0, 0.0)
            } else {
                c(0.0, 0.0)
            }
        } else {
            gate.tensor()[[target_in, target_out].concat().as_slice()]
        }
    });
    Gate::from_parts(tensor, format!("C({})", gate.label()))
}

/// Controlled `gate` with the qubit control as its last site instead of its first.
///
/// On a pair of qubits this equals `SWAP · C(gate) · SWAP`.
pub fn reverse_controlled(gate: &Gate) -> Gate {
    let m = gate.num_sites();
    // [c, t.., c', t'..] -> [t.., c, t'.., c']
    let perm: Vec<usize> = (1..=m)
        .chain(once(0))
        .chain(m + 2..=2 * m + 1)
        .chain(once(m + 1))
        .collect();
    let tensor = controlled(gate).tensor().clone().permuted_axes(IxDyn(&perm));
    Gate::from_parts(tensor, format!("RC({})", gate.label()))
}

fn check_bits(values: &[u8]) -> Result<()> {
    match values.iter().find(|&&b| b > 1) {
        Some(bad) => Err(QcError::invalid_oracle(format!(
            "oracle outputs must be 0 or 1, got {}",
            bad
        ))),
        None => Ok(()),
    }
}

/// Diagonal phase oracle `|x⟩ → (−1)^{f(x)} |x⟩`.
///
/// `f` lists f(x) ∈ {0, 1} for every input x = 0 .. 2^q − 1 in big-endian bit order.
pub fn phase_oracle(f: &[u8]) -> Result<Gate> {
    let qubits = logn(f.len(), 2)?;
    check_bits(f)?;
    let signs: Array1<Complex64> = f
        .iter()
        .map(|&fx| if fx == 0 { c(1.0, 0.0) } else { c(-1.0, 0.0) })
        .collect();
    Gate::from_matrix(&vec![2; qubits], &Array2::from_diag(&signs), "Uf")
}

/// XOR oracle `|x⟩|y⟩ → |x⟩|y ⊕ f(x)⟩` on `q` input qubits followed by the output qubits.
///
/// `f[x]` is the output bit pattern for input x; every pattern must have the same width.
///
/// # Example
/// ```
/// use qcsim::catalog::xor_oracle;
///
/// // f(x) = x on one bit: the oracle is CNOT.
/// let uf = xor_oracle(&[vec![0], vec![1]]).unwrap();
/// assert_eq!(uf.matrix(), qcsim::catalog::cnot().matrix());
/// ```
pub fn xor_oracle(f: &[Vec<u8>]) -> Result<Gate> {
    let qubits = logn(f.len(), 2)?;
    let outs = f.first().map_or(0, Vec::len);
    if outs == 0 {
        return Err(QcError::invalid_oracle("oracle has no output bits"));
    }
    for row in f {
        if row.len() != outs {
            return Err(QcError::invalid_oracle(format!(
                "output widths differ: {} vs {}",
                outs,
                row.len()
            )));
        }
        check_bits(row)?;
    }

    let sites = qubits + outs;
    let mut tensor = ArrayD::zeros(IxDyn(&vec![2; 2 * sites]));
    for (x, fx) in f.iter().enumerate() {
        let x_bits = bits(x, qubits);
        for y in 0..(1usize << outs) {
            let y_bits = bits(y, outs);
            let y_out: Vec<usize> = y_bits
                .iter()
                .zip(fx)
                .map(|(&yb, &fb)| yb ^ usize::from(fb))
                .collect();
            let idx = [x_bits.as_slice(), &y_bits, &x_bits, &y_out].concat();
            tensor[idx.as_slice()] = c(1.0, 0.0);
        }
    }
    Ok(Gate::from_parts(tensor, "Uf".to_string()))
}

/// Phase oracle of a uniformly random balanced function on `n` bits.
pub fn random_balanced_oracle<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Gate> {
    let size = 1usize << n;
    let mut f: Vec<u8> = vec![1; size / 2];
    f.extend(vec![0; size / 2]);
    f.shuffle(rng);
    phase_oracle(&f)
}

/// Cyclic shift on a qudit: |k⟩ → |k+1 mod d⟩.
pub fn shift(d: usize) -> Gate {
    let mut m = Array2::zeros((d, d));
    for k in 0..d {
        m[[(k + 1) % d, k]] = c(1.0, 0.0);
    }
    Gate::from_square(&[d], &m, &format!("X{}", d))
}

/// Clock on a qudit: |k⟩ → ω^k |k⟩ with ω = e^{2πi/d}.
pub fn clock(d: usize) -> Gate {
    let w = omega(d);
    let phases: Array1<Complex64> = (0..d).map(|k| w.powu(k as u32)).collect();
    Gate::from_square(&[d], &Array2::from_diag(&phases), &format!("Z{}", d))
}

/// Discrete Fourier transform on a qudit: F[p][q] = ω^{pq} / √d.
pub fn fourier(d: usize) -> Gate {
    let w = omega(d);
    let norm = 1.0 / (d as f64).sqrt();
    let m = Array2::from_shape_fn((d, d), |(p, q)| w.powu((p * q % d) as u32) * norm);
    Gate::from_square(&[d], &m, &format!("F{}", d))
}

/// Controlled sum on two qudits: |a, b⟩ → |a, a + b mod d⟩.
pub fn csum(d: usize) -> Gate {
    let mut m = Array2::zeros((d * d, d * d));
    for a in 0..d {
        for b in 0..d {
            m[[a * d + (a + b) % d, a * d + b]] = c(1.0, 0.0);
        }
    }
    Gate::from_square(&[d, d], &m, &format!("CSUM{}", d))
}

/// Swap of two qudits of dimension `d`.
pub fn qudit_swap(d: usize) -> Gate {
    let mut m = Array2::zeros((d * d, d * d));
    for a in 0..d {
        for b in 0..d {
            m[[b * d + a, a * d + b]] = c(1.0, 0.0);
        }
    }
    Gate::from_square(&[d, d], &m, &format!("SWAP{}", d))
}
