//! Grover search demo.
//!
//! Searches a 3-qubit space for a marked item with a phase oracle, then
//! samples the register to show the amplified outcome.
//!
//! Run with: cargo run --example grover

use rand::rngs::StdRng;
use rand::SeedableRng;

use qcsim::algorithms::diffusion;
use qcsim::catalog::{self, phase_oracle};
use qcsim::index::{basis_label, unbits};
use qcsim::{DisplayConfig, QuantumComputer};

fn main() {
    let n = 3;
    let marked = 5;
    let qubits: Vec<usize> = (0..n).collect();
    let mut f = vec![0u8; 1 << n];
    f[marked] = 1;
    let oracle = phase_oracle(&f).unwrap();

    let iterations = ((std::f64::consts::PI / 4.0) * ((1 << n) as f64).sqrt()).floor() as usize;
    println!("=== Grover search over {} items, marked {} ===", 1 << n, marked);
    println!("Iterations: {}\n", iterations);

    let mut qc = QuantumComputer::qubits(n).unwrap();
    qc.multi_gate(&catalog::h(), qubits.iter().copied()).unwrap();
    for step in 1..=iterations {
        qc.gate(&oracle, qubits.clone()).unwrap();
        diffusion(&mut qc, &qubits).unwrap();
        println!("After iteration {}:", step);
        DisplayConfig::default().print_probs(qc.state()).unwrap();
        println!();
    }

    let mut rng = StdRng::seed_from_u64(2024);
    let (p, outcome) = qc.joint_measure(&qubits, &mut rng).unwrap();
    println!(
        "Measured |{}⟩ = {} with probability {:.4}",
        basis_label(&outcome),
        unbits(&outcome),
        p
    );
}
