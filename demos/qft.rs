//! Quantum Fourier Transform demo.
//!
//! Runs the textbook QFT on a few basis states of a 4-qubit register and
//! compares the result with the dense Fourier gate on the same register.
//!
//! Run with: cargo run --example qft

use qcsim::algorithms::{inverse_qft, qft};
use qcsim::index::{basis_label, bits};
use qcsim::{catalog, DisplayConfig, QuantumComputer};

fn prepare(n: usize, x: usize) -> QuantumComputer {
    let mut qc = QuantumComputer::qubits(n).unwrap();
    for (axis, bit) in bits(x, n).into_iter().enumerate() {
        if bit == 1 {
            qc.gate(&catalog::x(), axis).unwrap();
        }
    }
    qc
}

fn main() {
    let n = 4;
    let axes: Vec<usize> = (0..n).collect();
    let display = DisplayConfig::default().with_suppress(true);
    println!("=== {}-qubit Quantum Fourier Transform ===\n", n);

    // QFT|0000⟩ is the uniform superposition
    let mut qc = prepare(n, 0);
    qft(&mut qc, &axes).unwrap();
    println!("QFT|{}⟩:", basis_label(&bits(0, n)));
    display.print_amps(qc.state()).unwrap();

    // QFT|0001⟩ carries the phase progression e^(2πi k/16)
    let mut qc = prepare(n, 1);
    qft(&mut qc, &axes).unwrap();
    println!("\nQFT|{}⟩:", basis_label(&bits(1, n)));
    display.print_amps(qc.state()).unwrap();

    // The circuit agrees with the dense 16-level Fourier matrix
    let f = catalog::fourier(1 << n).matrix();
    let worst = (0..1 << n)
        .map(|x| {
            let mut qc = prepare(n, x);
            qft(&mut qc, &axes).unwrap();
            qc.state()
                .to_vec()
                .iter()
                .zip(f.column(x).iter())
                .map(|(a, b)| (a - b).norm())
                .fold(0.0, f64::max)
        })
        .fold(0.0, f64::max);
    println!("\nLargest deviation from the Fourier matrix: {:.2e}", worst);

    // Inverse QFT undoes the transform
    let mut qc = prepare(n, 11);
    qft(&mut qc, &axes).unwrap();
    inverse_qft(&mut qc, &axes).unwrap();
    println!("\nQFT then inverse QFT on |{}⟩:", basis_label(&bits(11, n)));
    display.nonzero().print_probs(qc.state()).unwrap();
}
