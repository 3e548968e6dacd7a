//! Human-readable dumps of states and matrices.
//!
//! All formatting goes through an explicit [`DisplayConfig`]; nothing here
//! touches global print settings.

use std::io::{self, Write};

use colored::Colorize;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::basis::named_qubit_states;
use crate::index::{basis_label, iter_basis};
use crate::linalg::{canonicalize, close, global_phase, round_to_zero};
use crate::state::State;

/// Probability below which [`DisplayConfig::nonzero`] hides an entry.
pub const NONZERO_THRESHOLD: f64 = 1e-8;

/// Formatting options for state and matrix dumps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Print real or imaginary parts below `small` as exact zeros.
    pub suppress_small: bool,
    pub small: f64,
    /// Entries with probability below this are skipped by the dumps.
    pub threshold: f64,
    /// Maximum characters per line in [`DisplayConfig::format_matrix`].
    pub line_width: usize,
    /// Side of one matrix cell in [`DisplayConfig::color_matrix`], in character pairs.
    pub cell_scale: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            suppress_small: false,
            small: 1e-6,
            threshold: 0.0,
            line_width: 75,
            cell_scale: 2,
        }
    }
}

impl DisplayConfig {
    pub fn with_suppress(mut self, suppress_small: bool) -> Self {
        self.suppress_small = suppress_small;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    /// Hide entries whose probability is numerically zero.
    pub fn nonzero(self) -> Self {
        self.with_threshold(NONZERO_THRESHOLD)
    }

    fn clean(&self, x: f64) -> f64 {
        if self.suppress_small && x.abs() < self.small {
            0.0
        } else {
            x
        }
    }

    /// Render a complex number, zeroing tiny parts when `suppress_small` is set.
    pub fn format_complex(&self, z: Complex64) -> String {
        Complex64::new(self.clean(z.re), self.clean(z.im)).to_string()
    }

    /// One line per basis state: `<digits> <probability>`.
    ///
    /// # Example
    /// ```
    /// use qcsim::{display::DisplayConfig, State};
    ///
    /// let state = State::product_state(&[2, 3], &[1, 2]);
    /// let mut out = Vec::new();
    /// DisplayConfig::default().nonzero().write_probs(&mut out, &state).unwrap();
    /// assert_eq!(String::from_utf8(out).unwrap(), "12 1\n");
    /// ```
    pub fn write_probs<W: Write>(&self, out: &mut W, state: &State) -> io::Result<()> {
        for coords in iter_basis(&state.dims) {
            let amp = state.data[coords.as_slice()];
            let p = amp.norm_sqr();
            if p < self.threshold {
                continue;
            }
            writeln!(out, "{} {}", basis_label(&coords), p)?;
        }
        Ok(())
    }

    /// One line per basis state: `<digits> <amplitude>`.
    pub fn write_amps<W: Write>(&self, out: &mut W, state: &State) -> io::Result<()> {
        for coords in iter_basis(&state.dims) {
            let amp = state.data[coords.as_slice()];
            if amp.norm_sqr() < self.threshold {
                continue;
            }
            writeln!(out, "{} {}", basis_label(&coords), self.format_complex(amp))?;
        }
        Ok(())
    }

    pub fn print_probs(&self, state: &State) -> io::Result<()> {
        self.write_probs(&mut io::stdout().lock(), state)
    }

    pub fn print_amps(&self, state: &State) -> io::Result<()> {
        self.write_amps(&mut io::stdout().lock(), state)
    }

    /// Aligned text rendering of a complex matrix.
    ///
    /// With `suppress_small`, zero entries are left blank. Rows wider than
    /// `line_width` wrap onto continuation lines.
    pub fn format_matrix(&self, m: &Array2<Complex64>) -> String {
        let cells: Vec<String> = m
            .iter()
            .map(|&z| {
                let z = Complex64::new(self.clean(z.re), self.clean(z.im));
                if self.suppress_small && z.re == 0.0 && z.im == 0.0 {
                    String::new()
                } else {
                    z.to_string()
                }
            })
            .collect();
        let width = cells.iter().map(|s| s.chars().count()).max().unwrap_or(0);
        let per_line = (self.line_width.saturating_sub(2) / (width + 2)).max(1);

        let mut out = String::new();
        for row in cells.chunks(m.ncols().max(1)) {
            for (n, chunk) in row.chunks(per_line).enumerate() {
                out.push_str(if n == 0 { "[ " } else { "  " });
                let line: Vec<String> = chunk.iter().map(|s| format!("{:>width$}", s)).collect();
                out.push_str(&line.join("  "));
                out.push('\n');
            }
        }
        out
    }

    /// Colour-block rendering of a matrix, one [`color`] cell per entry.
    pub fn color_matrix(&self, m: &Array2<Complex64>) -> String {
        let cell = "  ".repeat(self.cell_scale);
        let mut out = String::new();
        for row in m.rows() {
            let line: String = row
                .iter()
                .map(|&z| {
                    let (r, g, b) = palette_rgb(color(z, self.small));
                    cell.as_str().on_truecolor(r, g, b).to_string()
                })
                .collect();
            for _ in 0..self.cell_scale {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }
}

/// Eight phases for magnitudes up to 1/2.
const INNER_RING: [(u8, u8); 8] = [
    (4, 4), (4, 3), (4, 2), (3, 2),
    (2, 2), (2, 3), (2, 4), (3, 4),
];

/// Sixteen phases for magnitudes above 1/2.
const OUTER_RING: [(u8, u8); 16] = [
    (5, 5), (5, 4), (5, 3), (5, 2),
    (5, 1), (4, 1), (3, 1), (2, 1),
    (1, 1), (1, 2), (1, 3), (1, 4),
    (1, 5), (2, 5), (3, 5), (4, 5),
];

/// 256-colour palette index for a complex value.
///
/// Zero maps to a neutral grey; non-zero values are bucketed into a small or a
/// large magnitude band and then by phase angle.
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use qcsim::display::color;
///
/// assert_eq!(color(Complex64::new(0.0, 0.0), 1e-6), 145);
/// assert_eq!(color(Complex64::new(1.0, 0.0), 1e-6), 231);
/// ```
pub fn color(z: Complex64, tol: f64) -> u8 {
    let bucket = |slots: usize| {
        let turns = z.arg() / (2.0 * std::f64::consts::PI) * slots as f64;
        (turns.round_ties_even() as i64).rem_euclid(slots as i64) as usize
    };
    let mag = z.norm();
    let (x, y) = if mag <= tol {
        (3, 3)
    } else if mag < 0.5 + tol {
        INNER_RING[bucket(INNER_RING.len())]
    } else {
        OUTER_RING[bucket(OUTER_RING.len())]
    };
    36 * y + 6 * x + y + 16
}

const ANSI_BASE: [(u8, u8, u8); 16] = [
    (0, 0, 0), (128, 0, 0), (0, 128, 0), (128, 128, 0),
    (0, 0, 128), (128, 0, 128), (0, 128, 128), (192, 192, 192),
    (128, 128, 128), (255, 0, 0), (0, 255, 0), (255, 255, 0),
    (0, 0, 255), (255, 0, 255), (0, 255, 255), (255, 255, 255),
];

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// RGB value of an xterm 256-colour index.
pub fn palette_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => ANSI_BASE[index as usize],
        16..=231 => {
            let i = (index - 16) as usize;
            (CUBE_LEVELS[i / 36], CUBE_LEVELS[(i / 6) % 6], CUBE_LEVELS[i % 6])
        }
        _ => {
            let level = 8 + 10 * (index - 232);
            (level, level, level)
        }
    }
}

/// Name a single-qubit state up to global phase, e.g. `"1+0i * |+>"`.
///
/// Compares against |0⟩, |1⟩, |+⟩, |−⟩, |i⟩ and |−i⟩ within `tol` and returns
/// `"unrecognized"` when nothing matches.
///
/// # Example
/// ```
/// use qcsim::{basis, display::whatis};
///
/// let v = basis::ket_minus().mapv(|z| z * num_complex::Complex64::new(0.0, 1.0));
/// assert_eq!(whatis(&v, 1e-6), "0+1i * |->");
/// ```
pub fn whatis(v: &Array1<Complex64>, tol: f64) -> String {
    let unknown = "unrecognized".to_string();
    if v.len() != 2 {
        return unknown;
    }
    let v = round_to_zero(v, tol);
    let Some(phase) = global_phase(&v, tol) else {
        return unknown;
    };
    let canon = canonicalize(&v, tol);
    let clean = DisplayConfig::default().with_suppress(true);
    named_qubit_states()
        .into_iter()
        .find(|(ket, _)| close(&canon, ket, tol))
        .map_or(unknown, |(_, name)| {
            format!("{} * |{}>", clean.format_complex(phase), name)
        })
}
