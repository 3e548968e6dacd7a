use ndarray::{ArrayD, IxDyn};
use num_complex::Complex64;

use crate::error::Result;

/// Amplitudes of a register of qudits, one array axis per subsystem.
///
/// `data[[i_0, i_1, ..., i_{k-1}]]` is the amplitude of `|i_0 i_1 ... i_{k-1}⟩`
/// and `data.shape() == dims`.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub dims: Vec<usize>,
    pub data: ArrayD<Complex64>,
}

impl State {
    /// Creates |0,0,...,0⟩.
    ///
    /// # Panics
    /// Panics if any dimension is zero.
    pub fn zero_state(dims: &[usize]) -> Self {
        assert!(dims.iter().all(|&d| d > 0), "dims must be positive, got {:?}", dims);
        let mut data = ArrayD::zeros(IxDyn(dims));
        data[IxDyn(&vec![0; dims.len()])] = Complex64::new(1.0, 0.0);
        State {
            dims: dims.to_vec(),
            data,
        }
    }

    /// Creates |i_0, i_1, ..., i_{n-1}⟩.
    ///
    /// # Panics
    /// Panics if `levels` has the wrong length or a level is out of range.
    pub fn product_state(dims: &[usize], levels: &[usize]) -> Self {
        assert_eq!(dims.len(), levels.len(), "dims and levels must have the same length");
        for (i, (&level, &dim)) in levels.iter().zip(dims.iter()).enumerate() {
            assert!(level < dim, "level[{}] = {} is out of range for dim = {}", i, level, dim);
        }

        let mut data = ArrayD::zeros(IxDyn(dims));
        data[IxDyn(levels)] = Complex64::new(1.0, 0.0);
        State {
            dims: dims.to_vec(),
            data,
        }
    }

    /// Builds a state from row-major amplitudes. The amplitudes are taken as given,
    /// without normalization.
    pub fn from_amplitudes(dims: &[usize], amplitudes: Vec<Complex64>) -> Result<Self> {
        let data = ArrayD::from_shape_vec(IxDyn(dims), amplitudes)?;
        Ok(State {
            dims: dims.to_vec(),
            data,
        })
    }

    /// L2 norm of the amplitudes
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt()
    }

    /// Number of amplitudes, the product of all dims
    pub fn total_dim(&self) -> usize {
        self.data.len()
    }

    pub fn num_axes(&self) -> usize {
        self.dims.len()
    }

    /// Joint distribution `|amplitude|^2`, same shape as the state.
    pub fn probs(&self) -> ArrayD<f64> {
        self.data.mapv(|c| c.norm_sqr())
    }

    /// Amplitude at a coordinate tuple, `None` if the tuple is out of range.
    pub fn amplitude(&self, coords: &[usize]) -> Option<Complex64> {
        self.data.get(IxDyn(coords)).copied()
    }

    /// Amplitudes flattened in row-major order.
    pub fn to_vec(&self) -> Vec<Complex64> {
        self.data.iter().copied().collect()
    }
}
