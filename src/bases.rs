//! # Bases
//! Basis functions which implement forward/backward transforms
//! and differentiation along a single axis of an ndarray.
//!
//! Implemented:
//! - Fourier (periodic, complex-to-complex)
pub mod fourier;
use crate::Real;
pub use fourier::Fourier;
use ndarray::prelude::*;
use ndarray::{Data, DataMut, RemoveAxis};

/// Defines transform from physical to spectral space and vice versa.
pub trait Transform<T> {
    /// Transform array from physical to spectral space along axis
    fn forward<S1, S2, D>(
        &mut self,
        input: &ArrayBase<S1, D>,
        output: &mut ArrayBase<S2, D>,
        axis: usize,
    ) where
        S1: Data<Elem = Real>,
        S2: Data<Elem = T> + DataMut,
        D: Dimension + RemoveAxis;

    /// Transform array from spectral to physical space along axis
    fn backward<S1, S2, D>(
        &mut self,
        input: &ArrayBase<S1, D>,
        output: &mut ArrayBase<S2, D>,
        axis: usize,
    ) where
        S1: Data<Elem = T>,
        S2: Data<Elem = Real> + DataMut,
        D: Dimension + RemoveAxis;
}

/// Defines differentiation in spectral space
pub trait Differentiate<T> {
    /// Differentiate n_times along axis (performed in spectral space)
    fn differentiate<S1, S2, D>(
        &self,
        input: &ArrayBase<S1, D>,
        output: &mut ArrayBase<S2, D>,
        n_times: usize,
        axis: usize,
    ) where
        S1: Data<Elem = T>,
        S2: Data<Elem = T> + DataMut,
        D: Dimension;
}
