//! # Cubic periodic field
//!
//! `Field3` holds a scalar field sampled on `n^3` points of a periodic
//! box, together with its fourier representation along one axis.
use crate::bases::{Differentiate, Fourier, Transform};
use crate::Real;
use ndarray::prelude::*;
use ndarray::Data;
use num_complex::Complex;

/// Field struct on a periodic cube
///
/// v: ndarray
///
///   Holds data in physical space
///
/// vhat: ndarray
///
///   Holds data in fourier space, transformed along the
///   axis of the last call to [`Field3::forward`]
///
/// ```
/// use cmfast_util::bases::Fourier;
/// use cmfast_util::Field3;
/// let mut field = Field3::new(Fourier::new(8, 100.));
/// field.v.fill(1.);
/// let dvdz = field.gradient(2);
/// assert!(dvdz.iter().all(|x| x.abs() < 1e-12));
/// ```
pub struct Field3 {
    /// Basis of all three (identical) axes
    pub base: Fourier,
    /// Field in physical space
    pub v: Array3<Real>,
    /// Field in fourier space
    pub vhat: Array3<Complex<Real>>,
}

impl Field3 {
    /// Returns zero field
    #[must_use]
    pub fn new(base: Fourier) -> Self {
        let n = base.n;
        Field3 {
            base,
            v: Array3::zeros((n, n, n)),
            vhat: Array3::zeros((n, n, n)),
        }
    }

    /// Returns field initialized from single precision samples
    ///
    /// # Panics
    /// Panics when the array is not of shape `(n, n, n)`.
    pub fn from_array<S: Data<Elem = f32>>(base: Fourier, array: &ArrayBase<S, Ix3>) -> Self {
        let n = base.n;
        assert!(
            array.shape() == &[n, n, n],
            "Field must be cubic with side {}, got {:?}",
            n,
            array.shape()
        );
        let mut field = Field3::new(base);
        field.v.assign(&array.mapv(Real::from));
        field
    }

    /// Forward transform along axis
    pub fn forward(&mut self, axis: usize) {
        self.base.forward(&self.v, &mut self.vhat, axis);
    }

    /// Backward transform along axis
    pub fn backward(&mut self, axis: usize) {
        self.base.backward(&self.vhat, &mut self.v, axis);
    }

    /// Spatial derivative of v along axis, in units of 1/[length]
    ///
    /// `v` is left untouched, `vhat` holds the spectrum of `v` afterwards.
    pub fn gradient(&mut self, axis: usize) -> Array3<Real> {
        self.forward(axis);
        let mut dvhat = Array3::<Complex<Real>>::zeros(self.vhat.raw_dim());
        self.base.differentiate(&self.vhat, &mut dvhat, 1, axis);
        let mut dv = Array3::<Real>::zeros(self.v.raw_dim());
        self.base.backward(&dvhat, &mut dv, axis);
        dv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_forward_backward_identity() {
        let n = 6;
        let mut field = Field3::new(Fourier::new(n, 1.));
        for (i, v) in field.v.iter_mut().enumerate() {
            *v = (i as f64).sin();
        }
        let expected = field.v.clone();
        for axis in 0..3 {
            field.forward(axis);
            field.v.fill(0.);
            field.backward(axis);
            for (a, b) in expected.iter().zip(field.v.iter()) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_gradient_along_each_axis() {
        let n = 8;
        let length = 4.;
        let kx = 2. * PI / length;
        for axis in 0..3 {
            let mut field = Field3::new(Fourier::new(n, length));
            field.v = Array3::from_shape_fn((n, n, n), |idx| {
                let i = [idx.0, idx.1, idx.2][axis];
                (kx * i as f64 * length / n as f64).sin()
            });
            let dv = field.gradient(axis);
            for (idx, d) in dv.indexed_iter() {
                let i = [idx.0, idx.1, idx.2][axis];
                let expected = kx * (kx * i as f64 * length / n as f64).cos();
                assert_abs_diff_eq!(*d, expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_gradient_keeps_v() {
        let n = 4;
        let mut field = Field3::new(Fourier::new(n, 1.));
        field.v[[1, 2, 3]] = 1.;
        let before = field.v.clone();
        let _ = field.gradient(2);
        assert_eq!(before, field.v);
    }

    #[test]
    #[should_panic(expected = "Field must be cubic")]
    fn test_from_array_not_cubic() {
        let array = Array3::<f32>::zeros((4, 4, 5));
        let _ = Field3::from_array(Fourier::new(4, 1.), &array);
    }
}
