//! # Fourier
//! Complex-to-complex transform of ndarrays from physical space to
//! fourier space and vice versa, on a periodic domain of length `L`.
//!
//! The forward transform is unnormalized, the backward transform
//! is scaled by 1/n, so that backward(forward(v)) == v.
use super::{Differentiate, Transform};
use crate::Real;
use ndarray::prelude::*;
use ndarray::{Data, DataMut, RemoveAxis, Zip};
use ndrustfft::{ndfft, ndifft, FftHandler};
use num_complex::Complex;
use std::f64::consts::PI;

/// # Periodic basis: Fourier modes
pub struct Fourier {
    /// Number of grid points
    pub n: usize,
    /// Physical length of the periodic domain
    pub length: Real,
    /// Angular wavenumbers, ordered like the fft output
    pub k: Array1<Real>,
    fft_handler: FftHandler<Real>,
}

impl Fourier {
    /// Creates a new Basis.
    ///
    /// # Arguments
    /// * `n` - Length of array's dimension which shall live in fourier space.
    /// * `length` - Length of the periodic domain, sets the units of `k`.
    ///
    /// # Examples
    /// ```
    /// use cmfast_util::bases::Fourier;
    /// let fourier = Fourier::new(8, 100.);
    /// assert_eq!(fourier.k[0], 0.);
    /// ```
    #[must_use]
    pub fn new(n: usize, length: Real) -> Self {
        Fourier {
            n,
            length,
            k: Fourier::wavenumbers(n, length),
            fft_handler: FftHandler::new(n),
        }
    }

    /// Angular wavenumbers `fftfreq(n) * n * 2 pi / length`
    ///
    /// Indices `0..(n+1)/2` hold the non-negative modes,
    /// the remaining indices the negative modes `-n/2..-1`.
    fn wavenumbers(n: usize, length: Real) -> Array1<Real> {
        let n_pos = (n + 1) / 2;
        let val = 1. / n as Real;
        Array1::from_shape_fn(n, |i| {
            let m = if i < n_pos {
                i as Real
            } else {
                i as Real - n as Real
            };
            m * val * n as Real * 2. * PI / length
        })
    }

    fn check_array<T, S, D>(&self, data: &ArrayBase<S, D>, axis: usize)
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        assert!(
            self.n == data.shape()[axis],
            "Size mismatch in fft, got {} expected {}",
            data.shape()[axis],
            self.n
        );
    }
}

impl Transform<Complex<Real>> for Fourier {
    /// Transform: Physical space --> Fourier space
    ///
    /// The transform is conducted along a single axis.
    /// Size of axis must match fourier's parameter *n*.
    ///
    /// # Example
    /// Forward transform of a constant along the last axis
    /// ```
    /// use cmfast_util::bases::{Fourier, Transform};
    /// use ndarray::Array3;
    /// use num_complex::Complex;
    /// let n = 4;
    /// let mut fourier = Fourier::new(n, 1.);
    /// let v = Array3::<f64>::ones((n, n, n));
    /// let mut vhat = Array3::<Complex<f64>>::zeros((n, n, n));
    /// fourier.forward(&v, &mut vhat, 2);
    /// assert_eq!(vhat[[0, 0, 0]].re, 4.);
    /// ```
    fn forward<S1, S2, D>(
        &mut self,
        input: &ArrayBase<S1, D>,
        output: &mut ArrayBase<S2, D>,
        axis: usize,
    ) where
        S1: Data<Elem = Real>,
        S2: Data<Elem = Complex<Real>> + DataMut,
        D: Dimension + RemoveAxis,
    {
        self.check_array(input, axis);
        self.check_array(output, axis);
        let mut buffer = input.mapv(|x| Complex::new(x, 0.));
        ndfft(&mut buffer, output, &mut self.fft_handler, axis);
    }

    /// Transform: Fourier space --> Physical space
    ///
    /// Only the real part is kept; for spectra of real fields the
    /// imaginary part is round-off.
    fn backward<S1, S2, D>(
        &mut self,
        input: &ArrayBase<S1, D>,
        output: &mut ArrayBase<S2, D>,
        axis: usize,
    ) where
        S1: Data<Elem = Complex<Real>>,
        S2: Data<Elem = Real> + DataMut,
        D: Dimension + RemoveAxis,
    {
        self.check_array(input, axis);
        self.check_array(output, axis);
        let mut buffer = input.to_owned();
        let mut result = Array::<Complex<Real>, D>::zeros(input.raw_dim());
        ndifft(&mut buffer, &mut result, &mut self.fft_handler, axis);
        Zip::from(output).and(&result).for_each(|o, r| *o = r.re);
    }
}

impl Differentiate<Complex<Real>> for Fourier {
    /// Differentiate n_times along axis: multiply each mode by (ik)^n_times
    ///
    /// # Example
    /// ```
    /// use cmfast_util::bases::{Differentiate, Fourier};
    /// use ndarray::Array1;
    /// use num_complex::Complex;
    /// let fourier = Fourier::new(4, std::f64::consts::TAU);
    /// let vhat = Array1::from_elem(4, Complex::new(1., 0.));
    /// let mut dvhat = Array1::<Complex<f64>>::zeros(4);
    /// fourier.differentiate(&vhat, &mut dvhat, 1, 0);
    /// assert_eq!(dvhat[1], Complex::new(0., 1.));
    /// ```
    fn differentiate<S1, S2, D>(
        &self,
        input: &ArrayBase<S1, D>,
        output: &mut ArrayBase<S2, D>,
        n_times: usize,
        axis: usize,
    ) where
        S1: Data<Elem = Complex<Real>>,
        S2: Data<Elem = Complex<Real>> + DataMut,
        D: Dimension,
    {
        self.check_array(input, axis);
        output.assign(input);
        let factor = self.k.mapv(|k| {
            let ik = Complex::new(0., k);
            let mut f = Complex::new(1., 0.);
            for _ in 0..n_times {
                f = f * ik;
            }
            f
        });
        for mut lane in output.lanes_mut(Axis(axis)) {
            lane *= &factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wavenumbers_even() {
        let fourier = Fourier::new(8, 2. * PI);
        let expected = [0., 1., 2., 3., -4., -3., -2., -1.];
        for (k, e) in fourier.k.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*k, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_wavenumbers_odd() {
        let fourier = Fourier::new(7, 2. * PI);
        let expected = [0., 1., 2., 3., -3., -2., -1.];
        for (k, e) in fourier.k.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*k, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_wavenumbers_box_length() {
        let fourier = Fourier::new(4, 100.);
        assert_abs_diff_eq!(fourier.k[1], 2. * PI / 100., epsilon = 1e-15);
        assert_abs_diff_eq!(fourier.k[2], -4. * PI / 100., epsilon = 1e-15);
    }

    #[test]
    fn test_forward_backward() {
        let (nx, ny) = (6, 5);
        let mut fourier = Fourier::new(ny, 1.);
        let v = Array2::from_shape_fn((nx, ny), |(i, j)| (i * ny + j) as f64 - 7.5);
        let mut vhat = Array2::<Complex<f64>>::zeros((nx, ny));
        let mut w = Array2::<f64>::zeros((nx, ny));
        fourier.forward(&v, &mut vhat, 1);
        fourier.backward(&vhat, &mut w, 1);
        for (a, b) in v.iter().zip(w.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_forward_unnormalized() {
        let n = 8;
        let mut fourier = Fourier::new(n, 1.);
        let v = Array1::from_elem(n, 2.);
        let mut vhat = Array1::<Complex<f64>>::zeros(n);
        fourier.forward(&v, &mut vhat, 0);
        assert_abs_diff_eq!(vhat[0].re, 16., epsilon = 1e-12);
        for x in vhat.iter().skip(1) {
            assert_abs_diff_eq!(x.norm(), 0., epsilon = 1e-12);
        }
    }

    #[test]
    fn test_differentiate_sine() {
        let n = 16;
        let length = 3.;
        let mut fourier = Fourier::new(n, length);
        let x = Array1::from_shape_fn(n, |i| i as f64 * length / n as f64);
        let v = x.mapv(|x| (2. * PI * x / length).sin());
        let mut vhat = Array1::<Complex<f64>>::zeros(n);
        let mut dvhat = Array1::<Complex<f64>>::zeros(n);
        let mut dv = Array1::<f64>::zeros(n);
        fourier.forward(&v, &mut vhat, 0);
        fourier.differentiate(&vhat, &mut dvhat, 1, 0);
        fourier.backward(&dvhat, &mut dv, 0);
        for (xi, d) in x.iter().zip(dv.iter()) {
            let expected = 2. * PI / length * (2. * PI * xi / length).cos();
            assert_abs_diff_eq!(*d, expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_differentiate_twice() {
        let n = 16;
        let length = 2. * PI;
        let mut fourier = Fourier::new(n, length);
        let x = Array1::from_shape_fn(n, |i| i as f64 * length / n as f64);
        let v = x.mapv(|x| (3. * x).cos());
        let mut vhat = Array1::<Complex<f64>>::zeros(n);
        let mut dvhat = Array1::<Complex<f64>>::zeros(n);
        let mut dv = Array1::<f64>::zeros(n);
        fourier.forward(&v, &mut vhat, 0);
        fourier.differentiate(&vhat, &mut dvhat, 2, 0);
        fourier.backward(&dvhat, &mut dv, 0);
        for (a, b) in v.iter().zip(dv.iter()) {
            assert_abs_diff_eq!(-9. * a, *b, epsilon = 1e-10);
        }
    }

    #[test]
    #[should_panic(expected = "Size mismatch in fft")]
    fn test_size_mismatch() {
        let mut fourier = Fourier::new(4, 1.);
        let v = Array1::<f64>::zeros(5);
        let mut vhat = Array1::<Complex<f64>>::zeros(5);
        fourier.forward(&v, &mut vhat, 0);
    }
}
