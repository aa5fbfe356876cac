//! # Velocity gradient
//! Line-of-sight derivative of a peculiar velocity field, normalized by
//! the Hubble rate: `(dv/dr) / H(z)`.
//!
//! The derivative is taken in fourier space along one array axis.
//! 21cmFAST stores the z-component of the velocity, so the line of
//! sight is the last axis, see [`LOS_AXIS`].
//!
//! # Example
//! ```
//! use cmfast_util::cosmology::Cosmology;
//! use cmfast_util::gradient::{normalized_velocity_gradient, LOS_AXIS};
//! use ndarray::Array3;
//! let vel = Array3::<f32>::zeros((4, 4, 4));
//! let cosmo = Cosmology::new(0.7, 0.3);
//! let dvdr = normalized_velocity_gradient(&vel, 100., LOS_AXIS, &cosmo, 6.0);
//! assert_eq!(dvdr, Array3::<f32>::zeros((4, 4, 4)));
//! ```
use crate::bases::Fourier;
use crate::cosmology::Cosmology;
use crate::{Field3, Real};
use ndarray::{Array3, ArrayBase, Data, Ix3};

/// Array axis along which velocity and its gradient are taken
pub const LOS_AXIS: usize = 2;

/// Derivative of `vel` along `axis` in units of [vel] / [box_len]
///
/// The field is transformed along `axis`, multiplied by `i k` and
/// transformed back; the real part is returned in single precision.
///
/// # Panics
/// Panics when `vel` is not cubic or `axis` is not 0, 1 or 2.
pub fn velocity_gradient<S>(vel: &ArrayBase<S, Ix3>, box_len: Real, axis: usize) -> Array3<f32>
where
    S: Data<Elem = f32>,
{
    let n = vel.shape()[0];
    let mut field = Field3::from_array(Fourier::new(n, box_len), vel);
    field.gradient(axis).mapv(|x| x as f32)
}

/// Dimensionless velocity gradient `(dv/dr) / H(z)`
///
/// `vel` must be in units of [box_len]/s, `H(z)` is in 1/s.
///
/// # Panics
/// Panics when `vel` is not cubic or `axis` is not 0, 1 or 2.
pub fn normalized_velocity_gradient<S>(
    vel: &ArrayBase<S, Ix3>,
    box_len: Real,
    axis: usize,
    cosmology: &Cosmology,
    redshift: Real,
) -> Array3<f32>
where
    S: Data<Elem = f32>,
{
    let mut dvdr = velocity_gradient(vel, box_len, axis);
    let hubble = cosmology.hubble_rate(redshift) as f32;
    dvdr.mapv_inplace(|x| x / hubble);
    dvdr
}
