#![warn(missing_docs)]
//! # cmfast-util: post-processing of 21cmFAST outputs
//!
//! The main product is the dimensionless velocity gradient
//! `(dv/dr) / H(z)` of the line-of-sight peculiar velocity, taken with
//! a fourier derivative on the periodic simulation box.
//!
//! Besides that, the crate contains the glue to organize a directory of
//! 21cmFAST outputs:
//! - [`rename`]: cache names -> `<field>_z<redshift>_s<seed>.h5`
//! - [`split`]: sort outputs by the value of an astrophysical parameter
//! - [`boxes`]: read renamed boxes in the units of the 21cm calculation
//!
//! # Example
//! ```
//! use cmfast_util::cosmology::Cosmology;
//! use cmfast_util::gradient::{normalized_velocity_gradient, LOS_AXIS};
//! use ndarray::Array3;
//! let (n, box_len) = (16, 100.);
//! let vel = Array3::<f32>::from_shape_fn((n, n, n), |(_, _, k)| {
//!     1e-16 * (2. * std::f32::consts::PI * k as f32 / n as f32).sin()
//! });
//! let dvdr = normalized_velocity_gradient(&vel, box_len, LOS_AXIS, &Cosmology::new(0.7, 0.3), 6.);
//! assert_eq!(dvdr.shape(), &[n, n, n]);
//! ```
pub mod bases;
pub mod batch;
pub mod boxes;
pub mod cosmology;
pub mod error;
pub mod field;
pub mod gradient;
pub mod hdf5;
pub mod naming;
pub mod record;
pub mod relocate;
pub mod rename;
pub mod split;
pub use cosmology::Cosmology;
pub use error::{Error, Result};
pub use field::Field3;

/// Real type
pub type Real = f64;
