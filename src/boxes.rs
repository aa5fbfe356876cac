//! # Coeval boxes
//! Read renamed 21cmFAST boxes at a given redshift and seed, converted
//! to the units used by the 21cm brightness temperature calculation.
use crate::error::Result;
use crate::hdf5::read_from_hdf5;
use crate::naming::RecordName;
use crate::Real;
use ndarray::{Array3, Ix3};
use std::path::Path;
use tracing::debug;

/// Mpc in m
pub const MPC_TO_M: f32 = 3.08567758e22;
/// Speed of light in m/s
pub const SPEED_OF_LIGHT: f32 = 299_792_458.;

/// Boxes of a coeval cube
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoevalBox {
    /// Matter overdensity
    Density,
    /// Line-of-sight peculiar velocity, read in units of c (proper)
    Velocity,
    /// `(dv/dr) / H(z)`
    VelocityGradient,
    /// Neutral fraction, read as ionized fraction `1 - xH`
    IonizedFraction,
    /// Spin temperature in K
    SpinTemperature,
}

impl CoevalBox {
    /// Output type the box is stored in
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            CoevalBox::Density | CoevalBox::Velocity => "PerturbedField",
            CoevalBox::VelocityGradient => "VelocityGradient",
            CoevalBox::IonizedFraction => "IonizedBox",
            CoevalBox::SpinTemperature => "TsBox",
        }
    }

    /// Name of the dataset inside group [`CoevalBox::field`]
    #[must_use]
    pub fn dataset(&self) -> &'static str {
        match self {
            CoevalBox::Density => "density",
            CoevalBox::Velocity => "velocity",
            CoevalBox::VelocityGradient => "velocity_gradient",
            CoevalBox::IonizedFraction => "xH_box",
            CoevalBox::SpinTemperature => "Ts_box",
        }
    }

    /// Convert stored values in place
    fn convert(self, data: &mut Array3<f32>, redshift: Real) {
        match self {
            // comoving Mpc/s -> proper m/s / c
            CoevalBox::Velocity => {
                let a = 1. + redshift;
                data.mapv_inplace(|v| (f64::from(v * MPC_TO_M / SPEED_OF_LIGHT) / a) as f32);
            }
            CoevalBox::IonizedFraction => data.mapv_inplace(|x| 1. - x),
            _ => (),
        }
    }
}

/// Read box `kind` of the record at `redshift` and `seed` in `dir`
///
/// # Errors
/// When the file or dataset can not be read.
pub fn read_box<P: AsRef<Path>>(
    dir: P,
    kind: CoevalBox,
    redshift: Real,
    seed: i64,
) -> Result<Array3<f32>> {
    let name = RecordName::new(kind.field(), redshift, seed);
    let path = dir.as_ref().join(name.to_string());
    debug!("reading {}/{} from {}", kind.field(), kind.dataset(), path.display());
    let mut data = read_from_hdf5::<f32, Ix3, _>(&path, kind.dataset(), Some(kind.field()))?;
    kind.convert(&mut data, redshift);
    Ok(data)
}
