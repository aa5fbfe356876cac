//! # Cosmology
//! Expansion history of a flat LCDM universe.
//!
//! The Hubble rate is used to turn peculiar velocity gradients into
//! the dimensionless quantity `(dv/dr) / H(z)` that enters redshift
//! space distortions of the 21cm signal.
use crate::Real;

/// Hubble constant in 1/s per unit of h (100 km/s/Mpc)
pub const H0_SI: Real = 3.24078e-18;

/// Redshift step of the growth integral
const GROWTH_DZ: Real = 1e-3;

/// Upper limit of the growth integral, relative to its lower limit
const GROWTH_Z_SPAN: Real = 100.;

/// Hubble rate H(z) in 1/s
///
/// ```
/// use cmfast_util::cosmology::{hubble, H0_SI};
/// assert_eq!(hubble(0., 0.7, 0.25), 0.7 * H0_SI);
/// ```
pub fn hubble(z: Real, h: Real, omega_matter: Real) -> Real {
    h * H0_SI * (omega_matter * (1. + z) * (1. + z) * (1. + z) + (1. - omega_matter)).sqrt()
}

/// Flat LCDM cosmology
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cosmology {
    /// Dimensionless Hubble parameter
    pub h: Real,
    /// Matter density parameter
    pub omega_matter: Real,
}

impl Cosmology {
    /// Return new cosmology
    #[must_use]
    pub fn new(h: Real, omega_matter: Real) -> Self {
        Self { h, omega_matter }
    }

    /// Hubble rate at redshift z, see [`hubble`]
    #[must_use]
    pub fn hubble_rate(&self, z: Real) -> Real {
        hubble(z, self.h, self.omega_matter)
    }

    /// Time derivative of redshift, dz/dt = -H(z) (1+z)
    #[must_use]
    pub fn dzdt(&self, z: Real) -> Real {
        -self.hubble_rate(z) * (1. + z)
    }

    /// Linear growth factor, normalized to 1 today
    #[must_use]
    pub fn growth_factor(&self, z: Real) -> Real {
        self.hubble_rate(z) / self.hubble_rate(0.) * self.growth_integral(z)
            / self.growth_integral(0.)
    }

    /// Time derivative of the growth factor in 1/s
    #[must_use]
    pub fn dgrowth_dt(&self, z: Real) -> Real {
        let dz = GROWTH_DZ;
        let dg = self.growth_factor(z + dz / 2.) - self.growth_factor(z - dz / 2.);
        dg / dz * self.dzdt(z)
    }

    /// Midpoint rule for int_z^inf (1+z') / E(z')^3 dz',
    /// truncated after [`GROWTH_Z_SPAN`]
    fn growth_integral(&self, z: Real) -> Real {
        let hz0 = self.hubble_rate(0.);
        let n = (GROWTH_Z_SPAN / GROWTH_DZ).round() as usize;
        let sum: Real = (0..n)
            .map(|i| {
                let zi = z + GROWTH_DZ / 2. + i as Real * GROWTH_DZ;
                let e = self.hubble_rate(zi) / hz0;
                (1. + zi) / (e * e * e)
            })
            .sum();
        sum * GROWTH_DZ
    }
}
