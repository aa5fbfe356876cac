//! # Records
//! 21cmFAST outputs stored as hdf5 files.
//!
//! A record has a fixed schema: grid metadata in the `user_params`
//! group, cosmology in the `cosmo_params` group, one group holding the
//! datasets of the record, and any number of further attribute groups
//! that are carried along verbatim. The schema is validated on read.
use crate::cosmology::Cosmology;
use crate::error::{Error, Result};
use crate::gradient::normalized_velocity_gradient;
use crate::hdf5::{
    group_names, read_attr, read_attrs, read_dataset, require_group, write_attr, write_attrs,
    write_dataset, AttrMap, AttrValue, File,
};
use crate::Real;
use ndarray::{Array3, ArrayD, Ix3};
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::path::Path;
use tracing::debug;

/// Group of the perturbed density and velocity fields
pub const PERTURBED_FIELD: &str = "PerturbedField";
/// Group of the velocity gradient
pub const VELOCITY_GRADIENT: &str = "VelocityGradient";
const USER_PARAMS: &str = "user_params";
const COSMO_PARAMS: &str = "cosmo_params";

/// Attribute maps of all groups of a record, by group name
pub type AttrGroups = BTreeMap<String, AttrMap>;

fn missing(group: &str, name: &str) -> Error {
    Error::MissingAttribute {
        group: group.to_owned(),
        name: name.to_owned(),
    }
}

fn require_f64(groups: &AttrGroups, group: &str, name: &str) -> Result<Real> {
    groups
        .get(group)
        .and_then(|attrs| attrs.get(name))
        .and_then(AttrValue::as_f64)
        .ok_or_else(|| missing(group, name))
}

fn require_i64(groups: &AttrGroups, group: &str, name: &str) -> Result<i64> {
    groups
        .get(group)
        .and_then(|attrs| attrs.get(name))
        .and_then(AttrValue::as_i64)
        .ok_or_else(|| missing(group, name))
}

/// Grid metadata
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserParams {
    /// Number of cells per side
    pub hii_dim: usize,
    /// Side length of the box in Mpc
    pub box_len: Real,
}

impl UserParams {
    /// Read `HII_DIM` and `BOX_LEN` from the `user_params` group
    ///
    /// # Errors
    /// When an attribute is missing or `HII_DIM` is negative.
    pub fn from_groups(groups: &AttrGroups) -> Result<Self> {
        let hii_dim = require_i64(groups, USER_PARAMS, "HII_DIM")?;
        let hii_dim = usize::try_from(hii_dim).map_err(|_| Error::InvalidAttribute {
            group: USER_PARAMS.to_owned(),
            name: "HII_DIM".to_owned(),
        })?;
        let box_len = require_f64(groups, USER_PARAMS, "BOX_LEN")?;
        Ok(Self { hii_dim, box_len })
    }
}

/// Cosmological parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosmoParams {
    /// Dimensionless Hubble parameter
    pub hlittle: Real,
    /// Matter density parameter
    pub omm: Real,
}

impl CosmoParams {
    /// Read `hlittle` and `OMm` from the `cosmo_params` group
    ///
    /// # Errors
    /// When an attribute is missing.
    pub fn from_groups(groups: &AttrGroups) -> Result<Self> {
        Ok(Self {
            hlittle: require_f64(groups, COSMO_PARAMS, "hlittle")?,
            omm: require_f64(groups, COSMO_PARAMS, "OMm")?,
        })
    }

    /// Flat LCDM cosmology with these parameters
    #[must_use]
    pub fn cosmology(&self) -> Cosmology {
        Cosmology::new(self.hlittle, self.omm)
    }
}

/// Attribute maps of all groups in the file except `skip`
fn read_attr_groups(file: &File, skip: &str) -> Result<AttrGroups> {
    let mut groups = AttrGroups::new();
    for name in group_names(file)? {
        if name == skip {
            continue;
        }
        let group = file.group(&name)?;
        let attrs = read_attrs(&group)?;
        groups.insert(name, attrs);
    }
    Ok(groups)
}

/// Root attributes `redshift` and `random_seed`, both optional
fn read_root_attrs(file: &File) -> Result<(Option<Real>, Option<i64>)> {
    let redshift = read_attr(file, "redshift")?.and_then(|a| a.as_f64());
    let random_seed = read_attr(file, "random_seed")?.and_then(|a| a.as_i64());
    Ok((redshift, random_seed))
}

fn write_root_attrs(
    file: &File,
    groups: &AttrGroups,
    redshift: Option<Real>,
    random_seed: Option<i64>,
) -> Result<()> {
    for (name, attrs) in groups {
        let group = require_group(file, name)?;
        write_attrs(&group, attrs)?;
    }
    if let Some(z) = redshift {
        write_attr(file, "redshift", &AttrValue::Float(z))?;
    }
    if let Some(seed) = random_seed {
        write_attr(file, "random_seed", &AttrValue::Int(seed))?;
    }
    Ok(())
}

/// Read `group/name` and check that it is a cube of side `n`
fn read_cube(file: &File, group: &str, name: &str, n: usize) -> Result<Array3<f32>> {
    let path = format!("{}/{}", group, name);
    let data: ArrayD<f32> = read_dataset(file, &path)?;
    let expected = vec![n; 3];
    if data.shape() != expected.as_slice() {
        return Err(Error::ShapeMismatch {
            name: path,
            got: data.shape().to_vec(),
            expected,
        });
    }
    Ok(data
        .into_dimensionality::<Ix3>()
        .map_err(hdf5_interface::Error::from)?)
}

/// `PerturbedField` record with its line-of-sight velocity
#[derive(Debug, Clone)]
pub struct PerturbedField {
    /// Grid metadata
    pub user_params: UserParams,
    /// Cosmology of the run
    pub cosmo_params: CosmoParams,
    /// Redshift stored in the file, if any
    pub redshift: Option<Real>,
    /// Random seed stored in the file, if any
    pub random_seed: Option<i64>,
    /// All attribute groups, including `user_params` and `cosmo_params`
    pub groups: AttrGroups,
    /// Velocity in Mpc/s, shape `(HII_DIM, HII_DIM, HII_DIM)`
    pub velocity: Array3<f32>,
}

impl PerturbedField {
    /// Validate attribute groups and velocity against each other
    ///
    /// # Errors
    /// When grid or cosmology attributes are missing, or the
    /// velocity is not a cube of side `HII_DIM`.
    pub fn new(
        groups: AttrGroups,
        redshift: Option<Real>,
        random_seed: Option<i64>,
        velocity: Array3<f32>,
    ) -> Result<Self> {
        let user_params = UserParams::from_groups(&groups)?;
        let cosmo_params = CosmoParams::from_groups(&groups)?;
        let expected = vec![user_params.hii_dim; 3];
        if velocity.shape() != expected.as_slice() {
            return Err(Error::ShapeMismatch {
                name: format!("{}/velocity", PERTURBED_FIELD),
                got: velocity.shape().to_vec(),
                expected,
            });
        }
        Ok(Self {
            user_params,
            cosmo_params,
            redshift,
            random_seed,
            groups,
            velocity,
        })
    }

    /// Read record from file
    ///
    /// # Errors
    /// When the file can not be read or does not follow the schema.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading {}", path.display());
        let file = File::open(path)?;
        let groups = read_attr_groups(&file, PERTURBED_FIELD)?;
        let (redshift, random_seed) = read_root_attrs(&file)?;
        let hii_dim = UserParams::from_groups(&groups)?.hii_dim;
        let velocity = read_cube(&file, PERTURBED_FIELD, "velocity", hii_dim)?;
        Self::new(groups, redshift, random_seed, velocity)
    }

    /// Write record to a new file (an existing file is truncated)
    ///
    /// # Errors
    /// When the file can not be created or written.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        write_root_attrs(&file, &self.groups, self.redshift, self.random_seed)?;
        let group = require_group(&file, PERTURBED_FIELD)?;
        write_dataset(&group, "velocity", &self.velocity)?;
        Ok(())
    }

    /// Dimensionless velocity gradient `(dv/dr) / H(z)` along `axis`
    ///
    /// `redshift` sets `H(z)`. All attribute groups are copied.
    #[must_use]
    pub fn velocity_gradient(&self, redshift: Real, axis: usize) -> VelocityGradient {
        let cosmology = self.cosmo_params.cosmology();
        // velocity is in Mpc/s, box length in Mpc
        let velocity_gradient = normalized_velocity_gradient(
            &self.velocity,
            self.user_params.box_len,
            axis,
            &cosmology,
            redshift,
        );
        VelocityGradient {
            redshift,
            random_seed: self.random_seed,
            groups: self.groups.clone(),
            velocity_gradient,
        }
    }
}

/// `VelocityGradient` record
#[derive(Debug, Clone)]
pub struct VelocityGradient {
    /// Redshift at which `H(z)` was evaluated
    pub redshift: Real,
    /// Random seed of the source record
    pub random_seed: Option<i64>,
    /// Attribute groups of the source record
    pub groups: AttrGroups,
    /// Dimensionless `(dv/dr) / H(z)`
    pub velocity_gradient: Array3<f32>,
}

impl VelocityGradient {
    /// Read record from file
    ///
    /// # Errors
    /// When the file can not be read, has no redshift or
    /// the gradient is not a cube of side `HII_DIM`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let groups = read_attr_groups(&file, VELOCITY_GRADIENT)?;
        let (redshift, random_seed) = read_root_attrs(&file)?;
        let redshift = redshift.ok_or_else(|| missing("/", "redshift"))?;
        let hii_dim = UserParams::from_groups(&groups)?.hii_dim;
        let velocity_gradient = read_cube(&file, VELOCITY_GRADIENT, "velocity_gradient", hii_dim)?;
        Ok(Self {
            redshift,
            random_seed,
            groups,
            velocity_gradient,
        })
    }

    /// Write record to a new file (an existing file is truncated)
    ///
    /// # Errors
    /// When the file can not be created or written.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("writing {}", path.display());
        let file = File::create(path)?;
        write_root_attrs(&file, &self.groups, Some(self.redshift), self.random_seed)?;
        let group = require_group(&file, VELOCITY_GRADIENT)?;
        write_dataset(&group, "velocity_gradient", &self.velocity_gradient)?;
        Ok(())
    }
}
