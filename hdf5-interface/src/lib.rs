//! Interface between ndarray and hdf5 for
//! easier reading/writing of multidimensional arrays
//! and of the attribute groups that describe them.
//!
//! Attributes are read into the explicit [`AttrValue`] type instead of
//! being looked up ad hoc, so a caller can validate what it needs and
//! carry the rest along verbatim.
pub use hdf5;
pub use hdf5::H5Type;
use hdf5::types::{TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{File, Group, Location};
use ndarray::{Array, ArrayBase, ArrayD, Dimension};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Result type of this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors of the hdf5 interface
#[derive(Debug, Error)]
pub enum Error {
    /// Error raised by the hdf5 library
    #[error(transparent)]
    Hdf5(#[from] hdf5::Error),
    /// Dataset has a different dimensionality than requested
    #[error("dimension mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),
    /// Text attribute is not representable in hdf5
    #[error("invalid text attribute: {0}")]
    Text(#[from] hdf5::types::StringError),
}

/// Value of a single hdf5 attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Signed or unsigned integer scalar
    Int(i64),
    /// Floating point scalar
    Float(f64),
    /// Boolean scalar (h5py stores these as a TRUE/FALSE enum)
    Bool(bool),
    /// Variable length string
    Text(String),
    /// One dimensional integer array
    IntArray(Vec<i64>),
    /// One dimensional float array
    FloatArray(Vec<f64>),
}

impl AttrValue {
    /// Numeric value as f64, if the attribute is a numeric scalar
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(x) => Some(*x as f64),
            AttrValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Integer value, if the attribute is an integer scalar
    /// or a float without fractional part
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(x) => Some(*x),
            AttrValue::Float(x) if x.fract() == 0. => Some(*x as i64),
            _ => None,
        }
    }
}

/// Attributes of one hdf5 location, sorted by name
pub type AttrMap = BTreeMap<String, AttrValue>;

/// Read dataset from hdf5 file, return array
///
/// # Errors
/// Errors when file/variable does not exist and
/// when the dataset's dimensionality differs from `D`.
///
/// # Example
/// ```no_run
/// use hdf5_interface::read_from_hdf5;
/// use ndarray::Array3;
/// let v: Array3<f32> = read_from_hdf5("PerturbedField_z6.000_s1.h5", "velocity", Some("PerturbedField")).unwrap();
/// ```
pub fn read_from_hdf5<T, D, P>(filename: P, name: &str, group: Option<&str>) -> Result<Array<T, D>>
where
    T: H5Type + Copy,
    D: Dimension,
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    read_dataset(&file, &gen_name_path(name, group))
}

/// Read dataset `name` (may be a path) below `group`
///
/// # Errors
/// Errors when the variable does not exist or has a
/// different dimensionality than `D`.
pub fn read_dataset<T, D>(group: &Group, name: &str) -> Result<Array<T, D>>
where
    T: H5Type + Copy,
    D: Dimension,
{
    let data = group.dataset(name)?;
    let y: ArrayD<T> = data.read_dyn::<T>()?;
    Ok(y.into_dimensionality::<D>()?)
}

/// Write dataset to hdf5 file
///
/// The file is created if it does not exist, otherwise
/// appended to.
///
/// # Errors
/// When file can not be created or when file and
/// variable exists, but variable has different
/// shape than input array (assign new value will fail).
pub fn write_to_hdf5<T, S, D, P>(
    filename: P,
    name: &str,
    group: Option<&str>,
    array: &ArrayBase<S, D>,
) -> Result<()>
where
    T: H5Type + Copy,
    S: ndarray::Data<Elem = T>,
    D: Dimension,
    P: AsRef<Path>,
{
    let file = if filename.as_ref().exists() {
        File::append(filename)?
    } else {
        File::create(filename)?
    };
    let parent = match group {
        Some(g) => require_group(&file, g)?,
        None => file.group("/")?,
    };
    write_dataset(&parent, name, array)
}

/// Write array as dataset `name` into `group`,
/// overwriting the values of an existing dataset
///
/// # Errors
/// When an existing variable has a different shape.
pub fn write_dataset<T, S, D>(group: &Group, name: &str, array: &ArrayBase<S, D>) -> Result<()>
where
    T: H5Type + Copy,
    S: ndarray::Data<Elem = T>,
    D: Dimension,
{
    let dset = if group.link_exists(name) {
        group.dataset(name)?
    } else {
        group
            .new_dataset::<T>()
            .shape(array.shape().to_vec())
            .create(name)?
    };
    dset.write(&array.view())?;
    Ok(())
}

/// Open group `name` in file, create it when missing
///
/// # Errors
/// When the link exists but is not a group.
pub fn require_group(file: &File, name: &str) -> Result<Group> {
    let name = name.trim_end_matches('/');
    if file.link_exists(name) {
        Ok(file.group(name)?)
    } else {
        Ok(file.create_group(name)?)
    }
}

/// Read a single attribute
///
/// Returns `Ok(None)` if the attribute does not exist or
/// is of a type that has no [`AttrValue`] counterpart
/// (compound, fixed length strings, ..); the latter is logged.
///
/// # Errors
/// When the attribute exists but can not be read.
pub fn read_attr(location: &Location, name: &str) -> Result<Option<AttrValue>> {
    if !location.attr_names()?.iter().any(|n| n == name) {
        return Ok(None);
    }
    let attr = location.attr(name)?;
    let scalar = attr.is_scalar();
    let value = match attr.dtype()?.to_descriptor()? {
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
            if scalar {
                AttrValue::Int(attr.read_scalar::<i64>()?)
            } else {
                AttrValue::IntArray(attr.read_raw::<i64>()?)
            }
        }
        TypeDescriptor::Float(_) => {
            if scalar {
                AttrValue::Float(attr.read_scalar::<f64>()?)
            } else {
                AttrValue::FloatArray(attr.read_raw::<f64>()?)
            }
        }
        TypeDescriptor::Boolean if scalar => AttrValue::Bool(attr.read_scalar::<bool>()?),
        TypeDescriptor::VarLenUnicode if scalar => {
            AttrValue::Text(attr.read_scalar::<VarLenUnicode>()?.as_str().to_owned())
        }
        TypeDescriptor::VarLenAscii if scalar => {
            AttrValue::Text(attr.read_scalar::<VarLenAscii>()?.as_str().to_owned())
        }
        other => {
            warn!(
                "skipping attribute {}/{} of unsupported type {:?}",
                location.name(),
                name,
                other
            );
            return Ok(None);
        }
    };
    Ok(Some(value))
}

/// Read all supported attributes of a location
///
/// # Errors
/// When an attribute can not be read.
pub fn read_attrs(location: &Location) -> Result<AttrMap> {
    let mut attrs = AttrMap::new();
    for name in location.attr_names()? {
        if let Some(value) = read_attr(location, &name)? {
            attrs.insert(name, value);
        }
    }
    Ok(attrs)
}

/// Write a single scalar or 1-D attribute
///
/// # Errors
/// When the attribute already exists or a string
/// contains interior nul bytes.
pub fn write_attr(location: &Location, name: &str, value: &AttrValue) -> Result<()> {
    match value {
        AttrValue::Int(x) => location.new_attr::<i64>().create(name)?.write_scalar(x)?,
        AttrValue::Float(x) => location.new_attr::<f64>().create(name)?.write_scalar(x)?,
        AttrValue::Bool(x) => location.new_attr::<bool>().create(name)?.write_scalar(x)?,
        AttrValue::Text(s) => {
            let s = VarLenUnicode::from_str(s)?;
            location
                .new_attr::<VarLenUnicode>()
                .create(name)?
                .write_scalar(&s)?;
        }
        AttrValue::IntArray(v) => location
            .new_attr::<i64>()
            .shape(v.len())
            .create(name)?
            .write_raw(v.as_slice())?,
        AttrValue::FloatArray(v) => location
            .new_attr::<f64>()
            .shape(v.len())
            .create(name)?
            .write_raw(v.as_slice())?,
    }
    Ok(())
}

/// Write all attributes of a map
///
/// # Errors
/// See [`write_attr`].
pub fn write_attrs(location: &Location, attrs: &AttrMap) -> Result<()> {
    for (name, value) in attrs {
        write_attr(location, name, value)?;
    }
    Ok(())
}

/// Names of all groups directly below `group`
///
/// # Errors
/// When the members can not be listed.
pub fn group_names(group: &Group) -> Result<Vec<String>> {
    Ok(group
        .groups()?
        .iter()
        .map(|g| base_name(&g.name()))
        .collect())
}

/// Names and shapes of all datasets directly below `group`
///
/// # Errors
/// When the members can not be listed.
pub fn dataset_shapes(group: &Group) -> Result<Vec<(String, Vec<usize>)>> {
    Ok(group
        .datasets()?
        .iter()
        .map(|d| (base_name(&d.name()), d.shape()))
        .collect())
}

/// Check if a variable exists in a hdf5 file
///
/// # Errors
/// When the members of the file can not be listed.
pub fn variable_exists(file: &File, name: &str, group: Option<&str>) -> Result<bool> {
    if let Some(g) = group {
        let g = g.trim_end_matches('/');
        if file.link_exists(g) {
            Ok(file.group(g)?.link_exists(name))
        } else {
            Ok(false)
        }
    } else {
        Ok(file.link_exists(name))
    }
}

/// Last component of an hdf5 path (`/user_params` -> `user_params`)
fn base_name(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_owned()
}

/// Generate full variable path inside hdf5 file from name
/// of the variable and name of the group (optional)
fn gen_name_path(name: &str, group: Option<&str>) -> String {
    group.map_or_else(
        || name.to_owned(),
        |g| {
            if g.ends_with('/') {
                g.to_owned() + name
            } else {
                g.to_owned() + "/" + name
            }
        },
    )
}
