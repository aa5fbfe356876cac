//! # Naming
//! File names of renamed records: `<field>_z<redshift>_s<seed>.h5`,
//! with the redshift printed to three decimals.
//!
//! ```
//! use cmfast_util::naming::RecordName;
//! let name: RecordName = "PerturbedField_z6.000_s731995.h5".parse().unwrap();
//! assert_eq!(name.seed, 731995);
//! assert_eq!(name.with_field("VelocityGradient").to_string(), "VelocityGradient_z6.000_s731995.h5");
//! ```
use crate::error::{Error, Result};
use crate::Real;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

lazy_static! {
    static ref RECORD_NAME: Regex =
        Regex::new(r"^(?P<field>[A-Za-z0-9]+)_z(?P<z>\d+\.\d{3})_s(?P<seed>\d+)\.h5$").unwrap();
}

/// Name of a renamed record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordName {
    /// Output type, e.g. `PerturbedField`
    pub field: String,
    /// Redshift of the output
    pub redshift: Real,
    /// Random seed of the run
    pub seed: i64,
}

impl RecordName {
    /// Return new name
    pub fn new<S: Into<String>>(field: S, redshift: Real, seed: i64) -> Self {
        Self {
            field: field.into(),
            redshift,
            seed,
        }
    }

    /// Same redshift and seed, other output type
    #[must_use]
    pub fn with_field(&self, field: &str) -> Self {
        Self::new(field, self.redshift, self.seed)
    }

    /// Parse the file name component of `path`
    ///
    /// # Errors
    /// When the file name does not follow the naming convention.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.file_name()
            .and_then(std::ffi::OsStr::to_str)
            .ok_or_else(|| Error::MalformedName(path.display().to_string()))?
            .parse()
    }
}

impl fmt::Display for RecordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_z{:.3}_s{}.h5", self.field, self.redshift, self.seed)
    }
}

impl FromStr for RecordName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedName(s.to_owned());
        let caps = RECORD_NAME.captures(s).ok_or_else(malformed)?;
        let redshift = caps["z"].parse().map_err(|_| malformed())?;
        let seed = caps["seed"].parse().map_err(|_| malformed())?;
        Ok(Self::new(&caps["field"], redshift, seed))
    }
}

/// Output type of a 21cmFAST cache file name,
/// e.g. `BrightnessTemp` for `BrightnessTemp_8346578_r4573257.h5`
#[must_use]
pub fn field_of_cache_name(name: &str) -> &str {
    name.split('_').next().unwrap_or(name)
}

/// Files in `root` with extension `ending`, sorted by path
///
/// # Errors
/// When the directory can not be read.
pub fn list_of_files_of_type<P: AsRef<Path>>(root: P, ending: &str) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut list = std::fs::read_dir(root)
        .map_err(Error::io(root))?
        .filter_map(std::result::Result::ok)
        .map(|r| r.path())
        .filter(|r| r.is_file() && r.extension() == Some(std::ffi::OsStr::new(ending)))
        .collect::<Vec<_>>();
    list.sort();
    Ok(list)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let name = RecordName::new("BrightnessTemp", 6., 731995);
        assert_eq!(name.to_string(), "BrightnessTemp_z6.000_s731995.h5");
        let name = RecordName::new("IonizedBox", 12.34567, 1);
        assert_eq!(name.to_string(), "IonizedBox_z12.346_s1.h5");
    }

    #[test]
    fn test_parse() {
        let name: RecordName = "TsBox_z10.250_s42.h5".parse().unwrap();
        assert_eq!(name, RecordName::new("TsBox", 10.25, 42));
        let path = Path::new("/data/run/PerturbedField_z6.000_s1.h5");
        assert_eq!(
            RecordName::from_path(path).unwrap(),
            RecordName::new("PerturbedField", 6., 1)
        );
    }

    #[test]
    fn test_parse_malformed() {
        for s in [
            "PerturbedField_bc9fb18cdbf1223a3377b5dd7fb03fe4_r731995.h5",
            "PerturbedField_z6.0_s1.h5",
            "PerturbedField_z6.000_s1.hdf5",
            "PerturbedField_z6.000_s.h5",
            "Perturbed_Field_z6.000_s1.h5",
        ] {
            assert!(
                matches!(s.parse::<RecordName>(), Err(Error::MalformedName(_))),
                "{} should not parse",
                s
            );
        }
    }

    #[test]
    fn test_field_of_cache_name() {
        assert_eq!(
            field_of_cache_name("BrightnessTemp_8346578_r4573257.h5"),
            "BrightnessTemp"
        );
        assert_eq!(field_of_cache_name("noseparator.h5"), "noseparator.h5");
    }

    #[test]
    fn test_list_of_files_of_type() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.h5", "a.h5", "c.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("d.h5")).unwrap();
        let list = list_of_files_of_type(dir.path(), "h5").unwrap();
        assert_eq!(list, vec![dir.path().join("a.h5"), dir.path().join("b.h5")]);
    }
}
