//! # Split
//! Sort a directory of 21cmFAST outputs into one subdirectory per value
//! of an astrophysical parameter, e.g. `A_VCB_0.0` and `A_VCB_1.0`.
//!
//! Outputs which do not depend on the parameter (no `astro_params`
//! group, or no such attribute) are linked into every subdirectory,
//! all other outputs are moved into the subdirectory of their value.
use crate::error::{Error, Result};
use crate::hdf5::{read_attr, File};
use crate::naming::list_of_files_of_type;
use crate::relocate::Relocation;
use crate::Real;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const ASTRO_PARAMS: &str = "astro_params";

/// Parameter and the values to split by
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRule {
    /// Attribute name in `astro_params`
    pub parameter: String,
    /// Values with an output directory each
    pub values: Vec<Real>,
}

impl Default for SplitRule {
    fn default() -> Self {
        Self::new("A_VCB", vec![0.0, 1.0])
    }
}

impl SplitRule {
    /// Return new rule
    pub fn new<S: Into<String>>(parameter: S, values: Vec<Real>) -> Self {
        Self {
            parameter: parameter.into(),
            values,
        }
    }

    /// Output directory of `value` below `dir`, `<dir>/<parameter>_<value>`
    ///
    /// ```
    /// use cmfast_util::split::SplitRule;
    /// use std::path::Path;
    /// let rule = SplitRule::default();
    /// assert_eq!(rule.out_dir(Path::new("out"), 1.), Path::new("out/A_VCB_1.0"));
    /// ```
    #[must_use]
    pub fn out_dir(&self, dir: &Path, value: Real) -> PathBuf {
        dir.join(format!("{}_{:?}", self.parameter, value))
    }
}

/// Value of `astro_params/<parameter>` in the file at `path`
///
/// `None` if the file has no `astro_params` group or the group has no
/// such attribute.
///
/// # Errors
/// When the file can not be read or the attribute is not numeric.
pub fn astro_param(path: &Path, parameter: &str) -> Result<Option<Real>> {
    let file = File::open(path)?;
    if !file.link_exists(ASTRO_PARAMS) {
        return Ok(None);
    }
    let group = file.group(ASTRO_PARAMS)?;
    match read_attr(&group, parameter)? {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| Error::MissingAttribute {
            group: ASTRO_PARAMS.to_owned(),
            name: parameter.to_owned(),
        }),
    }
}

/// Split all `*.h5` in `dir` according to `rule`
///
/// Output directories are created first. Returns the paths of all
/// links and moved files.
///
/// # Errors
/// When a file holds a value not listed in `rule`, or a file can
/// not be read or relocated.
pub fn split_all<P: AsRef<Path>>(dir: P, rule: &SplitRule) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let out_dirs = rule
        .values
        .iter()
        .map(|v| (*v, rule.out_dir(dir, *v)))
        .collect::<Vec<_>>();
    for (_, out_dir) in &out_dirs {
        std::fs::create_dir_all(out_dir).map_err(Error::io(out_dir))?;
    }

    let files = list_of_files_of_type(dir, "h5")?;
    info!(
        "-- splitting {} files of {} by {}",
        files.len(),
        dir.display(),
        rule.parameter
    );
    let mut relocated = Vec::new();
    for src in files {
        let file_name = match src.file_name() {
            Some(name) => name.to_owned(),
            None => continue,
        };
        match astro_param(&src, &rule.parameter)? {
            None => {
                for (_, out_dir) in &out_dirs {
                    let dst = out_dir.join(&file_name);
                    debug!("symlinking {} -> {}", src.display(), dst.display());
                    Relocation::Symlink.apply(&src, &dst)?;
                    relocated.push(dst);
                }
            }
            Some(value) => {
                let out_dir = out_dirs
                    .iter()
                    .find(|(v, _)| *v == value)
                    .map(|(_, d)| d)
                    .ok_or_else(|| Error::UnknownSplitValue {
                        path: src.clone(),
                        parameter: rule.parameter.clone(),
                        value,
                    })?;
                let dst = out_dir.join(&file_name);
                debug!("moving {} -> {}", src.display(), dst.display());
                Relocation::Move.apply(&src, &dst)?;
                relocated.push(dst);
            }
        }
    }
    Ok(relocated)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hdf5::{require_group, write_attr, AttrValue};

    fn write_file(dir: &Path, name: &str, value: Option<AttrValue>) {
        let file = File::create(dir.join(name)).unwrap();
        let group = require_group(&file, "user_params").unwrap();
        write_attr(&group, "HII_DIM", &AttrValue::Int(4)).unwrap();
        if let Some(v) = value {
            let astro = require_group(&file, ASTRO_PARAMS).unwrap();
            write_attr(&astro, "A_VCB", &v).unwrap();
        }
    }

    #[test]
    fn test_out_dir() {
        let rule = SplitRule::new("F_STAR10", vec![-1.3, 0.5]);
        assert_eq!(
            rule.out_dir(Path::new("/data"), -1.3),
            Path::new("/data/F_STAR10_-1.3")
        );
        assert_eq!(SplitRule::default().values, vec![0.0, 1.0]);
    }

    #[test]
    fn test_astro_param() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.h5", Some(AttrValue::Float(1.)));
        write_file(dir.path(), "b.h5", None);
        write_file(dir.path(), "c.h5", Some(AttrValue::Int(0)));
        write_file(dir.path(), "d.h5", Some(AttrValue::Text("x".to_owned())));
        assert_eq!(astro_param(&dir.path().join("a.h5"), "A_VCB").unwrap(), Some(1.));
        assert_eq!(astro_param(&dir.path().join("b.h5"), "A_VCB").unwrap(), None);
        assert_eq!(astro_param(&dir.path().join("c.h5"), "A_VCB").unwrap(), Some(0.));
        assert_eq!(astro_param(&dir.path().join("a.h5"), "F_ESC10").unwrap(), None);
        assert!(astro_param(&dir.path().join("d.h5"), "A_VCB").is_err());
    }

    #[test]
    fn test_split_all() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "BrightnessTemp_z6.000_s1.h5", Some(AttrValue::Float(1.)));
        write_file(dir.path(), "IonizedBox_z6.000_s1.h5", Some(AttrValue::Float(0.)));
        write_file(dir.path(), "PerturbedField_z6.000_s1.h5", None);
        let rule = SplitRule::default();
        let relocated = split_all(dir.path(), &rule).unwrap();
        assert_eq!(relocated.len(), 4);

        let d0 = dir.path().join("A_VCB_0.0");
        let d1 = dir.path().join("A_VCB_1.0");
        assert!(d1.join("BrightnessTemp_z6.000_s1.h5").is_file());
        assert!(d0.join("IonizedBox_z6.000_s1.h5").is_file());
        assert!(!dir.path().join("BrightnessTemp_z6.000_s1.h5").exists());
        // independent of A_VCB: stays in place, linked into both
        assert!(dir.path().join("PerturbedField_z6.000_s1.h5").is_file());
        for d in [&d0, &d1] {
            let link = d.join("PerturbedField_z6.000_s1.h5");
            assert!(std::fs::symlink_metadata(&link)
                .unwrap()
                .file_type()
                .is_symlink());
            assert!(link.is_file());
        }
    }

    #[test]
    fn test_split_unknown_value() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "TsBox_z6.000_s1.h5", Some(AttrValue::Float(0.5)));
        match split_all(dir.path(), &SplitRule::default()) {
            Err(Error::UnknownSplitValue { value, parameter, .. }) => {
                assert_eq!(value, 0.5);
                assert_eq!(parameter, "A_VCB");
            }
            other => panic!("expected unknown split value, got {:?}", other),
        }
    }
}
