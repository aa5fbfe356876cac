//! # Rename
//! Give 21cmFAST cache files (`BrightnessTemp_<hash>_r<seed>.h5`)
//! readable names (`BrightnessTemp_z6.000_s731995.h5`) built from the
//! redshift and random seed stored in the file.
//!
//! The renamed files are placed in the subdirectory `renamed/`.
use crate::error::{Error, Result};
use crate::hdf5::{read_attr, File};
use crate::naming::{field_of_cache_name, list_of_files_of_type, RecordName};
use crate::relocate::Relocation;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the output subdirectory
pub const RENAMED_DIR: &str = "renamed";

/// The only output type without a redshift
const INITIAL_CONDITIONS: &str = "InitialConditions";

/// New name of the cache file at `path`
///
/// # Errors
/// When the file can not be read, has no `random_seed`, or has no
/// `redshift` without being `InitialConditions`.
pub fn record_name_of(path: &Path) -> Result<RecordName> {
    let file_name = path
        .file_name()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(|| Error::MalformedName(path.display().to_string()))?;
    let field = field_of_cache_name(file_name);
    let file = File::open(path)?;
    let redshift = match read_attr(&file, "redshift")?.and_then(|a| a.as_f64()) {
        Some(z) => z,
        None if field == INITIAL_CONDITIONS => 0.,
        None => return Err(Error::MissingRedshift(path.to_path_buf())),
    };
    let seed = read_attr(&file, "random_seed")?
        .and_then(|a| a.as_i64())
        .ok_or_else(|| Error::MissingAttribute {
            group: "/".to_owned(),
            name: "random_seed".to_owned(),
        })?;
    Ok(RecordName::new(field, redshift, seed))
}

/// Relocate every `*.h5` in `dir` to `dir/renamed/<new name>`
///
/// Returns the new paths.
///
/// # Errors
/// When a file has no valid new name or can not be relocated.
pub fn rename_all<P: AsRef<Path>>(dir: P, relocation: Relocation) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let out_dir = dir.join(RENAMED_DIR);
    std::fs::create_dir_all(&out_dir).map_err(Error::io(&out_dir))?;
    info!("-- {} files into {}", relocation.verb(), out_dir.display());

    let mut renamed = Vec::new();
    for src in list_of_files_of_type(dir, "h5")? {
        let dst = out_dir.join(record_name_of(&src)?.to_string());
        debug!("{} -> {}", src.display(), dst.display());
        relocation.apply(&src, &dst)?;
        renamed.push(dst);
    }
    Ok(renamed)
}
