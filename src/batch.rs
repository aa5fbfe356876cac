//! # Batch
//! Compute `VelocityGradient` records from `PerturbedField` records.
//!
//! Input and output are named after [`RecordName`]; the redshift in the
//! input name sets `H(z)`. Records are processed one after another and
//! the first failing record aborts the run.
use crate::error::{Error, Result};
use crate::naming::{list_of_files_of_type, RecordName};
use crate::record::{PerturbedField, PERTURBED_FIELD, VELOCITY_GRADIENT};
use crate::Real;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Compute the velocity gradient of a single record in `dir`
///
/// Reads `PerturbedField_z<z>_s<seed>.h5` and writes
/// `VelocityGradient_z<z>_s<seed>.h5`. Returns the output path.
///
/// # Errors
/// When `axis` is not 0, 1 or 2, the input can not be read or the
/// output not be written.
pub fn write_velocity_gradient<P: AsRef<Path>>(
    dir: P,
    redshift: Real,
    seed: i64,
    axis: usize,
) -> Result<PathBuf> {
    let name = RecordName::new(PERTURBED_FIELD, redshift, seed);
    write_velocity_gradient_of(dir.as_ref(), &name, axis)
}

fn write_velocity_gradient_of(dir: &Path, name: &RecordName, axis: usize) -> Result<PathBuf> {
    check_axis(axis)?;
    let path = dir.join(name.to_string());
    let field = PerturbedField::read(&path)?;
    if let Some(z) = field.redshift {
        if (z - name.redshift).abs() > 5e-4 {
            warn!(
                "{} stores redshift {}, using {:.3} from its name",
                path.display(),
                z,
                name.redshift
            );
        }
    }
    let output = dir.join(name.with_field(VELOCITY_GRADIENT).to_string());
    field.velocity_gradient(name.redshift, axis).write(&output)?;
    Ok(output)
}

fn check_axis(axis: usize) -> Result<()> {
    if axis < 3 {
        Ok(())
    } else {
        Err(Error::InvalidAxis(axis))
    }
}

/// Compute velocity gradients of all `PerturbedField` records in `dir`
///
/// Returns the output paths, sorted like the inputs.
///
/// # Errors
/// When `axis` is not 0, 1 or 2, a `PerturbedField*.h5` file is not
/// named after [`RecordName`], or any record fails.
pub fn write_velocity_gradient_all<P: AsRef<Path>>(dir: P, axis: usize) -> Result<Vec<PathBuf>> {
    check_axis(axis)?;
    let dir = dir.as_ref();
    let inputs = list_of_files_of_type(dir, "h5")?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(std::ffi::OsStr::to_str)
                .map_or(false, |s| s.starts_with(PERTURBED_FIELD))
        })
        .collect::<Vec<_>>();
    // parse all names before touching any record
    let names = inputs
        .iter()
        .map(|path| RecordName::from_path(path))
        .collect::<Result<Vec<_>>>()?;
    let mut outputs = Vec::with_capacity(names.len());
    for (path, name) in inputs.iter().zip(&names) {
        info!(
            "-- working on {} at z = {:.3} with seed {}",
            path.display(),
            name.redshift,
            name.seed
        );
        outputs.push(write_velocity_gradient_of(dir, name, axis)?);
    }
    Ok(outputs)
}
