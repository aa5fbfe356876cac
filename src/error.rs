//! Error type of *cmfast-util*
use std::path::PathBuf;
use thiserror::Error;

/// Result type of this crate
pub type Result<T> = std::result::Result<T, Error>;

/// All failures are fatal for the record (or batch) being processed.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem error (listing, linking, moving)
    #[error("{path}: {source}")]
    Io {
        /// Path the operation failed on
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Error reading or writing an hdf5 file
    #[error(transparent)]
    Hdf5(#[from] hdf5_interface::Error),
    /// A required attribute is absent or not numeric
    #[error("missing attribute {group}/{name}")]
    MissingAttribute {
        /// Group holding the attribute ("/" for the file root)
        group: String,
        /// Attribute name
        name: String,
    },
    /// Attribute is present but its value is not allowed
    #[error("invalid value of attribute {group}/{name}")]
    InvalidAttribute {
        /// Group holding the attribute
        group: String,
        /// Attribute name
        name: String,
    },
    /// Derivative axis outside of the three box axes
    #[error("invalid axis {0}, expected 0, 1 or 2")]
    InvalidAxis(usize),
    /// Array shape does not match the grid metadata
    #[error("shape mismatch in {name}: got {got:?} expected {expected:?}")]
    ShapeMismatch {
        /// Dataset name
        name: String,
        /// Shape read
        got: Vec<usize>,
        /// Shape implied by HII_DIM
        expected: Vec<usize>,
    },
    /// File name does not follow `<field>_z<z>_s<seed>.h5`
    #[error("malformed record name {0:?}")]
    MalformedName(String),
    /// Record without redshift, which is only allowed for initial conditions
    #[error("{0} has no redshift attribute")]
    MissingRedshift(PathBuf),
    /// Parameter value without configured output directory
    #[error("{path}: {parameter} = {value} is not one of the split values")]
    UnknownSplitValue {
        /// File that was inspected
        path: PathBuf,
        /// Name of the parameter
        parameter: String,
        /// Value found in the file
        value: f64,
    },
}

impl From<hdf5_interface::hdf5::Error> for Error {
    fn from(error: hdf5_interface::hdf5::Error) -> Self {
        Error::Hdf5(error.into())
    }
}

impl Error {
    /// Attach a path to an io error
    pub(crate) fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}
