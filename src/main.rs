//! Command line interface of cmfast-util
//!
//! ```bash
//! cmfast-util dvdr --dir ./renamed
//! cmfast-util dvdr --redshift 6.0 --seed 731995
//! cmfast-util rename ./cache
//! cmfast-util split ./cache/renamed --param A_VCB --values 0.0 --values 1.0
//! RUST_LOG=debug cmfast-util inspect PerturbedField_z6.000_s731995.h5
//! ```
use clap::{Parser, Subcommand};
use cmfast_util::gradient::LOS_AXIS;
use cmfast_util::hdf5::{dataset_shapes, group_names, read_attrs, File};
use cmfast_util::relocate::Relocation;
use cmfast_util::split::SplitRule;
use cmfast_util::{batch, rename, split, Result};
use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Post-processing of 21cmFAST outputs
#[derive(Parser, Debug)]
#[command(name = "cmfast-util", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute VelocityGradient records from PerturbedField records
    Dvdr {
        /// Directory of the renamed records
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
        /// Redshift of a single record (requires --seed)
        #[arg(short = 'z', long, requires = "seed")]
        redshift: Option<f64>,
        /// Random seed of a single record (requires --redshift)
        #[arg(short, long, requires = "redshift")]
        seed: Option<i64>,
        /// Array axis of the line of sight
        #[arg(short, long, default_value_t = LOS_AXIS as u8,
              value_parser = clap::value_parser!(u8).range(0..3))]
        axis: u8,
    },
    /// Rename 21cmFAST cache files after redshift and seed
    Rename {
        /// Directory of the cache files
        dir: PathBuf,
        /// Move the files instead of symlinking them
        #[arg(long = "move")]
        move_files: bool,
    },
    /// Sort outputs into directories by an astro_params value
    Split {
        /// Directory of the outputs
        dir: PathBuf,
        /// Name of the parameter
        #[arg(short, long, default_value = "A_VCB")]
        param: String,
        /// Values with an output directory each
        #[arg(short, long, default_values_t = vec![0.0, 1.0])]
        values: Vec<f64>,
    },
    /// Print groups, attributes and datasets of a file
    Inspect {
        /// hdf5 file
        file: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn inspect(path: &Path) -> Result<()> {
    let file = File::open(path)?;
    info!("{}", path.display());
    for (name, value) in read_attrs(&file)? {
        info!("  @{} = {:?}", name, value);
    }
    for name in group_names(&file)? {
        let group = file.group(&name)?;
        info!("  {}/ ({} attributes)", name, read_attrs(&group)?.len());
        for (dataset, shape) in dataset_shapes(&group)? {
            info!("    {} {:?}", dataset, shape);
        }
    }
    Ok(())
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Dvdr {
            dir,
            redshift,
            seed,
            axis,
        } => {
            if let (Some(z), Some(seed)) = (redshift, seed) {
                let output = batch::write_velocity_gradient(&dir, z, seed, usize::from(axis))?;
                info!("wrote {}", output.display());
            } else {
                let outputs = batch::write_velocity_gradient_all(&dir, usize::from(axis))?;
                info!("wrote {} velocity gradients", outputs.len());
            }
        }
        Command::Rename { dir, move_files } => {
            let relocation = if move_files {
                Relocation::Move
            } else {
                Relocation::Symlink
            };
            let renamed = rename::rename_all(&dir, relocation)?;
            info!("renamed {} files", renamed.len());
        }
        Command::Split { dir, param, values } => {
            let relocated = split::split_all(&dir, &SplitRule::new(param, values))?;
            info!("relocated {} files", relocated.len());
        }
        Command::Inspect { file } => inspect(&file)?,
    }
    Ok(())
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(e) = run(args.command) {
        error!("{}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}
