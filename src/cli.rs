use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Normalize DICOM pixel data into 8-bit images
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Print debug information
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert DICOM files to 8-bit PNG images
    Convert {
        /// DICOM file path(s) to convert
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output directory (default: next to each input file)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Invert polarity of the output
        #[arg(long)]
        flip: bool,
    },

    /// Rename series folders after their Series Description
    Rename {
        /// Dataset root laid out as patient/study/series/*.dcm
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Report planned renames without touching the filesystem
        #[arg(long)]
        dry_run: bool,
    },
}
