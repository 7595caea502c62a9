use clap::Parser;
use dcmnorm::cli::{Args, Command};
use dcmnorm::dicom::{self, ProcessError};
use dcmnorm::image;
use dcmnorm::rename;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, Level};

fn main() {
    let args = Args::parse();

    if let Err(e) = tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
            .with_writer(std::io::stderr)
            .finish(),
    ) {
        eprintln!("[ERROR] Could not set up global logging subscriber: {e}");
    }

    let ok = match &args.command {
        Command::Convert {
            files,
            output,
            flip,
        } => convert_all(files, output.as_deref(), *flip),
        Command::Rename { root, dry_run } => match rename::rename_series(root, *dry_run) {
            Ok(renames) => {
                info!(count = renames.len(), "series processed");
                true
            }
            Err(e) => {
                error!("{:#}", anyhow::Error::from(e));
                false
            }
        },
    };

    if !ok {
        std::process::exit(1);
    }
}

/// Convert every file, continuing past failures; returns false if any failed
fn convert_all(files: &[PathBuf], output: Option<&Path>, flip: bool) -> bool {
    let mut any_failed = false;

    for file_path in files {
        match process_file(file_path, output, flip) {
            Ok(saved) => println!("{} -> {}", file_path.display(), saved.display()),
            Err(e) => {
                match e.series_description() {
                    Some(series) => error!(file = %file_path.display(), series, "{e}"),
                    None => error!(file = %file_path.display(), "{e}"),
                }
                any_failed = true;
            }
        }
    }

    !any_failed
}

/// Process a single DICOM file, returning the path of the written image
fn process_file(file_path: &Path, output: Option<&Path>, flip: bool) -> Result<PathBuf, ProcessError> {
    // Stage 1: Open DICOM file
    let obj = dicom::open_dicom_file(file_path).map_err(ProcessError::NotADicomFile)?;

    // Stage 2: Decode pixel data and attributes
    let dataset = dicom::extract_pixel_dataset(&obj).map_err(|e| {
        ProcessError::from_extraction(e, dicom::extract_series_description(&obj))
    })?;

    // Stage 3: Normalize
    let display_img = image::to_display_image(&dataset, flip).map_err(|error| {
        ProcessError::ConversionFailed {
            series_description: dataset.series_description.clone(),
            error,
        }
    })?;
    debug!(mode = %display_img.mode(), width = display_img.width(), height = display_img.height(), "normalized");

    // Stage 4: Save
    let path = output_path(file_path, output);
    display_img
        .save(&path)
        .map_err(|error| ProcessError::SaveFailed {
            path: path.clone(),
            error,
        })?;

    Ok(path)
}

fn output_path(file_path: &Path, output: Option<&Path>) -> PathBuf {
    let mut path = match (output, file_path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => file_path.to_path_buf(),
    };
    path.set_extension("png");
    path
}
