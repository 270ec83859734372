//! Parallel conversion of independent documents.

use std::path::PathBuf;

use rayon::prelude::*;

use super::{ConvertOptions, ConvertResult, Converter};
use crate::assets::DEFAULT_IMAGE_DIR;
use crate::detect::LanguageDetector;
use crate::error::Result;

/// One snapshot to convert and where to write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    /// JSON snapshot to read
    pub input: PathBuf,
    /// HTML file to write
    pub output: PathBuf,
}

impl BatchJob {
    /// Create a job.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Job writing `<stem>.html` into `dir`.
    pub fn into_dir(input: impl Into<PathBuf>, dir: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let stem = input
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "document".into());
        let mut output = dir.into().join(stem);
        output.set_extension("html");
        Self { input, output }
    }
}

/// Convert every job on the rayon pool.
///
/// Each job runs its own pipeline; only the detector is shared. Results are
/// returned in job order. Without an explicit image directory, each job's
/// images land in `images/<stem>/` beside its output so numbering never
/// collides.
pub fn convert_batch(
    jobs: &[BatchJob],
    detector: &dyn LanguageDetector,
    options: &ConvertOptions,
) -> Vec<Result<ConvertResult>> {
    jobs.par_iter()
        .map(|job| {
            let mut job_options = options.clone();
            if job_options.image_dir.is_none() {
                job_options.image_dir = Some(job_image_dir(job));
            }
            let mut provider = options.json_provider(&job.input);
            let converter = Converter::new(detector, job_options);

            let result = converter.convert_to_file(&mut provider, &job.output);
            if let Err(ref err) = result {
                log::warn!("Failed to convert {}: {}", job.input.display(), err);
            }
            result
        })
        .collect()
}

/// Per-document image directory, so jobs sharing an output directory never
/// overwrite each other's images.
fn job_image_dir(job: &BatchJob) -> PathBuf {
    let parent = job.output.parent().map(PathBuf::from).unwrap_or_default();
    let stem = job
        .output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    parent.join(DEFAULT_IMAGE_DIR).join(stem)
}
