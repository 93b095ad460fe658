//! Path resolution and multi-file aggregation.
//!
//! A demonstration path is either one `.demo` file or a directory of them.
//! [`DemoLoader::load`] scans each candidate in turn and concatenates the
//! step records under the first file's parameter record.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use mimic_core::{ParameterRecord, RecordDecoder, StepRecord};
use tracing::{debug, info, instrument};

use crate::codec::BinaryCodec;
use crate::error::DemoError;
use crate::scanner::{scan, ScannedFile};

/// Default demonstration file extension (without the dot).
pub const DEMO_EXTENSION: &str = "demo";

/// Options controlling [`DemoLoader`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// File extension of demonstration files, without the dot. Default: `"demo"`.
    pub extension: String,
    /// Reject files whose parameter record implies different shapes than the
    /// first file's. Default: `true`.
    pub check_parameters: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extension: DEMO_EXTENSION.to_string(),
            check_parameters: true,
        }
    }
}

/// The combined contents of every file under a demonstration path.
#[derive(Clone, Debug, PartialEq)]
pub struct Demonstration {
    /// Parameter record of the first file.
    pub parameters: ParameterRecord,
    /// Step records of all files, file by file in load order.
    pub steps: Vec<StepRecord>,
    /// Sum of the step counts declared by each file's meta record.
    pub expected_steps: usize,
    /// The files that were loaded, in load order.
    pub files: Vec<PathBuf>,
}

/// Loads demonstration files with a given record decoder.
#[derive(Clone, Debug, Default)]
pub struct DemoLoader<D> {
    decoder: D,
    options: LoadOptions,
}

impl<D: RecordDecoder> DemoLoader<D> {
    /// Create a loader.
    pub fn new(decoder: D, options: LoadOptions) -> Self {
        Self { decoder, options }
    }

    /// The options this loader was built with.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Match on the file name suffix, so a file named just `.demo` counts.
    fn has_extension(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(OsStr::to_str)
            .and_then(|name| name.strip_suffix(self.options.extension.as_str()))
            .is_some_and(|stem| stem.ends_with('.'))
    }

    /// Resolve `path` to the ordered list of files to load.
    ///
    /// Directory entries are sorted by path so repeated loads see the same
    /// order. Subdirectories are not searched.
    pub fn candidate_files(&self, path: &Path) -> Result<Vec<PathBuf>, DemoError> {
        if path.is_dir() {
            let entries = fs::read_dir(path).map_err(|source| DemoError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
            let mut files = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|source| DemoError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })?;
                let candidate = entry.path();
                if candidate.is_file() && self.has_extension(&candidate) {
                    files.push(candidate);
                }
            }
            if files.is_empty() {
                return Err(DemoError::NoDemoFiles {
                    dir: path.to_path_buf(),
                    extension: self.options.extension.clone(),
                });
            }
            files.sort();
            Ok(files)
        } else if path.is_file() {
            if !self.has_extension(path) {
                return Err(DemoError::WrongExtension {
                    path: path.to_path_buf(),
                    expected: self.options.extension.clone(),
                });
            }
            Ok(vec![path.to_path_buf()])
        } else {
            Err(DemoError::PathNotFound {
                path: path.to_path_buf(),
            })
        }
    }

    /// Read and scan a single file. Errors are annotated with the file path.
    pub fn load_file(&self, path: &Path) -> Result<ScannedFile, DemoError> {
        let bytes = fs::read(path).map_err(|source| DemoError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        scan(&bytes, &self.decoder).map_err(|e| DemoError::InFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Load every demonstration file under `path`.
    ///
    /// Aborts on the first file that fails; no partial result is returned.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> Result<Demonstration, DemoError> {
        let files = self.candidate_files(path)?;
        let (first, rest) = files.split_first().ok_or_else(|| DemoError::NoDemoFiles {
            dir: path.to_path_buf(),
            extension: self.options.extension.clone(),
        })?;

        let ScannedFile {
            meta,
            parameters,
            mut steps,
        } = self.load_file(first)?;
        let mut expected_steps = meta.number_steps as usize;
        debug!(file = %first.display(), steps = steps.len(), "loaded demonstration file");

        for file in rest {
            let scanned = self.load_file(file)?;
            if self.options.check_parameters {
                if let Some(detail) = parameters.shape_difference(&scanned.parameters) {
                    return Err(DemoError::ShapeMismatch {
                        path: file.clone(),
                        detail,
                    });
                }
            }
            expected_steps += scanned.expected_steps();
            debug!(file = %file.display(), steps = scanned.steps.len(), "loaded demonstration file");
            steps.extend(scanned.steps);
        }

        info!(
            files = files.len(),
            steps = steps.len(),
            brain = %parameters.brain_name,
            "loaded demonstrations"
        );
        Ok(Demonstration {
            parameters,
            steps,
            expected_steps,
            files,
        })
    }
}

/// Load a demonstration path with [`BinaryCodec`] and default options.
pub fn load_demonstration(path: impl AsRef<Path>) -> Result<Demonstration, DemoError> {
    DemoLoader::new(BinaryCodec, LoadOptions::default()).load(path.as_ref())
}
