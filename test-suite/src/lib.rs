//! Case-file driven tests for protolit.
//!
//! Every `cases/**/*.json` file holds one case. The fields present decide
//! which scenarios run: a message value with its expected literal, a literal
//! to canonicalize, or a literal the canonicalizer must reject.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod case;
pub mod scenarios;

pub use case::{Case, CaseData, CaseResult, NamedScenarioResult, ScenarioResult, Text};

/// Root of the case files.
pub fn cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("cases")
}

/// Descriptor sets referenced by render cases.
pub fn descriptors_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("descriptors")
}

#[derive(Debug, Error)]
pub enum CollectCasesError {
    #[error("{}: {error}", path.display())]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },
    #[error("{}: {error}", path.display())]
    ParseError {
        path: PathBuf,
        error: serde_json::Error,
    },
}

impl CollectCasesError {
    pub fn path(&self) -> &Path {
        match self {
            CollectCasesError::IoError { path, .. } | CollectCasesError::ParseError { path, .. } => {
                path
            }
        }
    }
}

/// Load every case file, sorted by path.
pub fn collect_cases() -> Result<Vec<Result<Case, CollectCasesError>>, CollectCasesError> {
    let mut files = Vec::new();
    walk_directory(&cases_dir(), &mut files)?;
    files.sort();
    Ok(files.into_iter().map(|path| load_case(path)).collect())
}

fn walk_directory(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), CollectCasesError> {
    let io_error = |error| CollectCasesError::IoError {
        path: dir.to_path_buf(),
        error,
    };
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            walk_directory(&path, files)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    Ok(())
}

fn load_case(path: PathBuf) -> Result<Case, CollectCasesError> {
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(error) => return Err(CollectCasesError::IoError { path, error }),
    };
    match serde_json::from_str(&content) {
        Ok(data) => Ok(Case { path, data }),
        Err(error) => Err(CollectCasesError::ParseError { path, error }),
    }
}
