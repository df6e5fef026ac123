//! Canonical on-disk layout: `inputs/input_<n>.txt` and `outputs/output_<n>.txt`.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::LayoutConfig;
use crate::error::StoreError;
use crate::prepare::CanonicalCase;

/// Paths of the files written for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFiles {
    pub index: usize,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Input and output files ordered by their numeric index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseListing {
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
}

/// Persist/list capability for canonical case files.
pub trait CaseStore {
    /// Replaces the stored case set with `cases`.
    fn persist(&self, cases: &[CanonicalCase]) -> Result<Vec<CaseFiles>, StoreError>;
    fn list(&self) -> Result<CaseListing, StoreError>;
}

#[derive(Debug, Clone)]
pub struct FsCaseStore {
    inputs_dir: PathBuf,
    outputs_dir: PathBuf,
}

const INPUT_PREFIX: &str = "input_";
const OUTPUT_PREFIX: &str = "output_";

impl FsCaseStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::from_layout(&LayoutConfig {
            root: root.as_ref().to_path_buf(),
            ..LayoutConfig::default()
        })
    }

    pub fn from_layout(layout: &LayoutConfig) -> Self {
        Self {
            inputs_dir: layout.root.join(&layout.inputs_dir),
            outputs_dir: layout.root.join(&layout.outputs_dir),
        }
    }

    pub fn inputs_dir(&self) -> &Path {
        &self.inputs_dir
    }

    pub fn outputs_dir(&self) -> &Path {
        &self.outputs_dir
    }

    pub fn input_path(&self, index: usize) -> PathBuf {
        self.inputs_dir.join(format!("{INPUT_PREFIX}{index}.txt"))
    }

    pub fn output_path(&self, index: usize) -> PathBuf {
        self.outputs_dir.join(format!("{OUTPUT_PREFIX}{index}.txt"))
    }
}

/// `input_12.txt` -> 12 for prefix `input_`.
fn index_of(name: &str, prefix: &str) -> Option<usize> {
    name.strip_prefix(prefix)?
        .strip_suffix(".txt")?
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
}

fn scan(dir: &Path, prefix: &str) -> Result<Vec<(usize, PathBuf)>, StoreError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(StoreError::io(dir, e)),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(index) = index_of(name, prefix) {
            found.push((index, path));
        }
    }
    found.sort_by_key(|(index, _)| *index);
    Ok(found)
}

/// Writes `contents` to a temp file beside `target`; nothing is visible at
/// `target` until the returned file is persisted.
fn stage(target: &Path, contents: &str) -> Result<tempfile::NamedTempFile, StoreError> {
    if target.is_dir() {
        return Err(StoreError::io(
            target,
            std::io::Error::other("a directory is in the way"),
        ));
    }
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|e| StoreError::io(target, e))?;
    Ok(tmp)
}

impl CaseStore for FsCaseStore {
    /// All files are staged before any existing case file is touched, so a
    /// failed write leaves the previous case set in place. Each file is then
    /// moved into place with a rename.
    fn persist(&self, cases: &[CanonicalCase]) -> Result<Vec<CaseFiles>, StoreError> {
        for dir in [&self.inputs_dir, &self.outputs_dir] {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }

        let mut staged = Vec::with_capacity(cases.len() * 2);
        let mut written = Vec::with_capacity(cases.len());
        for case in cases {
            let files = CaseFiles {
                index: case.index,
                input: self.input_path(case.index),
                output: self.output_path(case.index),
            };
            staged.push((stage(&files.input, case.input.as_str())?, files.input.clone()));
            staged.push((stage(&files.output, case.output.as_str())?, files.output.clone()));
            written.push(files);
        }

        for (tmp, target) in staged {
            tmp.persist(&target)
                .map_err(|e| StoreError::io(&target, e.error))?;
        }

        // Drop leftovers from a previous, larger case set.
        let keep: Vec<usize> = cases.iter().map(|c| c.index).collect();
        for (dir, prefix) in [
            (&self.inputs_dir, INPUT_PREFIX),
            (&self.outputs_dir, OUTPUT_PREFIX),
        ] {
            for (index, path) in scan(dir, prefix)? {
                if !keep.contains(&index) {
                    std::fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
                    tracing::debug!(path = %path.display(), "removed stale case file");
                }
            }
        }

        tracing::info!(
            cases = written.len(),
            inputs = %self.inputs_dir.display(),
            outputs = %self.outputs_dir.display(),
            "test cases written"
        );
        Ok(written)
    }

    fn list(&self) -> Result<CaseListing, StoreError> {
        let inputs = scan(&self.inputs_dir, INPUT_PREFIX)?;
        let outputs = scan(&self.outputs_dir, OUTPUT_PREFIX)?;

        if inputs.is_empty() && outputs.is_empty() {
            return Err(StoreError::Layout(format!(
                "no input or output files found under {} and {}",
                self.inputs_dir.display(),
                self.outputs_dir.display()
            )));
        }

        if inputs.len() == outputs.len() {
            if let Some(((i, _), (o, _))) = inputs.iter().zip(&outputs).find(|((i, _), (o, _))| i != o) {
                return Err(StoreError::Layout(format!(
                    "{INPUT_PREFIX}{i}.txt is paired with {OUTPUT_PREFIX}{o}.txt; indices must match"
                )));
            }
        }

        Ok(CaseListing {
            inputs: inputs.into_iter().map(|(_, p)| p).collect(),
            outputs: outputs.into_iter().map(|(_, p)| p).collect(),
        })
    }
}
