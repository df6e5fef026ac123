//! Closed table of supported languages.
//!
//! A language is a name, the source extension its files use, an optional build
//! step producing an artifact, and a run step. Command arguments may contain
//! `{source}` and `{artifact}` placeholders. Stdin is never part of a
//! template; the runner binds the test input to the child's stdin.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::RunnerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTemplate {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Extension used when a solution file is created for this language.
    pub file_extension: &'static str,
    /// Every source extension that maps to this language.
    pub source_extensions: &'static [&'static str],
    pub build: Option<CommandTemplate>,
    pub run: CommandTemplate,
}

/// A fully substituted command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl CommandLine {
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

#[cfg(windows)]
const PYTHON: &str = "python";
#[cfg(not(windows))]
const PYTHON: &str = "python3";

pub const CPP: LanguageDescriptor = LanguageDescriptor {
    name: "C++",
    aliases: &["cpp", "c++", "cxx", "cc"],
    file_extension: "cpp",
    source_extensions: &["cpp", "cc", "cxx"],
    build: Some(CommandTemplate {
        program: "g++",
        args: &["-O2", "-std=c++17", "{source}", "-o", "{artifact}"],
    }),
    run: CommandTemplate {
        program: "{artifact}",
        args: &[],
    },
};

pub const PYTHON3: LanguageDescriptor = LanguageDescriptor {
    name: "Python",
    aliases: &["python", "py", "python3"],
    file_extension: "py",
    source_extensions: &["py"],
    build: None,
    run: CommandTemplate {
        program: PYTHON,
        args: &["{source}"],
    },
};

pub const LANGUAGES: &[LanguageDescriptor] = &[CPP, PYTHON3];

impl LanguageDescriptor {
    pub fn is_compiled(&self) -> bool {
        self.build.is_some()
    }

    fn matches(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.name.eq_ignore_ascii_case(tag) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(tag))
    }

    /// Path of the build artifact inside `artifact_dir`.
    pub fn artifact_path(&self, artifact_dir: &Path) -> PathBuf {
        artifact_dir.join(format!("solution{}", std::env::consts::EXE_SUFFIX))
    }

    pub fn build_command(&self, source: &Path, artifact: &Path) -> Option<CommandLine> {
        self.build.map(|t| substitute(&t, source, artifact))
    }

    /// Run command for `source`; `artifact` is only consulted by compiled languages.
    pub fn run_command(&self, source: &Path, artifact: &Path) -> CommandLine {
        substitute(&self.run, source, artifact)
    }
}

fn substitute(template: &CommandTemplate, source: &Path, artifact: &Path) -> CommandLine {
    let fill = |s: &str| -> OsString {
        match s {
            "{source}" => source.as_os_str().to_owned(),
            "{artifact}" => artifact.as_os_str().to_owned(),
            other => OsString::from(
                other
                    .replace("{source}", &source.to_string_lossy())
                    .replace("{artifact}", &artifact.to_string_lossy()),
            ),
        }
    };
    CommandLine {
        program: fill(template.program),
        args: template.args.iter().map(|a| fill(a)).collect(),
    }
}

/// Lookup over a set of descriptors. `builtin()` is the shipped table.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<LanguageDescriptor>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LanguageRegistry {
    pub fn builtin() -> Self {
        Self::new(LANGUAGES.to_vec())
    }

    pub fn new(languages: Vec<LanguageDescriptor>) -> Self {
        Self { languages }
    }

    pub fn languages(&self) -> &[LanguageDescriptor] {
        &self.languages
    }

    pub fn resolve(&self, tag: &str) -> Result<&LanguageDescriptor, RunnerError> {
        self.languages
            .iter()
            .find(|l| l.matches(tag))
            .ok_or_else(|| RunnerError::UnsupportedLanguage(tag.trim().to_string()))
    }

    /// Infers the language from a source file's extension.
    pub fn for_path(&self, path: &Path) -> Result<&LanguageDescriptor, RunnerError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        self.languages
            .iter()
            .find(|l| l.source_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .ok_or_else(|| {
                RunnerError::UnsupportedLanguage(format!("no language for '{}'", path.display()))
            })
    }
}
