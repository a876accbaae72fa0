//! Build plan resolution.
//!
//! Sources come from exactly one place: either the `-b` list on the command
//! line or a `CBuildfile`. The resolver merges that with the output path and
//! compiler defaults and produces a [`BuildPlan`] that can be handed straight
//! to the compiler.

use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::buildfile::{self, BuildfileError};
use crate::config::{BUILDFILE_NAME, DEFAULT_OUTPUT};
use crate::paths;

/// Raw command-line inputs, before any trimming or cleaning.
#[derive(Debug, Clone, Default)]
pub struct CliInputs {
    pub sources: Vec<String>,
    pub buildfile: Option<String>,
    pub output: Option<String>,
}

/// Where a plan's sources came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "path", rename_all = "snake_case")]
pub enum SourceOrigin {
    CommandLine,
    Buildfile(PathBuf),
}

/// Everything needed for one compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub sources: Vec<String>,
    pub output: String,
    pub compiler: String,
    pub extra_args: Vec<String>,
    pub origin: SourceOrigin,
}

/// Invalid combination or shape of command-line inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// Explicit sources and a buildfile path given together
    ConflictingSources,
    /// Buildfile path that does not end in `CBuildfile`
    NotABuildfile(String),
    /// No buildfile at the expected location
    NoBuildfile(PathBuf),
    /// Source named on the command line does not exist
    SourceNotFound(String),
    /// Buildfile parsed cleanly but lists no sources
    EmptyBuildfile(PathBuf),
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::ConflictingSources => write!(
                f,
                "source files and a {} cannot be given at the same time",
                BUILDFILE_NAME
            ),
            UsageError::NotABuildfile(path) => {
                write!(f, "given path '{}' is not a {}", path, BUILDFILE_NAME)
            }
            UsageError::NoBuildfile(path) => {
                write!(f, "no {} found at '{}'", BUILDFILE_NAME, path.display())
            }
            UsageError::SourceNotFound(path) => write!(f, "file '{}' does not exist", path),
            UsageError::EmptyBuildfile(path) => {
                write!(f, "'{}' lists no source files", path.display())
            }
        }
    }
}

impl std::error::Error for UsageError {}

/// Error type for plan resolution
#[derive(Debug)]
pub enum ResolveError {
    Usage(UsageError),
    Buildfile(BuildfileError),
    /// Filesystem failure that is not a plain "not found"
    Io(io::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Usage(e) => write!(f, "{}", e),
            ResolveError::Buildfile(e) => write!(f, "{}", e),
            ResolveError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        // Display already forwards to the wrapped error, so skip a level.
        match self {
            ResolveError::Usage(_) => None,
            ResolveError::Buildfile(e) => std::error::Error::source(e),
            ResolveError::Io(e) => std::error::Error::source(e),
        }
    }
}

impl From<UsageError> for ResolveError {
    fn from(e: UsageError) -> Self {
        ResolveError::Usage(e)
    }
}

impl From<BuildfileError> for ResolveError {
    fn from(e: BuildfileError) -> Self {
        ResolveError::Buildfile(e)
    }
}

impl From<io::Error> for ResolveError {
    fn from(e: io::Error) -> Self {
        ResolveError::Io(e)
    }
}

fn normalize(raw: Option<&str>) -> String {
    paths::clean(raw.unwrap_or_default().trim())
}

/// Resolve command-line inputs into a [`BuildPlan`].
///
/// `root` is the directory relative paths are checked against and where the
/// default buildfile is looked up. `default_compiler` is used unless a
/// buildfile overrides it.
pub fn resolve(
    inputs: &CliInputs,
    root: &Path,
    default_compiler: &str,
) -> Result<BuildPlan, ResolveError> {
    let has_sources = !inputs.sources.is_empty();

    let mut buildfile_path = normalize(inputs.buildfile.as_deref());
    if paths::is_blank(&buildfile_path) {
        buildfile_path = if has_sources {
            String::new()
        } else {
            format!("./{}", BUILDFILE_NAME)
        };
    }

    if has_sources && !buildfile_path.is_empty() {
        return Err(UsageError::ConflictingSources.into());
    }

    if !buildfile_path.is_empty() && !buildfile_path.ends_with(BUILDFILE_NAME) {
        return Err(UsageError::NotABuildfile(buildfile_path).into());
    }

    let mut output = normalize(inputs.output.as_deref());

    let mut sources = Vec::with_capacity(inputs.sources.len());
    for raw in &inputs.sources {
        if raw.trim().is_empty() {
            return Err(UsageError::SourceNotFound(raw.trim().to_string()).into());
        }
        let path = paths::clean(raw.trim());
        match paths::probe(root, &path) {
            Ok(()) => sources.push(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(UsageError::SourceNotFound(path).into());
            }
            Err(e) => return Err(e.into()),
        }
    }

    if paths::is_blank(&output) {
        output = DEFAULT_OUTPUT.to_string();
    }

    if has_sources {
        return Ok(BuildPlan {
            sources,
            output,
            compiler: default_compiler.to_string(),
            extra_args: Vec::new(),
            origin: SourceOrigin::CommandLine,
        });
    }

    let location = buildfile::locate(&buildfile_path, root);
    if let Err(e) = std::fs::metadata(&location) {
        if e.kind() == io::ErrorKind::NotFound {
            return Err(UsageError::NoBuildfile(location).into());
        }
        return Err(e.into());
    }

    let parsed = buildfile::load(&location, root)?;
    if parsed.sources.is_empty() {
        return Err(UsageError::EmptyBuildfile(location).into());
    }
    let info = parsed.info;

    if let Some(out) = info
        .output
        .map(|out| paths::clean(&out))
        .filter(|out| !paths::is_blank(out))
    {
        output = out;
    }

    Ok(BuildPlan {
        sources: parsed.sources,
        output,
        compiler: info.compiler.unwrap_or_else(|| default_compiler.to_string()),
        extra_args: info.extra_args,
        origin: SourceOrigin::Buildfile(location),
    })
}
