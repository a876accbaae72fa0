//! `CBuildfile` parsing.
//!
//! A buildfile is line oriented:
//!
//! ```text
//! // comments run to the end of the line
//! %COMPILER clang
//! %OUT hello
//! %ARG -Wall
//! %ARG -O2
//! src/main.c
//! src/util.c
//! ```
//!
//! `%`-lines are directives, every other non-blank line is a source file
//! that must exist when the file is parsed. Source order is kept because it
//! is the order the compiler (and so the linker) sees.
//!
//! `//` is stripped wherever it appears, including inside a path. Quoting is
//! not supported.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::paths;

const COMMENT: &str = "//";
const SIGIL: char = '%';

/// One recognised `%` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildDirective {
    /// `%OUT <path>`
    Output(String),
    /// `%COMPILER <name>`
    Compiler(String),
    /// `%ARG <value>`
    Arg(String),
}

impl BuildDirective {
    const OUT: &'static str = "OUT ";
    const ARG: &'static str = "ARG ";
    const COMPILER: &'static str = "COMPILER ";

    /// Classify the text following the `%` sigil.
    fn classify(rest: &str) -> Option<Self> {
        if let Some(value) = rest.strip_prefix(Self::OUT) {
            Some(Self::Output(value.trim().to_string()))
        } else if let Some(value) = rest.strip_prefix(Self::ARG) {
            Some(Self::Arg(value.trim().to_string()))
        } else {
            rest.strip_prefix(Self::COMPILER)
                .map(|value| Self::Compiler(value.trim().to_string()))
        }
    }
}

/// Directives collected from one buildfile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildfileInfo {
    pub output: Option<String>,
    pub compiler: Option<String>,
    pub extra_args: Vec<String>,
}

impl BuildfileInfo {
    fn apply(
        &mut self,
        directive: BuildDirective,
        line: usize,
        content: &str,
    ) -> Result<(), BuildfileError> {
        let duplicate = |name| BuildfileError::DuplicateDirective {
            line,
            name,
            content: content.to_string(),
        };

        match directive {
            BuildDirective::Output(value) => {
                if self.output.is_some() {
                    return Err(duplicate("OUT"));
                }
                self.output = Some(value);
            }
            BuildDirective::Compiler(value) => {
                if self.compiler.is_some() {
                    return Err(duplicate("COMPILER"));
                }
                self.compiler = Some(value);
            }
            BuildDirective::Arg(value) => self.extra_args.push(value),
        }
        Ok(())
    }
}

/// A successfully parsed buildfile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buildfile {
    /// Source paths exactly as written, in file order.
    pub sources: Vec<String>,
    pub info: BuildfileInfo,
}

/// Error type for buildfile parsing. Line numbers are 1-indexed.
#[derive(Debug)]
pub enum BuildfileError {
    /// `OUT` or `COMPILER` given a second time
    DuplicateDirective {
        line: usize,
        name: &'static str,
        content: String,
    },
    /// `%` line that is not a known directive
    InvalidDirective { line: usize, content: String },
    /// Source line naming a file that does not exist
    PathNotFound { line: usize, path: String },
    /// Any other filesystem failure, passed through untouched
    Io(io::Error),
}

impl BuildfileError {
    /// Line the error was raised on, when it concerns a specific line.
    pub fn line(&self) -> Option<usize> {
        match self {
            BuildfileError::DuplicateDirective { line, .. }
            | BuildfileError::InvalidDirective { line, .. }
            | BuildfileError::PathNotFound { line, .. } => Some(*line),
            BuildfileError::Io(_) => None,
        }
    }
}

impl fmt::Display for BuildfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildfileError::DuplicateDirective { line, name, .. } => write!(
                f,
                "error on line {}: directive '{}' has already been declared",
                line, name
            ),
            BuildfileError::InvalidDirective { line, content } => {
                write!(f, "error on line {}: invalid directive '{}'", line, content)
            }
            BuildfileError::PathNotFound { line, path } => {
                write!(f, "error on line {}: path '{}' does not exist", line, path)
            }
            BuildfileError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BuildfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildfileError::Io(e) => std::error::Error::source(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BuildfileError {
    fn from(e: io::Error) -> Self {
        BuildfileError::Io(e)
    }
}

/// Parse buildfile text, checking source paths against the current directory.
pub fn parse(contents: &str) -> Result<Buildfile, BuildfileError> {
    parse_in(contents, Path::new("."))
}

/// Parse buildfile text, checking relative source paths against `base`.
///
/// Stops at the first error; nothing parsed before it is returned.
pub fn parse_in(contents: &str, base: &Path) -> Result<Buildfile, BuildfileError> {
    let mut buildfile = Buildfile::default();

    for (idx, raw) in contents.lines().enumerate() {
        let line_no = idx + 1;

        let line = match raw.find(COMMENT) {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(SIGIL) {
            let directive =
                BuildDirective::classify(rest).ok_or_else(|| BuildfileError::InvalidDirective {
                    line: line_no,
                    content: line.to_string(),
                })?;
            buildfile.info.apply(directive, line_no, line)?;
            continue;
        }

        match paths::probe(base, line) {
            Ok(()) => buildfile.sources.push(line.to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BuildfileError::PathNotFound {
                    line: line_no,
                    path: line.to_string(),
                });
            }
            Err(e) => return Err(BuildfileError::Io(e)),
        }
    }

    Ok(buildfile)
}

/// Read and parse the buildfile at `path`.
pub fn load(path: &Path, base: &Path) -> Result<Buildfile, BuildfileError> {
    let contents = fs::read_to_string(path)?;
    parse_in(&contents, base)
}

/// Absolute location of the buildfile named by a cleaned path.
pub fn locate(path: &str, base: &Path) -> PathBuf {
    let joined = base.join(path);
    if joined.is_absolute() {
        joined
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&joined))
            .unwrap_or(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, "int x;\n").unwrap();
        }
        dir
    }

    #[test]
    fn test_parse_sources_in_file_order() {
        let dir = project(&["b.c", "a.c", "src/z.c"]);
        let parsed = parse_in("b.c\na.c\nsrc/z.c\n", dir.path()).unwrap();
        assert_eq!(parsed.sources, vec!["b.c", "a.c", "src/z.c"]);
        assert_eq!(parsed.info, BuildfileInfo::default());
    }

    #[test]
    fn test_parse_directives() {
        let dir = project(&["a.c", "b.c"]);
        let text = "%COMPILER  clang \n%OUT prog\n%ARG -Wall\na.c\n%ARG   -O2  \nb.c\n";
        let parsed = parse_in(text, dir.path()).unwrap();
        assert_eq!(parsed.sources, vec!["a.c", "b.c"]);
        assert_eq!(parsed.info.output.as_deref(), Some("prog"));
        assert_eq!(parsed.info.compiler.as_deref(), Some("clang"));
        assert_eq!(parsed.info.extra_args, vec!["-Wall", "-O2"]);
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let dir = project(&["main.c"]);
        let text = "// header comment\n\n   \n  main.c   // trailing\n%ARG -g // debug\n//%OUT nope\n";
        let parsed = parse_in(text, dir.path()).unwrap();
        assert_eq!(parsed.sources, vec!["main.c"]);
        assert_eq!(parsed.info.extra_args, vec!["-g"]);
        assert!(parsed.info.output.is_none());
    }

    #[test]
    fn test_parse_empty_input() {
        let dir = project(&[]);
        let parsed = parse_in("", dir.path()).unwrap();
        assert!(parsed.sources.is_empty());
        assert_eq!(parsed.info, BuildfileInfo::default());
    }

    #[test]
    fn test_duplicate_out_cites_second_line() {
        let dir = project(&["a.c"]);
        let err = parse_in("%OUT one\na.c\n\n  %OUT two  // again\n", dir.path()).unwrap_err();
        match &err {
            BuildfileError::DuplicateDirective {
                line,
                name,
                content,
            } => {
                assert_eq!(*line, 4);
                assert_eq!(*name, "OUT");
                assert_eq!(content, "%OUT two");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "error on line 4: directive 'OUT' has already been declared"
        );
    }

    #[test]
    fn test_duplicate_compiler() {
        let dir = project(&[]);
        let err = parse_in("%COMPILER gcc\n%COMPILER clang\n", dir.path()).unwrap_err();
        assert!(matches!(
            err,
            BuildfileError::DuplicateDirective {
                line: 2,
                name: "COMPILER",
                ref content,
            } if content == "%COMPILER clang"
        ));
    }

    #[test]
    fn test_repeated_arg_is_allowed() {
        let dir = project(&[]);
        let parsed = parse_in("%ARG -a\n%ARG -a\n", dir.path()).unwrap();
        assert_eq!(parsed.info.extra_args, vec!["-a", "-a"]);
    }

    #[test]
    fn test_unknown_directive() {
        let dir = project(&["a.c"]);
        let err = parse_in("a.c\n%FOO bar\n", dir.path()).unwrap_err();
        assert!(matches!(err, BuildfileError::InvalidDirective { line: 2, .. }));
        assert_eq!(err.to_string(), "error on line 2: invalid directive '%FOO bar'");
    }

    #[test]
    fn test_directive_needs_separator() {
        let dir = project(&[]);
        for text in ["%OUT", "%OUTprog", "%ARG", "%COMPILER", "%COMPILERgcc", "%", "%out prog"] {
            let err = parse_in(text, dir.path()).unwrap_err();
            assert!(
                matches!(err, BuildfileError::InvalidDirective { line: 1, .. }),
                "expected invalid directive for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_directive_with_empty_value() {
        // Trailing whitespace is trimmed from the line before the keyword is
        // matched, so "%OUT " never reaches the OUT branch.
        let dir = project(&[]);
        let err = parse_in("%OUT   \n", dir.path()).unwrap_err();
        assert!(matches!(err, BuildfileError::InvalidDirective { line: 1, .. }));
    }

    #[test]
    fn test_missing_path_discards_everything() {
        let dir = project(&["a.c", "c.c"]);
        let err = parse_in("%OUT prog\na.c\nmissing.c\nc.c\n", dir.path()).unwrap_err();
        match err {
            BuildfileError::PathNotFound { line, path } => {
                assert_eq!(line, 3);
                assert_eq!(path, "missing.c");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_comment_marker_truncates_paths() {
        let dir = project(&["src/main.c"]);
        let parsed = parse_in("src//main.c\n", dir.path()).unwrap();
        assert_eq!(parsed.sources, vec!["src"]);
    }

    #[test]
    fn test_parse_is_repeatable() {
        let dir = project(&["a.c", "b.c"]);
        let text = "%OUT prog\n%ARG -Wall\na.c\nb.c\n";
        let first = parse_in(text, dir.path()).unwrap();
        let second = parse_in(text, dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_crlf_line_endings() {
        let dir = project(&["a.c"]);
        let parsed = parse_in("%OUT prog\r\na.c\r\n", dir.path()).unwrap();
        assert_eq!(parsed.sources, vec!["a.c"]);
        assert_eq!(parsed.info.output.as_deref(), Some("prog"));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = project(&["a.c"]);
        let path = dir.path().join("CBuildfile");
        fs::write(&path, "a.c\n%ARG -lm\n").unwrap();
        let parsed = load(&path, dir.path()).unwrap();
        assert_eq!(parsed.sources, vec!["a.c"]);
        assert_eq!(parsed.info.extra_args, vec!["-lm"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_stat_failure_is_not_path_not_found() {
        // a.c is a regular file, so a.c/x.c fails with "not a directory"
        let dir = project(&["a.c"]);
        let err = parse_in("a.c\na.c/x.c\n", dir.path()).unwrap_err();
        match err {
            BuildfileError::Io(e) => assert_ne!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file_is_io() {
        let dir = project(&[]);
        let err = load(&dir.path().join("CBuildfile"), dir.path()).unwrap_err();
        assert!(matches!(err, BuildfileError::Io(_)));
        assert!(err.line().is_none());
    }

    #[test]
    fn test_locate_is_absolute() {
        let dir = project(&[]);
        assert!(locate("CBuildfile", dir.path()).is_absolute());
        assert!(locate("CBuildfile", Path::new(".")).is_absolute());
    }
}
