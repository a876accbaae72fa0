//! Path helpers shared by the parser and the resolver.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Lexically clean a path string.
///
/// Collapses repeated separators, drops `.` components and resolves `..`
/// against the component before it. Leading `..` on a relative path is kept,
/// `..` directly under the root is dropped. An empty result becomes `"."`.
/// The filesystem is never consulted.
pub fn clean(path: &str) -> String {
    let mut components: Vec<Component> = Vec::new();

    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    if components.is_empty() {
        return ".".to_string();
    }

    components
        .iter()
        .collect::<PathBuf>()
        .to_string_lossy()
        .to_string()
}

/// Stat `path`, relative paths being taken against `base`.
///
/// Callers must check for [`io::ErrorKind::NotFound`] themselves: any other
/// error means the entry may or may not exist, so it is never treated as
/// proof of absence.
pub fn probe(base: &Path, path: &str) -> io::Result<()> {
    std::fs::metadata(base.join(path)).map(|_| ())
}

/// True when a cleaned path carries no information (`""` or `"."`).
pub fn is_blank(cleaned: &str) -> bool {
    cleaned.is_empty() || cleaned == "."
}
