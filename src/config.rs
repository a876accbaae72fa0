//! Built-in defaults.
//!
//! cbuild has no configuration file of its own beyond the `CBuildfile`; the
//! values here are what the resolver falls back to when neither the command
//! line nor the buildfile says otherwise.

/// File name every buildfile path must end with.
pub const BUILDFILE_NAME: &str = "CBuildfile";

/// Output artifact name when `-o` and `%OUT` are both absent.
pub const DEFAULT_OUTPUT: &str = "compiled_output";

/// Compiler used when `CC` is unset and the buildfile has no `%COMPILER`.
pub const DEFAULT_COMPILER: &str = "gcc";

/// Resolve the default compiler name.
///
/// Honours the conventional `CC` environment variable, the same way the
/// project builder picks a C compiler. A `%COMPILER` directive still wins
/// over whatever this returns.
pub fn default_compiler() -> String {
    compiler_from_env(std::env::var("CC").ok())
}

fn compiler_from_env(cc: Option<String>) -> String {
    match cc {
        Some(cc) if !cc.trim().is_empty() => cc.trim().to_string(),
        _ => DEFAULT_COMPILER.to_string(),
    }
}
