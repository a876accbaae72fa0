//! # cbuild - A simple C build system
//!
//! cbuild turns either a list of source files or a `CBuildfile` into a
//! single compiler invocation that produces one binary.
//!
//! ```text
//! // CBuildfile
//! %OUT hello
//! %ARG -Wall
//! src/main.c
//! src/greet.c
//! ```
//!
//! ```bash
//! cbuild                      # reads ./CBuildfile
//! cbuild -b main.c util.c     # no buildfile, default output name
//! ```
//!
//! ## Module Organization
//!
//! - [`buildfile`] - `CBuildfile` parsing
//! - [`plan`] - Merging CLI inputs and buildfile directives into a plan
//! - [`compiler`] - Running the compiler
//! - [`config`] - Built-in defaults
//! - [`paths`] - Lexical path cleaning and existence checks
//! - [`ui`] - Terminal output

/// `CBuildfile` parsing.
pub mod buildfile;

/// Running the compiler for a resolved plan.
pub mod compiler;

/// Built-in defaults.
pub mod config;

/// Lexical path cleaning and existence checks.
pub mod paths;

/// Build plan resolution.
pub mod plan;

/// Terminal output helpers.
pub mod ui;
