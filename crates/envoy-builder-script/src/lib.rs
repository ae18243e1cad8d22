//! Build script rendering for envoy-builder profiles.
//!
//! # Pipeline
//!
//! ```text
//! envoy-builder-gen --tag <profile> --conf <yaml>
//!   1. Template ── ScriptRenderer::new() parses the embedded build.sh
//!   2. Profile  ── profile::lookup() builds the BuildScript
//!   3. Config   ── the YAML file is read in full
//!   4. Sort     ── required parameters first, declaration order kept
//!   5. Render   ── tag, parameters and YAML substituted into the template
//! ```
//!
//! # Generated script
//!
//! The rendered script parses the profile's flags, rejects missing required
//! values, and writes the YAML into a temporary build context:
//! - `@TOKEN@` placeholders of build-time parameters are replaced at build
//! - runtime parameters become `ENV` defaults and are substituted by the
//!   container entrypoint on every start
//! - `--debug` keeps the build context for inspection

pub mod error;
pub mod renderer;

pub use error::{Error, Result};
pub use renderer::{ScriptRenderer, TEMPLATE_NAME};
