//! Flavorgen - cascading brand/build configuration for Android apps
//!
//! Flavorgen resolves configuration keys over a hierarchy of variants
//! (global defaults, build types, brands and brand×build combinations),
//! prompting the operator only where a key may be specialized, caching
//! secrets outside the repository, and writing one minimal resource file per
//! variant that actually overrides something.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Resolution engine (variants, prompting, expansion, compaction, rendering)
//! - `error`: Error taxonomy and diagnostic severity

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
