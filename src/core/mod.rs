//! Core resolution engine.
//!
//! The pipeline runs in four steps:
//!
//! 1. **Resolve** (`resolve`): ask the operator for every (key, variant) the
//!    key's `maxLevel` allows, falling back to static overrides elsewhere.
//! 2. **Persist** (`secrets`): write back the secret cache.
//! 3. **Compact** (`compact`): expand `%%placeholders%%` and drop values the
//!    variant already inherits.
//! 4. **Render** (`render`): turn surviving variants into resource documents.

pub mod compact;
pub mod definition;
pub mod placeholder;
pub mod render;
pub mod resolve;
pub mod secrets;
pub mod source;
pub mod variant;

pub use compact::{CompactedConfig, CompactedVariant, Compaction, compact};
pub use definition::{ConfigKeyDefinition, Definitions, EXAMPLE_DEFINITIONS, ValueType};
pub use placeholder::{Expansion, expand};
pub use render::{RenderedDocument, Rendering, ResourceSink, XmlResourceSink, render_all};
pub use resolve::{ResolvedConfig, resolve};
pub use secrets::{CacheLoad, SecretCache};
pub use source::{Prompt, TerminalSource, ValueSource, acquire};
pub use variant::{Level, MAIN, Variant, VariantGraph};
