//! Pure pipeline components for a single chat exchange: intent
//! classification, entity extraction, catalog grounding, and the
//! three-tier reply cascade.

pub mod context;
pub mod extract;
pub mod intent;
pub mod synthesize;

pub use context::{build_context, CatalogSnapshot, CONTEXT_LIMIT};
pub use extract::extract_title;
pub use intent::classify;
pub use synthesize::{Reply, ReplyStatus, Synthesizer};
