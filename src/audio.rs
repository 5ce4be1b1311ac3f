//! Audio collaborators of the playback controller: the transport engine and
//! the metadata reader, each behind a small trait.

mod engine;
mod metadata;
mod sink;

pub use engine::AudioEngine;
pub use metadata::{LoftyReader, MetadataReader, TagSummary, read_tags};
pub use sink::RodioEngine;
