//! Library of acquired tracks: the persisted title -> record index and the
//! helpers used to name stored files.

mod model;
mod naming;
mod store;

pub use model::TrackRecord;
pub use naming::safe_file_stem;
pub use store::LibraryStore;
