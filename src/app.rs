//! Application module: exposes the view model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the visible list,
//! selection, typed input and status line.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
