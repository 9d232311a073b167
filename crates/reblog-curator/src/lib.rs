pub mod curator;
pub mod error;

pub use curator::{normalize_selection, ReblogCurator};
pub use error::{CuratorError, Result};
