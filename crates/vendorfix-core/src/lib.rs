pub mod error;
pub mod manifest;
pub mod matcher;
pub mod operations;
pub mod types;

pub use error::{PatchError, Result};
pub use operations::{apply_all, apply_descriptor, ApplyOptions};
pub use types::{Outcome, OutcomeEntry, PatchDescriptor, PatchKind, Report};
