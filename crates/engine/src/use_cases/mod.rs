//! Use cases - user-facing flows built on the campaign store.
//!
//! - `debounced_save` - Coalesces rapid edits into single writes
//! - `transfer` - Import and export of whole campaign files

pub mod debounced_save;
pub mod transfer;

pub use debounced_save::{DebouncedSave, PendingSave, SaveTarget};
pub use transfer::{
    export_campaign, export_file_name, export_with, import_campaign, parse_campaign, Export,
    ImportError,
};
