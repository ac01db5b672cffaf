//! Shared presentational components.

mod preview;
mod uploader;

pub use preview::StylePreviewPanel;
pub use uploader::{OutfitUploader, PickedFile};
