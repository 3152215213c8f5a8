//! Still image retrieval and media typing.

pub mod fetcher;
pub mod mime_detect;

pub use fetcher::{fetch_snapshot, SnapshotFetcher};
pub use mime_detect::{
    attachment_filename, detect_mime_type, is_inline_safe, sniff_image, ImageFormat,
};
