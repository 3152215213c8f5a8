//! MIME type detection for captured media.
//!
//! Stills arrive as opaque bytes, so their type is sniffed from magic bytes;
//! clips are files whose type follows from the extension the capture wrote.

use std::path::Path;

/// Still image formats a camera endpoint is likely to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Bmp,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::WebP => "webp",
            ImageFormat::Bmp => "bmp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
        }
    }
}

/// Identify an image format from its leading bytes.
pub fn sniff_image(data: &[u8]) -> Option<ImageFormat> {
    match data {
        [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(ImageFormat::Png),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(ImageFormat::Gif),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(ImageFormat::WebP),
        [b'B', b'M', ..] => Some(ImageFormat::Bmp),
        _ => None,
    }
}

/// Name for a still attachment: the configured name, with its extension
/// swapped for the sniffed one when they disagree.
pub fn attachment_filename(configured: &str, data: &[u8]) -> String {
    let Some(format) = sniff_image(data) else {
        return configured.to_string();
    };
    let path = Path::new(configured);
    let current = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    let matches = match (current.as_deref(), format) {
        (Some("jpg" | "jpeg"), ImageFormat::Jpeg) => true,
        (Some(ext), format) => ext == format.extension(),
        (None, _) => false,
    };
    if matches {
        return configured.to_string();
    }
    path.with_extension(format.extension())
        .to_string_lossy()
        .into_owned()
}

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "apng"         => "image/apng",
        "bmp"          => "image/bmp",
        "mp4"          => "video/mp4",
        "webm"         => "video/webm",
        "mkv"          => "video/x-matroska",
        "mov"          => "video/quicktime",
        _              => "application/octet-stream",
    }
}

/// Whether Discord renders the type inline rather than as a download.
pub fn is_inline_safe(mime: &str) -> bool {
    matches!(
        mime,
        "image/jpeg" | "image/png" | "image/gif" | "image/webp" | "video/mp4" | "video/webm"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(sniff_image(&[0xFF, 0xD8, 0xFF, 0xDB]), Some(ImageFormat::Jpeg));
        assert_eq!(
            sniff_image(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"),
            Some(ImageFormat::Png)
        );
        assert_eq!(sniff_image(b"GIF89a\x01\x00"), Some(ImageFormat::Gif));
        assert_eq!(sniff_image(b"RIFF\x24\0\0\0WEBPVP8 "), Some(ImageFormat::WebP));
        assert_eq!(sniff_image(b"<html>"), None);
        assert_eq!(sniff_image(&[]), None);
    }

    #[test]
    fn keeps_matching_name() {
        assert_eq!(attachment_filename("creep.jpg", &[0xFF, 0xD8, 0xFF]), "creep.jpg");
        assert_eq!(attachment_filename("creep.JPEG", &[0xFF, 0xD8, 0xFF]), "creep.JPEG");
    }

    #[test]
    fn fixes_mismatched_extension() {
        assert_eq!(attachment_filename("creep.jpg", b"\x89PNG\r\n\x1a\n"), "creep.png");
        assert_eq!(attachment_filename("creep", b"GIF89a"), "creep.gif");
    }

    #[test]
    fn unknown_payload_keeps_configured_name() {
        assert_eq!(attachment_filename("creep.jpg", b"garbage"), "creep.jpg");
    }

    #[test]
    fn detects_clip_types() {
        assert_eq!(detect_mime_type(&PathBuf::from("/tmp/clip.gif")), "image/gif");
        assert_eq!(detect_mime_type(&PathBuf::from("clip.MP4")), "video/mp4");
        assert_eq!(detect_mime_type(&PathBuf::from("clip.xyz")), "application/octet-stream");
        assert!(is_inline_safe("image/gif"));
        assert!(!is_inline_safe("application/octet-stream"));
    }
}
