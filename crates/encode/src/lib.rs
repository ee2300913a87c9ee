//! Fixed-quality re-encoding of product photography.
//!
//! Source images arrive in whatever raster format the photographer exported
//! (PNG, JPEG, WebP, GIF, BMP or TIFF). Each one is decoded at its native
//! dimensions and written back out in a single [`OutputFormat`] suited to
//! on-screen display. There is no resizing and no adaptive quality search.

mod encoder;
pub mod error;

pub use crate::encoder::{DEFAULT_QUALITY, Encoded, Encoder};
use derive_more::Display;

/// Output raster format.
///
/// Defaults to [`WebP`](Self::WebP).
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OutputFormat {
    /// WebP (.webp)
    #[default]
    #[display("webp")]
    WebP,
    /// JPEG (.jpg)
    #[display("jpeg")]
    Jpeg,
}

impl OutputFormat {
    /// File extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::WebP => "image/webp",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Inverse of [`mime_type`](Self::mime_type).
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/webp" => Some(Self::WebP),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::WebP => image::ImageFormat::WebP,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(OutputFormat::WebP, "webp", "image/webp")]
    #[case(OutputFormat::Jpeg, "jpg", "image/jpeg")]
    fn test_output_format(#[case] format: OutputFormat, #[case] extension: &str, #[case] mime: &str) {
        assert_eq!(format.extension(), extension);
        assert_eq!(format.mime_type(), mime);
        assert_eq!(OutputFormat::from_mime_type(mime), Some(format));
    }

    #[test]
    fn test_unknown_mime_type() {
        assert_eq!(OutputFormat::from_mime_type("image/png"), None);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::WebP);
        assert_eq!(OutputFormat::default().to_string(), "webp");
    }
}
