use crate::OutputFormat;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError, ImageReader};
use std::io::Cursor;
use tracing::instrument;

/// Quality used when none is configured.
pub const DEFAULT_QUALITY: f32 = 0.90;

/// The re-encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

/// Decodes any supported raster image and re-encodes it as `format`.
///
/// `quality` is a fraction in `(0, 1]`, mapped onto the 1 to 100 scale of
/// the lossy JPEG and WebP encoders.
///
/// Colour is flattened to 8 bits per channel. Transparency is kept for WebP
/// and dropped for JPEG.
///
/// ```
/// use snapsku_encode::{Encoder, OutputFormat};
///
/// let encoder = Encoder::new(OutputFormat::Jpeg, 0.9);
/// assert!(encoder.encode_blocking(b"definitely not an image").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoder {
    format: OutputFormat,
    quality: f32,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(OutputFormat::default(), DEFAULT_QUALITY)
    }
}

impl Encoder {
    /// Quality outside `(0, 1]` is clamped; a non-finite quality falls back
    /// to [`DEFAULT_QUALITY`].
    pub fn new(format: OutputFormat, quality: f32) -> Self {
        let quality = if quality.is_finite() { quality.clamp(0.01, 1.0) } else { DEFAULT_QUALITY };
        Self { format, quality }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    fn percent(&self) -> u8 {
        // Infallible: quality is clamped to [0.01, 1.0].
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// Decode and re-encode on the current thread. CPU-bound; prefer
    /// [`encode`](Self::encode) from async code.
    ///
    /// # Errors
    /// - [`ErrorKind::Decode`] for empty, truncated or corrupt input.
    /// - [`ErrorKind::UnsupportedFormat`] when the input isn't a recognised
    ///   raster format.
    /// - [`ErrorKind::Encode`] if writing the output fails.
    pub fn encode_blocking(&self, data: &[u8]) -> Result<Encoded> {
        if data.is_empty() {
            exn::bail!(ErrorKind::Decode("empty input".to_string()));
        }
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .or_raise(|| ErrorKind::Decode("could not read image header".to_string()))?;
        let Some(source_format) = reader.format() else {
            exn::bail!(ErrorKind::UnsupportedFormat("unrecognised image data".to_string()));
        };
        let image = match reader.decode() {
            Ok(image) => image,
            Err(ImageError::Unsupported(e)) => exn::bail!(ErrorKind::UnsupportedFormat(e.to_string())),
            Err(e) => exn::bail!(ErrorKind::Decode(e.to_string())),
        };
        let (width, height) = (image.width(), image.height());

        let buffer = match self.format {
            OutputFormat::Jpeg => self.encode_jpeg(&image)?,
            OutputFormat::WebP => self.encode_webp(&image)?,
        };
        tracing::trace!(
            from = ?source_format,
            to = ?self.format.image_format(),
            width,
            height,
            bytes_in = data.len(),
            bytes_out = buffer.len(),
            "Re-encoded image"
        );
        Ok(Encoded {
            data: buffer,
            width,
            height,
            format: self.format,
        })
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.percent());
        if let Err(e) = image.to_rgb8().write_with_encoder(encoder) {
            exn::bail!(ErrorKind::Encode(e.to_string()));
        }
        Ok(buffer)
    }

    fn encode_webp(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        // libwebp only accepts 8-bit RGB or RGBA.
        let flattened = if image.color().has_alpha() {
            DynamicImage::ImageRgba8(image.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(image.to_rgb8())
        };
        let encoder = match webp::Encoder::from_image(&flattened) {
            Ok(encoder) => encoder,
            Err(e) => exn::bail!(ErrorKind::Encode(e.to_string())),
        };
        match encoder.encode_simple(false, f32::from(self.percent())) {
            Ok(memory) => Ok(memory.to_vec()),
            Err(e) => exn::bail!(ErrorKind::Encode(format!("{e:?}"))),
        }
    }

    /// Decode and re-encode on Tokio's blocking pool.
    ///
    /// # Errors
    /// As [`encode_blocking`](Self::encode_blocking), plus
    /// [`ErrorKind::Task`] if the blocking task panics.
    #[instrument(skip_all, fields(format = %self.format, bytes = data.len()))]
    pub async fn encode(&self, data: Vec<u8>) -> Result<Encoded> {
        let encoder = *self;
        tokio::task::spawn_blocking(move || encoder.encode_blocking(&data)).await.or_raise(|| ErrorKind::Task)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use rstest::rstest;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 30, 30])));
        let mut buffer = Vec::new();
        image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png).unwrap();
        buffer
    }

    #[rstest]
    #[case(OutputFormat::WebP, ImageFormat::WebP)]
    #[case(OutputFormat::Jpeg, ImageFormat::Jpeg)]
    fn test_reencodes_at_native_dimensions(#[case] format: OutputFormat, #[case] expected: ImageFormat) {
        let encoded = Encoder::new(format, 0.9).encode_blocking(&png(17, 9)).unwrap();
        assert_eq!((encoded.width, encoded.height), (17, 9));
        assert_eq!(encoded.format, format);
        assert_eq!(image::guess_format(&encoded.data).unwrap(), expected);
        let decoded = image::load_from_memory(&encoded.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (17, 9));
    }

    fn noise(size: u32) -> RgbImage {
        RgbImage::from_fn(size, size, |x, y| {
            let v = x.wrapping_mul(7919) ^ y.wrapping_mul(104_729) ^ (x * y).wrapping_mul(31);
            Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
        })
    }

    #[test]
    fn test_webp_is_lossy_and_follows_quality() {
        let source = noise(64);
        let mut input = Vec::new();
        DynamicImage::ImageRgb8(source.clone()).write_to(&mut Cursor::new(&mut input), ImageFormat::Png).unwrap();

        let high = Encoder::new(OutputFormat::WebP, 0.9).encode_blocking(&input).unwrap();
        let low = Encoder::new(OutputFormat::WebP, 0.1).encode_blocking(&input).unwrap();
        assert_ne!(high.data, low.data);
        assert!(low.data.len() < high.data.len());

        let decoded = image::load_from_memory(&high.data).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (64, 64));
        assert_ne!(decoded, source);
    }

    #[test]
    fn test_webp_keeps_transparency() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 0])));
        let mut buffer = Vec::new();
        source.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png).unwrap();
        let encoded = Encoder::default().encode_blocking(&buffer).unwrap();
        assert!(image::load_from_memory(&encoded.data).unwrap().color().has_alpha());
    }

    #[test]
    fn test_empty_input_is_a_decode_error() {
        let err = Encoder::default().encode_blocking(&[]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Decode(_)));
    }

    #[test]
    fn test_garbage_is_unsupported() {
        let err = Encoder::default().encode_blocking(b"this is a text file").unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }

    #[test]
    fn test_truncated_image_is_a_decode_error() {
        let source = png(8, 8);
        let err = Encoder::default().encode_blocking(&source[..source.len() / 2]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Decode(_)));
    }

    #[rstest]
    #[case(0.9, 0.9, 90)]
    #[case(1.5, 1.0, 100)]
    #[case(0.0, 0.01, 1)]
    #[case(f32::NAN, DEFAULT_QUALITY, 90)]
    fn test_quality_is_clamped(#[case] requested: f32, #[case] expected: f32, #[case] percent: u8) {
        let encoder = Encoder::new(OutputFormat::Jpeg, requested);
        assert_eq!(encoder.quality(), expected);
        assert_eq!(encoder.percent(), percent);
    }

    #[tokio::test]
    async fn test_async_encode() {
        let encoded = Encoder::default().encode(png(5, 4)).await.unwrap();
        assert_eq!((encoded.width, encoded.height), (5, 4));
    }
}
