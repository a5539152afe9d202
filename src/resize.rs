// Core resize operation shared by the HTTP and gRPC transports.
// Decodes an encoded image, resamples it to the exact requested size and
// re-encodes it in the source format.

use image::{ImageFormat, ImageReader, imageops::FilterType};
use std::io::Cursor;
use thiserror::Error;

/// Largest width or height a transport accepts.
pub const MAX_DIMENSION: u32 = 4096;

/// Format used when the source encoding cannot be detected.
pub const FALLBACK_FORMAT: ImageFormat = ImageFormat::Png;

const RESAMPLING_FILTER: FilterType = FilterType::Lanczos3;

#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("failed to encode image as {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
    #[error("target dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions { width: u32, height: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{axis} must be greater than 0 (got {value})")]
    TooSmall { axis: &'static str, value: i64 },
    #[error("{axis} must be at most {max} (got {value})", max = MAX_DIMENSION)]
    TooLarge { axis: &'static str, value: i64 },
}

/// Target size that has passed transport-boundary validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    pub fn new(width: i64, height: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            width: check_axis("width", width)?,
            height: check_axis("height", height)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

fn check_axis(axis: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::TooSmall { axis, value });
    }
    if value > i64::from(MAX_DIMENSION) {
        return Err(ValidationError::TooLarge { axis, value });
    }
    Ok(value as u32)
}

/// Result of a successful resize.
#[derive(Debug, Clone)]
pub struct ResizedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub source_width: u32,
    pub source_height: u32,
    pub width: u32,
    pub height: u32,
}

impl ResizedImage {
    /// Lowercase format identifier, e.g. `"png"` or `"jpeg"`.
    pub fn format_tag(&self) -> &'static str {
        format_tag(self.format)
    }

    pub fn content_type(&self) -> String {
        format!("image/{}", self.format_tag())
    }
}

pub fn format_tag(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Gif => "gif",
        ImageFormat::WebP => "webp",
        ImageFormat::Pnm => "pnm",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Tga => "tga",
        ImageFormat::Dds => "dds",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Ico => "ico",
        ImageFormat::Hdr => "hdr",
        ImageFormat::OpenExr => "openexr",
        ImageFormat::Farbfeld => "farbfeld",
        ImageFormat::Avif => "avif",
        ImageFormat::Qoi => "qoi",
        _ => format.extensions_str().first().copied().unwrap_or("png"),
    }
}

/// Resize `data` to exactly `width` x `height`.
///
/// The aspect ratio is not preserved. The output is encoded in the detected
/// source format, or PNG when no format could be detected. Decoding runs
/// with the `image` crate's default limits, so absurd source dimensions fail
/// as a decode error instead of exhausting memory.
pub fn resize_image(data: &[u8], width: u32, height: u32) -> Result<ResizedImage, ResizeError> {
    if width == 0 || height == 0 {
        return Err(ResizeError::EmptyDimensions { width, height });
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ResizeError::Decode(e.to_string()))?;
    let detected_format = reader.format();
    let source = reader
        .decode()
        .map_err(|e| ResizeError::Decode(e.to_string()))?;

    let resized = source.resize_exact(width, height, RESAMPLING_FILTER);

    let format = detected_format.unwrap_or(FALLBACK_FORMAT);
    let mut buffer = Cursor::new(Vec::new());
    resized
        .write_to(&mut buffer, format)
        .map_err(|e| ResizeError::Encode {
            format: format_tag(format),
            message: e.to_string(),
        })?;

    Ok(ResizedImage {
        data: buffer.into_inner(),
        format,
        source_width: source.width(),
        source_height: source.height(),
        width: resized.width(),
        height: resized.height(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};

    pub(crate) fn encode_fixture(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    pub(crate) fn red_png(width: u32, height: u32) -> Vec<u8> {
        encode_fixture(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 0, 0]))),
            ImageFormat::Png,
        )
    }

    #[test]
    fn test_red_png_halved() {
        let resized = resize_image(&red_png(100, 100), 50, 50).unwrap();

        assert_eq!(resized.format, ImageFormat::Png);
        assert_eq!(resized.format_tag(), "png");
        assert_eq!((resized.source_width, resized.source_height), (100, 100));

        let decoded = image::load_from_memory_with_format(&resized.data, ImageFormat::Png).unwrap();
        assert_eq!(decoded.dimensions(), (50, 50));
        let Rgb([r, g, b]) = *decoded.to_rgb8().get_pixel(25, 25);
        assert!(r >= 250 && g <= 5 && b <= 5, "got ({r}, {g}, {b})");
    }

    #[test]
    fn test_aspect_ratio_is_not_preserved() {
        let resized = resize_image(&red_png(100, 100), 300, 7).unwrap();
        let decoded = image::load_from_memory(&resized.data).unwrap();
        assert_eq!(decoded.dimensions(), (300, 7));
        assert_eq!((resized.width, resized.height), (300, 7));
    }

    #[test]
    fn test_jpeg_stays_jpeg() {
        let jpeg = encode_fixture(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, Rgb([10, 200, 30]))),
            ImageFormat::Jpeg,
        );

        let resized = resize_image(&jpeg, 32, 32).unwrap();

        assert_eq!(resized.format_tag(), "jpeg");
        assert_eq!(resized.content_type(), "image/jpeg");
        assert_eq!(image::guess_format(&resized.data).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&resized.data).unwrap();
        assert_eq!(decoded.dimensions(), (32, 32));
    }

    #[test]
    fn test_gif_stays_gif() {
        let gif = encode_fixture(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([0, 0, 255, 255]))),
            ImageFormat::Gif,
        );

        let resized = resize_image(&gif, 40, 10).unwrap();

        assert_eq!(resized.format_tag(), "gif");
        let decoded = image::load_from_memory_with_format(&resized.data, ImageFormat::Gif).unwrap();
        assert_eq!(decoded.dimensions(), (40, 10));
    }

    #[test]
    fn test_webp_stays_webp() {
        let webp = encode_fixture(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(24, 16, Rgba([0, 255, 0, 128]))),
            ImageFormat::WebP,
        );

        let resized = resize_image(&webp, 12, 30).unwrap();

        assert_eq!(resized.format_tag(), "webp");
        assert_eq!(resized.content_type(), "image/webp");
        let decoded =
            image::load_from_memory_with_format(&resized.data, ImageFormat::WebP).unwrap();
        assert_eq!(decoded.dimensions(), (12, 30));
    }

    #[test]
    fn test_upscale_to_bounds() {
        let resized = resize_image(&red_png(2, 2), 1, MAX_DIMENSION).unwrap();
        assert_eq!((resized.width, resized.height), (1, MAX_DIMENSION));
    }

    #[test]
    fn test_truncated_png_is_decode_error() {
        let png = red_png(100, 100);
        let truncated = &png[..png.len() / 2];

        let err = resize_image(truncated, 50, 50).unwrap_err();
        assert!(matches!(err, ResizeError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = resize_image(b"definitely not an image", 10, 10).unwrap_err();
        assert!(matches!(err, ResizeError::Decode(_)));

        let err = resize_image(&[], 10, 10).unwrap_err();
        assert!(matches!(err, ResizeError::Decode(_)));
    }

    #[test]
    fn test_zero_dimension_rejected_before_decoding() {
        let err = resize_image(b"garbage", 0, 10).unwrap_err();
        assert!(matches!(
            err,
            ResizeError::EmptyDimensions {
                width: 0,
                height: 10
            }
        ));
    }

    #[test]
    fn test_dimensions_bounds() {
        assert!(Dimensions::new(1, 1).is_ok());
        let max = Dimensions::new(4096, 4096).unwrap();
        assert_eq!((max.width(), max.height()), (4096, 4096));

        assert_eq!(
            Dimensions::new(0, 10),
            Err(ValidationError::TooSmall {
                axis: "width",
                value: 0
            })
        );
        assert_eq!(
            Dimensions::new(10, -3),
            Err(ValidationError::TooSmall {
                axis: "height",
                value: -3
            })
        );
        assert_eq!(
            Dimensions::new(4097, 10),
            Err(ValidationError::TooLarge {
                axis: "width",
                value: 4097
            })
        );
        assert_eq!(
            Dimensions::new(10, 4097),
            Err(ValidationError::TooLarge {
                axis: "height",
                value: 4097
            })
        );
    }

    #[test]
    fn test_validation_messages() {
        let err = Dimensions::new(4097, 1).unwrap_err();
        assert_eq!(err.to_string(), "width must be at most 4096 (got 4097)");
        let err = Dimensions::new(1, 0).unwrap_err();
        assert_eq!(err.to_string(), "height must be greater than 0 (got 0)");
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tag(ImageFormat::Png), "png");
        assert_eq!(format_tag(ImageFormat::Jpeg), "jpeg");
        assert_eq!(format_tag(ImageFormat::WebP), "webp");
        assert_eq!(format_tag(ImageFormat::Bmp), "bmp");
    }
}
