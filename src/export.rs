use std::io::Cursor;

use image::{
    ExtendedColorType, ImageEncoder, RgbaImage,
    codecs::{
        avif::AvifEncoder, jpeg::JpegEncoder, png::PngEncoder, webp::WebPEncoder,
    },
};

use crate::{
    error::{ModcardError, ModcardResult},
    model::{OutputConfig, OutputFormat},
};

const DEFAULT_JPEG_QUALITY: i32 = 90;

/// Encodes a finished card surface.
///
/// Quality is validated before any encoder runs. PNG ignores quality
/// (lossless); the webp path encodes lossless as well, the range check
/// still applies so a bad config fails the same way on every format.
/// Encoder failures surface as a single [`ModcardError::Encode`]; there is
/// no silent empty-output path.
pub fn export_canvas(image: &RgbaImage, config: &OutputConfig) -> ModcardResult<Vec<u8>> {
    config.validate()?;

    let (width, height) = image.dimensions();
    let mut buf = Vec::new();
    let format = config.format;

    let result = match format {
        OutputFormat::Png => PngEncoder::new(Cursor::new(&mut buf)).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        OutputFormat::Webp => WebPEncoder::new_lossless(Cursor::new(&mut buf)).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel; composite onto opaque first.
            let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let quality = config.quality.unwrap_or(DEFAULT_JPEG_QUALITY) as u8;
            JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        OutputFormat::Avif => {
            let avif = config.avif.unwrap_or_default();
            // A plain quality field applies to avif too when no structured
            // config was given.
            let quality = config.quality.map(|q| q as u8).unwrap_or(avif.quality);
            AvifEncoder::new_with_speed_quality(Cursor::new(&mut buf), avif.speed, quality)
                .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
        }
    };

    result.map_err(|e| ModcardError::encode(format.as_str(), e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AvifConfig;
    use image::Rgba;

    fn sample() -> RgbaImage {
        RgbaImage::from_pixel(8, 8, Rgba([120, 40, 200, 255]))
    }

    fn cfg(format: OutputFormat, quality: Option<i32>) -> OutputConfig {
        OutputConfig {
            format,
            quality,
            avif: None,
        }
    }

    #[test]
    fn png_roundtrip_is_lossless() {
        let img = sample();
        let bytes = export_canvas(&img, &cfg(OutputFormat::Png, None)).unwrap();
        let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(back.as_raw(), img.as_raw());
    }

    #[test]
    fn quality_out_of_range_fails_before_encoding() {
        for format in [OutputFormat::Webp, OutputFormat::Jpeg] {
            for q in [-1, 101] {
                let err = export_canvas(&sample(), &cfg(format, Some(q))).unwrap_err();
                assert!(
                    matches!(err, ModcardError::Config(_)),
                    "expected config error for {format:?} quality {q}"
                );
            }
        }
    }

    #[test]
    fn quality_bounds_encode_fine() {
        for format in [OutputFormat::Webp, OutputFormat::Jpeg] {
            for q in [0, 100] {
                let bytes = export_canvas(&sample(), &cfg(format, Some(q))).unwrap();
                assert!(!bytes.is_empty(), "{format:?} quality {q}");
            }
        }
    }

    #[test]
    fn jpeg_drops_alpha_but_decodes() {
        let bytes = export_canvas(&sample(), &cfg(OutputFormat::Jpeg, Some(85))).unwrap();
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!(back.width(), 8);
    }

    #[test]
    fn avif_uses_structured_config() {
        let config = OutputConfig {
            format: OutputFormat::Avif,
            quality: None,
            avif: Some(AvifConfig {
                quality: 60,
                speed: 10,
            }),
        };
        let bytes = export_canvas(&sample(), &config).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn same_input_same_bytes() {
        let a = export_canvas(&sample(), &cfg(OutputFormat::Png, None)).unwrap();
        let b = export_canvas(&sample(), &cfg(OutputFormat::Png, None)).unwrap();
        assert_eq!(a, b);
    }
}
