use image::{Rgba, RgbaImage};

/// Weight kept from the original pixel when tinting.
const ORIGINAL_WEIGHT: f32 = 0.2;
/// Weight given to the tier color, scaled by pixel brightness.
const TINT_WEIGHT: f32 = 0.8;

/// Recolors white/grayscale art toward a tier accent color.
///
/// Each non-transparent pixel keeps 20% of its own channels and takes 80%
/// of the tier channel scaled by the pixel's brightness (mean of R, G, B),
/// so shading in the source art survives the recolor. Alpha is untouched
/// and fully transparent pixels pass through unchanged.
pub fn tint_image(src: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
    let mut out = src.clone();
    for px in out.pixels_mut() {
        if px[3] == 0 {
            continue;
        }
        let brightness =
            (f32::from(px[0]) + f32::from(px[1]) + f32::from(px[2])) / 3.0 / 255.0;
        for i in 0..3 {
            let blended = f32::from(px[i]) * ORIGINAL_WEIGHT
                + f32::from(color[i]) * brightness * TINT_WEIGHT;
            px[i] = blended.clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Darkens an image by reducing every channel by `percentage` of itself
/// (0.0 = unchanged, 1.0 = black). Used for collapsed-card thumbnails.
pub fn shade_image(src: &RgbaImage, percentage: f32) -> RgbaImage {
    let mut out = src.clone();
    for px in out.pixels_mut() {
        for i in 0..3 {
            let reduced = f32::from(px[i]) - f32::from(px[i]) * percentage;
            px[i] = reduced.max(0.0) as u8;
        }
    }
    out
}

/// Source-in composite with a solid fill: every pixel with coverage takes
/// the fill color's channels, keeping its own alpha. Produces the flat
/// single-color polarity silhouettes.
pub fn mask_fill(src: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
    let mut out = src.clone();
    for px in out.pixels_mut() {
        if px[3] == 0 {
            continue;
        }
        px[0] = color[0];
        px[1] = color[1];
        px[2] = color[2];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_white_pixel_lands_near_the_accent() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        let out = tint_image(&src, Rgba([0xAC, 0x83, 0xD5, 0xFF]));
        let px = out.get_pixel(0, 0);
        // 255*0.2 + channel*1.0*0.8
        assert_eq!(px[0], (255.0 * 0.2 + 172.0 * 0.8) as u8);
        assert_eq!(px[1], (255.0 * 0.2 + 131.0 * 0.8) as u8);
        assert_eq!(px[2], (255.0 * 0.2 + 213.0 * 0.8) as u8);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn tint_skips_transparent_pixels() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([200, 200, 200, 0]));
        let out = tint_image(&src, Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(0, 0), &Rgba([200, 200, 200, 0]));
    }

    #[test]
    fn tint_preserves_alpha() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([100, 100, 100, 77]));
        let out = tint_image(&src, Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(0, 0)[3], 77);
    }

    #[test]
    fn shade_halves_channels_at_50_percent() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255]));
        let out = shade_image(&src, 0.5);
        assert_eq!(out.get_pixel(0, 0), &Rgba([100, 50, 25, 255]));
    }

    #[test]
    fn shade_full_percentage_floors_at_black() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 128]));
        let out = shade_image(&src, 1.0);
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 0, 128]));
    }

    #[test]
    fn mask_fill_keeps_coverage_only() {
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, Rgba([10, 20, 30, 200]));
        src.put_pixel(1, 0, Rgba([10, 20, 30, 0]));
        let out = mask_fill(&src, Rgba([0xFA, 0xE7, 0xBE, 0xFF]));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0xFA, 0xE7, 0xBE, 200]));
        assert_eq!(out.get_pixel(1, 0), &Rgba([10, 20, 30, 0]));
    }
}
