use image::{Rgba, RgbaImage, imageops};

/// Mutable RGBA8 draw surface. One (or two, for the final crop/center pass)
/// exists per render; nothing else in the pipeline is mutable.
///
/// Coordinates are signed: several frame pieces are deliberately drawn with
/// negative X so their inner edge lands on the card. Out-of-bounds source
/// pixels are clipped, never wrapped.
#[derive(Clone, Debug)]
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    /// Alpha-composites `src` over this canvas with its top-left at (x, y).
    pub fn draw_image(&mut self, src: &RgbaImage, x: i64, y: i64) {
        let dst_w = i64::from(self.img.width());
        let dst_h = i64::from(self.img.height());

        for (sx, sy, &px) in src.enumerate_pixels() {
            if px[3] == 0 {
                continue;
            }
            let dx = x + i64::from(sx);
            let dy = y + i64::from(sy);
            if dx < 0 || dy < 0 || dx >= dst_w || dy >= dst_h {
                continue;
            }
            let dst = self.img.get_pixel_mut(dx as u32, dy as u32);
            *dst = over(*dst, px);
        }
    }

    /// Draws `src` scaled to `width` x `height` (the canvas-API style
    /// five-argument drawImage).
    pub fn draw_image_scaled(&mut self, src: &RgbaImage, x: i64, y: i64, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if src.width() == width && src.height() == height {
            self.draw_image(src, x, y);
            return;
        }
        let resized = imageops::resize(src, width, height, imageops::FilterType::Triangle);
        self.draw_image(&resized, x, y);
    }

    /// Composites another canvas over this one.
    pub fn draw_canvas(&mut self, other: &Canvas, x: i64, y: i64) {
        self.draw_image(&other.img, x, y);
    }

    /// Fills an axis-aligned rectangle, compositing the fill color.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        let dst_w = i64::from(self.img.width());
        let dst_h = i64::from(self.img.height());

        for ry in 0..i64::from(height) {
            let dy = y + ry;
            if dy < 0 || dy >= dst_h {
                continue;
            }
            for rx in 0..i64::from(width) {
                let dx = x + rx;
                if dx < 0 || dx >= dst_w {
                    continue;
                }
                let dst = self.img.get_pixel_mut(dx as u32, dy as u32);
                *dst = over(*dst, color);
            }
        }
    }
}

/// Horizontal mirror of an image. Mirrored side/corner lights are always
/// produced from the opposite side's asset, never authored separately.
pub fn flip_horizontal(src: &RgbaImage) -> RgbaImage {
    imageops::flip_horizontal(src)
}

/// Straight-alpha source-over blend, integer math with round-to-nearest.
fn over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    let out_a = sa * 255 + da * inv; // scaled by 255

    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = u32::from(src[i]);
        let dc = u32::from(dst[i]);
        let num = sc * sa * 255 + dc * da * inv;
        out[i] = ((num + out_a / 2) / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    Rgba(out)
}
