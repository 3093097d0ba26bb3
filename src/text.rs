use std::sync::{Arc, OnceLock};

use fontdue::layout::{CoordinateSystem, Layout, TextStyle};
use image::{Rgba, RgbaImage};

use crate::{
    canvas::Canvas,
    error::{ModcardError, ModcardResult},
    model::{LevelStat, Mod},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Measurement and rasterization seam for card text.
///
/// The production implementation is [`GlyphTypeface`] over `fontdue`;
/// the compositor only sees this trait so layout logic stays testable
/// without font files.
pub trait Typeface: Send + Sync {
    /// Rendered width of `text` at `px` pixels.
    fn measure(&self, text: &str, px: f32) -> f32;

    /// Draws `text` with its baseline at `y`. For [`Align::Center`], `x` is
    /// the center of the rendered run.
    fn draw(
        &self,
        canvas: &mut Canvas,
        text: &str,
        px: f32,
        x: i64,
        y: i64,
        color: Rgba<u8>,
        align: Align,
    );
}

/// `fontdue`-backed [`Typeface`].
pub struct GlyphTypeface {
    font: fontdue::Font,
}

impl GlyphTypeface {
    pub fn from_bytes(bytes: &[u8]) -> ModcardResult<Self> {
        let font = fontdue::Font::from_bytes(bytes.to_vec(), fontdue::FontSettings::default())
            .map_err(ModcardError::font)?;
        Ok(Self { font })
    }
}

impl Typeface for GlyphTypeface {
    fn measure(&self, text: &str, px: f32) -> f32 {
        text.chars()
            .map(|c| self.font.metrics(c, px).advance_width)
            .sum()
    }

    fn draw(
        &self,
        canvas: &mut Canvas,
        text: &str,
        px: f32,
        x: i64,
        y: i64,
        color: Rgba<u8>,
        align: Align,
    ) {
        let origin_x = match align {
            Align::Left => x as f32,
            Align::Center => x as f32 - self.measure(text, px) / 2.0,
        };
        let ascent = self
            .font
            .horizontal_line_metrics(px)
            .map(|m| m.ascent)
            .unwrap_or(px);
        let top = y as f32 - ascent;

        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.append(&[&self.font], &TextStyle::new(text, px, 0));

        for glyph in layout.glyphs() {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (metrics, coverage) = self.font.rasterize_config(glyph.key);
            let mut patch = RgbaImage::new(metrics.width as u32, metrics.height as u32);
            for (i, &cov) in coverage.iter().enumerate() {
                if cov == 0 {
                    continue;
                }
                let gx = (i % metrics.width) as u32;
                let gy = (i / metrics.width) as u32;
                let alpha = (u16::from(cov) * u16::from(color[3]) / 255) as u8;
                patch.put_pixel(gx, gy, Rgba([color[0], color[1], color[2], alpha]));
            }
            canvas.draw_image(
                &patch,
                (origin_x + glyph.x) as i64,
                (top + glyph.y) as i64,
            );
        }
    }
}

static TYPEFACE: OnceLock<Arc<GlyphTypeface>> = OnceLock::new();

/// Parses and registers the process-wide card typeface.
///
/// Idempotent: the first successful call wins and later calls (including
/// racing ones) return the already-registered face without re-parsing.
pub fn ensure_font_registered(bytes: &[u8]) -> ModcardResult<Arc<GlyphTypeface>> {
    if let Some(face) = TYPEFACE.get() {
        return Ok(Arc::clone(face));
    }
    let face = Arc::new(GlyphTypeface::from_bytes(bytes)?);
    Ok(Arc::clone(TYPEFACE.get_or_init(|| face)))
}

/// Greedy word-wrap.
///
/// Words never split; a candidate line that would overflow `max_width`
/// pushes the accumulated line and restarts from the word, so the only
/// over-wide output line is a single word that alone exceeds `max_width`.
/// The final accumulated line is pushed unconditionally, which can yield a
/// trailing empty line; callers rely on line count for vertical flow, so
/// the historical behavior is kept.
pub fn wrap_text(face: &dyn Typeface, px: f32, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if face.measure(&candidate, px) > max_width {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }

    lines.push(current);
    lines
}

/// Description text for a mod at `rank`: the authored description when
/// present, otherwise the rank's stat lines joined with newlines, otherwise
/// nothing (the compositor skips the draw).
pub fn mod_description(
    description: Option<&str>,
    level_stats: Option<&[LevelStat]>,
    rank: u32,
) -> Option<String> {
    if let Some(desc) = description {
        if !desc.is_empty() {
            return Some(desc.to_string());
        }
    }

    let stats = level_stats?;
    if stats.is_empty() {
        return None;
    }
    let idx = (rank as usize).min(stats.len() - 1);
    Some(stats[idx].stats.join("\n"))
}

pub fn description_for(mod_: &Mod, rank: u32) -> Option<String> {
    mod_description(mod_.description.as_deref(), mod_.level_stats.as_deref(), rank)
}
