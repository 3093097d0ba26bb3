//! modcard: trading-card image generation for in-game mod items.
//!
//! Composites layered frame art, tinted polarity badges, rank-progress
//! indicators and wrapped description text into a card image, then encodes
//! it as PNG, WebP, JPEG or AVIF.
//!
//! # Example
//!
//! ```no_run
//! use modcard::{AssetProvider, CardOptions, Mod, ensure_font_registered, render_mod};
//!
//! # fn main() -> modcard::ModcardResult<()> {
//! let provider = AssetProvider::new("./cache");
//! let face = ensure_font_registered(&provider.font_bytes()?)?;
//!
//! let mod_: Mod = serde_json::from_str(r#"{ "name": "Vitality", "rarity": "Common" }"#)
//!     .expect("valid mod json");
//! let png = render_mod(&provider, face.as_ref(), &mod_, &CardOptions::default())?;
//! std::fs::write("vitality.png", png).ok();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod assets;
pub mod canvas;
pub mod compose;
pub mod error;
pub mod export;
pub mod model;
pub mod render;
pub mod text;
pub mod tier;
pub mod tint;

pub use assets::{AssetProvider, BackgroundPieces, FramePieces, RankSlotArt};
pub use canvas::Canvas;
pub use compose::{CardAssets, compose_card, compose_collapsed};
pub use error::{ModcardError, ModcardResult};
pub use export::export_canvas;
pub use model::{AvifConfig, CardOptions, LevelStat, Mod, OutputConfig, OutputFormat};
pub use render::render_mod;
pub use text::{
    Align, GlyphTypeface, Typeface, ensure_font_registered, mod_description, wrap_text,
};
pub use tier::{Tier, TierLayout, resolve_tier};
pub use tint::{mask_fill, shade_image, tint_image};
