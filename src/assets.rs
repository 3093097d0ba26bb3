use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::RgbaImage;

use crate::{
    error::{ModcardError, ModcardResult},
    tier::Tier,
};

/// Default CDN serving the frame/badge fragments.
pub const DEFAULT_BASE_URL: &str = "https://cdn.warframestat.us/genesis/modframes";
/// Default CDN serving mod thumbnails.
pub const DEFAULT_IMAGE_URL: &str = "https://cdn.warframestat.us/img";
/// Card typeface, served from the same fragment CDN.
pub const FONT_ASSET: &str = "Roboto-Regular.ttf";

/// Polarity symbols with badge art on the CDN. Anything else ("universal"
/// included) renders as a "??" placeholder instead of a badge.
const KNOWN_POLARITIES: &[&str] = &[
    "madurai", "vazarin", "naramon", "zenurik", "penjaga", "unairu", "umbra", "aura",
];

/// Decorative border fragments for one tier.
#[derive(Clone, Debug)]
pub struct FramePieces {
    pub top: RgbaImage,
    pub bottom: RgbaImage,
    pub side_lights: RgbaImage,
    pub corner_lights: RgbaImage,
}

/// Background stack fragments for one tier.
#[derive(Clone, Debug)]
pub struct BackgroundPieces {
    pub background: RgbaImage,
    pub backer: RgbaImage,
    pub lower_tab: RgbaImage,
}

/// Rank-progress indicator art, shared across tiers.
#[derive(Clone, Debug)]
pub struct RankSlotArt {
    pub empty: RgbaImage,
    pub active: RgbaImage,
    pub complete_line: RgbaImage,
}

/// Lazily fetches and caches named raster fragments.
///
/// The cache directory mirrors the CDN file names and is never invalidated;
/// if the CDN updates an asset the stale copy wins until the cache is
/// cleared by hand.
pub struct AssetProvider {
    base_url: String,
    image_url: String,
    cache_dir: PathBuf,
    client: reqwest::blocking::Client,
}

impl AssetProvider {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self::with_base_urls(cache_dir, DEFAULT_BASE_URL, DEFAULT_IMAGE_URL)
    }

    pub fn with_base_urls(
        cache_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            image_url: image_url.into(),
            cache_dir: cache_dir.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Raw bytes for a named fragment, from cache or the CDN.
    pub fn fetch_bytes(&self, name: &str) -> ModcardResult<Vec<u8>> {
        self.fetch_from(&self.base_url, name)
    }

    fn fetch_from(&self, base: &str, name: &str) -> ModcardResult<Vec<u8>> {
        let cached = self.cache_dir.join(name);
        if cached.is_file() {
            tracing::trace!(asset = name, "asset cache hit");
            return fs::read(&cached)
                .with_context(|| format!("read cached asset '{}'", cached.display()))
                .map_err(|e| ModcardError::fetch(format!("{e:#}")));
        }

        tracing::debug!(asset = name, "asset cache miss, fetching");
        let url = format!("{base}/{name}");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ModcardError::fetch(format!("GET {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(ModcardError::fetch(format!(
                "GET {url}: status {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .map_err(|e| ModcardError::fetch(format!("read body of {url}: {e}")))?
            .to_vec();

        // Racing renders may write the same bytes twice; that is harmless.
        write_cache(&cached, &bytes)?;
        Ok(bytes)
    }

    /// Fetches and decodes a fragment to RGBA8.
    pub fn fetch_image(&self, name: &str) -> ModcardResult<RgbaImage> {
        decode_image(&self.fetch_bytes(name)?, name)
    }

    pub fn frame(&self, tier: Tier) -> ModcardResult<FramePieces> {
        let p = tier.prefix();
        Ok(FramePieces {
            top: self.fetch_image(&format!("{p}FrameTop.png"))?,
            bottom: self.fetch_image(&format!("{p}FrameBottom.png"))?,
            side_lights: self.fetch_image(&format!("{p}SideLight.png"))?,
            corner_lights: self.fetch_image(&format!("{p}CornerLights.png"))?,
        })
    }

    /// Background stack for a tier. Omega has no background set of its own:
    /// it reuses the Legendary background with riven-specific backer and
    /// tab art.
    pub fn background(&self, tier: Tier) -> ModcardResult<BackgroundPieces> {
        let (background, backer, lower_tab) = if tier == Tier::Omega {
            (
                "LegendaryBackground.png".to_string(),
                "RivenTopRightBacker.png".to_string(),
                "RivenLowerTab.png".to_string(),
            )
        } else {
            let p = tier.prefix();
            (
                format!("{p}Background.png"),
                format!("{p}TopRightBacker.png"),
                format!("{p}LowerTab.png"),
            )
        };
        Ok(BackgroundPieces {
            background: self.fetch_image(&background)?,
            backer: self.fetch_image(&backer)?,
            lower_tab: self.fetch_image(&lower_tab)?,
        })
    }

    pub fn rank_slots(&self) -> ModcardResult<RankSlotArt> {
        Ok(RankSlotArt {
            empty: self.fetch_image("RankSlotEmpty.png")?,
            active: self.fetch_image("RankSlotActive.png")?,
            complete_line: self.fetch_image("RankCompleteLine.png")?,
        })
    }

    /// Badge art for a polarity symbol, or `None` for symbols without art.
    pub fn polarity(&self, symbol: &str) -> ModcardResult<Option<RgbaImage>> {
        let symbol = symbol.to_lowercase();
        if !KNOWN_POLARITIES.contains(&symbol.as_str()) {
            return Ok(None);
        }
        let name = format!("{}.png", capitalize(&symbol));
        Ok(Some(self.fetch_image(&name)?))
    }

    /// Header banner for a mod set, keyed by the set's short name.
    pub fn set_header(&self, set_name: &str) -> ModcardResult<RgbaImage> {
        self.fetch_image(&format!("{set_name}Header.png"))
    }

    /// Mod thumbnail from the image CDN.
    pub fn thumbnail(&self, image_name: &str) -> ModcardResult<RgbaImage> {
        let bytes = self.fetch_from(&self.image_url, image_name)?;
        decode_image(&bytes, image_name)
    }

    /// Bytes of the card typeface, for [`crate::ensure_font_registered`].
    pub fn font_bytes(&self) -> ModcardResult<Vec<u8>> {
        self.fetch_bytes(FONT_ASSET)
    }
}

fn write_cache(path: &Path, bytes: &[u8]) -> ModcardResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create cache dir '{}'", parent.display()))
            .map_err(|e| ModcardError::fetch(format!("{e:#}")))?;
    }
    fs::write(path, bytes)
        .with_context(|| format!("write cached asset '{}'", path.display()))
        .map_err(|e| ModcardError::fetch(format!("{e:#}")))
}

fn decode_image(bytes: &[u8], name: &str) -> ModcardResult<RgbaImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ModcardError::fetch(format!("decode asset '{name}': {e}")))?;
    Ok(img.to_rgba8())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
