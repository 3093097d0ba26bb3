use image::Rgba;

use crate::model::Mod;

/// Visual rarity class of a card. Drives frame/background asset selection
/// and the accent color used for tinted art.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Legendary,
    /// Riven cards. Shares the Legendary background set but has its own
    /// wider frame art.
    Omega,
}

impl Tier {
    /// File-name prefix of this tier's frame assets on the CDN.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Legendary => "Legendary",
            Self::Omega => "Omega",
        }
    }

    /// Accent color applied to polarity badges, set headers and pips.
    pub fn accent(self) -> Rgba<u8> {
        match self {
            Self::Bronze => Rgba([0xCA, 0x9A, 0x87, 0xFF]),
            Self::Silver | Self::Legendary => Rgba([0xFF, 0xFF, 0xFF, 0xFF]),
            Self::Gold => Rgba([0xFA, 0xE7, 0xBE, 0xFF]),
            Self::Omega => Rgba([0xAC, 0x83, 0xD5, 0xFF]),
        }
    }

    pub fn layout(self) -> &'static TierLayout {
        match self {
            Self::Omega => &RIVEN_LAYOUT,
            Self::Legendary => &LEGENDARY_LAYOUT,
            _ => &STANDARD_LAYOUT,
        }
    }
}

/// Maps a mod to its tier.
///
/// Priority: riven category, then Archon naming (Archon mods reuse the gold
/// frame), then the rarity string. Unknown or missing rarity falls back to
/// Bronze rather than erroring; that is deliberate so unrecognized database
/// entries still render.
pub fn resolve_tier(mod_: &Mod) -> Tier {
    if mod_.item_type.contains("Riven") {
        return Tier::Omega;
    }
    if mod_.name.contains("Archon") {
        return Tier::Gold;
    }
    match mod_
        .rarity
        .as_deref()
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "uncommon" => Tier::Silver,
        "rare" => Tier::Gold,
        "legendary" => Tier::Legendary,
        _ => Tier::Bronze,
    }
}

/// Geometry of one tier's card, expressed once instead of scattered through
/// the draw calls. Pixel values are in background-image space unless noted;
/// fractional values are relative to the background's decoded size.
#[derive(Clone, Copy, Debug)]
pub struct TierLayout {
    /// Working canvas, sized for the widest frame piece of the tier.
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Final card height after the crop/center pass.
    pub card_height: u32,
    /// Compact-card height.
    pub collapsed_height: u32,
    /// Thumbnail content rectangle: x, y, width, height.
    pub thumb_rect: (i64, i64, u32, u32),
    /// Y of the top frame piece as a fraction of background height.
    pub top_frame_y: f32,
    /// Y of the bottom assembly as a fraction of background height.
    pub bottom_y: f32,
    /// Backer origin as fractions of background width/height.
    pub backer_offset: (f32, f32),
    /// Set header origin as fractions of background width/height.
    pub header_offset: (f32, f32),
    /// X of the right side light; the mirrored copy sits at `side_light_mirror_x`.
    pub side_light_x: i64,
    pub side_light_mirror_x: i64,
    pub side_light_y: i64,
    /// Corner light X positions and Y relative to the bottom assembly.
    /// Legendary art sits 5px lower than standard.
    pub corner_light_x: i64,
    pub corner_light_mirror_x: i64,
    pub corner_light_rel_y: i64,
    /// Gap between the lower tab and the bottom frame piece. Riven art
    /// reserves more room here.
    pub lower_tab_pad: u32,
    /// Horizontal padding unit used when re-centering overflowing frame
    /// pieces.
    pub h_pad: u32,
    /// Title baseline Y and description start Y.
    pub title_y: i64,
    pub description_y: i64,
    /// Line advance for wrapped description text.
    pub line_step: i64,
    /// Compat label baseline, relative to the lower tab's top edge.
    pub compat_y: i64,
}

const STANDARD_LAYOUT: TierLayout = TierLayout {
    canvas_width: 256,
    canvas_height: 512,
    card_height: 380,
    collapsed_height: 170,
    thumb_rect: (10, 90, 239, 200),
    top_frame_y: 0.14,
    bottom_y: 0.65,
    backer_offset: (0.80, 0.185),
    header_offset: (0.30, 0.13),
    side_light_x: 238,
    side_light_mirror_x: 2,
    side_light_y: 120,
    corner_light_x: 200,
    corner_light_mirror_x: -5,
    corner_light_rel_y: 35,
    lower_tab_pad: 10,
    h_pad: 4,
    title_y: 315,
    description_y: 335,
    line_step: 15,
    compat_y: 18,
};

const LEGENDARY_LAYOUT: TierLayout = TierLayout {
    corner_light_rel_y: 40,
    ..STANDARD_LAYOUT
};

const RIVEN_LAYOUT: TierLayout = TierLayout {
    canvas_width: 292,
    side_light_x: 249,
    lower_tab_pad: 20,
    line_step: 20,
    compat_y: 16,
    ..STANDARD_LAYOUT
};
