use image::{Rgba, RgbaImage};

use crate::{
    assets::{AssetProvider, BackgroundPieces, FramePieces, RankSlotArt},
    canvas::{Canvas, flip_horizontal},
    error::ModcardResult,
    model::{CardOptions, Mod},
    text::{Align, Typeface, description_for, wrap_text},
    tier::{Tier, TierLayout},
    tint::{mask_fill, shade_image, tint_image},
};

const TITLE_PX: f32 = 20.0;
const DESCRIPTION_PX: f32 = 12.0;
const COMPAT_PX: f32 = 16.0;
const DRAIN_PX: f32 = 16.0;

const TEXT_COLOR: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
/// Horizontal margin kept free of description text on each side.
const DESCRIPTION_MARGIN: f32 = 16.0;
/// Never draw more rank slots than this, whatever the database claims.
const MAX_RANK_SLOTS: u32 = 10;

const POLARITY_BADGE_SIZE: u32 = 16;
const SET_PIP_SIZE: (u32, u32) = (10, 4);
const SET_PIP_GAP: i64 = 3;
const RANK_SLOT_GAP: i64 = 2;

/// All decoded art one render needs, borrowed by the compositor for the
/// duration of a single [`compose_card`]/[`compose_collapsed`] call.
#[derive(Clone, Debug)]
pub struct CardAssets {
    pub frame: FramePieces,
    pub background: BackgroundPieces,
    pub rank_slots: RankSlotArt,
    pub polarity: Option<RgbaImage>,
    pub set_header: Option<RgbaImage>,
    pub thumbnail: Option<RgbaImage>,
}

impl CardAssets {
    pub fn load(
        provider: &AssetProvider,
        mod_: &Mod,
        tier: Tier,
        image_override: Option<&str>,
    ) -> ModcardResult<Self> {
        let polarity = match mod_.polarity.as_deref() {
            Some(symbol) => provider.polarity(symbol)?,
            None => None,
        };
        let set_header = match mod_.mod_set.as_deref() {
            Some(set) => Some(provider.set_header(&set_short_name(set))?),
            None => None,
        };
        let thumbnail = match image_override.or(mod_.image_name.as_deref()) {
            Some(name) => Some(provider.thumbnail(name)?),
            None => None,
        };
        Ok(Self {
            frame: provider.frame(tier)?,
            background: provider.background(tier)?,
            rank_slots: provider.rank_slots()?,
            polarity,
            set_header,
            thumbnail,
        })
    }
}

/// Short set name from a database set identifier, e.g.
/// "/Lotus/Upgrades/Mods/Sets/Augur/AugurModSet" -> "Augur".
pub fn set_short_name(mod_set: &str) -> String {
    let segment = mod_set.rsplit('/').next().unwrap_or(mod_set);
    segment
        .strip_suffix("ModSet")
        .or_else(|| segment.strip_suffix("SetMod"))
        .unwrap_or(segment)
        .to_string()
}

/// A riven still carrying its veil has no stats to show; its drain reads
/// "???" instead of a number.
fn is_veiled_riven(mod_: &Mod, tier: Tier) -> bool {
    tier == Tier::Omega && mod_.description.is_none() && mod_.level_stats.is_none()
}

/// Composites the full card.
///
/// All intermediate offsets are percentages of the decoded background size,
/// not of the working canvas: riven frame pieces are wider than the
/// 256px background, so the canvas is allocated wider up-front and pieces
/// are centered into it.
pub fn compose_card(
    assets: &CardAssets,
    mod_: &Mod,
    tier: Tier,
    opts: &CardOptions,
    face: &dyn Typeface,
) -> Canvas {
    let layout = tier.layout();
    let bg = &assets.background.background;
    let bg_w = i64::from(bg.width());
    let bg_h = i64::from(bg.height());

    let mut working = Canvas::new(layout.canvas_width, layout.canvas_height);
    let center_x = (i64::from(working.width()) - bg_w) / 2;
    let center_y = (i64::from(working.height()) - bg_h) / 2;

    let inner = compose_inner(assets, mod_, tier, opts, face);
    working.draw_canvas(&inner, center_x, center_y);

    // Top frame. Overflowing pieces are centered so the excess splits
    // evenly left and right.
    let top = &assets.frame.top;
    let top_y = center_y + (bg_h as f32 * layout.top_frame_y) as i64;
    if top.width() > bg.width() {
        let pad = i64::from(layout.h_pad) * 6;
        let diff = i64::from(top.width()) - bg_w - pad;
        working.draw_image(top, -diff / 2, top_y);
    } else {
        working.draw_image(top, center_x, top_y);
    }

    if let Some(header) = &assets.set_header {
        let hx = center_x + (bg_w as f32 * layout.header_offset.0) as i64;
        let hy = center_y + (bg_h as f32 * layout.header_offset.1) as i64;
        draw_set_header(&mut working, header, mod_, tier, opts, hx, hy);
    }

    let bottom_part = compose_bottom(assets, tier, mod_.fusion_limit, opts.rank);
    let bottom_y = center_y + (bg_h as f32 * layout.bottom_y) as i64;
    if assets.frame.bottom.width() > bg.width() {
        let pad = i64::from(layout.h_pad) * 5;
        let diff = i64::from(assets.frame.bottom.width()) - bg_w - pad;
        working.draw_canvas(&bottom_part, -diff / 2, bottom_y);
    } else {
        working.draw_canvas(&bottom_part, center_x, bottom_y);
    }

    // Crop/center pass into the final card surface.
    let mut card = Canvas::new(layout.canvas_width, layout.card_height);
    let crop_x = (i64::from(card.width()) - i64::from(working.width())) / 2;
    let crop_y = (i64::from(card.height()) - i64::from(working.height())) / 2;
    card.draw_canvas(&working, crop_x, crop_y);
    card
}

/// Background-sized canvas holding everything that scrolls with the
/// background: art, lights, backer, tab and text.
fn compose_inner(
    assets: &CardAssets,
    mod_: &Mod,
    tier: Tier,
    opts: &CardOptions,
    face: &dyn Typeface,
) -> Canvas {
    let layout = tier.layout();
    let bg = &assets.background.background;
    let bg_w = i64::from(bg.width());
    let bg_h = i64::from(bg.height());

    let mut inner = Canvas::new(bg.width(), bg.height());
    inner.draw_image(bg, 0, 0);

    if let Some(thumb) = &assets.thumbnail {
        let (tx, ty, tw, th) = layout.thumb_rect;
        inner.draw_image_scaled(thumb, tx, ty, tw, th);
    }

    let lights = &assets.frame.side_lights;
    inner.draw_image(lights, layout.side_light_x, layout.side_light_y);
    inner.draw_image(
        &flip_horizontal(lights),
        layout.side_light_mirror_x,
        layout.side_light_y,
    );

    let backer = compose_backer(assets, mod_, tier, opts, face);
    inner.draw_canvas(
        &backer,
        (bg_w as f32 * layout.backer_offset.0) as i64,
        (bg_h as f32 * layout.backer_offset.1) as i64,
    );

    let tab = compose_lower_tab(assets, mod_, layout, face);
    let tab_y = (bg_h as f32 * layout.bottom_y) as i64 + i64::from(layout.lower_tab_pad);
    inner.draw_canvas(&tab, 23, tab_y);

    face.draw(
        &mut inner,
        &mod_.name,
        TITLE_PX,
        bg_w / 2,
        layout.title_y,
        TEXT_COLOR,
        Align::Center,
    );

    if let Some(description) = description_for(mod_, opts.rank) {
        let max_width = bg_w as f32 - 2.0 * DESCRIPTION_MARGIN;
        let mut y = layout.description_y;
        for paragraph in description.split('\n') {
            for line in wrap_text(face, DESCRIPTION_PX, paragraph, max_width) {
                face.draw(
                    &mut inner,
                    &line,
                    DESCRIPTION_PX,
                    bg_w / 2,
                    y,
                    TEXT_COLOR,
                    Align::Center,
                );
                y += layout.line_step;
            }
        }
    }

    inner
}

/// The drain/polarity panel drawn into the card's top-right corner.
fn compose_backer(
    assets: &CardAssets,
    mod_: &Mod,
    tier: Tier,
    opts: &CardOptions,
    face: &dyn Typeface,
) -> Canvas {
    let art = &assets.background.backer;
    let w = i64::from(art.width());
    let h = i64::from(art.height());
    let mut panel = Canvas::new(art.width(), art.height());
    panel.draw_image(art, 0, 0);

    let drain_text = if is_veiled_riven(mod_, tier) {
        "???".to_string()
    } else {
        (mod_.base_drain + opts.rank as i32).to_string()
    };
    let baseline = (h as f32 * 0.72) as i64;
    face.draw(
        &mut panel,
        &drain_text,
        DRAIN_PX,
        w / 3,
        baseline,
        TEXT_COLOR,
        Align::Center,
    );

    match &assets.polarity {
        Some(glyph) => {
            // Mask-fill, not a blend: the badge is a flat silhouette in the
            // tier accent.
            let badge = mask_fill(glyph, tier.accent());
            let size = POLARITY_BADGE_SIZE;
            panel.draw_image_scaled(
                &badge,
                w - i64::from(size) - 4,
                (h - i64::from(size)) / 2,
                size,
                size,
            );
        }
        None => {
            // Universal or unknown polarity.
            face.draw(
                &mut panel,
                "??",
                DRAIN_PX,
                w - i64::from(POLARITY_BADGE_SIZE) / 2 - 4,
                baseline,
                TEXT_COLOR,
                Align::Center,
            );
        }
    }

    panel
}

/// The tab art always shows; only the label depends on the record.
fn compose_lower_tab(
    assets: &CardAssets,
    mod_: &Mod,
    layout: &TierLayout,
    face: &dyn Typeface,
) -> Canvas {
    let art = &assets.background.lower_tab;
    let mut tab = Canvas::new(art.width(), art.height());
    tab.draw_image(art, 0, 0);

    if let Some(compat) = mod_.compat_name.as_deref() {
        face.draw(
            &mut tab,
            compat,
            COMPAT_PX,
            i64::from(art.width()) / 2,
            layout.compat_y,
            TEXT_COLOR,
            Align::Center,
        );
    }
    tab
}

/// Bottom frame piece with mirrored corner lights and the rank-slot row.
fn compose_bottom(assets: &CardAssets, tier: Tier, fusion_limit: u32, rank: u32) -> Canvas {
    let layout = tier.layout();
    let bottom = &assets.frame.bottom;
    let corners = &assets.frame.corner_lights;

    let height = bottom
        .height()
        .max((layout.corner_light_rel_y + i64::from(corners.height())).max(0) as u32);
    let mut part = Canvas::new(bottom.width(), height);
    part.draw_image(bottom, 0, 0);

    part.draw_image(corners, layout.corner_light_x, layout.corner_light_rel_y);
    part.draw_image(
        &flip_horizontal(corners),
        layout.corner_light_mirror_x,
        layout.corner_light_rel_y,
    );

    draw_rank_row(
        &mut part,
        &assets.rank_slots,
        fusion_limit,
        rank,
        i64::from(bottom.width()) / 2,
        6,
    );
    part
}

/// Rank-slot indicator row centered on `center_x`.
///
/// Exactly `min(fusion_limit, 10)` slots are drawn; slot indexes below
/// `rank` use the active art. When the (capped) maximum is reached the
/// completion line is stretched across the whole row.
fn draw_rank_row(
    canvas: &mut Canvas,
    slots: &RankSlotArt,
    fusion_limit: u32,
    rank: u32,
    center_x: i64,
    y: i64,
) {
    let count = fusion_limit.min(MAX_RANK_SLOTS);
    if count == 0 {
        return;
    }

    let slot_w = i64::from(slots.empty.width());
    let total = i64::from(count) * slot_w + i64::from(count - 1) * RANK_SLOT_GAP;
    let x0 = center_x - total / 2;

    for i in 0..count {
        let art = if i < rank {
            &slots.active
        } else {
            &slots.empty
        };
        let x = x0 + i64::from(i) * (slot_w + RANK_SLOT_GAP);
        canvas.draw_image(art, x, y);
    }

    if rank >= count {
        canvas.draw_image_scaled(
            &slots.complete_line,
            x0,
            y,
            total as u32,
            slots.complete_line.height(),
        );
    }
}

/// Tinted set header banner plus the set-progress pip row beneath it.
fn draw_set_header(
    canvas: &mut Canvas,
    header: &RgbaImage,
    mod_: &Mod,
    tier: Tier,
    opts: &CardOptions,
    hx: i64,
    hy: i64,
) {
    let tinted = tint_image(header, tier.accent());
    let hw = header.width() * 4 / 5;
    let hh = header.height() * 4 / 5;
    canvas.draw_image_scaled(&tinted, hx, hy, hw, hh);

    let set_size = mod_.num_upgrades_in_set.unwrap_or(0);
    if set_size == 0 {
        return;
    }
    let filled = opts.set_bonus.unwrap_or(0).min(set_size);

    let (pip_w, pip_h) = SET_PIP_SIZE;
    let total = i64::from(set_size) * i64::from(pip_w) + i64::from(set_size - 1) * SET_PIP_GAP;
    let mut x = hx + i64::from(hw) / 2 - total / 2;
    let pip_y = hy + i64::from(hh) + 3;
    let accent = tier.accent();
    let hollow = Rgba([accent[0], accent[1], accent[2], 90]);

    for i in 0..set_size {
        let color = if i < filled { accent } else { hollow };
        canvas.fill_rect(x, pip_y, pip_w, pip_h, color);
        x += i64::from(pip_w) + SET_PIP_GAP;
    }
}

/// Compact card: shaded thumbnail backdrop, title, drain panel and rank
/// row, with no frame stack or description.
pub fn compose_collapsed(
    assets: &CardAssets,
    mod_: &Mod,
    tier: Tier,
    opts: &CardOptions,
    face: &dyn Typeface,
) -> Canvas {
    let layout = tier.layout();
    let width = layout.canvas_width;
    let height = layout.collapsed_height;
    let mut card = Canvas::new(width, height);

    let bg = &assets.background.background;
    card.draw_image(bg, 0, -((i64::from(bg.height()) - i64::from(height)) / 2));

    if let Some(thumb) = &assets.thumbnail {
        let shaded = shade_image(thumb, 0.5);
        card.draw_image_scaled(&shaded, 0, 0, width, height);
    }

    face.draw(
        &mut card,
        &mod_.name,
        TITLE_PX,
        i64::from(width) / 2,
        i64::from(height) / 2,
        TEXT_COLOR,
        Align::Center,
    );

    let backer = compose_backer(assets, mod_, tier, opts, face);
    card.draw_canvas(&backer, i64::from(width) - i64::from(backer.width()) - 4, 4);

    draw_rank_row(
        &mut card,
        &assets.rank_slots,
        mod_.fusion_limit,
        opts.rank,
        i64::from(width) / 2,
        i64::from(height) - 18,
    );

    card
}
