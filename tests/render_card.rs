//! End-to-end render scenarios over a pre-seeded asset cache.
//!
//! The provider's base URLs point at an unroutable address, so any cache
//! miss fails the render instead of hitting the network. Text is drawn
//! through a no-op typeface; these tests assert on geometry and slot art,
//! not glyphs.

use std::io::Cursor;
use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use modcard::{
    Align, AssetProvider, Canvas, CardOptions, Mod, ModcardError, Typeface, render_mod,
};

const ACTIVE: Rgba<u8> = Rgba([200, 0, 0, 255]);
const EMPTY: Rgba<u8> = Rgba([0, 0, 200, 255]);
const COMPLETE: Rgba<u8> = Rgba([0, 200, 0, 255]);

struct NoFace;

impl Typeface for NoFace {
    fn measure(&self, text: &str, px: f32) -> f32 {
        text.chars().count() as f32 * px * 0.6
    }

    fn draw(
        &self,
        _canvas: &mut Canvas,
        _text: &str,
        _px: f32,
        _x: i64,
        _y: i64,
        _color: Rgba<u8>,
        _align: Align,
    ) {
    }
}

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "modcard_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(dir: &PathBuf, name: &str, width: u32, height: u32, color: Rgba<u8>) {
    let img = RgbaImage::from_pixel(width, height, color);
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(dir.join(name), &buf).unwrap();
}

/// Seeds every fragment a Bronze and an Omega render needs.
fn seed_cache(dir: &PathBuf) {
    std::fs::create_dir_all(dir).unwrap();

    for prefix in ["Bronze", "Omega"] {
        let frame_width = if prefix == "Omega" { 288 } else { 256 };
        write_png(
            dir,
            &format!("{prefix}FrameTop.png"),
            frame_width,
            70,
            Rgba([50, 50, 50, 255]),
        );
        write_png(
            dir,
            &format!("{prefix}FrameBottom.png"),
            frame_width,
            64,
            Rgba([60, 60, 60, 255]),
        );
        write_png(
            dir,
            &format!("{prefix}SideLight.png"),
            16,
            256,
            Rgba([70, 70, 70, 255]),
        );
        write_png(
            dir,
            &format!("{prefix}CornerLights.png"),
            64,
            64,
            Rgba([80, 80, 80, 255]),
        );
    }

    write_png(dir, "BronzeBackground.png", 256, 512, Rgba([20, 20, 20, 255]));
    write_png(dir, "BronzeTopRightBacker.png", 48, 32, Rgba([30, 30, 30, 255]));
    write_png(dir, "BronzeLowerTab.png", 210, 28, Rgba([40, 40, 40, 255]));

    // Omega reuses the Legendary background with riven backer/tab art.
    write_png(dir, "LegendaryBackground.png", 256, 512, Rgba([25, 25, 25, 255]));
    write_png(dir, "RivenTopRightBacker.png", 48, 32, Rgba([35, 35, 35, 255]));
    write_png(dir, "RivenLowerTab.png", 210, 28, Rgba([45, 45, 45, 255]));

    write_png(dir, "RankSlotEmpty.png", 8, 8, EMPTY);
    write_png(dir, "RankSlotActive.png", 8, 8, ACTIVE);
    write_png(dir, "RankCompleteLine.png", 32, 4, COMPLETE);
}

fn offline_provider(dir: &PathBuf) -> AssetProvider {
    AssetProvider::with_base_urls(dir, "http://127.0.0.1:1", "http://127.0.0.1:1")
}

fn common_mod() -> Mod {
    Mod {
        name: "Pressure Point".into(),
        item_type: "Melee Mod".into(),
        rarity: Some("common".into()),
        fusion_limit: 5,
        base_drain: 2,
        description: Some("+10% Damage".into()),
        ..Mod::default()
    }
}

fn count_pixels(img: &RgbaImage, color: Rgba<u8>) -> usize {
    img.pixels().filter(|&&p| p == color).count()
}

#[test]
fn common_mod_rank_3_of_5_shows_split_slot_row() {
    let dir = temp_dir("rank_split");
    seed_cache(&dir);

    let opts = CardOptions {
        rank: 3,
        ..CardOptions::default()
    };
    let bytes = render_mod(&offline_provider(&dir), &NoFace, &common_mod(), &opts).unwrap();
    let card = image::load_from_memory(&bytes).unwrap().to_rgba8();

    assert_eq!(card.width(), 256);
    assert_eq!(card.height(), 380);
    // 8x8 slots: 3 active, 2 empty, no completion line at rank 3 of 5.
    assert_eq!(count_pixels(&card, ACTIVE), 3 * 64);
    assert_eq!(count_pixels(&card, EMPTY), 2 * 64);
    assert_eq!(count_pixels(&card, COMPLETE), 0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn maxed_mod_adds_completion_line() {
    let dir = temp_dir("rank_maxed");
    seed_cache(&dir);

    let opts = CardOptions {
        rank: 5,
        ..CardOptions::default()
    };
    let bytes = render_mod(&offline_provider(&dir), &NoFace, &common_mod(), &opts).unwrap();
    let card = image::load_from_memory(&bytes).unwrap().to_rgba8();

    assert_eq!(count_pixels(&card, EMPTY), 0);
    let completeish = card
        .pixels()
        .filter(|p| p[1] > 150 && p[0] < 50 && p[2] < 50)
        .count();
    assert!(completeish > 0, "completion line missing");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_fusion_limit_caps_at_ten_slots() {
    let dir = temp_dir("rank_cap");
    seed_cache(&dir);

    let mut mod_ = common_mod();
    mod_.fusion_limit = 32756;
    let bytes = render_mod(
        &offline_provider(&dir),
        &NoFace,
        &mod_,
        &CardOptions::default(),
    )
    .unwrap();
    let card = image::load_from_memory(&bytes).unwrap().to_rgba8();

    assert_eq!(count_pixels(&card, EMPTY), 10 * 64);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn riven_renders_wider_than_standard() {
    let dir = temp_dir("riven_width");
    seed_cache(&dir);
    let provider = offline_provider(&dir);

    let riven = Mod {
        name: "Karak Visi-critatis".into(),
        item_type: "Riven Mod".into(),
        rarity: Some("common".into()),
        fusion_limit: 8,
        base_drain: 10,
        ..Mod::default()
    };
    let bytes = render_mod(&provider, &NoFace, &riven, &CardOptions::default()).unwrap();
    let riven_card = image::load_from_memory(&bytes).unwrap().to_rgba8();

    let bytes = render_mod(&provider, &NoFace, &common_mod(), &CardOptions::default()).unwrap();
    let standard_card = image::load_from_memory(&bytes).unwrap().to_rgba8();

    assert_eq!(riven_card.width(), 292);
    assert_eq!(standard_card.width(), 256);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn warm_cache_renders_are_byte_identical() {
    let dir = temp_dir("determinism");
    seed_cache(&dir);
    let provider = offline_provider(&dir);

    let opts = CardOptions {
        rank: 2,
        ..CardOptions::default()
    };
    let a = render_mod(&provider, &NoFace, &common_mod(), &opts).unwrap();
    let b = render_mod(&provider, &NoFace, &common_mod(), &opts).unwrap();
    assert_eq!(a, b);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_asset_aborts_with_fetch_error() {
    let dir = temp_dir("missing_asset");
    std::fs::create_dir_all(&dir).unwrap();
    // Empty cache + unroutable CDN: the first fragment lookup must fail.
    let err = render_mod(
        &offline_provider(&dir),
        &NoFace,
        &common_mod(),
        &CardOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ModcardError::Fetch(_)), "got {err}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn collapsed_card_is_compact() {
    let dir = temp_dir("collapsed");
    seed_cache(&dir);

    let opts = CardOptions {
        collapsed: true,
        rank: 3,
        ..CardOptions::default()
    };
    let bytes = render_mod(&offline_provider(&dir), &NoFace, &common_mod(), &opts).unwrap();
    let card = image::load_from_memory(&bytes).unwrap().to_rgba8();

    assert_eq!(card.width(), 256);
    assert_eq!(card.height(), 170);
    assert_eq!(count_pixels(&card, ACTIVE), 3 * 64);

    std::fs::remove_dir_all(&dir).ok();
}
