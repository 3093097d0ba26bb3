use crate::error::{ModcardError, ModcardResult};

/// A mod record as found in the upstream item database export.
///
/// Field names follow the database's camelCase JSON. Everything the
/// compositor does not strictly need is optional; absent data skips the
/// corresponding draw call instead of failing the render.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Mod {
    pub name: String,
    /// Item category, e.g. "Warframe Mod", "Riven Mod".
    #[serde(rename = "type")]
    pub item_type: String,
    pub rarity: Option<String>,
    pub polarity: Option<String>,
    pub base_drain: i32,
    /// Maximum rank the mod can be upgraded to.
    pub fusion_limit: u32,
    pub image_name: Option<String>,
    pub description: Option<String>,
    pub level_stats: Option<Vec<LevelStat>>,
    /// Restricts the mod to one weapon/warframe class, e.g. "Rifle".
    pub compat_name: Option<String>,
    /// Identifier of the mod set this mod belongs to, if any.
    pub mod_set: Option<String>,
    /// Number of mods in the set.
    pub num_upgrades_in_set: Option<u32>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct LevelStat {
    pub stats: Vec<String>,
}

/// Per-render options supplied alongside the [`Mod`].
#[derive(Clone, Debug, Default)]
pub struct CardOptions {
    /// Current rank, 0 if absent.
    pub rank: u32,
    /// How many mods of the set are equipped; drives the pip row.
    pub set_bonus: Option<u32>,
    /// Overrides `Mod::image_name` for the thumbnail.
    pub image: Option<String>,
    /// Render the compact card instead of the full one.
    pub collapsed: bool,
    pub output: OutputConfig,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Webp,
    Jpeg,
    Avif,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Jpeg => "jpeg",
            Self::Avif => "avif",
        }
    }
}

/// Encoder settings for AVIF output.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AvifConfig {
    /// Quality in [0, 100], higher is better.
    pub quality: u8,
    /// Encoder effort, 1 (slowest) ..= 10 (fastest).
    pub speed: u8,
}

impl Default for AvifConfig {
    fn default() -> Self {
        Self {
            quality: 80,
            speed: 4,
        }
    }
}

/// Requested output encoding.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Lossy quality in [0, 100]. Ignored by png; webp encodes lossless
    /// regardless but the range is still enforced.
    pub quality: Option<i32>,
    pub avif: Option<AvifConfig>,
}

impl OutputConfig {
    pub fn png() -> Self {
        Self::default()
    }

    /// Range-checks the quality fields. Called before any drawing so a bad
    /// config never costs a render.
    pub fn validate(&self) -> ModcardResult<()> {
        if let Some(q) = self.quality {
            if !(0..=100).contains(&q) {
                return Err(ModcardError::config(format!(
                    "quality must be in [0, 100], got {q}"
                )));
            }
        }
        if let Some(avif) = &self.avif {
            if avif.quality > 100 {
                return Err(ModcardError::config(format!(
                    "avif quality must be in [0, 100], got {}",
                    avif.quality
                )));
            }
            if !(1..=10).contains(&avif.speed) {
                return Err(ModcardError::config(format!(
                    "avif speed must be in [1, 10], got {}",
                    avif.speed
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_deserializes_from_database_json() {
        let json = r#"{
            "name": "Vitality",
            "type": "Warframe Mod",
            "rarity": "Common",
            "polarity": "vazarin",
            "baseDrain": 2,
            "fusionLimit": 10,
            "compatName": "WARFRAME",
            "levelStats": [{ "stats": ["+40% Health"] }]
        }"#;
        let m: Mod = serde_json::from_str(json).unwrap();
        assert_eq!(m.name, "Vitality");
        assert_eq!(m.item_type, "Warframe Mod");
        assert_eq!(m.rarity.as_deref(), Some("Common"));
        assert_eq!(m.base_drain, 2);
        assert_eq!(m.fusion_limit, 10);
        assert_eq!(m.level_stats.unwrap()[0].stats[0], "+40% Health");
    }

    #[test]
    fn quality_bounds_are_inclusive() {
        for q in [0, 50, 100] {
            let cfg = OutputConfig {
                format: OutputFormat::Jpeg,
                quality: Some(q),
                avif: None,
            };
            assert!(cfg.validate().is_ok(), "quality {q} should be accepted");
        }
        for q in [-1, 101] {
            let cfg = OutputConfig {
                format: OutputFormat::Webp,
                quality: Some(q),
                avif: None,
            };
            assert!(cfg.validate().is_err(), "quality {q} should be rejected");
        }
    }

    #[test]
    fn avif_config_is_checked() {
        let cfg = OutputConfig {
            format: OutputFormat::Avif,
            quality: None,
            avif: Some(AvifConfig {
                quality: 101,
                speed: 4,
            }),
        };
        assert!(cfg.validate().is_err());

        let cfg = OutputConfig {
            format: OutputFormat::Avif,
            quality: None,
            avif: Some(AvifConfig {
                quality: 100,
                speed: 11,
            }),
        };
        assert!(cfg.validate().is_err());
    }
}
