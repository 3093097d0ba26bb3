use std::{fs, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use modcard::{
    AssetProvider, AvifConfig, CardOptions, Mod, OutputConfig, OutputFormat,
    ensure_font_registered, render_mod,
};

#[derive(Parser, Debug)]
#[command(name = "modcard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a mod card from a mod JSON record.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input mod JSON (a single record from the item database export).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Current rank of the mod.
    #[arg(long, default_value_t = 0)]
    rank: u32,

    /// Equipped set-bonus count, for set mods.
    #[arg(long)]
    set_bonus: Option<u32>,

    /// Thumbnail image name, overriding the record's own.
    #[arg(long)]
    image: Option<String>,

    /// Render the compact card instead of the full one.
    #[arg(long)]
    collapsed: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,

    /// Lossy quality in [0, 100] (webp/jpeg/avif).
    #[arg(long)]
    quality: Option<i32>,

    /// AVIF encoder speed, 1 (slowest) ..= 10 (fastest).
    #[arg(long)]
    avif_speed: Option<u8>,

    /// Asset cache directory.
    #[arg(long, default_value = "./cache")]
    cache_dir: PathBuf,

    /// Fragment CDN base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Thumbnail CDN base URL.
    #[arg(long)]
    image_url: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Webp,
    Jpeg,
    Avif,
}

impl From<FormatChoice> for OutputFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Png => Self::Png,
            FormatChoice::Webp => Self::Webp,
            FormatChoice::Jpeg => Self::Jpeg,
            FormatChoice::Avif => Self::Avif,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let json = fs::read_to_string(&args.in_path)
        .with_context(|| format!("read mod json '{}'", args.in_path.display()))?;
    let mod_: Mod = serde_json::from_str(&json).context("parse mod JSON")?;

    let provider = match (&args.base_url, &args.image_url) {
        (None, None) => AssetProvider::new(&args.cache_dir),
        (base, image) => AssetProvider::with_base_urls(
            &args.cache_dir,
            base.as_deref().unwrap_or(modcard::assets::DEFAULT_BASE_URL),
            image.as_deref().unwrap_or(modcard::assets::DEFAULT_IMAGE_URL),
        ),
    };

    let font_bytes = provider.font_bytes().context("fetch card typeface")?;
    let face = ensure_font_registered(&font_bytes).context("register card typeface")?;

    let format: OutputFormat = args.format.into();
    let avif = match (format, args.avif_speed) {
        (OutputFormat::Avif, Some(speed)) => Some(AvifConfig {
            speed,
            ..AvifConfig::default()
        }),
        _ => None,
    };

    let opts = CardOptions {
        rank: args.rank,
        set_bonus: args.set_bonus,
        image: args.image.clone(),
        collapsed: args.collapsed,
        output: OutputConfig {
            format,
            quality: args.quality,
            avif,
        },
    };

    let bytes = render_mod(&provider, face.as_ref(), &mod_, &opts)
        .with_context(|| format!("render '{}'", mod_.name))?;
    fs::write(&args.out, &bytes)
        .with_context(|| format!("write output '{}'", args.out.display()))?;

    println!("wrote {} ({} bytes)", args.out.display(), bytes.len());
    Ok(())
}
