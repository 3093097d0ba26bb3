use crate::{
    assets::AssetProvider,
    compose::{CardAssets, compose_card, compose_collapsed},
    error::ModcardResult,
    model::{CardOptions, Mod},
    text::Typeface,
    tier::resolve_tier,
};

/// Renders one mod to an encoded image buffer.
///
/// The one-shot pipeline: validate the output config, resolve the tier,
/// load the tier's assets through the provider cache, composite, encode.
/// Renders are independent; concurrent calls only share the provider's
/// on-disk cache, which tolerates duplicate writes.
#[tracing::instrument(skip(provider, face, mod_, opts), fields(mod_name = %mod_.name))]
pub fn render_mod(
    provider: &AssetProvider,
    face: &dyn Typeface,
    mod_: &Mod,
    opts: &CardOptions,
) -> ModcardResult<Vec<u8>> {
    // Fail fast on bad config before any fetch or draw work.
    opts.output.validate()?;

    let tier = resolve_tier(mod_);
    tracing::debug!(?tier, collapsed = opts.collapsed, "compositing card");

    let assets = CardAssets::load(provider, mod_, tier, opts.image.as_deref())?;
    let canvas = if opts.collapsed {
        compose_collapsed(&assets, mod_, tier, opts, face)
    } else {
        compose_card(&assets, mod_, tier, opts, face)
    };

    crate::export::export_canvas(canvas.image(), &opts.output)
}
