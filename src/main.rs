use std::path::PathBuf;

use anyhow::{Context, bail};

use pagestitch::screenshot::persist::DirectorySink;
use pagestitch::{NoSuppression, Rect, RegionScreenshot, RenderedPage, StitchConfig, ViewportSpec};

const USAGE: &str =
    "usage: pagestitch <page.png> <x> <y> <width> <height> [viewport_w viewport_h [pixel_ratio]]";

struct Args {
    page: PathBuf,
    target: Rect,
    viewport: ViewportSpec,
}

fn number(args: &[String], index: usize, name: &str) -> anyhow::Result<Option<f64>> {
    args.get(index)
        .map(|value| {
            value
                .parse::<f64>()
                .with_context(|| format!("{name} must be a number, got {value:?}"))
        })
        .transpose()
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    if args.len() < 5 || args.len() > 8 {
        bail!(USAGE);
    }
    let required = |index: usize, name: &str| -> anyhow::Result<f64> {
        number(args, index, name)?.with_context(|| format!("missing {name}\n{USAGE}"))
    };
    let target = Rect::new(
        required(1, "x")?,
        required(2, "y")?,
        required(3, "width")?,
        required(4, "height")?,
    );
    let defaults = ViewportSpec::default();
    let viewport = ViewportSpec::new(
        number(args, 5, "viewport_w")?.unwrap_or(defaults.width),
        number(args, 6, "viewport_h")?.unwrap_or(defaults.height),
        number(args, 7, "pixel_ratio")?.unwrap_or(defaults.pixel_ratio),
    );
    Ok(Args {
        page: PathBuf::from(&args[0]),
        target,
        viewport,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Args {
        page,
        target,
        viewport,
    } = parse_args(&args)?;

    let config = StitchConfig::load();
    let page = RenderedPage::open(&page, viewport)?;
    let sink = DirectorySink::for_location(config.save_location)?;
    let fallback_dir = std::env::current_dir().context("Failed to read current directory")?;

    let saved = RegionScreenshot::new(config)
        .capture_and_save(
            &target,
            &viewport,
            &page,
            &page,
            &NoSuppression,
            &sink,
            &fallback_dir,
        )
        .await?;

    println!("{}", saved.path.display());
    Ok(())
}
