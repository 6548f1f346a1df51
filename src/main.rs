use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use ingot_piles::assets::{DirectoryAssets, TemplateSource, decode_png};
use ingot_piles::catalog::JsonCatalog;
use ingot_piles::config::Settings;
use ingot_piles::generator::{GenerationReport, TextureGenerator};
use ingot_piles::lifecycle::Lifecycle;
use ingot_piles::pack::{PackType, VirtualPack};
use ingot_piles::paths::resolve_full_path;
use ingot_piles::publish::{DiskPack, MemoryPublisher};
use ingot_piles::store::TextureStore;
use ingot_piles::{Color, average_color, recolor};

#[derive(Debug, Parser)]
#[command(name = "ingot-piles", about = "Generate ingot pile textures for every metal")]
struct Cli {
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Discover ingots and generate a pile texture for each
    Generate {
        /// JSON dump of the item registry
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        /// Directory holding extracted `assets/<namespace>/...`
        #[arg(long, value_name = "DIR")]
        assets: PathBuf,

        /// Game directory; the pack goes to `<DIR>/resourcepacks/<pack name>`
        #[arg(long, value_name = "DIR", default_value = ".")]
        game_dir: PathBuf,

        /// Optional JSON settings file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Keep textures in memory and list what the virtual pack would serve
        #[arg(long)]
        memory: bool,
    },
    /// Recolor a template image toward a hex color
    Recolor {
        #[arg(long, value_name = "PNG")]
        template: PathBuf,

        /// Target color as "#RRGGBB"
        #[arg(long)]
        color: String,

        #[arg(long, value_name = "PNG")]
        out: PathBuf,
    },
    /// Print the average visible color of an image
    Sample {
        #[arg(long, value_name = "PNG")]
        image: PathBuf,
    },
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(format!("ingot_piles={level}").parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Command::Generate {
            catalog,
            assets,
            game_dir,
            config,
            memory,
        } => generate(&catalog, &assets, &game_dir, config.as_deref(), memory),
        Command::Recolor {
            template,
            color,
            out,
        } => recolor_file(&template, &color, &out),
        Command::Sample { image } => sample_file(&image),
    }
}

fn generate(
    catalog_path: &Path,
    assets_dir: &Path,
    game_dir: &Path,
    config: Option<&Path>,
    memory: bool,
) -> Result<()> {
    let settings = match config {
        Some(path) => {
            let path = resolve_full_path(path);
            Settings::from_json_file(&path)
                .with_context(|| format!("loading settings from {}", path.display()))?
        }
        None => Settings::default(),
    };
    settings.validate().context("validating settings")?;

    let catalog = JsonCatalog::from_json_file(&resolve_full_path(catalog_path))?;
    let assets = DirectoryAssets::new(resolve_full_path(assets_dir));
    let template = TemplateSource::new(
        settings.template_location()?,
        settings.template_fallback_location()?,
        settings.template_policy,
    );

    if memory {
        let store = Arc::new(TextureStore::new());
        let generator = TextureGenerator::new(assets, MemoryPublisher::new(store.clone()), template);
        let lifecycle = Lifecycle::new(catalog, generator, settings.clone());
        lifecycle.on_early_init();
        let report = lifecycle.on_ready().unwrap_or_default();

        let pack = VirtualPack::new(store, &settings);
        let served = pack.list_resources(
            PackType::ClientResources,
            &settings.pack_namespace,
            settings.texture_dir(),
        );
        print_report(&report);
        println!("{}", "Virtual pack would serve:".cyan());
        for (location, bytes) in served {
            println!(" - {} ({} bytes)", location, bytes.len());
        }
    } else {
        let pack = DiskPack::new(&resolve_full_path(game_dir), &settings);
        let generator = TextureGenerator::new(assets, pack.clone(), template);
        let lifecycle = Lifecycle::new(catalog, generator, settings).with_disk_pack(pack.clone());
        lifecycle.on_early_init();
        let report = lifecycle.on_ready().unwrap_or_default();

        print_report(&report);
        if report.succeeded() > 0 {
            println!(
                "{} {} texture files in {}",
                "Pack holds".cyan(),
                pack.texture_count(),
                pack.texture_dir().display()
            );
        }
    }

    Ok(())
}

fn print_report(report: &GenerationReport) {
    println!(
        "{} {}/{} metals ({} new, {} already present)",
        "Generation complete:".green(),
        report.succeeded(),
        report.total,
        report.generated,
        report.already_present
    );

    if !report.failed.is_empty() {
        println!("{}", "Failed metals:".red());
        for metal in &report.failed {
            println!(" - {}", metal);
        }
        println!(
            "{}",
            "-> Check that the template texture exists in the assets directory".magenta()
        );
    }
}

fn recolor_file(template_path: &Path, hex: &str, out: &Path) -> Result<()> {
    let target = Color::from_hex(hex)?;
    let bytes = std::fs::read(template_path)
        .with_context(|| format!("reading template {}", template_path.display()))?;
    let template = decode_png(&bytes)
        .with_context(|| format!("decoding template {}", template_path.display()))?;

    let result = recolor(&template, target);
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    result
        .save(out)
        .with_context(|| format!("saving {}", out.display()))?;

    println!("{} {}", "Recolored to".green(), target);
    Ok(())
}

fn sample_file(image_path: &Path) -> Result<()> {
    let bytes = std::fs::read(image_path)
        .with_context(|| format!("reading {}", image_path.display()))?;
    let image = decode_png(&bytes).with_context(|| format!("decoding {}", image_path.display()))?;

    println!("{}", average_color(&image));
    Ok(())
}
