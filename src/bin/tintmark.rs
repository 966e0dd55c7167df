use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tintmark", version)]
struct Cli {
    /// Log render and load details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a background, color wash and logo into a PNG.
    Compose(ComposeArgs),
    /// List the named backgrounds in a gallery directory.
    Gallery(GalleryArgs),
    /// List the supported aspect ratios and their output sizes.
    Ratios,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Composition config JSON. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of background images, named by file stem.
    #[arg(long)]
    gallery_dir: Option<PathBuf>,

    /// Background picked from the gallery by name.
    #[arg(long, conflicts_with = "background")]
    gallery: Option<String>,

    /// Background image file.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Overlay color, `#RRGGBB`.
    #[arg(long)]
    color: Option<String>,

    /// Logo distance from the top and right edges in pixels (invalid values mean 24).
    #[arg(long, allow_hyphen_values = true)]
    padding: Option<String>,

    /// Logo image file (raster or SVG).
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Logo width as a percentage of canvas width (invalid values mean 20).
    #[arg(long, allow_hyphen_values = true)]
    logo_width: Option<String>,

    /// Output aspect ratio: 1:1, 4:3, 16:9 or 21:9.
    #[arg(long)]
    ratio: Option<tintmark::AspectRatio>,

    /// Directory the PNG is written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct GalleryArgs {
    /// Directory of background images.
    #[arg(long)]
    dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Gallery(args) => cmd_gallery(args),
        Command::Ratios => cmd_ratios(),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let (config, root) = match &args.config {
        Some(path) => {
            let cfg = tintmark::ComposeConfig::from_path(path)?;
            let root = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            (cfg, root)
        }
        None => (tintmark::ComposeConfig::default(), PathBuf::from(".")),
    };

    let mut gallery = config.gallery_at(&root);
    if let Some(dir) = &args.gallery_dir {
        gallery.merge(tintmark::Gallery::from_dir(dir)?);
    }

    let mut session = tintmark::Session::new(gallery)?;
    config
        .apply(&mut session, &root)
        .context("apply composition config")?;

    if let Some(ratio) = args.ratio {
        session.set_aspect_ratio(ratio)?;
    }
    if let Some(color) = &args.color {
        session.set_color(color)?;
    }
    if let Some(padding) = &args.padding {
        session.set_padding(padding)?;
    }
    if let Some(pct) = &args.logo_width {
        session.set_logo_width(pct)?;
    }
    if let Some(name) = &args.gallery {
        session.select_gallery(name)?.ensure_applied("background")?;
    }
    if let Some(path) = &args.background {
        let source = tintmark::AssetSource::Path(path.clone());
        session.upload_background(source)?.ensure_applied("background")?;
    }
    if let Some(path) = &args.logo {
        let source = tintmark::AssetSource::Path(path.clone());
        session.upload_logo(source)?.ensure_applied("logo")?;
    }

    if !session.export_enabled() {
        anyhow::bail!("nothing to export: {}", session.status());
    }

    let out = session.export_to_dir(&args.out_dir)?;
    tracing::info!(path = %out.display(), "exported");
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_gallery(args: GalleryArgs) -> anyhow::Result<()> {
    let gallery = tintmark::Gallery::from_dir(&args.dir)?;
    if gallery.is_empty() {
        eprintln!("no images in {}", args.dir.display());
        return Ok(());
    }
    for name in gallery.names() {
        let path = gallery
            .resolve(name)
            .with_context(|| format!("resolve gallery entry '{name}'"))?;
        println!("{name}\t{}", path.display());
    }
    Ok(())
}

fn cmd_ratios() -> anyhow::Result<()> {
    for ratio in tintmark::AspectRatio::ALL {
        let size = ratio.output_size();
        let marker = if ratio == tintmark::AspectRatio::default() {
            " (default)"
        } else {
            ""
        };
        println!("{:<5} {}x{}{marker}", ratio.key(), size.width, size.height);
    }
    Ok(())
}
