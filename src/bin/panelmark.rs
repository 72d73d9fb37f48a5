use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use panelmark::{
    JsonFileStore, MarkerConfig, MarkerFamily, MarkerIdentity, MarkerRegistry, ModuleMatrixFile,
    PanelId, VectorImage,
};

#[derive(Parser, Debug)]
#[command(name = "panelmark", version)]
struct Cli {
    /// Marker config JSON; built-in defaults when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured marker family (e.g. `5x5_BCH_22_7_7`).
    #[arg(long, global = true)]
    family: Option<MarkerFamily>,

    /// Log verbosity: -v info, -vv debug, -vvv trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the codeword for an identity.
    Encode(IdArgs),
    /// Print the marker grid for an identity.
    Grid(IdArgs),
    /// Write a standalone marker image (SVG or PNG by extension).
    Standalone(ImageArgs),
    /// Write a QR code with the marker embedded in its centre.
    Composite(CompositeArgs),
    /// Write a `.patt` template for a marker or a QR matrix.
    Pattern(PatternArgs),
    /// Give a panel a marker identity.
    Assign(PanelArgs),
    /// Free a panel's marker identity.
    Release(PanelArgs),
    /// Reassign identities outside the active family's range.
    Migrate(StoreArgs),
}

#[derive(Parser, Debug)]
struct IdArgs {
    /// Marker identity.
    #[arg(long)]
    id: u32,
}

#[derive(Parser, Debug)]
struct ImageArgs {
    /// Marker identity.
    #[arg(long)]
    id: u32,

    /// Output path (`.png` rasterizes, anything else writes SVG).
    #[arg(long)]
    out: PathBuf,

    /// Pixels per image unit for PNG output.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,
}

#[derive(Parser, Debug)]
struct CompositeArgs {
    #[command(flatten)]
    image: ImageArgs,

    /// QR module matrix JSON (`{"ec_level": "H", "rows": [...]}`).
    #[arg(long)]
    qr: PathBuf,
}

#[derive(Parser, Debug)]
struct PatternArgs {
    /// Marker identity; required unless `--qr` is given.
    #[arg(long, required_unless_present = "qr")]
    id: Option<u32>,

    /// Export the QR matrix instead of the marker grid.
    #[arg(long)]
    qr: Option<PathBuf>,

    /// Output `.patt` path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct StoreArgs {
    /// Identity store JSON (created on first write).
    #[arg(long)]
    store: PathBuf,
}

#[derive(Parser, Debug)]
struct PanelArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Panel id.
    #[arg(long)]
    panel: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => MarkerConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => MarkerConfig::default(),
    };
    if let Some(family) = cli.family {
        config.family = family;
        config.validate().context("validate config")?;
    }

    match cli.cmd {
        Command::Encode(args) => cmd_encode(&config, args),
        Command::Grid(args) => cmd_grid(&config, args),
        Command::Standalone(args) => cmd_standalone(&config, args),
        Command::Composite(args) => cmd_composite(&config, args),
        Command::Pattern(args) => cmd_pattern(&config, args),
        Command::Assign(args) => cmd_assign(&config, args),
        Command::Release(args) => cmd_release(&config, args),
        Command::Migrate(args) => cmd_migrate(&config, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn identity(config: &MarkerConfig, id: u32) -> anyhow::Result<MarkerIdentity> {
    Ok(MarkerIdentity::checked(id, config.family)?)
}

fn cmd_encode(config: &MarkerConfig, args: IdArgs) -> anyhow::Result<()> {
    let id = identity(config, args.id)?;
    let word = panelmark::encode(config.family, id)?;
    let bits = config.family.codeword_bits() as usize;
    println!("{}\t{id}\t{word}\t{:0bits$b}", config.family, word.0);
    Ok(())
}

fn cmd_grid(config: &MarkerConfig, args: IdArgs) -> anyhow::Result<()> {
    let grid = panelmark::identity_grid(config.family, identity(config, args.id)?)?;
    print!("{grid}");
    Ok(())
}

fn cmd_standalone(config: &MarkerConfig, args: ImageArgs) -> anyhow::Result<()> {
    let id = identity(config, args.id)?;
    let img = panelmark::render_standalone(config.family, id, &config.standalone)?;
    write_image(&img, &args.out, args.scale)
}

fn cmd_composite(config: &MarkerConfig, args: CompositeArgs) -> anyhow::Result<()> {
    let id = identity(config, args.image.id)?;
    let qr = ModuleMatrixFile::from_path(&args.qr)?;
    let img = panelmark::render_composite(qr.modules(), config.family, id, &config.composite)?;
    write_image(&img, &args.image.out, args.image.scale)
}

fn cmd_pattern(config: &MarkerConfig, args: PatternArgs) -> anyhow::Result<()> {
    let grid = match (&args.qr, args.id) {
        (Some(path), _) => ModuleMatrixFile::from_path(path)?.modules().grid().clone(),
        (None, Some(id)) => panelmark::identity_grid(config.family, identity(config, id)?)?,
        (None, None) => anyhow::bail!("pattern needs --id or --qr"),
    };
    let template = panelmark::to_pattern_template(&grid, config.pattern.resolution)?;
    ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, template.to_patt_string())
        .with_context(|| format!("write pattern '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn open_registry(
    config: &MarkerConfig,
    args: &StoreArgs,
) -> anyhow::Result<MarkerRegistry<JsonFileStore>> {
    let store = JsonFileStore::open(&args.store)?;
    let (registry, report) = MarkerRegistry::open(store, config)
        .with_context(|| format!("open identity store '{}'", args.store.display()))?;
    for change in &report.reassigned {
        eprintln!("migrated panel {}: {} -> {}", change.panel, change.from, change.to);
    }
    Ok(registry)
}

fn cmd_assign(config: &MarkerConfig, args: PanelArgs) -> anyhow::Result<()> {
    let registry = open_registry(config, &args.store)?;
    let id = registry.assign(PanelId(args.panel))?;
    println!("{id}");
    Ok(())
}

fn cmd_release(config: &MarkerConfig, args: PanelArgs) -> anyhow::Result<()> {
    let registry = open_registry(config, &args.store)?;
    match registry.release(PanelId(args.panel))? {
        Some(id) => println!("{id}"),
        None => eprintln!("panel {} holds no marker", args.panel),
    }
    Ok(())
}

fn cmd_migrate(config: &MarkerConfig, args: StoreArgs) -> anyhow::Result<()> {
    let store = JsonFileStore::open(&args.store)?;
    let (_, report) = MarkerRegistry::open(store, config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.unavailable.is_empty() {
        eprintln!(
            "{} panel(s) kept out-of-range markers: no free slot",
            report.unavailable.len()
        );
    }
    Ok(())
}

fn write_image(img: &VectorImage, out: &Path, scale: f32) -> anyhow::Result<()> {
    ensure_parent_dir(out)?;
    img.save(out, scale)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
