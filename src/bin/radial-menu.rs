use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "radial-menu", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a menu and write its SVG scene as markup.
    Render(RenderArgs),
    /// Print the default configuration as JSON.
    Defaults,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Menu configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output markup path.
    #[arg(long)]
    out: PathBuf,

    /// Directory the sprite URL is resolved against (defaults to the config's directory).
    #[arg(long)]
    sprite_root: Option<PathBuf>,

    /// Open the menu at `X,Y` and settle all animations before writing.
    #[arg(long, value_parser = parse_point)]
    open_at: Option<(f64, f64)>,

    /// Animation step in milliseconds when settling.
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// Font file used to measure hint text (a fixed advance is used otherwise).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Hint font size in pixels.
    #[arg(long, default_value_t = 12.0)]
    font_size: f32,
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok((parse(x)?, parse(y)?))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Defaults => {
            println!("{}", radial_menu::MenuConfig::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn read_config_json(path: &Path) -> anyhow::Result<radial_menu::MenuConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let config: radial_menu::MenuConfig =
        serde_json::from_reader(r).with_context(|| "parse config JSON")?;
    Ok(config)
}

fn make_metrics(args: &RenderArgs) -> anyhow::Result<Rc<dyn radial_menu::TextMetrics>> {
    let Some(font) = &args.font else {
        return Ok(Rc::new(radial_menu::FixedTextMetrics::default()));
    };
    let bytes = std::fs::read(font).with_context(|| format!("read font '{}'", font.display()))?;
    let metrics = radial_menu::ParleyTextMetrics::new(&bytes, args.font_size)?;
    Ok(Rc::new(metrics))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = read_config_json(&args.config)?;
    config.validate()?;

    let sprite_root = args
        .sprite_root
        .clone()
        .or_else(|| args.config.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    let sprite = radial_menu::FsSpriteSource::new(sprite_root);
    let metrics = make_metrics(&args)?;

    let mut manager = radial_menu::Manager::new(config, &sprite, metrics)?;
    if !manager.builder().has_icons() {
        eprintln!("warning: sprite not loaded; menu has no icons");
    }

    if let Some((x, y)) = args.open_at {
        manager.show(&radial_menu::PointerEvent::context_menu(x, y))?;
        let settled = manager.builder_mut().run_to_completion(args.frame_ms, 60_000.0);
        eprintln!("settled at {settled}ms");
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, manager.builder().to_markup())
        .with_context(|| format!("write markup '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
