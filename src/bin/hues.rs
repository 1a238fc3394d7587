use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use hues::{
    AudioInputConfig, Canvas, EncodeConfig, Fps, Resources, Session, Surface, default_video_config,
    render_to_video,
};

#[derive(Parser, Debug)]
#[command(name = "hues", version)]
struct Cli {
    /// Respack zip archives to load, in priority order.
    #[arg(long = "respack", required = true)]
    respacks: Vec<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List songs and images in the loaded respacks.
    List,
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a video (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Song name from a respack song catalogue.
    #[arg(long)]
    song: String,

    /// Time of the frame in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 1280)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// RNG seed for reproducible color/image picks.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Song name from a respack song catalogue.
    #[arg(long)]
    song: String,

    /// Output duration in seconds.
    #[arg(long)]
    seconds: f64,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 1280)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Frame rate numerator (default NTSC film, 24000/1001).
    #[arg(long, default_value_t = 24_000)]
    fps_num: u32,
    /// Frame rate denominator.
    #[arg(long, default_value_t = 1_001)]
    fps_den: u32,

    /// RNG seed for reproducible color/image picks.
    #[arg(long)]
    seed: Option<u64>,

    /// Mux the song audio into the output.
    #[arg(long, default_value_t = true)]
    audio: bool,

    /// Overwrite the output if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let resources = Resources::load(&cli.respacks)?;

    match cli.cmd {
        Command::List => cmd_list(&resources),
        Command::Frame(args) => cmd_frame(resources, args),
        Command::Render(args) => cmd_render(resources, args),
    }
}

fn cmd_list(resources: &Resources) -> anyhow::Result<()> {
    println!("songs:");
    for name in resources.list_songs() {
        println!("  {name}");
    }
    println!("images:");
    for name in resources.list_images() {
        println!("  {name}");
    }
    Ok(())
}

fn cmd_frame(resources: Resources, args: FrameArgs) -> anyhow::Result<()> {
    let canvas = Canvas {
        width: args.width,
        height: args.height,
    };
    let mut session = Session::open(resources, &args.song, canvas, args.seed)?;

    let mut surface = Surface::new(canvas);
    session.render_frame(args.time, &mut surface)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        surface.data(),
        surface.width(),
        surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(resources: Resources, args: RenderArgs) -> anyhow::Result<()> {
    let canvas = Canvas {
        width: args.width,
        height: args.height,
    };
    let mut session = Session::open(resources, &args.song, canvas, args.seed)?;

    let mut cfg: EncodeConfig = default_video_config(&args.out, args.width, args.height);
    cfg.fps = Fps::new(args.fps_num, args.fps_den)?;
    cfg.overwrite = args.overwrite;
    if args.audio
        && let Some((loop_path, buildup_path)) = session.media_paths()
    {
        cfg.audio = Some(AudioInputConfig {
            loop_path: loop_path.to_path_buf(),
            buildup_path: buildup_path.map(|p| p.to_path_buf()),
        });
    }

    let stats = render_to_video(&mut session, cfg, args.seconds)?;
    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames_total);
    Ok(())
}
