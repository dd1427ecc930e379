use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use homeshot::{
    BatchConfig, BatchRenderer, FileFormat, HomeScene, JobEvent, JobStatus, LocalFs,
    OutputFormat, SceneDocument, SoftwareView, SupersampledRenderer, Viewpoint,
    existing_destinations, write_frame,
};

#[derive(Parser, Debug)]
#[command(name = "homeshot", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render stored viewpoints of a scene into image files.
    Render(RenderArgs),
    /// Render a transparent PNG icon from one viewpoint.
    Icon(IconArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Batch config JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Photo width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Photo height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Quality level (0-3).
    #[arg(long)]
    quality: Option<u8>,

    /// Output format: png or jpeg.
    #[arg(long)]
    format: Option<FileFormat>,

    /// JPEG compression quality in (0, 1].
    #[arg(long)]
    jpeg_quality: Option<f32>,

    /// Render only these viewpoints (repeatable); default is all.
    #[arg(long = "viewpoint")]
    viewpoints: Vec<String>,

    /// Replace files that already exist.
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

#[derive(Parser, Debug)]
struct IconArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Viewpoint name; defaults to the first stored viewpoint.
    #[arg(long)]
    viewpoint: Option<String>,

    /// Icon edge length in pixels.
    #[arg(long, default_value_t = 128)]
    size: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Icon(args) => cmd_icon(args),
    }
}

fn pick_viewpoints(scene: &HomeScene, names: &[String]) -> anyhow::Result<Vec<Viewpoint>> {
    if names.is_empty() {
        anyhow::ensure!(
            !scene.viewpoints().is_empty(),
            "scene '{}' has no stored viewpoints",
            scene.name()
        );
        return Ok(scene.viewpoints().to_vec());
    }
    names
        .iter()
        .map(|n| {
            scene
                .viewpoint(n)
                .cloned()
                .with_context(|| format!("no viewpoint named '{n}'"))
        })
        .collect()
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = HomeScene::from_path(&args.scene)
        .with_context(|| format!("load scene '{}'", args.scene.display()))?;

    let mut cfg = match &args.config {
        Some(p) => BatchConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => BatchConfig::default(),
    };
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    if let Some(q) = args.quality {
        cfg.quality = q;
    }
    if let Some(f) = args.format {
        cfg.format = f;
        if f == FileFormat::Png {
            cfg.compression_quality = None;
        }
    }
    if let Some(q) = args.jpeg_quality {
        cfg.compression_quality = Some(q);
    }
    cfg.validate()?;

    let viewpoints = pick_viewpoints(&scene, &args.viewpoints)?;
    let request = cfg.request_for(scene.name(), &viewpoints, &args.out_dir)?;

    let fs = Arc::new(LocalFs);
    let destinations: Vec<PathBuf> = request
        .targets
        .iter()
        .map(|t| t.destination.clone())
        .collect();
    let existing = existing_destinations(fs.as_ref(), &destinations);
    if let Some(first) = existing.first() {
        anyhow::ensure!(
            args.overwrite,
            "{} output file(s) already exist (first: '{}'); pass --overwrite to replace them",
            existing.len(),
            first.display()
        );
    }

    let size = cfg.photo_size();
    let view = SoftwareView::new(size.width(), size.height())?;
    let renderer = BatchRenderer::new(fs)
        .with_offscreen_view(view)
        .with_physical_renderer(SupersampledRenderer::default())
        .with_opts(cfg.batch_opts());

    let handle = renderer.submit(&scene, request)?;
    for event in handle.events() {
        match event {
            JobEvent::Progress { index, total, path } => {
                eprintln!("[{}/{}] wrote {}", index + 1, total, path.display());
            }
            _ => break,
        }
    }

    let outcome = handle.wait()?;
    match outcome.status {
        JobStatus::Completed => {
            eprintln!("rendered {} viewpoint(s)", outcome.written.len());
            Ok(())
        }
        JobStatus::Cancelled => {
            eprintln!("cancelled after {} viewpoint(s)", outcome.written.len());
            Ok(())
        }
        _ => match outcome.error {
            Some(err) => Err(anyhow::anyhow!("batch render failed: {err}")),
            None => Err(anyhow::anyhow!("batch render ended in {:?}", outcome.status)),
        },
    }
}

fn cmd_icon(args: IconArgs) -> anyhow::Result<()> {
    let scene = HomeScene::from_path(&args.scene)
        .with_context(|| format!("load scene '{}'", args.scene.display()))?;
    let names: Vec<String> = args.viewpoint.into_iter().collect();
    let viewpoint = pick_viewpoints(&scene, &names)?
        .into_iter()
        .next()
        .context("no viewpoint to render")?;

    let view = SoftwareView::new(args.size.max(1), args.size.max(1))?;
    let renderer = BatchRenderer::new(Arc::new(LocalFs)).with_offscreen_view(view);
    let icon = renderer.generate_icon(&scene, &viewpoint, args.size)?;

    write_frame(&LocalFs, &icon, &args.out, &OutputFormat::png())
        .with_context(|| format!("write icon '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
