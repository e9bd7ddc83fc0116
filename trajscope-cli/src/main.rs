use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use trajscope::{
    CancelToken, ExportConfig, ExportController, ExportResult, Font, InvariantGuard, LoadedRun,
    Preferences, Progress, RenderOptions, SequenceMode, Validator,
};

#[derive(Parser, Debug)]
#[command(name = "trajscope", version)]
struct Cli {
    /// JSON file with default width/height/fps/duration.
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// TTF/OTF font used for labels and overlays (text is skipped without one).
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a run file and print its diagnosis.
    Validate {
        /// Run JSON.
        file: PathBuf,
    },
    /// Render one frame as a PNG.
    Still(StillArgs),
    /// Render a numbered PNG sequence into a directory.
    Sequence(SequenceArgs),
    /// Render two runs side by side at the same time.
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Output width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Hide evaluator, metrics, eigen and annotation overlays.
    #[arg(long, default_value_t = false)]
    no_overlays: bool,
}

#[derive(Args, Debug)]
struct StillArgs {
    /// Run JSON.
    file: PathBuf,

    /// Normalized time in [0, 1].
    #[arg(long, default_value_t = 1.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Label drawn in the top-left corner.
    #[arg(long)]
    label: Option<String>,

    #[command(flatten)]
    frame: FrameArgs,
}

#[derive(Args, Debug)]
struct SequenceArgs {
    /// Run JSON.
    file: PathBuf,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Duration in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Render on a pool of this many workers.
    #[arg(long)]
    workers: Option<usize>,

    /// Request cancellation once this many frames have been written.
    #[arg(long)]
    cancel_after: Option<u64>,

    /// Print the export result as JSON on stdout.
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(flatten)]
    frame: FrameArgs,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Left run JSON.
    left: PathBuf,

    /// Right run JSON.
    right: PathBuf,

    /// Normalized time shared by both panels.
    #[arg(long, default_value_t = 1.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    frame: FrameArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context::new(&cli)?;
    tracing::debug!(command = ?cli.cmd, font = ctx.font.is_some(), "dispatching");
    match cli.cmd {
        Command::Validate { file } => cmd_validate(&ctx, &file),
        Command::Still(args) => cmd_still(&ctx, args),
        Command::Sequence(args) => cmd_sequence(&ctx, args),
        Command::Compare(args) => cmd_compare(&ctx, args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Shared state resolved from the global flags.
struct Context {
    guard: Arc<InvariantGuard>,
    prefs: Preferences,
    font: Option<Font>,
    validator: Validator,
}

impl Context {
    fn new(cli: &Cli) -> anyhow::Result<Self> {
        let prefs = match &cli.prefs {
            Some(p) => Preferences::from_path(p)
                .with_context(|| format!("read preferences '{}'", p.display()))?,
            None => Preferences::default(),
        };
        let font = match &cli.font {
            Some(p) => Some(
                Font::from_path(p).with_context(|| format!("read font '{}'", p.display()))?,
            ),
            None => None,
        };
        Ok(Self {
            guard: Arc::new(InvariantGuard::new()),
            prefs,
            font,
            validator: Validator::default(),
        })
    }

    fn load(&self, path: &Path) -> anyhow::Result<LoadedRun> {
        match self.validator.validate_path(path, &self.guard) {
            Ok(loaded) => {
                tracing::info!(
                    path = %path.display(),
                    timesteps = loaded.run.trajectory().len(),
                    warnings = loaded.warnings.len(),
                    "run loaded"
                );
                for w in &loaded.warnings {
                    eprintln!("warning: {w}");
                }
                Ok(loaded)
            }
            Err(failure) => {
                print_failure(&failure);
                Err(failure).with_context(|| format!("load run '{}'", path.display()))
            }
        }
    }

    fn options(&self, frame: &FrameArgs) -> RenderOptions {
        let mut opts = self.prefs.apply(&RenderOptions::default());
        if let Some(w) = frame.width {
            opts.width = w;
        }
        if let Some(h) = frame.height {
            opts.height = h;
        }
        if frame.no_overlays {
            opts = opts.with_overlays(false);
        }
        opts
    }

    fn controller(&self, config: ExportConfig) -> ExportController {
        let controller = ExportController::new(Arc::clone(&self.guard), config);
        match &self.font {
            Some(font) => controller.with_font(font.clone()),
            None => controller,
        }
    }
}

fn print_failure(failure: &trajscope::LoadFailure) {
    eprintln!("{}", failure.title);
    eprintln!("  {}", failure.message);
    for s in &failure.suggestions {
        eprintln!("  - {s}");
    }
}

fn cmd_validate(ctx: &Context, file: &Path) -> anyhow::Result<()> {
    let loaded = ctx.load(file)?;
    let run = &loaded.run;
    println!(
        "ok: {} ({} timesteps, {} eigen snapshots, {} scalar series, {} evaluators)",
        run.metadata().display_name(),
        run.trajectory().len(),
        run.geometry().len(),
        run.scalars().len(),
        run.evaluators().len()
    );
    Ok(())
}

fn finish(result: ExportResult) -> anyhow::Result<()> {
    if let Some(w) = result.warning() {
        eprintln!("warning: {w}");
    }
    match result {
        ExportResult::Succeeded { output, .. } => {
            for p in output.paths() {
                eprintln!("wrote {}", p.display());
            }
            Ok(())
        }
        ExportResult::Cancelled => {
            eprintln!("cancelled");
            Ok(())
        }
        ExportResult::Failed { message } => anyhow::bail!("export failed: {message}"),
    }
}

fn cmd_still(ctx: &Context, args: StillArgs) -> anyhow::Result<()> {
    let loaded = ctx.load(&args.file)?;
    let mut opts = ctx.options(&args.frame);
    if let Some(label) = args.label {
        opts = opts.with_label(label);
    }
    let controller = ctx.controller(ExportConfig::from_env());
    finish(controller.export_still(&loaded.run, args.time, &args.out, Some(&opts), None))
}

fn cmd_sequence(ctx: &Context, args: SequenceArgs) -> anyhow::Result<()> {
    let loaded = ctx.load(&args.file)?;
    let base = ctx.options(&args.frame);
    let opts = base.with_timing(
        args.fps.unwrap_or(base.fps),
        args.duration.unwrap_or(base.duration_secs),
    );

    let mut config = ExportConfig::from_env();
    if let Some(workers) = args.workers {
        config.sequence_mode = SequenceMode::Parallel { workers };
    }
    let controller = ctx.controller(config);

    let token = CancelToken::new();
    let cancel_after = args.cancel_after;
    let mut report = |p: &Progress| {
        eprintln!(
            "[{:>3}%] {}/{} {}",
            p.percent, p.current_frame, p.total_frames, p.filename
        );
        if cancel_after.is_some_and(|n| p.current_frame >= n) {
            token.cancel();
        }
    };
    let result = controller.export_sequence(
        &loaded.run,
        &args.out_dir,
        Some(&opts),
        Some(&mut report),
        Some(&token),
    );

    if args.json {
        let text = serde_json::to_string_pretty(&result).context("serialize export result")?;
        println!("{text}");
    }
    finish(result)
}

fn cmd_compare(ctx: &Context, args: CompareArgs) -> anyhow::Result<()> {
    let left = ctx.load(&args.left)?;
    let right = ctx.load(&args.right)?;
    let opts = ctx.options(&args.frame);
    let controller = ctx.controller(ExportConfig::from_env());
    finish(controller.export_comparison(&left.run, &right.run, args.time, &args.out, Some(&opts)))
}
