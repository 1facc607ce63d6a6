//! aruco-servo CLI: run the servo node, print printable markers, inspect
//! dictionaries and configuration.

use aruco_servo::{CameraSource, MarkerDictionary, MarkerLostPolicy, ServoConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "aruco-servo")]
#[command(about = "Center an ArUco marker vertically by publishing bang-bang velocity commands")]
#[command(version)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,

    /// Emit JSON log records instead of text.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the servo: one detection-to-command cycle per pose event.
    Run(RunArgs),

    /// Write (and optionally show) a printable marker image.
    Generate(GenerateArgs),

    /// List the supported marker dictionaries.
    Dictionaries,

    /// Print the default configuration as JSON.
    DefaultConfig {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TransportArg {
    /// JSON-lines pose events on stdin, commands on stdout.
    Stdio,
    /// ROS 2 topics from the configuration.
    Ros,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MarkerLostArg {
    Stop,
    Legacy,
}

impl From<MarkerLostArg> for MarkerLostPolicy {
    fn from(value: MarkerLostArg) -> Self {
        match value {
            MarkerLostArg::Stop => MarkerLostPolicy::Stop,
            MarkerLostArg::Legacy => MarkerLostPolicy::Legacy,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Marker dictionary, e.g. DICT_5X5_100.
    #[arg(long)]
    dictionary: Option<MarkerDictionary>,

    /// Camera device index.
    #[arg(long, conflicts_with = "video")]
    camera: Option<i32>,

    /// Replay a video file instead of a live camera.
    #[arg(long)]
    video: Option<PathBuf>,

    /// Fixed magnitude of every non-zero command.
    #[arg(long, allow_negative_numbers = true)]
    magnitude: Option<f64>,

    /// Behavior when no marker is visible.
    #[arg(long, value_enum)]
    marker_lost: Option<MarkerLostArg>,

    /// Do not open the debug window.
    #[arg(long)]
    no_display: bool,

    #[arg(long, value_enum, default_value_t = TransportArg::Stdio)]
    transport: TransportArg,
}

impl RunArgs {
    /// Load the config file (or defaults), apply overrides and validate.
    fn to_config(&self) -> CliResult<ServoConfig> {
        let mut cfg = match &self.config {
            Some(path) => ServoConfig::load_json(path)?,
            None => ServoConfig::default(),
        };
        if let Some(dictionary) = self.dictionary {
            cfg.dictionary = dictionary;
        }
        if let Some(index) = self.camera {
            cfg.camera = CameraSource::Device(index);
        }
        if let Some(path) = &self.video {
            cfg.camera = CameraSource::File(path.clone());
        }
        if let Some(magnitude) = self.magnitude {
            cfg.command_magnitude = magnitude;
        }
        if let Some(policy) = self.marker_lost {
            cfg.marker_lost = policy.into();
        }
        if self.no_display {
            cfg.display.enabled = false;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Args)]
#[cfg_attr(not(feature = "opencv"), allow(dead_code))]
struct GenerateArgs {
    #[arg(long, default_value_t = MarkerDictionary::default())]
    dictionary: MarkerDictionary,

    /// Marker id inside the dictionary.
    #[arg(long, default_value_t = 1)]
    id: i32,

    /// Image side in pixels.
    #[arg(long, default_value_t = 250)]
    size: i32,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Show the marker until a key is pressed.
    #[arg(long)]
    show: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = init_logging(&cli).and_then(|()| match cli.command {
        Commands::Run(args) => run_servo(&args),
        Commands::Generate(args) => run_generate(&args),
        Commands::Dictionaries => run_dictionaries(),
        Commands::DefaultConfig { out } => run_default_config(out),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> CliResult<()> {
    aruco_servo::core::init_tracing(cli.log_level, cli.log_json);
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> CliResult<()> {
    aruco_servo::core::init_with_level(cli.log_level)?;
    Ok(())
}

// ── run ────────────────────────────────────────────────────────────────

fn run_servo(args: &RunArgs) -> CliResult<()> {
    let cfg = args.to_config()?;
    log::debug!("effective config: {}", serde_json::to_string(&cfg)?);
    serve(&cfg, args.transport)
}

#[cfg(feature = "opencv")]
fn serve(cfg: &ServoConfig, transport: TransportArg) -> CliResult<()> {
    use aruco_servo::{node, JsonLinesEvents, JsonLinesSink};

    let stats = match transport {
        TransportArg::Stdio => {
            let mut events = JsonLinesEvents::new(std::io::stdin().lock());
            node::run_node(cfg, &mut events, JsonLinesSink::new(std::io::stdout()))?
        }
        TransportArg::Ros => serve_ros(cfg)?,
    };
    log::info!(
        "served {} events: {} published, {} aborted, {} skipped",
        stats.events,
        stats.published,
        stats.aborted,
        stats.no_frame + stats.failed
    );
    Ok(())
}

#[cfg(not(feature = "opencv"))]
fn serve(_cfg: &ServoConfig, _transport: TransportArg) -> CliResult<()> {
    Err("`run` needs a camera backend; rebuild with `--features opencv`".into())
}

#[cfg(all(feature = "opencv", feature = "ros2"))]
fn serve_ros(cfg: &ServoConfig) -> CliResult<aruco_servo::LoopStats> {
    let (mut events, sink) = aruco_servo::ros::open(&cfg.topics)?;
    Ok(aruco_servo::node::run_node(cfg, &mut events, sink)?)
}

#[cfg(all(feature = "opencv", not(feature = "ros2")))]
fn serve_ros(_cfg: &ServoConfig) -> CliResult<aruco_servo::LoopStats> {
    Err("`--transport ros` needs the `ros2` feature".into())
}

// ── generate ───────────────────────────────────────────────────────────

#[cfg(feature = "opencv")]
fn run_generate(args: &GenerateArgs) -> CliResult<()> {
    use aruco_servo::opencv::generate;

    if args.show {
        let img = generate::render_marker(args.dictionary, args.id, args.size)?;
        generate::show_marker(&generate::marker_file_name(args.dictionary, args.id), &img)?;
    }
    let path = generate::write_marker(&args.out_dir, args.dictionary, args.id, args.size)?;
    println!("{}", path.display());
    Ok(())
}

#[cfg(not(feature = "opencv"))]
fn run_generate(args: &GenerateArgs) -> CliResult<()> {
    if !args.dictionary.contains_id(args.id) {
        return Err(format!("marker id {} is outside {}", args.id, args.dictionary).into());
    }
    Err("`generate` needs the OpenCV backend; rebuild with `--features opencv`".into())
}

// ── dictionaries ───────────────────────────────────────────────────────

fn run_dictionaries() -> CliResult<()> {
    println!("{:<22} {:>5} {:>6}", "name", "bits", "ids");
    for dict in MarkerDictionary::ALL {
        let info = dict.info();
        println!(
            "{:<22} {:>5} {:>6}",
            info.name,
            format!("{0}x{0}", info.marker_size),
            info.capacity
        );
    }
    Ok(())
}

// ── default-config ─────────────────────────────────────────────────────

fn run_default_config(out: Option<PathBuf>) -> CliResult<()> {
    let cfg = ServoConfig::default();
    match out {
        Some(path) => {
            cfg.write_json(&path)?;
            log::info!("default config written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&cfg)?),
    }
    Ok(())
}
