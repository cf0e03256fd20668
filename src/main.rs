use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use tracing::{info, warn, Level};

use motion_fx::{
    config::Config,
    detect::SimulatedDetector,
    effects::EffectId,
    video::{CaptureSource, FrameEvent, FrameLoop, SyntheticCapture},
};

#[derive(Parser)]
#[command(
    name = "motion-fx",
    version,
    about = "Apply real-time landmark-driven effects to a live video stream",
    long_about = "Motion-FX captures a live video stream, runs landmark detection per frame, and applies a composable set of visual effects keyed on the detected geometry. Processed frames can be recorded as a numbered PNG sequence and the last frame exported as a screenshot."
)]
struct Cli {
    /// Camera device index
    #[arg(short, long, default_value_t = 0)]
    device: u32,

    /// Effects to enable at startup (comma separated, e.g. glitch,rainbow,face-mask)
    #[arg(short, long, value_delimiter = ',')]
    effects: Vec<String>,

    /// Use the synthetic test-pattern source instead of a camera
    #[arg(long)]
    synthetic: bool,

    /// Record processed frames into this directory
    #[arg(short, long)]
    record: Option<PathBuf>,

    /// Stop after this many seconds
    #[arg(long, default_value_t = 10.0)]
    duration: f64,

    /// Save the last processed frame here on exit
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Starting Motion-FX v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    config.capture.device_index = cli.device;
    config.validate()?;

    let capture = open_capture(&cli, &config)?;
    let detector = Box::new(SimulatedDetector::new());

    let mut frame_loop = FrameLoop::spawn(
        capture,
        detector,
        config.recording.params.clone(),
        config.overlay.clone(),
    )?;
    let handle = frame_loop.handle();

    // Enable the requested effects
    for name in &cli.effects {
        match EffectId::from_cli_name(name) {
            Some(id) => {
                info!("Enabling effect: {}", id.label());
                handle.set_effect_enabled(id, true);
            }
            None => warn!("Unknown effect '{}', skipping", name),
        }
    }

    if let Some(dir) = &cli.record {
        handle.start_recording(dir.clone());
    }

    // Consume events until the deadline
    let deadline = Instant::now() + Duration::from_secs_f64(cli.duration);
    let mut last_frame = None;
    let mut frame_count = 0u64;
    while Instant::now() < deadline {
        match frame_loop.events().recv_timeout(Duration::from_millis(250)) {
            Ok(FrameEvent::Frame(frame)) => {
                frame_count += 1;
                last_frame = Some(frame);
            }
            Ok(FrameEvent::RecordingState(recording)) => {
                info!(
                    "Recording {}",
                    if recording { "started" } else { "stopped" }
                );
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    handle.stop_recording();
    frame_loop.stop();
    info!("Processed {} frames", frame_count);

    // Screenshot export reads the last published frame
    if let (Some(path), Some(frame)) = (&cli.screenshot, &last_frame) {
        frame.save_png(path)?;
        info!("Screenshot saved to {:?}", path);
    }

    Ok(())
}

fn open_capture(cli: &Cli, config: &Config) -> Result<Box<dyn CaptureSource>> {
    if cli.synthetic {
        info!("Using synthetic test-pattern source");
        return Ok(Box::new(SyntheticCapture::paced(
            config.capture.width,
            config.capture.height,
            config.capture.fps,
        )));
    }

    #[cfg(feature = "camera")]
    {
        let capture = motion_fx::video::CameraCapture::open(
            config.capture.device_index,
            config.capture.width,
            config.capture.height,
            config.capture.fps,
        )?;
        Ok(Box::new(capture))
    }

    #[cfg(not(feature = "camera"))]
    {
        anyhow::bail!("Built without the `camera` feature; rerun with --synthetic")
    }
}
