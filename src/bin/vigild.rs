//! vigild - surveillance control-core daemon
//!
//! This daemon:
//! 1. Pulls per-frame detections from the configured detector (stub source
//!    when no inference engine is attached)
//! 2. Updates the live track set via greedy IoU association
//! 3. Evaluates zone membership and assembles the frame's event batch
//! 4. Dispatches the batch to the configured webhooks, cooldown-gated
//!
//! Video capture, decoding, and rendering live outside this binary; the
//! stub detector stands in for the capture+inference pair.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use vigil_core::{
    Alerter, Detector, EventPipeline, IouTracker, StubDetector, VigilConfig, ZoneManager,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the tracking/zone/alert control loop")]
struct Args {
    /// Path to the JSON config file.
    #[arg(long, env = "VIGIL_CONFIG")]
    config: Option<PathBuf>,

    /// Target frame rate.
    #[arg(long, default_value_t = 10)]
    fps: u32,

    /// Frame width in pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Stop after this many frames (run forever when omitted).
    #[arg(long)]
    frames: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => VigilConfig::load_from(path)?,
        None => VigilConfig::load()?,
    };

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
    }

    let mut detector = StubDetector::new(args.width, args.height);
    let mut tracker = IouTracker::new(cfg.tracker.max_age, cfg.tracker.iou_match_threshold);
    let pipeline = EventPipeline::new(
        ZoneManager::new(cfg.zones.clone()),
        cfg.alerting.target_classes.clone(),
    );
    let mut alerter = Alerter::new(&cfg.alerting);

    log::info!(
        "vigild running: detector={} zones={} webhooks={} alerting={}",
        detector.name(),
        pipeline.zone_manager().zones().len(),
        cfg.alerting.webhooks.len(),
        if cfg.alerting.enabled { "on" } else { "off" }
    );

    let frame_interval = Duration::from_millis(1000 / args.fps.max(1) as u64);
    let mut last_health_log = Instant::now();
    let mut frame_count = 0u64;
    let mut event_count = 0u64;

    while running.load(Ordering::SeqCst) {
        if let Some(limit) = args.frames {
            if frame_count >= limit {
                break;
            }
        }

        let detections = detector.detect()?;
        let tracks = tracker.update(&detections);
        let events = pipeline.assemble(tracks, &detector, args.width, args.height);

        for event in &events {
            event_count += 1;
            log::info!(
                "event #{}: {}#{} in {:?}",
                event_count,
                event.label,
                event.track,
                event.zones
            );
        }
        log::debug!(
            "frame {}: {} detections, {} tracks, {} events",
            frame_count,
            detections.len(),
            tracks.len(),
            events.len()
        );

        if alerter.maybe_alert(&events)? {
            log::info!(
                "alert batch dispatched: {} events to {} webhooks",
                events.len(),
                cfg.alerting.webhooks.len()
            );
        }

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            log::info!("health: frames={} events={}", frame_count, event_count);
            last_health_log = Instant::now();
        }

        frame_count += 1;
        std::thread::sleep(frame_interval);
    }

    log::info!("vigild stopped after {} frames", frame_count);
    Ok(())
}
