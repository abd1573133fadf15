//! Example: Score a single recorded pose track
//!
//! Usage:
//!   cargo run --example analyze_file -- <track.json> [shot type]
//!
//! The track is a JSON recording of pose-estimator output (see
//! `shotform::PoseTrack`). Set `RUST_LOG=debug` to follow the pipeline.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use shotform::{analyze_shot, AnalysisConfig, LandmarkSource, PoseTrack, ReplayBackend, ShotType, TrackVideo};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args.next().ok_or("Usage: analyze_file <track.json> [shot type]")?;
    let shot_type = args
        .next()
        .map(|hint| ShotType::from_hint(&hint))
        .unwrap_or_default();

    let track = Arc::new(PoseTrack::from_reader(BufReader::new(File::open(&path)?))?);
    let mut video = TrackVideo::new(Arc::clone(&track));
    let mut source = LandmarkSource::new(ReplayBackend::new(track));

    let config = AnalysisConfig::for_shot_type(shot_type);
    let result = analyze_shot(&mut video, &mut source, &config)?;

    println!("Analysis Results ({}):", shot_type.label());
    if result.is_invalid {
        println!("  Could not analyze: {}", result.message_if_invalid.as_deref().unwrap_or("unknown reason"));
        println!("  Frames: {}/{}", result.processed_frames, result.total_frames);
        return Ok(());
    }

    println!("  Score: {} (next target: {})", result.score, result.target_score);
    println!("  Frames: {}/{} ({} valid)", result.processed_frames, result.total_frames, result.metadata.valid_frames);
    println!("  Metrics:");
    for (key, value) in result.metrics.iter() {
        println!("    {:<20} {:.2}", key.display_name(), value);
    }
    println!("  Strengths:");
    for strength in &result.strengths {
        println!("    - {}", strength);
    }
    if !result.improvements.is_empty() {
        println!("  Improvements:");
        for improvement in &result.improvements {
            println!("    - {}", improvement);
        }
    }
    if let Some(tip) = &result.coach_tip {
        println!("  Coach tip: {}", tip);
    }

    Ok(())
}
