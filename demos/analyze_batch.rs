//! Example: Score multiple recorded pose tracks in parallel
//!
//! Usage:
//!   cargo run --release --example analyze_batch -- [--jobs N] [--json] [--shot-type T] <track1.json> <track2.json> ...
//!
//! Notes:
//! - Parallelism is across files (batch-level). Each analysis is still sequential.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.

use rayon::prelude::*;
use shotform::{
    analyze_shot, AnalysisConfig, AnalysisResult, LandmarkSource, PoseTrack, ReplayBackend, ShotRecord, ShotType,
    TrackVideo,
};
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Instant;

fn analyze_track_file(path: &str, config: &AnalysisConfig) -> Result<AnalysisResult, Box<dyn std::error::Error>> {
    let track = Arc::new(PoseTrack::from_reader(BufReader::new(File::open(path)?))?);
    let mut video = TrackVideo::new(Arc::clone(&track));
    let mut source = LandmarkSource::new(ReplayBackend::new(track));
    Ok(analyze_shot(&mut video, &mut source, config)?)
}

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn percentile(mut xs: Vec<f32>, p: f32) -> Option<f32> {
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((xs.len() - 1) as f32 * p.clamp(0.0, 1.0)).round() as usize;
    Some(xs[idx.min(xs.len() - 1)])
}

struct ItemOut {
    path: String,
    result: Result<AnalysisResult, String>,
    processing_ms: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut shot_type = ShotType::default();
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--shot-type" => {
                let v = args.first().ok_or("--shot-type requires a value")?;
                shot_type = ShotType::from_hint(v);
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_batch [--jobs N] [--json] [--shot-type T] <track1.json> <track2.json> ...\n\
                     \n\
                     --jobs N         Parallel workers (default: CPU-1)\n\
                     --json           Emit one JSON shot record per line (JSONL)\n\
                     --shot-type T    Shot type hint, e.g. \"free throw\" (default: jump shot)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one pose track path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}, shot type={}", paths.len(), jobs, shot_type.label());

    let config = AnalysisConfig::for_shot_type(shot_type);

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<ItemOut> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let start = Instant::now();
                let result = analyze_track_file(path, &config).map_err(|e| e.to_string());
                ItemOut {
                    path: path.clone(),
                    result,
                    processing_ms: start.elapsed().as_secs_f32() * 1000.0,
                }
            })
            .collect()
    });

    for (idx, o) in outs.iter().enumerate() {
        match (&o.result, json) {
            (Ok(res), true) => {
                let record = ShotRecord::new(shot_type.label(), serde_json::json!({ "file": o.path }), res.clone());
                println!("{}", record.to_json()?);
            }
            (Err(e), true) => {
                println!("{}", serde_json::json!({ "file": o.path, "error": e }));
            }
            (Ok(res), false) if res.is_invalid => {
                println!(
                    "[{}/{}] {}: INVALID: {} time={:.2}ms",
                    idx + 1,
                    outs.len(),
                    o.path,
                    res.message_if_invalid.as_deref().unwrap_or("unknown reason"),
                    o.processing_ms
                );
            }
            (Ok(res), false) => {
                println!(
                    "[{}/{}] {}: score={} target={} findings={} time={:.2}ms",
                    idx + 1,
                    outs.len(),
                    o.path,
                    res.score,
                    res.target_score,
                    res.findings.len(),
                    o.processing_ms
                );
            }
            (Err(e), false) => {
                println!("[{}/{}] {}: ERROR: {}", idx + 1, outs.len(), o.path, e);
            }
        }
    }

    let ok_times: Vec<f32> = outs.iter().filter(|o| o.result.is_ok()).map(|o| o.processing_ms).collect();
    let scored = outs
        .iter()
        .filter(|o| matches!(&o.result, Ok(r) if !r.is_invalid))
        .count();
    let wall_ms = t0.elapsed().as_secs_f64() * 1000.0;

    eprintln!(
        "Done: ok={}/{} scored={} wall={:.0}ms",
        ok_times.len(),
        outs.len(),
        scored,
        wall_ms
    );
    if !ok_times.is_empty() {
        let mean = ok_times.iter().sum::<f32>() / ok_times.len() as f32;
        let p50 = percentile(ok_times.clone(), 0.50).unwrap_or(mean);
        let p90 = percentile(ok_times.clone(), 0.90).unwrap_or(mean);
        eprintln!("processing_time_ms: mean={:.2} p50={:.2} p90={:.2}", mean, p50, p90);
    }

    Ok(())
}
