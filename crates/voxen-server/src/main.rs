use std::path::PathBuf;
use std::process;

use voxen_server::report;
use voxen_server::runner::SceneRunner;
use voxen_server::scenes;
use voxen_world::WorldConfig;

fn usage() {
    eprintln!("Usage: voxen-server [OPTIONS]");
    eprintln!("  --config <path>                World config (RON)");
    eprintln!("  --ticks <n>                    Ticks per scene (default: 120)");
    eprintln!("  --output <path>                Save current results as JSON baseline");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
}

/// Value following a flag, or exit with usage.
fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(value) => value,
        None => {
            eprintln!("Missing value for {flag}");
            usage();
            process::exit(1);
        }
    }
}

fn parse_or_exit<T: std::str::FromStr>(value: &str, flag: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {flag} value: {value}");
        process::exit(1);
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut tick_count = 120u32;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(PathBuf::from(flag_value(&args, i, "--config")));
            }
            "--baseline" => {
                i += 1;
                baseline_path = Some(PathBuf::from(flag_value(&args, i, "--baseline")));
            }
            "--output" => {
                i += 1;
                output_path = Some(PathBuf::from(flag_value(&args, i, "--output")));
            }
            "--regression-threshold" => {
                i += 1;
                regression_threshold = parse_or_exit(
                    flag_value(&args, i, "--regression-threshold"),
                    "--regression-threshold",
                );
            }
            "--ticks" => {
                i += 1;
                tick_count = parse_or_exit(flag_value(&args, i, "--ticks"), "--ticks");
            }
            "--help" | "-h" => {
                usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = match &config_path {
        Some(path) => WorldConfig::load(path).unwrap_or_else(|err| {
            eprintln!("ERROR: {err}");
            process::exit(1);
        }),
        None => WorldConfig::default(),
    };
    log::info!(
        "World seed {}, view distance {}, {} ticks per scene",
        config.seed,
        config.view_distance,
        tick_count
    );

    let runner = SceneRunner::new(config, tick_count);
    let mut results = Vec::new();
    for scene in &scenes::standard_scenes() {
        match runner.run_scene(scene) {
            Ok(result) => results.push(result),
            Err(err) => {
                eprintln!("ERROR: scene '{}' failed: {err}", scene.name);
                process::exit(1);
            }
        }
    }

    println!("\n## Server Tick Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: run_label(),
            results: results.clone(),
        };
        if let Err(err) = report::save_baseline(path, &baseline) {
            eprintln!("ERROR: failed to save baseline to {}: {err}", path.display());
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        let loaded = report::load_baseline(path).unwrap_or_else(|err| {
            eprintln!("ERROR: failed to load baseline {}: {err}", path.display());
            process::exit(1);
        });
        if let Some(baseline) = loaded {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Server run complete.");
}

/// Label for a saved baseline, seconds since the Unix epoch.
fn run_label() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("run-{secs}")
}
