use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use qrtrust::application::dto::VerificationOutcome;
use qrtrust::domain::repositories::FrameConstraints;
use qrtrust::infrastructure::phishtank::{PhishTankClient, PhishTankConfig};
use qrtrust::infrastructure::replay::{ReplayCamera, ReplayDecoder};
use qrtrust::presentation::cli::{print_outcome, print_stats, Cli, Commands};
use qrtrust::{DecodedPayload, ReputationVerdictResolver, ScanAndVerifyUseCase, ScanSessionController};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.debug);

    let config = PhishTankConfig::from_env().context("Invalid configuration")?;
    let transport = PhishTankClient::new(config).context("Failed to build HTTP client")?;

    match cli.command {
        Commands::Check { url } => {
            let resolver = ReputationVerdictResolver::new(transport);
            let verdict = resolver.check(&url).await;
            let outcome = VerificationOutcome::new(DecodedPayload::new(url), verdict);
            print_outcome(&outcome, cli.json)?;
        }
        Commands::Replay {
            frames,
            interval_ms,
            width,
            height,
        } => {
            let constraints = FrameConstraints::default().with_resolution(width, height);
            run_replay(&frames, interval_ms, &constraints, transport, cli.json).await?;
        }
    }

    Ok(())
}

async fn run_replay(
    frames: &Path,
    interval_ms: u64,
    constraints: &FrameConstraints,
    transport: PhishTankClient,
    json: bool,
) -> Result<()> {
    let camera = ReplayCamera::from_path(frames)
        .with_context(|| format!("Failed to load frame log: {:?}", frames))?;
    let decoder = ReplayDecoder::new().with_frame_interval(Duration::from_millis(interval_ms));

    if !json {
        println!(
            "{} {} frames from {:?}",
            style("Scanning").cyan(),
            camera.frame_count(),
            frames
        );
    }

    let use_case = ScanAndVerifyUseCase::new(
        ScanSessionController::new(camera, decoder),
        ReputationVerdictResolver::new(transport),
    );

    let outcome = use_case.execute(constraints).await;
    let stats = use_case.controller().session().stats();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            if !json {
                print_stats(&stats);
            }
            return Err(e);
        }
    };

    print_outcome(&outcome, json)?;
    if !json {
        print_stats(&stats);
    }

    Ok(())
}

fn init_tracing(verbose: bool, debug: bool) {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("qrtrust={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
