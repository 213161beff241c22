//! # Danfo-quote CLI
//!
//! Command-line interface for the danfo-quote library.
//! Produces delivery distance and cost estimates between two addresses.

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use danfo_quote::{
    extract_state, suggest_state, BatchOptions, Coordinates, Gazetteer, Geocoder, QuoteEstimate,
    TransportType,
};
use log::{error, warn};

mod cli;

/// Command-line interface for danfo-quote
#[derive(Parser)]
#[command(name = "danfo-quote")]
#[command(about = "Delivery distance and cost estimator for Nigerian routes")]
#[command(long_about = "Estimates delivery distance and cost between two addresses:
  danfo-quote \"Ikeja, Lagos\" \"Kano\"                # Heuristic estimate, truck
  danfo-quote \"Lekki\" \"Abuja\" -t van --json        # JSON output, van rates
  danfo-quote --offline \"Yaba, Lagos\" \"Ibadan\"     # Skip geocoding entirely
  danfo-quote --batch quotes.jsonl -o out.jsonl     # Bulk estimation

Addresses are matched against a built-in gazetteer of Nigerian states,
aliases and cities when geocoding is unavailable. Unresolvable addresses
block the cost estimate; make the address more specific and retry.")]
#[command(version = env!("DANFO_VERSION"))]
struct Cli {
    /// Origin address (free text)
    origin: Option<String>,

    /// Destination address (free text)
    destination: Option<String>,

    /// Cargo weight in kilograms
    #[arg(long, default_value_t = 100.0)]
    weight_kg: f64,

    /// Cargo volume in cubic meters
    #[arg(long, default_value_t = 1.0)]
    volume_m3: f64,

    /// Transport type: truck, van or motorcycle
    #[arg(short, long, default_value = "truck")]
    transport: String,

    /// Skip geocoding and estimate from state heuristics only
    #[arg(long)]
    offline: bool,

    /// Print the estimate as JSON instead of a breakdown table
    #[arg(long)]
    json: bool,

    /// Batch mode: estimate every JSON-lines quote request in this file
    #[arg(long)]
    batch: Option<String>,

    /// Output file for batch mode (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Geocode batch records too (slower, more precise)
    #[arg(long)]
    geocode: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("🚚 Danfo-quote v{} starting...", env!("DANFO_VERSION"));
    }

    if let Some(batch_path) = &cli.batch {
        return run_batch_mode(batch_path, cli.output.as_deref(), cli.geocode, cli.verbose).await;
    }

    let (Some(origin), Some(destination)) = (cli.origin.as_deref(), cli.destination.as_deref())
    else {
        eprintln!("❌ Error: origin and destination are required unless --batch is used");
        std::process::exit(1);
    };

    if cli.weight_kg <= 0.0 || cli.volume_m3 <= 0.0 {
        bail!("weight and volume must be positive");
    }
    let transport: TransportType = cli
        .transport
        .parse()
        .context("invalid --transport value")?;

    let estimate = if cli.offline {
        danfo_quote::quote(origin, destination, cli.weight_kg, cli.volume_m3, transport)
    } else {
        quote_online(
            origin,
            destination,
            cli.weight_kg,
            cli.volume_m3,
            transport,
            cli.verbose,
        )
        .await
    };

    if !estimate.distance.is_resolved() {
        report_unresolved(origin, destination);
        std::process::exit(1);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        print_estimate(&estimate, transport);
    }

    Ok(())
}

/// Estimate with a geocoding pre-step, degrading per endpoint on failure
async fn quote_online(
    origin: &str,
    destination: &str,
    weight_kg: f64,
    volume_m3: f64,
    transport: TransportType,
    verbose: bool,
) -> QuoteEstimate {
    let geocoder = Geocoder::new();
    let origin_coordinates = lookup_with_fallback(&geocoder, origin, verbose).await;
    let destination_coordinates = lookup_with_fallback(&geocoder, destination, verbose).await;

    let request = danfo_quote::QuoteRequest {
        origin: origin.to_string(),
        destination: destination.to_string(),
        weight_kg,
        volume_m3,
        transport,
    };
    danfo_quote::estimate_request(
        Gazetteer::nigeria(),
        &request,
        origin_coordinates,
        destination_coordinates,
    )
}

async fn lookup_with_fallback(
    geocoder: &Geocoder,
    address: &str,
    verbose: bool,
) -> Option<Coordinates> {
    match geocoder.lookup(address).await {
        Ok(Some(coordinates)) => {
            if verbose {
                eprintln!(
                    "📍 Geocoded '{address}' -> ({:.4}, {:.4})",
                    coordinates.lat, coordinates.lng
                );
            }
            Some(coordinates)
        }
        Ok(None) => {
            if verbose {
                eprintln!("📍 No geocoding result for '{address}', using state heuristics");
            }
            None
        }
        Err(e) => {
            warn!("geocoding '{address}' failed, using state heuristics: {e}");
            None
        }
    }
}

/// Explain an unresolved estimate and suggest likely corrections
fn report_unresolved(origin: &str, destination: &str) {
    eprintln!("❌ Could not estimate a distance between these addresses.");
    eprintln!("   Please enter a more specific address (street, city or state).");

    let gazetteer = Gazetteer::nigeria();
    for address in [origin, destination] {
        if extract_state(gazetteer, address).is_none() {
            if let Some(suggestion) = suggest_state(gazetteer, address) {
                eprintln!(
                    "💡 For '{address}', did you mean {} ({})?",
                    suggestion.matched_name, suggestion.state
                );
            }
        }
    }
}

/// Print a human-readable estimate with its cost breakdown
fn print_estimate(estimate: &QuoteEstimate, transport: TransportType) {
    println!("📦 {} → {}", estimate.origin, estimate.destination);
    println!(
        "   Distance: {:.0} km ({})",
        estimate.distance.distance_km, estimate.distance.source
    );

    if let Some(cost) = &estimate.cost {
        println!("   Breakdown:");
        println!(
            "     Base rate ({transport}):  {}",
            cli::format_naira(cost.base_rate.round() as u64)
        );
        println!(
            "     Distance:             {}",
            cli::format_naira(cost.distance_factor.round() as u64)
        );
        println!(
            "     Weight:               {}",
            cli::format_naira(cost.weight_factor.round() as u64)
        );
        println!(
            "     Volume:               {}",
            cli::format_naira(cost.volume_factor.round() as u64)
        );
        println!("     Multiplier:           ×{:.1}", cost.transport_multiplier);
        println!("💰 Total: {}", cli::format_naira(cost.total_cost));
    }
}

/// Run batch estimation with a progress bar
async fn run_batch_mode(
    input_path: &str,
    output_path: Option<&str>,
    geocode: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    if verbose {
        eprintln!("🧮 Batch estimating quotes from {input_path}");
    }

    let progress_manager = cli::ProgressManager::new(0, &format!("🧮 Estimating {input_path}"));

    let options = BatchOptions {
        geocode,
        progress: Some(Arc::new({
            let pb = progress_manager.pb.clone();
            move |completed, total| {
                if pb.length().unwrap_or(0) != total {
                    pb.set_length(total);
                }
                pb.set_position(completed);
                if completed >= total {
                    pb.finish_with_message("✅ Batch complete");
                }
            }
        })),
        ..Default::default()
    };

    let summary = danfo_quote::run_batch(Gazetteer::nigeria(), input_path, output_path, &options)
        .await
        .with_context(|| format!("batch estimation from {input_path} failed"))?;

    eprintln!(
        "✅ {} quotes estimated ({} resolved, {} unresolved)",
        summary.total, summary.resolved, summary.unresolved
    );

    Ok(())
}
