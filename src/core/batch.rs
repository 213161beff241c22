//! Bulk estimation over JSON-lines quote requests
//!
//! Reads one quote request per line, optionally geocodes both endpoints
//! with bounded concurrency, and writes one estimate per line in input
//! order. Geocoding failures degrade to heuristic estimation rather than
//! aborting the batch; malformed input lines abort with the line number.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::cost::{calculate, DeliveryCostEstimate, DeliveryCostInput, TransportType};
use crate::core::distance::{
    AddressInput, Coordinates, DistanceEstimate, DistanceResolver,
};
use crate::core::error::{Error, Result};
use crate::core::gazetteer::Gazetteer;
use crate::core::geocode::{Geocoder, GeocoderConfig};

/// Progress callback receiving (completed, total) record counts
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Options for batch estimation runs
pub struct BatchOptions {
    /// Geocode both endpoints of every request before estimating.
    /// Off by default: bulk runs are the offline-estimation path.
    pub geocode: bool,

    /// Maximum number of requests processed at a time
    pub concurrency: usize,

    /// Optional progress callback
    pub progress: Option<ProgressCallback>,

    /// Geocoding endpoint used when `geocode` is set
    pub geocoder: GeocoderConfig,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            geocode: false,
            concurrency: num_cpus::get(),
            progress: None,
            geocoder: GeocoderConfig::default(),
        }
    }
}

/// One line of batch input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub origin: String,
    pub destination: String,
    pub weight_kg: f64,
    pub volume_m3: f64,
    pub transport: TransportType,
}

/// One line of batch output
///
/// `cost` is absent when the distance is unresolved; consumers must treat
/// such records as "needs a clearer address", not as free delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteEstimate {
    pub origin: String,
    pub destination: String,
    pub distance: DistanceEstimate,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<DeliveryCostEstimate>,
}

/// Outcome counts for a completed batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

/// Estimate a single quote request, with whatever coordinates the
/// geocoding step produced (or `None` for the heuristic path).
pub fn estimate_request(
    gazetteer: &Gazetteer,
    request: &QuoteRequest,
    origin_coordinates: Option<Coordinates>,
    destination_coordinates: Option<Coordinates>,
) -> QuoteEstimate {
    let origin = AddressInput {
        text: request.origin.clone(),
        coordinates: origin_coordinates,
    };
    let destination = AddressInput {
        text: request.destination.clone(),
        coordinates: destination_coordinates,
    };

    let distance = DistanceResolver::new(gazetteer).resolve(&origin, &destination);

    let cost = distance.is_resolved().then(|| {
        calculate(&DeliveryCostInput {
            distance_km: distance.distance_km,
            weight_kg: request.weight_kg,
            volume_m3: request.volume_m3,
            transport_type: request.transport,
        })
    });

    QuoteEstimate {
        origin: request.origin.clone(),
        destination: request.destination.clone(),
        distance,
        cost,
    }
}

/// Geocode one endpoint, degrading to `None` on any failure so a flaky
/// geocoding service cannot sink an entire batch.
async fn lookup_or_degrade(geocoder: &Geocoder, address: &str) -> Option<Coordinates> {
    match geocoder.lookup(address).await {
        Ok(coordinates) => coordinates,
        Err(e) => {
            warn!("geocoding '{address}' failed, falling back to heuristics: {e}");
            None
        }
    }
}

/// Run a batch estimation from a JSON-lines input file.
///
/// Writes one JSON estimate per input line (in input order) to
/// `output_path`, or to stdout when no output path is given.
pub async fn run_batch(
    gazetteer: &Gazetteer,
    input_path: &str,
    output_path: Option<&str>,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    let raw = tokio::fs::read_to_string(input_path).await?;

    let mut requests = Vec::new();
    for (line_number, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let request: QuoteRequest = serde_json::from_str(line).map_err(|e| {
            Error::InvalidInput(format!("{input_path}:{}: {e}", line_number + 1))
        })?;
        requests.push(request);
    }

    let total = requests.len() as u64;
    let geocoder = options
        .geocode
        .then(|| Geocoder::with_config(options.geocoder.clone()));
    let concurrency = options.concurrency.max(1);

    let mut in_flight = stream::iter(requests.into_iter().enumerate().map(|(index, request)| {
        let geocoder = geocoder.as_ref();
        async move {
            let (origin_coordinates, destination_coordinates) = match geocoder {
                Some(geocoder) => (
                    lookup_or_degrade(geocoder, &request.origin).await,
                    lookup_or_degrade(geocoder, &request.destination).await,
                ),
                None => (None, None),
            };
            let estimate = estimate_request(
                gazetteer,
                &request,
                origin_coordinates,
                destination_coordinates,
            );
            (index, estimate)
        }
    }))
    .buffer_unordered(concurrency);

    let mut results: Vec<(usize, QuoteEstimate)> = Vec::with_capacity(total as usize);
    while let Some(result) = in_flight.next().await {
        results.push(result);
        if let Some(progress) = &options.progress {
            progress(results.len() as u64, total);
        }
    }

    results.sort_by_key(|(index, _)| *index);

    let resolved = results
        .iter()
        .filter(|(_, estimate)| estimate.distance.is_resolved())
        .count();

    let mut output = String::new();
    for (_, estimate) in &results {
        let line = serde_json::to_string(estimate)
            .map_err(|e| Error::InvalidInput(format!("failed to serialize estimate: {e}")))?;
        output.push_str(&line);
        output.push('\n');
    }

    match output_path {
        Some(path) => tokio::fs::write(path, output).await?,
        None => print!("{output}"),
    }

    Ok(BatchSummary {
        total: total as usize,
        resolved,
        unresolved: total as usize - resolved,
    })
}
