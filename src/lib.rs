//! # Danfo-quote Library
//!
//! Delivery distance and cost estimation for Nigerian routes, built for
//! marketplace checkouts that need an actionable number even when a full
//! address cannot be geocoded.
//!
//! ## Features
//!
//! - **Address resolution**: free-text addresses matched to states via a
//!   built-in gazetteer of states, aliases and cities
//! - **Graceful degradation**: geocoded great-circle distance when
//!   coordinates exist, state-level heuristics when they don't, and an
//!   explicit provenance tag on every estimate
//! - **Deterministic pricing**: a fixed cost formula per transport mode,
//!   rounded up to the nearest 100 currency units
//! - **Bulk mode**: JSON-lines batch estimation with bounded concurrency
//!   and optional progress callbacks
//!
//! ## Basic Usage
//!
//! ```rust
//! use danfo_quote::TransportType;
//!
//! let estimate = danfo_quote::quote("Ikeja, Lagos", "Kano", 50.0, 1.0, TransportType::Truck);
//!
//! assert!(estimate.distance.is_resolved());
//! assert_eq!(estimate.distance.distance_km, 1050.0);
//! let cost = estimate.cost.expect("resolved estimates carry a cost");
//! assert_eq!(cost.total_cost, 54100);
//! ```
//!
//! ## Geocoded Estimates
//!
//! ```rust,no_run
//! use danfo_quote::TransportType;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Looks up both endpoints against the geocoding service first and
//!     // falls back to heuristics for whatever it cannot resolve.
//!     let estimate = danfo_quote::quote_geocoded(
//!         "14 Allen Avenue, Ikeja",
//!         "Kofar Mata Road, Kano",
//!         50.0,
//!         1.0,
//!         TransportType::Van,
//!     )
//!     .await?;
//!
//!     println!("{:.0} km ({:?})", estimate.distance.distance_km, estimate.distance.source);
//!     Ok(())
//! }
//! ```

// Re-export core types that users might need
pub use crate::core::batch::{
    estimate_request, run_batch, BatchOptions, BatchSummary, ProgressCallback, QuoteEstimate,
    QuoteRequest,
};
pub use crate::core::cost::{
    calculate, DeliveryCostEstimate, DeliveryCostInput, TransportType, PER_KG_RATE, PER_KM_RATE,
    PER_M3_RATE,
};
pub use crate::core::distance::{
    haversine_distance_km, AddressInput, Coordinates, DistanceEstimate, DistanceResolver,
    DistanceSource, EARTH_RADIUS_KM,
};
pub use crate::core::error::{Error, Result};
pub use crate::core::gazetteer::{Gazetteer, StateRecord, DEFAULT_SAME_STATE_KM, REFERENCE_STATE};
pub use crate::core::geocode::{Geocoder, GeocoderConfig};
pub use crate::core::matcher::{extract_state, suggest_state, Suggestion};

// Internal modules
mod core;

/// Estimate a delivery without touching the network.
///
/// Distances come from the state-level heuristic chain; the estimate's
/// source tag says which rule fired. An unresolved distance yields no
/// cost; callers should prompt for a clearer address.
pub fn quote(
    origin: &str,
    destination: &str,
    weight_kg: f64,
    volume_m3: f64,
    transport: TransportType,
) -> QuoteEstimate {
    let request = QuoteRequest {
        origin: origin.to_string(),
        destination: destination.to_string(),
        weight_kg,
        volume_m3,
        transport,
    };
    estimate_request(Gazetteer::nigeria(), &request, None, None)
}

/// Estimate a delivery, geocoding both endpoints first.
///
/// A geocoding miss (`Ok(None)`) degrades that endpoint to heuristic
/// resolution; transport-level failures (network, HTTP) propagate so the
/// caller can decide between retrying and going offline.
pub async fn quote_geocoded(
    origin: &str,
    destination: &str,
    weight_kg: f64,
    volume_m3: f64,
    transport: TransportType,
) -> Result<QuoteEstimate> {
    let geocoder = Geocoder::new();
    let origin_coordinates = geocoder.lookup(origin).await?;
    let destination_coordinates = geocoder.lookup(destination).await?;

    let request = QuoteRequest {
        origin: origin.to_string(),
        destination: destination.to_string(),
        weight_kg,
        volume_m3,
        transport,
    };
    Ok(estimate_request(
        Gazetteer::nigeria(),
        &request,
        origin_coordinates,
        destination_coordinates,
    ))
}
