//! Delivery cost calculation
//!
//! A fixed linear-combination formula plus a per-transport-mode multiplier,
//! rounded up to a coarse currency granularity. The formula is a business
//! rule reproduced exactly; it does not validate its inputs: rejecting
//! non-positive weights or volumes is the caller's job.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;

/// Per-kilometer rate in currency units
pub const PER_KM_RATE: f64 = 50.0;

/// Per-kilogram rate in currency units
pub const PER_KG_RATE: f64 = 2.0;

/// Per-cubic-meter rate in currency units
pub const PER_M3_RATE: f64 = 500.0;

/// Costs are rounded up to the nearest multiple of this, in currency units
pub const ROUNDING_STEP: f64 = 100.0;

/// Vehicle class carrying the delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Truck,
    Van,
    Motorcycle,
}

impl TransportType {
    /// Fixed base rate in currency units
    pub fn base_rate(&self) -> f64 {
        match self {
            TransportType::Truck => 1000.0,
            TransportType::Van => 750.0,
            TransportType::Motorcycle => 300.0,
        }
    }

    /// Multiplier applied to the combined cost terms
    pub fn multiplier(&self) -> f64 {
        match self {
            TransportType::Truck => 1.0,
            TransportType::Van => 0.8,
            TransportType::Motorcycle => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Truck => "truck",
            TransportType::Van => "van",
            TransportType::Motorcycle => "motorcycle",
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "truck" => Ok(TransportType::Truck),
            "van" => Ok(TransportType::Van),
            "motorcycle" => Ok(TransportType::Motorcycle),
            other => Err(Error::InvalidInput(format!(
                "unknown transport type '{other}' (expected truck, van or motorcycle)"
            ))),
        }
    }
}

/// Inputs to a single cost calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeliveryCostInput {
    pub distance_km: f64,
    pub weight_kg: f64,
    pub volume_m3: f64,
    pub transport_type: TransportType,
}

/// A computed cost with its contributing terms retained for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryCostEstimate {
    /// Final cost in currency units, rounded up to the nearest 100
    pub total_cost: u64,

    pub base_rate: f64,
    pub distance_factor: f64,
    pub weight_factor: f64,
    pub volume_factor: f64,
    pub transport_multiplier: f64,
}

/// Compute the delivery cost for pre-validated inputs.
///
/// `raw = (base + km*50 + kg*2 + m3*500) * multiplier`, then rounded up to
/// the nearest 100 currency units. Pure and deterministic; garbage in,
/// deterministic garbage out.
pub fn calculate(input: &DeliveryCostInput) -> DeliveryCostEstimate {
    let base_rate = input.transport_type.base_rate();
    let distance_factor = input.distance_km * PER_KM_RATE;
    let weight_factor = input.weight_kg * PER_KG_RATE;
    let volume_factor = input.volume_m3 * PER_M3_RATE;
    let transport_multiplier = input.transport_type.multiplier();

    let raw_cost =
        (base_rate + distance_factor + weight_factor + volume_factor) * transport_multiplier;
    let total_cost = ((raw_cost / ROUNDING_STEP).ceil() * ROUNDING_STEP) as u64;

    DeliveryCostEstimate {
        total_cost,
        base_rate,
        distance_factor,
        weight_factor,
        volume_factor,
        transport_multiplier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(transport_type: TransportType) -> DeliveryCostInput {
        DeliveryCostInput {
            distance_km: 10.0,
            weight_kg: 50.0,
            volume_m3: 1.0,
            transport_type,
        }
    }

    #[test]
    fn test_truck_cost_exact_multiple() {
        // (1000 + 500 + 100 + 500) * 1.0 = 2100, already a multiple of 100
        let estimate = calculate(&input(TransportType::Truck));
        assert_eq!(estimate.total_cost, 2100);
        assert_eq!(estimate.base_rate, 1000.0);
        assert_eq!(estimate.distance_factor, 500.0);
        assert_eq!(estimate.weight_factor, 100.0);
        assert_eq!(estimate.volume_factor, 500.0);
        assert_eq!(estimate.transport_multiplier, 1.0);
    }

    #[test]
    fn test_van_cost_rounds_up() {
        // 2100 * 0.8 = 1680, rounded up to 1700
        let estimate = calculate(&input(TransportType::Van));
        assert_eq!(estimate.total_cost, 1700);
    }

    #[test]
    fn test_motorcycle_cost() {
        // (300 + 500 + 100 + 500) * 0.5 = 700
        let estimate = calculate(&input(TransportType::Motorcycle));
        assert_eq!(estimate.total_cost, 700);
    }

    #[test]
    fn test_zero_everything_still_charges_base() {
        let estimate = calculate(&DeliveryCostInput {
            distance_km: 0.0,
            weight_kg: 0.0,
            volume_m3: 0.0,
            transport_type: TransportType::Van,
        });
        // 750 * 0.8 = 600
        assert_eq!(estimate.total_cost, 600);
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let first = calculate(&input(TransportType::Truck));
        let second = calculate(&input(TransportType::Truck));
        assert_eq!(first, second);
    }

    #[test]
    fn test_transport_type_parsing() {
        assert_eq!("truck".parse::<TransportType>().unwrap(), TransportType::Truck);
        assert_eq!("VAN".parse::<TransportType>().unwrap(), TransportType::Van);
        assert_eq!(
            "Motorcycle".parse::<TransportType>().unwrap(),
            TransportType::Motorcycle
        );
        assert!("bicycle".parse::<TransportType>().is_err());
    }

    #[test]
    fn test_transport_type_serde_tags() {
        assert_eq!(
            serde_json::to_string(&TransportType::Motorcycle).unwrap(),
            "\"motorcycle\""
        );
        let parsed: TransportType = serde_json::from_str("\"van\"").unwrap();
        assert_eq!(parsed, TransportType::Van);
    }
}
