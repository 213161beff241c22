//! Distance estimation between two delivery addresses
//!
//! Prefers precision and degrades gracefully: coordinates from a prior
//! geocoding step give a great-circle distance; otherwise the resolver
//! falls back through progressively cruder state-level heuristics and
//! always labels the result with how it was obtained.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::gazetteer::Gazetteer;
use crate::core::matcher::extract_state;

/// Mean Earth radius in kilometers for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Triangulation weights for two non-reference states. These are a
/// documented business rule, not a geometric derivation; do not re-derive.
const TRIANGULATION_SPREAD_WEIGHT: f64 = 0.8;
const TRIANGULATION_BASE_WEIGHT: f64 = 0.3;

/// A geographic point from the geocoding collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One endpoint of a delivery: free text, plus coordinates when a prior
/// geocoding step succeeded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInput {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl AddressInput {
    /// Address with no coordinates (geocoding failed or was skipped)
    pub fn text_only(text: &str) -> Self {
        Self {
            text: text.to_string(),
            coordinates: None,
        }
    }

    pub fn with_coordinates(text: &str, coordinates: Coordinates) -> Self {
        Self {
            text: text.to_string(),
            coordinates: Some(coordinates),
        }
    }
}

/// How a distance estimate was obtained, from most to least trustworthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceSource {
    Geocoded,
    SameStateHeuristic,
    LagosDirectHeuristic,
    TriangulatedHeuristic,
    Unresolved,
}

impl DistanceSource {
    /// Stable tag for display and wire formats
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceSource::Geocoded => "geocoded",
            DistanceSource::SameStateHeuristic => "same-state-heuristic",
            DistanceSource::LagosDirectHeuristic => "lagos-direct-heuristic",
            DistanceSource::TriangulatedHeuristic => "triangulated-heuristic",
            DistanceSource::Unresolved => "unresolved",
        }
    }
}

impl std::fmt::Display for DistanceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A distance in kilometers, labeled with its provenance
///
/// An `Unresolved` estimate carries `distance_km: 0.0` as a sentinel;
/// callers must gate on the source tag, never on the number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceEstimate {
    pub distance_km: f64,
    pub source: DistanceSource,
}

impl DistanceEstimate {
    fn unresolved() -> Self {
        Self {
            distance_km: 0.0,
            source: DistanceSource::Unresolved,
        }
    }

    /// Whether this estimate carries enough information to price a delivery
    pub fn is_resolved(&self) -> bool {
        self.source != DistanceSource::Unresolved
    }
}

/// Great-circle distance between two points in kilometers
pub fn haversine_distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Resolves a best-effort distance between two addresses.
///
/// Pure and synchronous: any geocoding has already happened (or failed)
/// by the time an [`AddressInput`] reaches this type, so each call only
/// reads the injected gazetteer and is safe to run concurrently.
pub struct DistanceResolver<'g> {
    gazetteer: &'g Gazetteer,
}

impl<'g> DistanceResolver<'g> {
    pub fn new(gazetteer: &'g Gazetteer) -> Self {
        Self { gazetteer }
    }

    /// Estimate the distance between two addresses.
    ///
    /// Never fails: insufficient information comes back as an
    /// [`DistanceSource::Unresolved`] estimate for the caller to surface.
    pub fn resolve(&self, origin: &AddressInput, destination: &AddressInput) -> DistanceEstimate {
        if let (Some(from), Some(to)) = (origin.coordinates, destination.coordinates) {
            let distance_km = haversine_distance_km(from, to);
            debug!("geocoded distance: {distance_km:.1} km");
            return DistanceEstimate {
                distance_km,
                source: DistanceSource::Geocoded,
            };
        }

        let origin_state = extract_state(self.gazetteer, &origin.text);
        let destination_state = extract_state(self.gazetteer, &destination.text);

        match (origin_state, destination_state) {
            (Some(a), Some(b)) if a == b => {
                let distance_km = self.gazetteer.same_state_distance(a);
                debug!("same-state heuristic for {a}: {distance_km} km");
                DistanceEstimate {
                    distance_km,
                    source: DistanceSource::SameStateHeuristic,
                }
            }
            (Some(a), Some(b)) => self.cross_state(a, b),
            _ => {
                debug!(
                    "unresolved: origin={origin_state:?} destination={destination_state:?}"
                );
                DistanceEstimate::unresolved()
            }
        }
    }

    fn cross_state(&self, a: &str, b: &str) -> DistanceEstimate {
        let reference = self.gazetteer.reference_state();

        if a == reference || b == reference {
            // One endpoint is the reference point, so the table value is
            // already the answer.
            let other = if a == reference { b } else { a };
            return match self.gazetteer.distance_from_reference(other) {
                Some(distance_km) => {
                    debug!("reference-direct heuristic for {other}: {distance_km} km");
                    DistanceEstimate {
                        distance_km,
                        source: DistanceSource::LagosDirectHeuristic,
                    }
                }
                None => {
                    debug!("no distance table entry for {other}");
                    DistanceEstimate::unresolved()
                }
            };
        }

        match (
            self.gazetteer.distance_from_reference(a),
            self.gazetteer.distance_from_reference(b),
        ) {
            (Some(dist_a), Some(dist_b)) => {
                let distance_km = (dist_a - dist_b).abs() * TRIANGULATION_SPREAD_WEIGHT
                    + dist_a.min(dist_b) * TRIANGULATION_BASE_WEIGHT;
                debug!("triangulated {a} <-> {b}: {distance_km:.1} km");
                DistanceEstimate {
                    distance_km,
                    source: DistanceSource::TriangulatedHeuristic,
                }
            }
            _ => {
                debug!("missing distance table entry for {a} or {b}");
                DistanceEstimate::unresolved()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gazetteer::StateRecord;

    fn resolver() -> DistanceResolver<'static> {
        DistanceResolver::new(Gazetteer::nigeria())
    }

    #[test]
    fn test_haversine_identical_points_is_zero() {
        let point = Coordinates { lat: 6.5244, lng: 3.3792 };
        assert_eq!(haversine_distance_km(point, point), 0.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Lagos to Kano, straight line is roughly 830 km
        let lagos = Coordinates { lat: 6.5244, lng: 3.3792 };
        let kano = Coordinates { lat: 12.0022, lng: 8.5920 };
        let km = haversine_distance_km(lagos, kano);
        assert!((800.0..870.0).contains(&km), "got {km}");
    }

    #[test]
    fn test_coordinates_take_precedence() {
        let point = Coordinates { lat: 6.5244, lng: 3.3792 };
        let origin = AddressInput::with_coordinates("Ikeja, Lagos", point);
        let destination = AddressInput::with_coordinates("Kano", point);

        let estimate = resolver().resolve(&origin, &destination);
        assert_eq!(estimate.source, DistanceSource::Geocoded);
        assert_eq!(estimate.distance_km, 0.0);
    }

    #[test]
    fn test_same_state_heuristic() {
        let origin = AddressInput::text_only("Ikeja, Lagos");
        let destination = AddressInput::text_only("Yaba, Lagos");

        let estimate = resolver().resolve(&origin, &destination);
        assert_eq!(estimate.source, DistanceSource::SameStateHeuristic);
        assert_eq!(estimate.distance_km, 25.0);
    }

    #[test]
    fn test_same_state_default_distance() {
        let origin = AddressInput::text_only("Abakaliki");
        let destination = AddressInput::text_only("Afikpo, Ebonyi");

        let estimate = resolver().resolve(&origin, &destination);
        assert_eq!(estimate.source, DistanceSource::SameStateHeuristic);
        assert_eq!(estimate.distance_km, 35.0);
    }

    #[test]
    fn test_lagos_direct_heuristic() {
        let origin = AddressInput::text_only("Apapa, Lagos");
        let destination = AddressInput::text_only("Kano");

        let estimate = resolver().resolve(&origin, &destination);
        assert_eq!(estimate.source, DistanceSource::LagosDirectHeuristic);
        assert_eq!(estimate.distance_km, 1050.0);

        // Direction does not matter
        let reversed = resolver().resolve(&destination, &origin);
        assert_eq!(reversed.distance_km, 1050.0);
    }

    #[test]
    fn test_triangulated_heuristic() {
        // Kano is 1050 km from Lagos, Kaduna 880 km:
        // |1050 - 880| * 0.8 + 880 * 0.3 = 136 + 264 = 400
        let origin = AddressInput::text_only("Kano");
        let destination = AddressInput::text_only("Zaria, Kaduna");

        let estimate = resolver().resolve(&origin, &destination);
        assert_eq!(estimate.source, DistanceSource::TriangulatedHeuristic);
        assert!((estimate.distance_km - 400.0).abs() < 1e-9, "got {}", estimate.distance_km);
    }

    #[test]
    fn test_unresolved_when_neither_matches() {
        let origin = AddressInput::text_only("somewhere");
        let destination = AddressInput::text_only("elsewhere");

        let estimate = resolver().resolve(&origin, &destination);
        assert_eq!(estimate.source, DistanceSource::Unresolved);
        assert_eq!(estimate.distance_km, 0.0);
        assert!(!estimate.is_resolved());
    }

    #[test]
    fn test_unresolved_when_one_side_matches() {
        let origin = AddressInput::text_only("Ikeja, Lagos");
        let destination = AddressInput::text_only("somewhere far away");

        let estimate = resolver().resolve(&origin, &destination);
        assert_eq!(estimate.source, DistanceSource::Unresolved);
    }

    #[test]
    fn test_missing_table_entry_is_unresolved() {
        // Synthetic gazetteer where one state has no distance entry
        let gazetteer = Gazetteer::new(
            vec![
                StateRecord::new("Alpha", &["Avila"]),
                StateRecord::new("Beta", &["Borra"]),
                StateRecord::new("Gamma", &["Goria"]),
            ],
            "Alpha",
            vec![],
            vec![("Beta".to_string(), 100.0)],
            vec![],
        );
        let resolver = DistanceResolver::new(&gazetteer);

        // Reference-direct lookup with no table entry
        let estimate = resolver.resolve(
            &AddressInput::text_only("Avila"),
            &AddressInput::text_only("Goria"),
        );
        assert_eq!(estimate.source, DistanceSource::Unresolved);

        // Triangulation with one side missing
        let estimate = resolver.resolve(
            &AddressInput::text_only("Borra"),
            &AddressInput::text_only("Goria"),
        );
        assert_eq!(estimate.source, DistanceSource::Unresolved);
    }

    #[test]
    fn test_source_tags_serialize_as_documented() {
        let tags = [
            (DistanceSource::Geocoded, "\"geocoded\""),
            (DistanceSource::SameStateHeuristic, "\"same-state-heuristic\""),
            (DistanceSource::LagosDirectHeuristic, "\"lagos-direct-heuristic\""),
            (DistanceSource::TriangulatedHeuristic, "\"triangulated-heuristic\""),
            (DistanceSource::Unresolved, "\"unresolved\""),
        ];
        for (source, expected) in tags {
            assert_eq!(serde_json::to_string(&source).unwrap(), expected);
        }
    }
}
