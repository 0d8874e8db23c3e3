//! Client-side narrowing of the station catalog.
//!
//! Everything here is pure: the same stations and the same [`StationFilter`] always give
//! the same result, in the input order.

use crate::types::station::{LatLon, Station, UNKNOWN};
use bon::Builder;
use haversine::{distance, Location as HaversineLocation, Units};
use ordered_float::OrderedFloat;
use std::collections::HashSet;

/// River selector value that disables the river predicate.
pub const ALL_RIVERS: &str = "All Rivers";
/// Status selector value that disables the status predicate.
pub const ALL_STATUSES: &str = "All Statuses";

/// Keep only stations within `max_distance_km` of `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub center: LatLon,
    pub max_distance_km: f64,
}

/// The predicates a user has selected. Unset predicates, an empty query and the
/// [`ALL_RIVERS`] / [`ALL_STATUSES`] sentinels all mean "don't filter on this".
///
/// # Examples
///
/// ```
/// use flood_monitoring::StationFilter;
///
/// let filter = StationFilter::builder()
///     .query("kingston")
///     .river("River Thames")
///     .build();
/// assert!(!filter.is_identity());
/// assert!(StationFilter::default().is_identity());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct StationFilter {
    /// Case-insensitive substring of the station label.
    #[builder(into)]
    pub query: Option<String>,
    /// Exact river name.
    #[builder(into)]
    pub river: Option<String>,
    /// Exact status, after URI stripping ("Active", "Closed", ...).
    #[builder(into)]
    pub status: Option<String>,
    pub near: Option<Proximity>,
}

impl StationFilter {
    /// True when no predicate is active, so [`StationFilter::apply`] returns its input.
    pub fn is_identity(&self) -> bool {
        self.active_query().is_none()
            && self.active_river().is_none()
            && self.active_status().is_none()
            && self.near.is_none()
    }

    pub fn matches(&self, station: &Station) -> bool {
        self.matches_query(station, self.active_query().map(str::to_lowercase).as_deref())
            && self.matches_rest(station)
    }

    /// The stations satisfying every active predicate, in input order.
    pub fn apply(&self, stations: &[Station]) -> Vec<Station> {
        let lowered_query = self.active_query().map(str::to_lowercase);
        stations
            .iter()
            .filter(|station| {
                self.matches_query(station, lowered_query.as_deref()) && self.matches_rest(station)
            })
            .cloned()
            .collect()
    }

    fn active_query(&self) -> Option<&str> {
        self.query.as_deref().filter(|query| !query.is_empty())
    }

    fn active_river(&self) -> Option<&str> {
        self.river.as_deref().filter(|river| *river != ALL_RIVERS)
    }

    fn active_status(&self) -> Option<&str> {
        self.status.as_deref().filter(|status| *status != ALL_STATUSES)
    }

    fn matches_query(&self, station: &Station, lowered_query: Option<&str>) -> bool {
        match lowered_query {
            None => true,
            Some(query) => {
                !station.label.is_empty() && station.label.to_lowercase().contains(query)
            }
        }
    }

    fn matches_rest(&self, station: &Station) -> bool {
        if let Some(river) = self.active_river() {
            if station.river != river {
                return false;
            }
        }
        if let Some(status) = self.active_status() {
            if station.status != status {
                return false;
            }
        }
        if let Some(near) = self.near {
            return station
                .location()
                .is_some_and(|at| distance_km(near.center, at) <= near.max_distance_km);
        }
        true
    }
}

/// Applies the three dashboard predicates. `None`, an empty query and the sentinels
/// leave the corresponding field unfiltered.
///
/// # Examples
///
/// ```
/// use flood_monitoring::{filter_stations, Station};
///
/// let station = |id: &str, label: &str, river: &str| Station {
///     id: id.to_string(),
///     label: label.to_string(),
///     river: river.to_string(),
///     town: None,
///     catchment: None,
///     latitude: None,
///     longitude: None,
///     status: "Active".to_string(),
///     measure_count: 1,
/// };
/// let stations = vec![
///     station("S1", "Thames at Kingston", "Thames"),
///     station("S2", "Lea", "Unknown"),
/// ];
///
/// let thames = filter_stations(&stations, None, Some("Thames"), None);
/// assert_eq!(thames.len(), 1);
/// assert_eq!(thames[0].id, "S1");
/// ```
pub fn filter_stations(
    stations: &[Station],
    query: Option<&str>,
    river: Option<&str>,
    status: Option<&str>,
) -> Vec<Station> {
    StationFilter {
        query: query.map(str::to_string),
        river: river.map(str::to_string),
        status: status.map(str::to_string),
        near: None,
    }
    .apply(stations)
}

/// Great-circle distance between two points in kilometres.
pub fn distance_km(from: LatLon, to: LatLon) -> f64 {
    distance(
        HaversineLocation {
            latitude: from.0,
            longitude: from.1,
        },
        HaversineLocation {
            latitude: to.0,
            longitude: to.1,
        },
        Units::Kilometers,
    )
}

/// The `n` stations closest to `center`, nearest first, with their distance in km.
/// Stations without coordinates are ignored.
pub fn nearest(stations: &[Station], center: LatLon, n: usize) -> Vec<(Station, f64)> {
    if n == 0 {
        return vec![];
    }
    let mut with_distance: Vec<(Station, f64)> = stations
        .iter()
        .filter_map(|station| {
            station
                .location()
                .map(|at| (station.clone(), distance_km(center, at)))
        })
        .collect();
    with_distance.sort_by_key(|(_, km)| OrderedFloat(*km));
    with_distance.truncate(n);
    with_distance
}

/// River selector options: [`ALL_RIVERS`] first, then every known river once, sorted.
pub fn river_options(stations: &[Station]) -> Vec<String> {
    let mut rivers: Vec<String> = stations
        .iter()
        .filter(|station| station.has_known_river())
        .map(|station| station.river.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    rivers.sort();
    std::iter::once(ALL_RIVERS.to_string())
        .chain(rivers)
        .collect()
}

/// Status selector options: [`ALL_STATUSES`] first, then each status in the order it
/// first appears. "Unknown" is left out.
pub fn status_options(stations: &[Station]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut options = vec![ALL_STATUSES.to_string()];
    for station in stations {
        if station.status != UNKNOWN && seen.insert(station.status.as_str()) {
            options.push(station.status.clone());
        }
    }
    options
}
