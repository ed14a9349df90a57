//! Metrics recording.
//!
//! # Metrics
//! - `routekit_cache_lookups_total` (counter): snapshot lookups by result (hit, miss)
//! - `routekit_routes_discovered_total` (counter): routes realized from declarations
//! - `routekit_route_matches_total` (counter): match attempts by result (matched, rejected)
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the application picks the exporter
//! - No per-route labels to keep cardinality bounded

use ::metrics::counter;

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("routekit_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_routes_discovered(count: usize) {
    counter!("routekit_routes_discovered_total").increment(count as u64);
}

pub fn record_route_match(matched: bool) {
    let result = if matched { "matched" } else { "rejected" };
    counter!("routekit_route_matches_total", "result" => result).increment(1);
}
