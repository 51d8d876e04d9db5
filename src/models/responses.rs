//! Response DTOs for the portal API
//!
//! Defines the structure of outgoing HTTP response bodies that are not
//! catalog views themselves.

use serde::Serialize;

use crate::memo::FunctionStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Counters for each memoized function
    pub functions: Vec<FunctionStats>,
    /// Entries stored across all functions
    pub total_entries: usize,
    /// Overall hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Aggregates per-function counters
    pub fn new(functions: Vec<FunctionStats>) -> Self {
        let total_entries = functions.iter().map(|f| f.stats.total_entries).sum();
        let hits: u64 = functions.iter().map(|f| f.stats.hits).sum();
        let misses: u64 = functions.iter().map(|f| f.stats.misses).sum();
        let total_requests = hits + misses;
        let hit_rate = if total_requests > 0 {
            hits as f64 / total_requests as f64
        } else {
            0.0
        };
        Self {
            functions,
            total_entries,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memo::MemoStats;

    fn function(name: &str, hits: u64, misses: u64, entries: usize) -> FunctionStats {
        let stats = MemoStats {
            hits,
            misses,
            total_entries: entries,
            ..Default::default()
        };
        FunctionStats {
            name: name.to_string(),
            hit_rate: stats.hit_rate(),
            stats,
        }
    }

    #[test]
    fn test_stats_response_aggregates() {
        let resp = StatsResponse::new(vec![function("settings", 3, 1, 1), function("catalog", 5, 1, 2)]);
        assert_eq!(resp.total_entries, 3);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::new(Vec::new());
        assert_eq!(resp.hit_rate, 0.0);
        assert_eq!(resp.total_entries, 0);
    }

    #[test]
    fn test_stats_response_serialize_flattens_counters() {
        let resp = StatsResponse::new(vec![function("catalog", 1, 1, 1)]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["functions"][0]["name"], "catalog");
        assert_eq!(json["functions"][0]["hits"], 1);
        assert_eq!(json["functions"][0]["hit_rate"], 0.5);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
