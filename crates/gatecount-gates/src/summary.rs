// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Occupancy payload consumed by the downstream lot publisher.
//!
//! The publisher sends one JSON object per cadence over a persistent stream
//! connection. The sensor count is not fed into it; this type only pins the
//! wire shape so a future producer stays compatible.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Occupied,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySummary {
    pub lot: String,
    pub total_spots: u32,
    pub occupied_spots: u32,
    /// Per-spot status, present only when the producer tracks spots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spots: Option<BTreeMap<String, SpotStatus>>,
}

impl OccupancySummary {
    /// Build a summary from a per-spot map; totals are derived from it.
    pub fn from_spots(lot: impl Into<String>, spots: BTreeMap<String, SpotStatus>) -> Self {
        let occupied_spots = spots
            .values()
            .filter(|status| **status == SpotStatus::Occupied)
            .count() as u32;
        Self {
            lot: lot.into(),
            total_spots: spots.len() as u32,
            occupied_spots,
            spots: Some(spots),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_without_spots_omits_field() {
        let summary = OccupancySummary {
            lot: "LotA".to_string(),
            total_spots: 40,
            occupied_spots: 12,
            spots: None,
        };
        assert_eq!(
            summary.to_json().unwrap(),
            r#"{"lot":"LotA","total_spots":40,"occupied_spots":12}"#
        );
    }

    #[test]
    fn test_summary_from_spots_counts_occupied() {
        let mut spots = BTreeMap::new();
        spots.insert("spot1".to_string(), SpotStatus::Occupied);
        spots.insert("spot2".to_string(), SpotStatus::Open);
        spots.insert("spot3".to_string(), SpotStatus::Occupied);

        let summary = OccupancySummary::from_spots("LotA", spots);
        assert_eq!(summary.total_spots, 3);
        assert_eq!(summary.occupied_spots, 2);

        let json = summary.to_json().unwrap();
        assert!(json.contains(r#""spot2":"open""#));
        assert_eq!(OccupancySummary::from_json(&json).unwrap(), summary);
    }

    #[test]
    fn test_summary_parses_publisher_payload() {
        let payload = r#"{"lot":"LotA","total_spots":2,"occupied_spots":1,"spots":{"spot1":"occupied","spot2":"open"}}"#;

        let summary = OccupancySummary::from_json(payload).unwrap();
        let spots = summary.spots.as_ref().unwrap();
        assert_eq!(summary.lot, "LotA");
        assert_eq!(summary.occupied_spots, 1);
        assert_eq!(spots["spot1"], SpotStatus::Occupied);
        assert_eq!(spots["spot2"], SpotStatus::Open);
        assert_eq!(summary.to_json().unwrap(), payload);
    }

    #[test]
    fn test_summary_rejects_unknown_status() {
        let payload = r#"{"lot":"LotA","total_spots":1,"occupied_spots":0,"spots":{"spot1":"free"}}"#;
        assert!(OccupancySummary::from_json(payload).is_err());
    }
}
