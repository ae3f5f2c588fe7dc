//! Farms on a map, colored by today's attendance.

use std::sync::Arc;

use log::warn;

use crate::api::{FarmBackend, FarmQuery};
use crate::error::FlowError;
use crate::geo::{format_distance, google_maps_url, haversine_km};
use crate::models::{AttendanceStatus, Farm, GeoPoint, TodayAttendances};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Gray,
    Red,
    Green,
    Blue,
}

impl MarkerColor {
    /// Inactive wins, then the active count; no attendance data is blue.
    pub fn for_farm(is_active: Option<bool>, active: Option<u32>) -> Self {
        if is_active == Some(false) {
            return MarkerColor::Gray;
        }
        match active {
            Some(0) => MarkerColor::Red,
            Some(_) => MarkerColor::Green,
            None => MarkerColor::Blue,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            MarkerColor::Gray => "#6B7280",
            MarkerColor::Red => "#EF4444",
            MarkerColor::Green => "#10B981",
            MarkerColor::Blue => "#3B82F6",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FarmMarker {
    pub farm: Farm,
    /// `None` for farms without usable coordinates; they are listed but
    /// not pinned.
    pub position: Option<GeoPoint>,
    pub today_total: Option<u32>,
    pub active: Option<u32>,
    pub color: MarkerColor,
    pub distance_km: Option<f64>,
}

impl FarmMarker {
    pub fn distance_text(&self) -> Option<String> {
        self.distance_km.map(format_distance)
    }

    pub fn maps_url(&self) -> Option<String> {
        self.position.map(google_maps_url)
    }

    pub fn description(&self) -> String {
        format!("{} active farmers today", self.active.unwrap_or(0))
    }
}

/// Header chips above the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapSummary {
    pub farms: usize,
    pub active_farms: usize,
    pub today: u32,
}

/// Joins `farms` with `today` by farm id. `today = None` means the
/// attendance feed could not be loaded.
pub fn build_markers(
    farms: Vec<Farm>,
    today: Option<&TodayAttendances>,
    search: &str,
    from: Option<GeoPoint>,
) -> Vec<FarmMarker> {
    farms
        .into_iter()
        .filter(|farm| farm.matches_search(search))
        .map(|farm| {
            let (today_total, active) = match today {
                Some(today) => {
                    let rows = today
                        .attendances
                        .iter()
                        .filter(|a| a.farm_id.as_deref() == Some(farm.id.as_str()));
                    let (total, active) = rows.fold((0u32, 0u32), |(total, active), a| {
                        let working = u32::from(a.status == AttendanceStatus::Working);
                        (total + 1, active + working)
                    });
                    (Some(total), Some(active))
                }
                None => (None, None),
            };
            let position = farm.position();
            let distance_km = position.zip(from).map(|(to, from)| haversine_km(from, to));
            FarmMarker {
                color: MarkerColor::for_farm(farm.is_active, active),
                farm,
                position,
                today_total,
                active,
                distance_km,
            }
        })
        .collect()
}

pub fn summarize(markers: &[FarmMarker]) -> MapSummary {
    MapSummary {
        farms: markers.len(),
        active_farms: markers
            .iter()
            .filter(|m| m.active.unwrap_or(0) > 0)
            .count(),
        today: markers.iter().filter_map(|m| m.today_total).sum(),
    }
}

pub struct MapScreen<B: FarmBackend> {
    backend: Arc<B>,
}

impl<B: FarmBackend> MapScreen<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Farms are required; today's attendance is best effort and leaves
    /// the markers blue when it fails.
    pub async fn load(
        &self,
        search: &str,
        from: Option<GeoPoint>,
    ) -> Result<Vec<FarmMarker>, FlowError> {
        let query = FarmQuery::default();
        let (farms, today) = tokio::join!(
            self.backend.list_farms(&query),
            self.backend.today_attendance(None)
        );
        let farms = farms.map_err(|e| FlowError::api(e, "Failed to load farms"))?;
        let today = match today {
            Ok(today) => Some(today),
            Err(e) => {
                warn!("Today's attendance unavailable for map: {}", e);
                None
            }
        };
        Ok(build_markers(farms, today.as_ref(), search, from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn farm(id: &str, active: Option<bool>, lat: f64, lng: f64) -> Farm {
        serde_json::from_value(json!({
            "id": id,
            "farm_name": format!("Farm {}", id),
            "is_active": active,
            "location": { "lat": lat, "lng": lng }
        }))
        .unwrap()
    }

    fn today() -> TodayAttendances {
        serde_json::from_value(json!({
            "total": 3,
            "attendances": [
                { "id": "a1", "farm_id": "f1", "status": "working" },
                { "id": "a2", "farm_id": "f1", "status": "completed" },
                { "id": "a3", "farm_id": "f2", "status": "completed" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn color_rules() {
        assert_eq!(MarkerColor::for_farm(Some(false), Some(4)), MarkerColor::Gray);
        assert_eq!(MarkerColor::for_farm(None, Some(0)), MarkerColor::Red);
        assert_eq!(MarkerColor::for_farm(Some(true), Some(2)), MarkerColor::Green);
        assert_eq!(MarkerColor::for_farm(Some(true), None), MarkerColor::Blue);
    }

    #[test]
    fn joins_by_farm_id() {
        let farms = vec![
            farm("f1", Some(true), 11.9, 108.4),
            farm("f2", None, 12.0, 108.5),
            farm("f3", Some(false), 0.0, 0.0),
        ];
        let markers = build_markers(farms, Some(&today()), "", None);
        assert_eq!(markers[0].today_total, Some(2));
        assert_eq!(markers[0].active, Some(1));
        assert_eq!(markers[0].color, MarkerColor::Green);
        assert_eq!(markers[1].color, MarkerColor::Red);
        assert_eq!(markers[2].color, MarkerColor::Gray);
        assert_eq!(markers[2].position, None);
        assert_eq!(markers[2].maps_url(), None);

        let summary = summarize(&markers);
        assert_eq!(summary.farms, 3);
        assert_eq!(summary.active_farms, 1);
        assert_eq!(summary.today, 3);
    }

    #[test]
    fn distance_only_with_both_points() {
        let from = GeoPoint::new(10.7769, 106.7009);
        let markers = build_markers(
            vec![farm("f1", None, 10.7769, 106.7009)],
            None,
            "",
            Some(from),
        );
        assert_eq!(markers[0].distance_text().as_deref(), Some("0m away"));
        assert_eq!(markers[0].color, MarkerColor::Blue);
    }

    #[test]
    fn search_filters_before_join() {
        let markers = build_markers(
            vec![farm("f1", None, 1.0, 1.0), farm("f2", None, 1.0, 1.0)],
            Some(&today()),
            "farm f2",
            None,
        );
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].farm.id, "f2");
    }
}
