use std::sync::Arc;

use crate::api::{FarmBackend, Tag, TagId, TagKind};
use crate::error::FlowError;
use crate::models::{DashboardStatistics, TodayAttendances};

pub const MOCK_MODE_BANNER: &str =
    "System is running in Mock Mode. Face recognition will return simulated results.";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub stats: DashboardStatistics,
    pub today: TodayAttendances,
}

impl DashboardView {
    pub fn banner(&self) -> Option<&'static str> {
        self.stats.is_mock().then_some(MOCK_MODE_BANNER)
    }

    /// Enrollment rate as a whole percentage.
    pub fn enrollment_percent(&self) -> u32 {
        let farmers = &self.stats.farmers;
        if farmers.total == 0 {
            return 0;
        }
        // The backend reports either a fraction or a percentage.
        let rate = if farmers.enrollment_rate > 1.0 {
            farmers.enrollment_rate
        } else if farmers.enrollment_rate > 0.0 {
            farmers.enrollment_rate * 100.0
        } else {
            f64::from(farmers.with_face_enrolled) * 100.0 / f64::from(farmers.total)
        };
        rate.round().clamp(0.0, 100.0) as u32
    }
}

pub struct DashboardScreen<B: FarmBackend> {
    backend: Arc<B>,
}

impl<B: FarmBackend> DashboardScreen<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn load(&self) -> Result<DashboardView, FlowError> {
        let (stats, today) = tokio::join!(
            self.backend.dashboard_statistics(),
            self.backend.today_attendance(None)
        );
        Ok(DashboardView {
            stats: stats.map_err(|e| FlowError::api(e, "Failed to load statistics"))?,
            today: today.map_err(|e| FlowError::api(e, "Failed to load today's attendance"))?,
        })
    }

    /// Pull-to-refresh: drops both cached queries, then reloads.
    pub async fn refresh(&self) -> Result<DashboardView, FlowError> {
        self.backend.invalidate(&[
            Tag::all(TagKind::Statistics),
            Tag::new(TagKind::Attendance, TagId::Today),
        ]);
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::statistics::FarmerCounts;

    fn view(farmers: FarmerCounts) -> DashboardView {
        DashboardView {
            stats: DashboardStatistics {
                farmers,
                ..Default::default()
            },
            today: TodayAttendances::default(),
        }
    }

    #[test]
    fn enrollment_rate_from_fraction_or_counts() {
        let v = view(FarmerCounts {
            total: 4,
            active: 4,
            with_face_enrolled: 1,
            enrollment_rate: 0.25,
        });
        assert_eq!(v.enrollment_percent(), 25);

        let v = view(FarmerCounts {
            total: 3,
            active: 3,
            with_face_enrolled: 2,
            enrollment_rate: 0.0,
        });
        assert_eq!(v.enrollment_percent(), 67);

        assert_eq!(view(FarmerCounts::default()).enrollment_percent(), 0);
    }

    #[test]
    fn no_banner_in_production() {
        assert!(view(FarmerCounts::default()).banner().is_none());
    }
}
