//! Dashboard endpoints
//!
//! Serves the counters rendered on the dashboard home screen.

use axum::Json;
use serde::Serialize;

/// Recruiting counters, serialized in the camelCase shape the dashboard reads
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_candidates: u64,
    pub active_jobs: u64,
    pub candidates_in_review: u64,
    pub scheduled_interviews: u64,
    pub total_applications: u64,
    pub hired_candidates: u64,
}

/// GET /api/dashboard/metrics
///
/// Nothing is persisted yet, so every counter reports zero.
pub async fn metrics() -> Json<DashboardMetrics> {
    Json(DashboardMetrics::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_field_names() {
        let value = serde_json::to_value(DashboardMetrics::default()).unwrap();
        for key in [
            "totalCandidates",
            "activeJobs",
            "candidatesInReview",
            "scheduledInterviews",
            "totalApplications",
            "hiredCandidates",
        ] {
            assert_eq!(value[key], 0, "missing {}", key);
        }
    }
}
