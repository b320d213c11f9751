use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::enrollments::repo::{Enrollment, EnrollmentStatus};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub progress: i32,
}

impl ProgressRequest {
    pub fn validate(self) -> AppResult<Self> {
        if !(0..=100).contains(&self.progress) {
            return Err(AppError::validation("Progress must be between 0 and 100"));
        }
        Ok(self)
    }
}

#[derive(Debug, Serialize)]
pub struct EnrollmentResponse {
    pub message: String,
    pub enrollment: Enrollment,
}

/// `enrolled` means "a ledger row exists", not "currently active":
/// a cancelled row still reports enrolled=true with its status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub enrolled: bool,
    pub status: Option<EnrollmentStatus>,
    pub progress: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<OffsetDateTime>,
}

impl StatusResponse {
    pub fn not_enrolled() -> Self {
        Self {
            enrolled: false,
            status: None,
            progress: 0,
            enrollment_date: None,
            completed_at: None,
        }
    }
}

impl From<Enrollment> for StatusResponse {
    fn from(e: Enrollment) -> Self {
        Self {
            enrolled: true,
            status: Some(e.status),
            progress: e.progress,
            enrollment_date: Some(e.enrollment_date),
            completed_at: e.completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bounds_are_inclusive() {
        assert!(ProgressRequest { progress: 0 }.validate().is_ok());
        assert!(ProgressRequest { progress: 50 }.validate().is_ok());
        assert!(ProgressRequest { progress: 100 }.validate().is_ok());
        assert!(ProgressRequest { progress: -1 }.validate().is_err());
        assert!(ProgressRequest { progress: 150 }.validate().is_err());
    }

    #[test]
    fn not_enrolled_serializes_null_status_and_zero_progress() {
        let json = serde_json::to_value(StatusResponse::not_enrolled()).unwrap();
        assert_eq!(json["enrolled"], false);
        assert_eq!(json["status"], serde_json::Value::Null);
        assert_eq!(json["progress"], 0);
        assert!(json.get("enrollment_date").is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&EnrollmentStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
