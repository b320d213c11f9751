use serde::Deserialize;
use uuid::Uuid;

use crate::courses::repo::CourseLevel;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub level: CourseLevel,
    pub category_id: Uuid,
    pub instructor_id: Uuid,
}

impl CreateCourseRequest {
    pub fn validate(mut self) -> AppResult<Self> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(AppError::validation("title must not be empty"));
        }
        if self.price < 0.0 {
            return Err(AppError::validation("price must not be negative"));
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<String>,
    pub level: Option<CourseLevel>,
    pub category_id: Option<Uuid>,
    pub instructor_id: Option<Uuid>,
}

impl UpdateCourseRequest {
    pub fn validate(mut self) -> AppResult<Self> {
        if let Some(title) = self.title.as_mut() {
            *title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::validation("title must not be empty"));
            }
        }
        if let Some(price) = self.price {
            if price < 0.0 {
                return Err(AppError::validation("price must not be negative"));
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_and_trims() {
        let req: CreateCourseRequest = serde_json::from_value(serde_json::json!({
            "title": "  Rust 101  ",
            "category_id": Uuid::new_v4(),
            "instructor_id": Uuid::new_v4(),
        }))
        .expect("deserialize");
        let req = req.validate().expect("valid");
        assert_eq!(req.title, "Rust 101");
        assert_eq!(req.price, 0.0);
        assert_eq!(req.level, CourseLevel::Beginner);
        assert_eq!(req.description, "");
    }

    #[test]
    fn create_request_rejects_negative_price_and_blank_title() {
        let blank = CreateCourseRequest {
            title: "   ".into(),
            description: String::new(),
            price: 0.0,
            duration: String::new(),
            level: CourseLevel::Beginner,
            category_id: Uuid::new_v4(),
            instructor_id: Uuid::new_v4(),
        };
        assert!(blank.validate().is_err());

        let negative = CreateCourseRequest {
            title: "Rust".into(),
            description: String::new(),
            price: -1.0,
            duration: String::new(),
            level: CourseLevel::Beginner,
            category_id: Uuid::new_v4(),
            instructor_id: Uuid::new_v4(),
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn level_deserializes_lowercase() {
        let level: CourseLevel = serde_json::from_str("\"advanced\"").unwrap();
        assert_eq!(level, CourseLevel::Advanced);
    }
}
