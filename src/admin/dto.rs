use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::courses::repo::CourseLevel;
use crate::users::repo::Role;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_students: i64,
    pub total_instructors: i64,
    pub total_courses: i64,
    pub total_enrollments: i64,
}

#[derive(Debug, Serialize)]
pub struct EnrolledCourseSummary {
    pub id: Uuid,
    pub title: String,
    pub category_name: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct StudentOverview {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub enrolled_courses: Vec<EnrolledCourseSummary>,
}

#[derive(Debug, Serialize)]
pub struct TaughtCourseSummary {
    pub id: Uuid,
    pub title: String,
    pub category_name: String,
    pub created_at: OffsetDateTime,
    pub enrolled_students_count: i64,
}

#[derive(Debug, Serialize)]
pub struct InstructorOverview {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub created_courses: Vec<TaughtCourseSummary>,
    pub total_students: i64,
}

#[derive(Debug, Serialize)]
pub struct InstructorRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CourseOverview {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub duration: String,
    pub level: CourseLevel,
    pub instructor: InstructorRef,
    pub category: CategoryRef,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub enrolled_students: Vec<Uuid>,
}
