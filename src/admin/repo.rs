//! Read-only rollups for the admin dashboard. Every report is computed
//! per request by joining the live tables; there is no caching and no
//! snapshot guarantee across the queries making up one report.

use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::admin::dto::{
    CategoryRef, CourseOverview, DashboardStats, EnrolledCourseSummary, InstructorOverview,
    InstructorRef, StudentOverview, TaughtCourseSummary,
};
use crate::courses::repo as courses_repo;
use crate::users::repo::{self as users_repo, Role};

pub async fn dashboard_stats(db: &PgPool) -> Result<DashboardStats, sqlx::Error> {
    sqlx::query_as::<_, DashboardStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM users WHERE role = 'student') AS total_students,
            (SELECT COUNT(*) FROM users WHERE role = 'instructor') AS total_instructors,
            (SELECT COUNT(*) FROM courses) AS total_courses,
            (SELECT COUNT(*) FROM enrollments) AS total_enrollments
        "#,
    )
    .fetch_one(db)
    .await
}

#[derive(FromRow)]
struct StudentCourseRow {
    student_id: Uuid,
    course_id: Uuid,
    title: String,
    category_name: String,
    created_at: OffsetDateTime,
}

pub async fn students_with_enrollments(db: &PgPool) -> Result<Vec<StudentOverview>, sqlx::Error> {
    let students = users_repo::list_by_role(db, Role::Student).await?;

    let rows = sqlx::query_as::<_, StudentCourseRow>(
        r#"
        SELECT e.student_id, c.id AS course_id, c.title,
               cat.name AS category_name, c.created_at
        FROM enrollments e
        JOIN courses c ON c.id = e.course_id
        JOIN categories cat ON cat.id = c.category_id
        "#,
    )
    .fetch_all(db)
    .await?;

    let mut by_student: HashMap<Uuid, Vec<EnrolledCourseSummary>> = HashMap::new();
    for row in rows {
        by_student
            .entry(row.student_id)
            .or_default()
            .push(EnrolledCourseSummary {
                id: row.course_id,
                title: row.title,
                category_name: row.category_name,
                created_at: row.created_at,
            });
    }

    Ok(students
        .into_iter()
        .map(|u| {
            let enrolled_courses = by_student.remove(&u.id).unwrap_or_default();
            StudentOverview {
                id: u.id,
                name: u.name,
                email: u.email,
                role: u.role,
                created_at: u.created_at,
                updated_at: u.updated_at,
                enrolled_courses,
            }
        })
        .collect())
}

#[derive(FromRow)]
struct TaughtCourseRow {
    instructor_id: Uuid,
    course_id: Uuid,
    title: String,
    category_name: String,
    created_at: OffsetDateTime,
    enrolled_students_count: i64,
}

pub async fn instructors_with_stats(db: &PgPool) -> Result<Vec<InstructorOverview>, sqlx::Error> {
    let instructors = users_repo::list_by_role(db, Role::Instructor).await?;

    let rows = sqlx::query_as::<_, TaughtCourseRow>(
        r#"
        SELECT c.instructor_id, c.id AS course_id, c.title,
               cat.name AS category_name, c.created_at,
               COUNT(e.id) AS enrolled_students_count
        FROM courses c
        JOIN categories cat ON cat.id = c.category_id
        LEFT JOIN enrollments e ON e.course_id = c.id
        GROUP BY c.id, cat.name
        "#,
    )
    .fetch_all(db)
    .await?;

    let mut by_instructor: HashMap<Uuid, Vec<TaughtCourseSummary>> = HashMap::new();
    for row in rows {
        by_instructor
            .entry(row.instructor_id)
            .or_default()
            .push(TaughtCourseSummary {
                id: row.course_id,
                title: row.title,
                category_name: row.category_name,
                created_at: row.created_at,
                enrolled_students_count: row.enrolled_students_count,
            });
    }

    Ok(instructors
        .into_iter()
        .map(|u| {
            let created_courses = by_instructor.remove(&u.id).unwrap_or_default();
            let total_students = created_courses
                .iter()
                .map(|c| c.enrolled_students_count)
                .sum();
            InstructorOverview {
                id: u.id,
                name: u.name,
                email: u.email,
                role: u.role,
                created_at: u.created_at,
                updated_at: u.updated_at,
                created_courses,
                total_students,
            }
        })
        .collect())
}

#[derive(FromRow)]
struct EnrollmentPairRow {
    course_id: Uuid,
    student_id: Uuid,
}

pub async fn courses_overview(db: &PgPool) -> Result<Vec<CourseOverview>, sqlx::Error> {
    let courses = courses_repo::list_with_refs(db).await?;

    let pairs = sqlx::query_as::<_, EnrollmentPairRow>(
        r#"SELECT course_id, student_id FROM enrollments"#,
    )
    .fetch_all(db)
    .await?;

    let mut by_course: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for pair in pairs {
        by_course.entry(pair.course_id).or_default().push(pair.student_id);
    }

    Ok(courses
        .into_iter()
        .map(|c| {
            let enrolled_students = by_course.remove(&c.id).unwrap_or_default();
            CourseOverview {
                id: c.id,
                title: c.title,
                description: c.description,
                price: c.price,
                duration: c.duration,
                level: c.level,
                instructor: InstructorRef {
                    id: c.instructor_id,
                    name: c.instructor_name,
                    email: c.instructor_email,
                },
                category: CategoryRef {
                    id: c.category_id,
                    name: c.category_name,
                },
                created_at: c.created_at,
                updated_at: c.updated_at,
                enrolled_students,
            }
        })
        .collect())
}
