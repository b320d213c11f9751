//! Role and ownership checks, applied after the caller is authenticated.
//! Denials are always 403; a missing or bad token never reaches here.

use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::{AppError, AppResult};
use crate::users::repo::Role;

pub fn ensure_admin(caller: &AuthUser) -> AppResult<()> {
    if caller.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::forbidden("Access denied. Admin role required."))
    }
}

pub fn ensure_self_or_admin(caller: &AuthUser, target: Uuid) -> AppResult<()> {
    if caller.role == Role::Admin || caller.id == target {
        Ok(())
    } else {
        Err(AppError::forbidden("Access denied"))
    }
}

pub fn ensure_student(caller: &AuthUser) -> AppResult<()> {
    if caller.role == Role::Student {
        Ok(())
    } else {
        Err(AppError::forbidden("Only students can enroll in courses"))
    }
}

/// The caller must be the instructor who owns the course, or an admin.
pub fn ensure_course_owner_or_admin(caller: &AuthUser, instructor_id: Uuid) -> AppResult<()> {
    if caller.role == Role::Admin || caller.id == instructor_id {
        Ok(())
    } else {
        Err(AppError::forbidden("Access denied"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn admin_gate_rejects_non_admins() {
        assert!(ensure_admin(&caller(Role::Admin)).is_ok());
        assert!(ensure_admin(&caller(Role::Student)).is_err());
        assert!(ensure_admin(&caller(Role::Instructor)).is_err());
    }

    #[test]
    fn self_or_admin_allows_owner_and_admin_only() {
        let me = caller(Role::Student);
        assert!(ensure_self_or_admin(&me, me.id).is_ok());
        assert!(ensure_self_or_admin(&me, Uuid::new_v4()).is_err());
        assert!(ensure_self_or_admin(&caller(Role::Admin), Uuid::new_v4()).is_ok());
    }

    #[test]
    fn only_students_pass_the_enrollment_gate() {
        assert!(ensure_student(&caller(Role::Student)).is_ok());
        let err = ensure_student(&caller(Role::Instructor)).unwrap_err();
        assert_eq!(err.to_string(), "Only students can enroll in courses");
        assert!(ensure_student(&caller(Role::Admin)).is_err());
    }

    #[test]
    fn course_roster_is_owner_or_admin_scoped() {
        let instructor = caller(Role::Instructor);
        assert!(ensure_course_owner_or_admin(&instructor, instructor.id).is_ok());
        // another instructor's course
        assert!(ensure_course_owner_or_admin(&instructor, Uuid::new_v4()).is_err());
        assert!(ensure_course_owner_or_admin(&caller(Role::Admin), Uuid::new_v4()).is_ok());
        assert!(ensure_course_owner_or_admin(&caller(Role::Student), Uuid::new_v4()).is_err());
    }

    #[test]
    fn denials_are_forbidden_not_unauthenticated() {
        let err = ensure_admin(&caller(Role::Student)).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
