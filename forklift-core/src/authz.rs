//! Authorization rules
//!
//! Role and assignment checks used by route handlers and templates. A missing
//! user is never privileged.

use serde::{Deserialize, Serialize};

use crate::domain::Role;
use crate::domain::pm_job::PmJob;
use crate::domain::workshop_job::WorkshopJob;

/// The logged-in user as cached in the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
}

/// A job that technicians can be assigned to
pub trait Assigned {
    fn assigned_user_ids(&self) -> Vec<i64>;
}

impl Assigned for PmJob {
    fn assigned_user_ids(&self) -> Vec<i64> {
        self.assigned.iter().map(|a| a.user_id).collect()
    }
}

impl Assigned for WorkshopJob {
    fn assigned_user_ids(&self) -> Vec<i64> {
        self.assigned.iter().map(|a| a.user_id).collect()
    }
}

pub fn is_admin(user: Option<&CurrentUser>) -> bool {
    matches!(user, Some(u) if u.role == Role::Admin)
}

pub fn is_supervisor(user: Option<&CurrentUser>) -> bool {
    matches!(user, Some(u) if u.role == Role::Supervisor)
}

/// Standard (technician) user
pub fn is_user(user: Option<&CurrentUser>) -> bool {
    matches!(user, Some(u) if u.role == Role::Technician)
}

/// Admins and supervisors may remove forklifts from the fleet
pub fn can_manage_fleet(user: Option<&CurrentUser>) -> bool {
    is_admin(user) || is_supervisor(user)
}

/// Whether `user` may edit or delete `job`.
///
/// Admins and supervisors always may; anyone else only when listed among the
/// job's assigned technicians.
pub fn is_assigned<J: Assigned + ?Sized>(user: Option<&CurrentUser>, job: &J) -> bool {
    if can_manage_fleet(user) {
        return true;
    }

    match user {
        Some(u) => job.assigned_user_ids().contains(&u.id),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeJob(Vec<i64>);

    impl Assigned for FakeJob {
        fn assigned_user_ids(&self) -> Vec<i64> {
            self.0.clone()
        }
    }

    fn user(id: i64, role: Role) -> CurrentUser {
        CurrentUser {
            id,
            name: format!("user-{id}"),
            email: None,
            role,
        }
    }

    #[test]
    fn test_role_predicates() {
        let admin = user(1, Role::Admin);
        let supervisor = user(2, Role::Supervisor);
        let tech = user(3, Role::Technician);

        assert!(is_admin(Some(&admin)));
        assert!(!is_admin(Some(&supervisor)));
        assert!(is_supervisor(Some(&supervisor)));
        assert!(is_user(Some(&tech)));
        assert!(!is_user(Some(&admin)));
    }

    #[test]
    fn test_missing_user_is_never_privileged() {
        assert!(!is_admin(None));
        assert!(!is_supervisor(None));
        assert!(!is_user(None));
        assert!(!can_manage_fleet(None));
        assert!(!is_assigned(None, &FakeJob(vec![1, 2])));
    }

    #[test]
    fn test_fleet_management_requires_admin_or_supervisor() {
        assert!(can_manage_fleet(Some(&user(1, Role::Admin))));
        assert!(can_manage_fleet(Some(&user(2, Role::Supervisor))));
        assert!(!can_manage_fleet(Some(&user(3, Role::Technician))));
    }

    #[test]
    fn test_technician_must_be_assigned() {
        let job = FakeJob(vec![5, 7]);

        assert!(is_assigned(Some(&user(5, Role::Technician)), &job));
        assert!(!is_assigned(Some(&user(6, Role::Technician)), &job));
        assert!(!is_assigned(
            Some(&user(6, Role::Technician)),
            &FakeJob(vec![])
        ));
    }

    #[test]
    fn test_admin_and_supervisor_bypass_assignment() {
        let job = FakeJob(vec![]);

        assert!(is_assigned(Some(&user(1, Role::Admin)), &job));
        assert!(is_assigned(Some(&user(2, Role::Supervisor)), &job));
    }
}
