//! Authorization rules over in-memory user and role values.
//!
//! Pure functions so the rules stay testable without a database. Looking
//! up the actor and target rows is the caller's job.

use crate::database::models::{Role, User};

/// Role id that carries HR-wide privileges.
pub const HR_ROLE_ID: i32 = 1;
/// Department whose members carry HR-wide privileges.
pub const PROTECTED_DEPARTMENT: &str = "HR";
/// Position treated as senior management with system-wide reach.
pub const SENIOR_MANAGEMENT_POSITION: &str = "Director";

/// Mutating actions the policy distinguishes. Every action currently
/// shares one rule chain; the discriminant keeps call sites honest
/// about what they are asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Approve,
    Reject,
    Edit,
    Delete,
}

pub fn can_view(actor: &User, actor_role: Option<&Role>, target: &User) -> bool {
    permits(actor, actor_role, target)
}

pub fn can_mutate(actor: &User, actor_role: Option<&Role>, target: &User, _action: Action) -> bool {
    permits(actor, actor_role, target)
}

/// The rule chain, evaluated in order. First match wins.
fn permits(actor: &User, actor_role: Option<&Role>, target: &User) -> bool {
    // 1. Own records are always accessible.
    if actor.staff_id == target.staff_id {
        return true;
    }

    // 2. Managers reach their direct reports, never transitive ones.
    if role_title_is(actor_role, "Manager") && target.reporting_manager == Some(actor.staff_id) {
        return true;
    }

    // 3. HR, whether by role or by department, reaches its own
    //    department, and everything when the actor is senior management.
    if is_hr(actor, actor_role) {
        if actor
            .position
            .eq_ignore_ascii_case(SENIOR_MANAGEMENT_POSITION)
        {
            return true;
        }
        if !actor.department.is_empty()
            && actor.department.eq_ignore_ascii_case(&target.department)
        {
            return true;
        }
    }

    // 4. Fail closed.
    false
}

fn role_title_is(role: Option<&Role>, title: &str) -> bool {
    role.is_some_and(|r| r.title.eq_ignore_ascii_case(title))
}

fn is_hr(actor: &User, actor_role: Option<&Role>) -> bool {
    actor.role_id == HR_ROLE_ID
        || role_title_is(actor_role, "HR")
        || actor.department.eq_ignore_ascii_case(PROTECTED_DEPARTMENT)
}

/// The check behind the role-authorization endpoint. Deliberately
/// disjunctive: the user is authorized when EITHER probe matches, the
/// role id and the department are never required together.
pub fn role_or_department_matches(
    user: &User,
    role_id: Option<i32>,
    department: Option<&str>,
) -> bool {
    if let Some(role_id) = role_id {
        if user.role_id == role_id {
            return true;
        }
    }
    if let Some(department) = department {
        if !department.is_empty() && user.department.eq_ignore_ascii_case(department) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(
        staff_id: i32,
        department: &str,
        position: &str,
        role_id: i32,
        reporting_manager: Option<i32>,
    ) -> User {
        User {
            staff_id,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            department: department.to_string(),
            position: position.to_string(),
            country: "USA".to_string(),
            email: format!("user{staff_id}@example.com"),
            reporting_manager,
            role_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn role(id: i32, title: &str) -> Role {
        Role {
            id,
            title: title.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_own_records_always_allowed() {
        let actor = user(1, "Engineering", "Staff", 2, None);
        assert!(can_view(&actor, None, &actor));
        assert!(can_mutate(&actor, None, &actor, Action::Edit));
    }

    #[test]
    fn test_manager_reaches_direct_reports_only() {
        let manager = user(10, "Engineering", "Manager", 3, None);
        let report = user(11, "Engineering", "Staff", 2, Some(10));
        let indirect = user(12, "Engineering", "Staff", 2, Some(11));
        let manager_role = role(3, "Manager");

        assert!(can_view(&manager, Some(&manager_role), &report));
        assert!(can_mutate(
            &manager,
            Some(&manager_role),
            &report,
            Action::Approve
        ));
        // Reports of reports are out of reach.
        assert!(!can_view(&manager, Some(&manager_role), &indirect));
    }

    #[test]
    fn test_manager_title_required_for_report_access() {
        let actor = user(10, "Engineering", "Staff", 2, None);
        let report = user(11, "Engineering", "Staff", 2, Some(10));

        // Same reporting line, but the actor's role is not Manager.
        assert!(!can_view(&actor, Some(&role(2, "Staff")), &report));
        // A missing role record fails closed.
        assert!(!can_view(&actor, None, &report));
    }

    #[test]
    fn test_hr_reaches_own_department() {
        let hr = user(20, "HR", "Executive", 1, None);
        let colleague = user(21, "HR", "Staff", 2, None);
        let outsider = user(22, "Finance", "Staff", 2, None);
        let hr_role = role(1, "HR");

        assert!(can_view(&hr, Some(&hr_role), &colleague));
        assert!(!can_view(&hr, Some(&hr_role), &outsider));
    }

    #[test]
    fn test_hr_senior_management_reaches_everyone() {
        let director = user(30, "HR", "Director", 1, None);
        let anyone = user(31, "Sales", "Staff", 2, Some(99));
        assert!(can_mutate(
            &director,
            Some(&role(1, "HR")),
            &anyone,
            Action::Delete
        ));
    }

    #[test]
    fn test_non_hr_director_has_no_global_reach() {
        // Senior management reach only applies through the HR rule.
        let director = user(32, "Sales", "Director", 2, None);
        let anyone = user(33, "Engineering", "Staff", 2, None);
        assert!(!can_view(&director, Some(&role(2, "Staff")), &anyone));
    }

    #[test]
    fn test_empty_department_fails_closed() {
        let actor = user(40, "", "Staff", 1, None);
        let target = user(41, "", "Staff", 2, None);
        assert!(!can_view(&actor, None, &target));
    }

    #[test]
    fn test_role_or_department_check_is_disjunctive() {
        let finance_user = user(1, "Finance", "Staff", 1, None);

        // Neither probe matches.
        assert!(!role_or_department_matches(
            &finance_user,
            Some(2),
            Some("HR")
        ));
        // The role alone suffices.
        assert!(role_or_department_matches(
            &finance_user,
            Some(1),
            Some("HR")
        ));
        // The department alone suffices.
        assert!(role_or_department_matches(
            &finance_user,
            Some(2),
            Some("Finance")
        ));
    }

    #[test]
    fn test_role_check_without_probes_denies() {
        let finance_user = user(1, "Finance", "Staff", 1, None);
        assert!(!role_or_department_matches(&finance_user, None, None));
        assert!(!role_or_department_matches(&finance_user, None, Some("")));
    }
}
