//! Notification audiences
//!
//! Pure audience computation; the side-effect layer writes the rows.
//! Transition fan-out targets the receiving department's staff plus admins.
//! Sales only hears about dispatch and completion. The actor never notifies
//! themselves.

use crate::db::models::Profile;
use shared::workflow::{Department, Priority, Role, Stage};

/// Department whose staff act on an item entering `stage`. Dispatch and
/// completion land on the production floor, which packs and hands over;
/// outsourced work is chased by the same floor since no role maps to the
/// outsource department.
fn acting_department(stage: Stage) -> Department {
    match stage {
        Stage::Outsource | Stage::Dispatch | Stage::Completed => Department::Production,
        other => Department::for_stage(other),
    }
}

fn recipient_id(profile: &Profile) -> Option<String> {
    profile.id.as_ref().map(|t| t.to_string())
}

/// Recipients for an item moving into `to_stage`. `profiles` is the active
/// staff list; `actor_id` is excluded.
pub fn transition_audience(
    profiles: &[Profile],
    to_stage: Stage,
    actor_id: &str,
) -> Vec<String> {
    let dept = acting_department(to_stage);
    let sales_included = matches!(to_stage, Stage::Dispatch | Stage::Completed);

    let mut out = Vec::new();
    for profile in profiles {
        if !profile.is_active {
            continue;
        }
        let include = match profile.role {
            Role::Admin => true,
            Role::Sales => sales_included,
            role => role.department() == Some(dept),
        };
        if !include {
            continue;
        }
        if let Some(id) = recipient_id(profile) {
            if id != actor_id {
                out.push(id);
            }
        }
    }
    out
}

/// Recipients for a priority escalation to High: admins plus the staff of
/// the department currently holding the item. Deliberately smaller than the
/// transition fan-out.
pub fn escalation_audience(
    profiles: &[Profile],
    holding: Department,
    actor_id: &str,
) -> Vec<String> {
    let mut out = Vec::new();
    for profile in profiles {
        if !profile.is_active {
            continue;
        }
        let include = match profile.role {
            Role::Admin => true,
            role => role.department() == Some(holding),
        };
        if !include {
            continue;
        }
        if let Some(id) = recipient_id(profile) {
            if id != actor_id {
                out.push(id);
            }
        }
    }
    out
}

/// Whether a recomputed priority warrants an escalation notice
pub fn escalated(old: Priority, new: Priority) -> bool {
    new == Priority::High && old != Priority::High
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, role: Role, active: bool) -> Profile {
        Profile {
            id: Some(format!("profile:{}", id).parse().unwrap()),
            username: id.to_string(),
            display_name: id.to_string(),
            password_hash: String::new(),
            role,
            specialty: None,
            is_active: active,
        }
    }

    fn staff() -> Vec<Profile> {
        vec![
            profile("admin1", Role::Admin, true),
            profile("sales1", Role::Sales, true),
            profile("design1", Role::Design, true),
            profile("prepress1", Role::Prepress, true),
            profile("prod1", Role::Production, true),
            profile("prod2", Role::Production, false),
        ]
    }

    #[test]
    fn midstream_move_skips_sales() {
        let ids = transition_audience(&staff(), Stage::Prepress, "profile:sales1");
        assert!(ids.contains(&"profile:admin1".to_string()));
        assert!(ids.contains(&"profile:prepress1".to_string()));
        assert!(!ids.contains(&"profile:sales1".to_string()));
        assert!(!ids.contains(&"profile:design1".to_string()));
    }

    #[test]
    fn dispatch_reaches_sales_and_maps_to_production() {
        let ids = transition_audience(&staff(), Stage::Dispatch, "profile:prod1");
        assert!(ids.contains(&"profile:sales1".to_string()));
        assert!(ids.contains(&"profile:admin1".to_string()));
        // Acting department is production, not a dispatch desk
        assert!(!ids.contains(&"profile:prod1".to_string())); // actor excluded
        assert!(!ids.contains(&"profile:design1".to_string()));
    }

    #[test]
    fn outsource_notifies_the_production_floor() {
        let ids = transition_audience(&staff(), Stage::Outsource, "profile:prepress1");
        assert!(ids.contains(&"profile:prod1".to_string()));
        assert!(ids.contains(&"profile:admin1".to_string()));
        assert!(!ids.contains(&"profile:sales1".to_string()));
        assert!(!ids.contains(&"profile:prepress1".to_string()));
    }

    #[test]
    fn actor_and_inactive_staff_are_excluded() {
        let ids = transition_audience(&staff(), Stage::Production, "profile:admin1");
        assert!(!ids.contains(&"profile:admin1".to_string()));
        assert!(ids.contains(&"profile:prod1".to_string()));
        assert!(!ids.contains(&"profile:prod2".to_string()));
    }

    #[test]
    fn escalation_fans_out_smaller() {
        let ids = escalation_audience(&staff(), Department::Design, "profile:sales1");
        assert!(ids.contains(&"profile:admin1".to_string()));
        assert!(ids.contains(&"profile:design1".to_string()));
        assert!(!ids.contains(&"profile:prepress1".to_string()));
        assert!(!ids.contains(&"profile:sales1".to_string()));
    }

    #[test]
    fn escalation_only_on_crossing_into_high() {
        assert!(escalated(Priority::Low, Priority::High));
        assert!(escalated(Priority::Medium, Priority::High));
        assert!(!escalated(Priority::High, Priority::High));
        assert!(!escalated(Priority::Low, Priority::Medium));
    }
}
