//! Audience targeting.
//!
//! Decides whether an activity or announcement is meant for a given profile.
//! Axes are combined with OR: matching any one non-empty targeting set is
//! enough. This differs on purpose from the roster facet filter, which is AND.

use db::models::activity::Model as Activity;
use db::models::announcement::{Audience, Model as Announcement};
use db::models::profile::{Model as Profile, Role};
use db::models::targets::{IdSet, YearSet};

/// Anything that can be restricted to a subset of profiles.
pub trait Targetable {
    /// Audience category, if the item declares one.
    fn audience(&self) -> Option<Audience> {
        None
    }
    fn target_classrooms(&self) -> &IdSet;
    fn target_departments(&self) -> &IdSet;
    fn target_year_levels(&self) -> &YearSet;

    fn has_no_restrictions(&self) -> bool {
        self.target_classrooms().is_empty()
            && self.target_departments().is_empty()
            && self.target_year_levels().is_empty()
    }
}

impl Targetable for Activity {
    fn target_classrooms(&self) -> &IdSet {
        &self.target_classrooms
    }

    fn target_departments(&self) -> &IdSet {
        &self.target_departments
    }

    fn target_year_levels(&self) -> &YearSet {
        &self.target_year_levels
    }
}

impl Targetable for Announcement {
    fn audience(&self) -> Option<Audience> {
        Some(self.target_audience)
    }

    fn target_classrooms(&self) -> &IdSet {
        &self.target_classrooms
    }

    fn target_departments(&self) -> &IdSet {
        &self.target_departments
    }

    fn target_year_levels(&self) -> &YearSet {
        &self.target_year_levels
    }
}

/// Whether `audience` addresses the role class `role` belongs to.
pub fn audience_includes(audience: Audience, role: Role) -> bool {
    match audience {
        Audience::All => true,
        Audience::Students => role == Role::Student,
        Audience::Teachers => role == Role::Teacher,
        Audience::Staff => matches!(role, Role::Staff | Role::Admin),
    }
}

/// Eligibility of `profile` for `item`.
///
/// Missing profile fields never match their axis; this function cannot fail.
pub fn is_eligible<T: Targetable + ?Sized>(profile: &Profile, item: &T) -> bool {
    match item.audience() {
        Some(audience) if audience_includes(audience, profile.role) => return true,
        Some(_) => {}
        None if item.has_no_restrictions() => return true,
        None => {}
    }

    let classrooms = item.target_classrooms();
    let departments = item.target_departments();
    let years = item.target_year_levels();

    let in_classroom = !classrooms.is_empty()
        && profile.classroom_id.is_some_and(|id| classrooms.contains(id));
    let in_department = !departments.is_empty()
        && profile.department_id.is_some_and(|id| departments.contains(id));
    let in_year = !years.is_empty() && profile.year_level.is_some_and(|y| years.contains(y));

    in_classroom || in_department || in_year
}
