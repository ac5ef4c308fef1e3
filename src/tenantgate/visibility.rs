//! Filters an organization's projects down to what a user may see and
//! annotates each with how the view layer should present it.

use super::access;
use super::model::{Organization, Project, User};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CssState {
    Normal,
    GrayedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectEntry<'a> {
    pub project: &'a Project,
    pub admin_view: bool,
    pub css_state: CssState,
    pub link: String,
}

/// Link to a project's elements on the default branch.
#[must_use]
pub fn project_link(org_id: &str, project_id: &str) -> String {
    format!("/orgs/{org_id}/projects/{project_id}/branches/master/elements")
}

/// Projects of `org` visible to `user`, in the organization's order.
///
/// Admins get every project, archived ones grayed out. Non-admins only get
/// projects passing [`access::is_visible`], never grayed out.
#[must_use]
pub fn filter_projects<'a>(user: &User, org: &'a Organization) -> Vec<ProjectEntry<'a>> {
    org.projects
        .iter()
        .filter(|project| access::is_visible(user, project))
        .map(|project| ProjectEntry {
            project,
            admin_view: user.admin,
            css_state: if user.admin && project.archived {
                CssState::GrayedOut
            } else {
                CssState::Normal
            },
            link: project_link(&org.id, &project.id),
        })
        .collect()
}
