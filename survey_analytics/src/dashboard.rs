//! Figures shown on the administration dashboard.

use log::debug;

use crate::config::*;
use crate::session::Session;

const MALE_LABELS: [&str; 2] = ["पुरुष", "Male"];
const FEMALE_LABELS: [&str; 2] = ["महिला", "Female"];
const RECENT_USERS: usize = 5;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AdminOverview {
    pub total_users: u64,
    pub total_submissions: u64,
    /// The ward with the most submissions and its count.
    pub top_ward: Option<(String, u64)>,
    pub male_count: u64,
    pub female_count: u64,
    pub admin_count: u64,
    /// Newest first.
    pub recent_users: Vec<User>,
}

/// Computes the overview figures. Only administrators may see them.
///
/// Users are expected in registration order, as returned by the user list.
pub fn admin_overview(
    session: &Session,
    submissions: &[Submission],
    users: &[User],
) -> Result<AdminOverview, AnalyticsErrors> {
    session.require_admin()?;

    let mut ward_counts: Vec<(String, u64)> = Vec::new();
    for s in submissions.iter() {
        let w = s.ward_number.as_deref().unwrap_or_default().trim().to_string();
        match ward_counts.iter().position(|(x, _)| *x == w) {
            Some(idx) => ward_counts[idx].1 += 1,
            None => ward_counts.push((w, 1)),
        }
    }
    debug!("admin_overview: ward counts: {:?}", ward_counts);
    // Stable: the first ward seen wins a tie.
    ward_counts.sort_by(|a, b| b.1.cmp(&a.1));

    let count_gender = |labels: &[&str]| -> u64 {
        submissions
            .iter()
            .filter(|s| {
                s.gender
                    .as_deref()
                    .map(|g| labels.contains(&g))
                    .unwrap_or(false)
            })
            .count() as u64
    };

    Ok(AdminOverview {
        total_users: users.len() as u64,
        total_submissions: submissions.len() as u64,
        top_ward: ward_counts.into_iter().next(),
        male_count: count_gender(&MALE_LABELS),
        female_count: count_gender(&FEMALE_LABELS),
        admin_count: users.iter().filter(|u| u.has_role("admin")).count() as u64,
        recent_users: users.iter().rev().take(RECENT_USERS).cloned().collect(),
    })
}

/// Case-insensitive search on the user name or the email. An empty term matches everyone.
pub fn search_users(
    session: &Session,
    users: &[User],
    term: &str,
) -> Result<Vec<User>, AnalyticsErrors> {
    session.require_admin()?;
    let t = term.to_lowercase();
    Ok(users
        .iter()
        .filter(|u| u.username.to_lowercase().contains(&t) || u.email.to_lowercase().contains(&t))
        .cloned()
        .collect())
}
