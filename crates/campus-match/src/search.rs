//! Free-text search predicates for the list surfaces.
//!
//! The contract shared by every surface: a case-insensitive substring
//! match of the query against the surface's text fields OR any element
//! of its collection fields, AND-ed with exact-match categorical
//! filters. An empty query or filter value passes everything through.
//! No ranking is applied; matched items keep their original order.

use campus_core::{Event, Profile, Resource, StudyBuddyCandidate};

/// Case-insensitive substring match across text fields and collections.
///
/// An empty or whitespace-only query matches everything.
pub fn text_match(query: &str, fields: &[Option<&str>], collections: &[&[String]]) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let field_hit = fields
        .iter()
        .flatten()
        .any(|f| f.to_lowercase().contains(&needle));

    field_hit
        || collections
            .iter()
            .flat_map(|c| c.iter())
            .any(|item| item.to_lowercase().contains(&needle))
}

/// Query plus categorical filters for the resource list.
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub query: Option<String>,
    /// Exact category match ("subject" dropdown).
    pub subject: Option<String>,
    /// Exact category match ("type" dropdown).
    pub kind: Option<String>,
}

impl ResourceFilter {
    /// Decide membership of one resource in the filtered result list.
    ///
    /// An unknown `subject` or `kind` value matches no category, so the
    /// result set comes back empty rather than erroring.
    pub fn matches(&self, resource: &Resource) -> bool {
        let query_ok = match &self.query {
            Some(q) => text_match(
                q,
                &[Some(&resource.title), resource.description.as_deref()],
                &[],
            ),
            None => true,
        };

        let category = resource.category.to_string();
        let subject_ok = matches_category(self.subject.as_deref(), &category);
        let kind_ok = matches_category(self.kind.as_deref(), &category);

        query_ok && subject_ok && kind_ok
    }
}

fn matches_category(filter: Option<&str>, category: &str) -> bool {
    match filter {
        None => true,
        Some(f) if f.is_empty() => true,
        Some(f) => f == category,
    }
}

/// Event surface: title, description, category, location.
pub fn event_matches(event: &Event, query: &str) -> bool {
    text_match(
        query,
        &[
            Some(&event.title),
            event.description.as_deref(),
            event.category.as_deref(),
            event.location.as_deref(),
        ],
        &[],
    )
}

/// Study-buddy surface: candidate name or any subject.
pub fn buddy_matches(candidate: &StudyBuddyCandidate, query: &str) -> bool {
    text_match(
        query,
        &[candidate.full_name.as_deref()],
        &[&candidate.subjects],
    )
}

/// Alumni directory: name, institution, major, or any skill or
/// research interest.
pub fn alumni_matches(profile: &Profile, query: &str) -> bool {
    text_match(
        query,
        &[
            profile.full_name.as_deref(),
            profile.institution.as_deref(),
            profile.major.as_deref(),
        ],
        &[&profile.skills, &profile.research_interests],
    )
}

/// Newest first, by creation timestamp.
pub fn sort_recent(resources: &mut [Resource]) {
    resources.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Most downloaded first. Ties keep the recent-first order stable.
pub fn sort_popular(resources: &mut [Resource]) {
    sort_recent(resources);
    resources.sort_by(|a, b| b.downloads.cmp(&a.downloads));
}
