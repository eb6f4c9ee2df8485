//! Study-buddy match scoring.
//!
//! The score is computed live from subject-set overlap rather than
//! stored per candidate: `round(100 * |shared| / |requester subjects|)`,
//! clamped to `[0, 100]`. Subjects compare case-insensitively and the
//! shared-interest list preserves the requester's ordering.

use std::collections::HashSet;

use serde_json::Value as JsonValue;

use campus_core::{Profile, StudyBuddyCandidate, StudyBuddyRequest};

/// Subjects both parties share, in the requester's order, deduplicated.
pub fn shared_interests(requester: &[String], candidate: &[String]) -> Vec<String> {
    let candidate_set: HashSet<String> = candidate.iter().map(|s| s.to_lowercase()).collect();

    let mut seen = HashSet::new();
    requester
        .iter()
        .filter(|s| candidate_set.contains(&s.to_lowercase()))
        .filter(|s| seen.insert(s.to_lowercase()))
        .cloned()
        .collect()
}

/// Relevance of a candidate to the requester, as an integer in `[0, 100]`.
///
/// An empty requester set scores 0: with nothing declared, no candidate
/// is more relevant than another.
pub fn match_score(requester: &[String], candidate: &[String]) -> u8 {
    let requester_set: HashSet<String> = requester.iter().map(|s| s.to_lowercase()).collect();
    if requester_set.is_empty() {
        return 0;
    }

    let shared = shared_interests(requester, candidate).len();
    let raw = (100.0 * shared as f64 / requester_set.len() as f64).round();
    raw.clamp(0.0, 100.0) as u8
}

/// Turn a stored availability JSON value into a display list.
///
/// Only an array of strings is meaningful; anything else yields an
/// empty list rather than an error.
pub fn availability_list(value: Option<&JsonValue>) -> Vec<String> {
    match value {
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    }
}

/// Score and annotate candidates, sorted by descending match score.
///
/// Ties keep the incoming order (sort is stable), which preserves the
/// store's recency ordering for equally relevant candidates.
pub fn rank_candidates(
    requester_subjects: &[String],
    candidates: Vec<(Profile, StudyBuddyRequest)>,
) -> Vec<StudyBuddyCandidate> {
    let mut ranked: Vec<StudyBuddyCandidate> = candidates
        .into_iter()
        .map(|(profile, request)| StudyBuddyCandidate {
            user_id: profile.id,
            full_name: profile.full_name,
            avatar_url: profile.avatar_url,
            role: profile.role,
            major: profile.major,
            year_of_study: profile.year_of_study,
            match_score: match_score(requester_subjects, &request.subjects),
            shared_interests: shared_interests(requester_subjects, &request.subjects),
            availability: availability_list(request.availability.as_ref()),
            subjects: request.subjects,
        })
        .collect();

    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::UserRole;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn subjects(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn profile(name: &str) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            username: name.to_lowercase(),
            full_name: Some(name.to_string()),
            avatar_url: None,
            role: UserRole::Student,
            major: None,
            department: None,
            institution: None,
            year_of_study: None,
            academic_goals: None,
            bio: None,
            website: None,
            subjects_of_interest: vec![],
            skills: vec![],
            achievements: vec![],
            research_interests: vec![],
            availability: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(user_id: Uuid, subj: &[&str], availability: Option<JsonValue>) -> StudyBuddyRequest {
        StudyBuddyRequest {
            id: Uuid::new_v4(),
            user_id,
            subjects: subjects(subj),
            availability,
            description: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_shared_interests_is_subset_of_both() {
        let req = subjects(&["Computer Science", "Mathematics", "AI"]);
        let cand = subjects(&["computer science", "Physics", "ai"]);
        let shared = shared_interests(&req, &cand);
        assert_eq!(shared, subjects(&["Computer Science", "AI"]));

        for s in &shared {
            assert!(req.iter().any(|r| r.eq_ignore_ascii_case(s)));
            assert!(cand.iter().any(|c| c.eq_ignore_ascii_case(s)));
        }
    }

    #[test]
    fn test_shared_interests_deduplicates() {
        let req = subjects(&["AI", "ai", "AI"]);
        let cand = subjects(&["AI"]);
        assert_eq!(shared_interests(&req, &cand), subjects(&["AI"]));
    }

    #[test]
    fn test_score_formula() {
        let req = subjects(&["A", "B", "C", "D"]);
        assert_eq!(match_score(&req, &subjects(&["A", "B"])), 50);
        assert_eq!(match_score(&req, &subjects(&["A"])), 25);
        assert_eq!(match_score(&req, &subjects(&["A", "B", "C", "D"])), 100);
        assert_eq!(match_score(&req, &subjects(&["E"])), 0);
    }

    #[test]
    fn test_score_rounds() {
        // 2 of 3 → 66.7 → 67
        let req = subjects(&["A", "B", "C"]);
        assert_eq!(match_score(&req, &subjects(&["A", "B"])), 67);
        // 1 of 3 → 33.3 → 33
        assert_eq!(match_score(&req, &subjects(&["A"])), 33);
    }

    #[test]
    fn test_score_bounds() {
        let req = subjects(&["A"]);
        for cand in [vec![], subjects(&["A"]), subjects(&["A", "B", "C"])] {
            let score = match_score(&req, &cand);
            assert!(score <= 100);
        }
    }

    #[test]
    fn test_empty_requester_scores_zero() {
        assert_eq!(match_score(&[], &subjects(&["A", "B"])), 0);
    }

    #[test]
    fn test_duplicate_requester_subjects_do_not_dilute() {
        // Two unique subjects, both shared: 100, not 2/3.
        let req = subjects(&["A", "a", "B"]);
        assert_eq!(match_score(&req, &subjects(&["A", "B"])), 100);
    }

    #[test]
    fn test_availability_list() {
        let v = json!(["Mon: 2PM-5PM", "Wed: 3PM-6PM"]);
        assert_eq!(
            availability_list(Some(&v)),
            subjects(&["Mon: 2PM-5PM", "Wed: 3PM-6PM"])
        );
        assert!(availability_list(Some(&json!({"mon": true}))).is_empty());
        assert!(availability_list(None).is_empty());
    }

    #[test]
    fn test_rank_candidates_sorted_descending() {
        let req = subjects(&["Computer Science", "AI"]);

        let weak = profile("Maria Garcia");
        let strong = profile("Marcus Johnson");
        let none = profile("Sophia Chen");

        let candidates = vec![
            (weak.clone(), request(weak.id, &["Computer Science"], None)),
            (
                strong.clone(),
                request(strong.id, &["Computer Science", "AI"], None),
            ),
            (none.clone(), request(none.id, &["Business"], None)),
        ];

        let ranked = rank_candidates(&req, candidates);
        let scores: Vec<u8> = ranked.iter().map(|c| c.match_score).collect();
        assert_eq!(scores, vec![100, 50, 0]);
        assert_eq!(ranked[0].user_id, strong.id);
        assert_eq!(ranked[0].shared_interests, req);
    }
}
