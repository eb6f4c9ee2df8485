//! # campus-match
//!
//! The algorithmic core of campuslink: the closed predicate set used for
//! structured filtering, the free-text search predicates behind every
//! list surface, and the study-buddy match scoring heuristic.
//!
//! Everything in this crate is a pure function over already-fetched
//! data. Matched items keep their original order unless an explicit
//! ordering (recent, popular, match score) is asked for.

pub mod buddies;
pub mod filter;
pub mod search;

pub use buddies::{match_score, rank_candidates, shared_interests};
pub use filter::{FilterSet, Predicate};
pub use search::{
    alumni_matches, buddy_matches, event_matches, sort_popular, sort_recent, text_match,
    ResourceFilter,
};
