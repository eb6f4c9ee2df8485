//! HTTP handlers, grouped by surface.

pub mod alumni;
pub mod assistant;
pub mod connections;
pub mod events;
pub mod feedback;
pub mod messages;
pub mod profiles;
pub mod resources;
pub mod study_buddies;
