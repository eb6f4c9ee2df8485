//! Profile repository implementation.
//!
//! Profiles are provisioned by the external auth layer. This repository
//! reads them, applies owner edits, and serves the alumni directory.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use campus_core::{
    Error, Profile, ProfileRepository, Publication, Result, UpdateProfileRequest, UserRole,
};

const PROFILE_COLUMNS: &str = "id, username, full_name, avatar_url, role::text AS role, major, \
     department, institution, year_of_study, academic_goals, bio, website, \
     subjects_of_interest, skills, achievements, research_interests, availability, \
     created_at, updated_at";

pub(crate) fn profile_from_row(row: &PgRow) -> Result<Profile> {
    let role: String = row.get("role");
    Ok(Profile {
        id: row.get("id"),
        username: row.get("username"),
        full_name: row.get("full_name"),
        avatar_url: row.get("avatar_url"),
        role: role.parse::<UserRole>()?,
        major: row.get("major"),
        department: row.get("department"),
        institution: row.get("institution"),
        year_of_study: row.get("year_of_study"),
        academic_goals: row.get("academic_goals"),
        bio: row.get("bio"),
        website: row.get("website"),
        subjects_of_interest: row
            .get::<Option<Vec<String>>, _>("subjects_of_interest")
            .unwrap_or_default(),
        skills: row.get::<Option<Vec<String>>, _>("skills").unwrap_or_default(),
        achievements: row
            .get::<Option<Vec<String>>, _>("achievements")
            .unwrap_or_default(),
        research_interests: row
            .get::<Option<Vec<String>>, _>("research_interests")
            .unwrap_or_default(),
        availability: row.get("availability"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// PostgreSQL implementation of ProfileRepository.
pub struct PgProfileRepository {
    pool: Pool<Postgres>,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn fetch(&self, id: Uuid) -> Result<Profile> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::ProfileNotFound(id))?;

        profile_from_row(&row)
    }

    async fn fetch_many(&self, ids: &[Uuid]) -> Result<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE id = ANY($1)",
            PROFILE_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(profile_from_row).collect()
    }

    async fn update(&self, id: Uuid, req: UpdateProfileRequest) -> Result<Profile> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r#"
            UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                avatar_url = COALESCE($3, avatar_url),
                major = COALESCE($4, major),
                department = COALESCE($5, department),
                institution = COALESCE($6, institution),
                year_of_study = COALESCE($7, year_of_study),
                academic_goals = COALESCE($8, academic_goals),
                bio = COALESCE($9, bio),
                website = COALESCE($10, website),
                subjects_of_interest = COALESCE($11, subjects_of_interest),
                skills = COALESCE($12, skills),
                achievements = COALESCE($13, achievements),
                research_interests = COALESCE($14, research_interests),
                availability = COALESCE($15, availability),
                updated_at = $16
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(id)
        .bind(req.full_name)
        .bind(req.avatar_url)
        .bind(req.major)
        .bind(req.department)
        .bind(req.institution)
        .bind(req.year_of_study)
        .bind(req.academic_goals)
        .bind(req.bio)
        .bind(req.website)
        .bind(req.subjects_of_interest)
        .bind(req.skills)
        .bind(req.achievements)
        .bind(req.research_interests)
        .bind(req.availability)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::ProfileNotFound(id))?;

        profile_from_row(&row)
    }

    async fn list_alumni(&self) -> Result<Vec<Profile>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE role = 'alumni' ORDER BY full_name NULLS LAST",
            PROFILE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(profile_from_row).collect()
    }

    async fn publications_for(&self, user_id: Uuid) -> Result<Vec<Publication>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, abstract_text, doi, url, keywords,
                   published_date, created_at
            FROM publications
            WHERE user_id = $1
            ORDER BY published_date DESC NULLS LAST, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| Publication {
                id: row.get("id"),
                user_id: row.get("user_id"),
                title: row.get("title"),
                abstract_text: row.get("abstract_text"),
                doi: row.get("doi"),
                url: row.get("url"),
                keywords: row
                    .get::<Option<Vec<String>>, _>("keywords")
                    .unwrap_or_default(),
                published_date: row.get("published_date"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    async fn research_interest_names(&self, user_id: Uuid) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT ra.name
            FROM user_research_interests uri
            JOIN research_areas ra ON ra.id = uri.research_area_id
            WHERE uri.user_id = $1
            ORDER BY ra.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(|row| row.get("name")).collect())
    }
}
