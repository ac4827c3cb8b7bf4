use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::domain::{JobApplication, NewJobApplication, SearchFilter};
use super::repository::{JobApplicationRepository, RepositoryError};

const SELECT_COLUMNS: &str = "SELECT id, applied_date, company, role, applied_from_platform, \
     status, payment, contact, observation FROM job_applications";

#[derive(Debug, FromRow)]
struct JobApplicationRow {
    id: i32,
    applied_date: NaiveDateTime,
    company: String,
    role: String,
    applied_from_platform: String,
    status: String,
    payment: Option<Decimal>,
    contact: Option<String>,
    observation: Option<String>,
}

impl From<JobApplicationRow> for JobApplication {
    fn from(row: JobApplicationRow) -> Self {
        Self {
            id: row.id,
            applied_date: row.applied_date,
            company: row.company,
            role: row.role,
            applied_from_platform: row.applied_from_platform,
            status: row.status,
            payment: row.payment,
            contact: row.contact,
            observation: row.observation,
        }
    }
}

/// Repository over the `job_applications` table.
///
/// Every call checks a connection out of the pool for the duration of one
/// statement.
#[derive(Debug, Clone)]
pub struct PgJobApplicationRepository {
    pool: PgPool,
}

impl PgJobApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Wrap user input for `ILIKE` so it matches as a literal substring.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub(crate) fn search_query(filter: &SearchFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_COLUMNS);
    let mut separator = " WHERE ";

    for (column, needle) in [("company", filter.company()), ("role", filter.role())] {
        if let Some(needle) = needle {
            builder
                .push(separator)
                .push(column)
                .push(" ILIKE ")
                .push_bind(like_pattern(needle))
                .push(" ESCAPE '\\'");
            separator = " AND ";
        }
    }

    builder.push(" ORDER BY id");
    builder
}

#[async_trait]
impl JobApplicationRepository for PgJobApplicationRepository {
    async fn list(&self) -> Result<Vec<JobApplication>, RepositoryError> {
        let rows = sqlx::query_as::<_, JobApplicationRow>(
            "SELECT id, applied_date, company, role, applied_from_platform, status, payment, contact, observation
             FROM job_applications ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobApplication::from).collect())
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<JobApplication>, RepositoryError> {
        let rows = search_query(filter)
            .build_query_as::<JobApplicationRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(JobApplication::from).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<JobApplication>, RepositoryError> {
        let row = sqlx::query_as::<_, JobApplicationRow>(
            "SELECT id, applied_date, company, role, applied_from_platform, status, payment, contact, observation
             FROM job_applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(JobApplication::from))
    }

    async fn create(
        &self,
        application: NewJobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        let row = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            INSERT INTO job_applications
                (applied_date, company, role, applied_from_platform, status, payment, contact, observation)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, applied_date, company, role, applied_from_platform, status, payment, contact, observation
            "#,
        )
        .bind(application.applied_date)
        .bind(&application.company)
        .bind(&application.role)
        .bind(&application.applied_from_platform)
        .bind(&application.status)
        .bind(application.payment)
        .bind(&application.contact)
        .bind(&application.observation)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, application: &JobApplication) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE job_applications
            SET applied_date = $2,
                company = $3,
                role = $4,
                applied_from_platform = $5,
                status = $6,
                payment = $7,
                contact = $8,
                observation = $9
            WHERE id = $1
            "#,
        )
        .bind(application.id)
        .bind(application.applied_date)
        .bind(&application.company)
        .bind(&application.role)
        .bind(&application.applied_from_platform)
        .bind(&application.status)
        .bind(application.payment)
        .bind(&application.contact)
        .bind(&application.observation)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM job_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i32) -> Result<bool, RepositoryError> {
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM job_applications WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }
}
