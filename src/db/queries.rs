use sqlx::{PgPool, Result};

use crate::db::models::UserRow;
use crate::domain::{Job, NewJob, NewUser};

// --- User Queries ---

pub async fn insert_user(pool: &PgPool, id: &str, user: &NewUser) -> Result<UserRow> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, full_name, email, password_hash, user_type, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&user.full_name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .fetch_one(pool)
    .await
}

pub async fn get_user_by_id(pool: &PgPool, id: &str) -> Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn update_user_by_email(
    pool: &PgPool,
    email: &str,
    full_name: Option<&str>,
    password_hash: Option<&str>,
) -> Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET full_name = COALESCE($2, full_name),
            password_hash = COALESCE($3, password_hash),
            updated_at = NOW()
        WHERE email = $1
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(full_name)
    .bind(password_hash)
    .fetch_optional(pool)
    .await
}

pub async fn delete_user_by_email(pool: &PgPool, email: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at ASC")
        .fetch_all(pool)
        .await
}

// --- Job Queries ---

pub async fn insert_job(pool: &PgPool, id: &str, job: &NewJob) -> Result<Job> {
    sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs (id, company_name, job_title, description, salary, created_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&job.company_name)
    .bind(&job.job_title)
    .bind(&job.description)
    .bind(&job.salary)
    .bind(&job.created_by)
    .fetch_one(pool)
    .await
}

pub async fn list_jobs(pool: &PgPool) -> Result<Vec<Job>> {
    sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn list_jobs_page(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Job>> {
    sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY created_at DESC LIMIT $1 OFFSET $2")
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_jobs(pool: &PgPool) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
        .fetch_one(pool)
        .await
}

pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
