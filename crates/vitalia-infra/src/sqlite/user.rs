//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `vitalia-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader for SELECTs,
//! writer for mutations.

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use vitalia_core::auth::repository::UserRepository;
use vitalia_types::error::RepositoryError;
use vitalia_types::user::{FitnessLevel, ProfileUpdate, UserAccount, UserProfile};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain UserAccount.
struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    is_verified: i64,
    is_active: i64,
    created_at: String,
    updated_at: String,
    last_login: Option<String>,
    age: Option<i64>,
    height: Option<String>,
    weight: Option<String>,
    fitness_level: Option<String>,
    health_goals: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            is_verified: row.try_get("is_verified")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            last_login: row.try_get("last_login")?,
            age: row.try_get("age")?,
            height: row.try_get("height")?,
            weight: row.try_get("weight")?,
            fitness_level: row.try_get("fitness_level")?,
            health_goals: row.try_get("health_goals")?,
        })
    }

    fn into_account(self) -> Result<UserAccount, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;
        let last_login = self.last_login.as_deref().map(parse_datetime).transpose()?;
        let fitness_level: Option<FitnessLevel> = self
            .fitness_level
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(RepositoryError::Query)?;
        let health_goals: Vec<String> = serde_json::from_str(&self.health_goals)
            .map_err(|e| RepositoryError::Query(format!("invalid health_goals: {e}")))?;

        Ok(UserAccount {
            id,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            is_verified: self.is_verified != 0,
            is_active: self.is_active != 0,
            created_at,
            updated_at,
            last_login,
            profile: UserProfile {
                age: self.age.map(|v| v as u8),
                height: self.height,
                weight: self.weight,
                fitness_level,
                health_goals,
            },
        })
    }
}

fn goals_json(goals: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(goals)
        .map_err(|e| RepositoryError::Query(format!("invalid health_goals: {e}")))
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &UserAccount) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO users (id, email, password_hash, first_name, last_name, is_verified, is_active, created_at, updated_at, last_login, age, height, weight, fitness_level, health_goals)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_verified as i64)
        .bind(user.is_active as i64)
        .bind(format_datetime(&user.created_at))
        .bind(format_datetime(&user.updated_at))
        .bind(user.last_login.as_ref().map(format_datetime))
        .bind(user.profile.age.map(|v| v as i64))
        .bind(&user.profile.height)
        .bind(&user.profile.weight)
        .bind(user.profile.fitness_level.map(|v| v.to_string()))
        .bind(goals_json(&user.profile.health_goals)?)
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(RepositoryError::Conflict("users.email".to_string()))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_account()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserAccount>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_account()?))
            }
            None => Ok(None),
        }
    }

    async fn mark_verified(&self, email: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE users SET is_verified = 1, updated_at = ? WHERE email = ?")
            .bind(format_datetime(&Utc::now()))
            .bind(email)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_last_login(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(format_datetime(&Utc::now()))
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_profile(
        &self,
        id: &Uuid,
        update: &ProfileUpdate,
    ) -> Result<UserAccount, RepositoryError> {
        let mut user = self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)?;

        if let Some(v) = &update.first_name {
            user.first_name = v.clone();
        }
        if let Some(v) = &update.last_name {
            user.last_name = v.clone();
        }
        if let Some(v) = update.age {
            user.profile.age = Some(v);
        }
        if let Some(v) = &update.height {
            user.profile.height = Some(v.clone());
        }
        if let Some(v) = &update.weight {
            user.profile.weight = Some(v.clone());
        }
        if let Some(v) = update.fitness_level {
            user.profile.fitness_level = Some(v);
        }
        if let Some(v) = &update.health_goals {
            user.profile.health_goals = v.clone();
        }
        user.updated_at = Utc::now();

        let result = sqlx::query(
            r#"UPDATE users
               SET first_name = ?, last_name = ?, age = ?, height = ?, weight = ?,
                   fitness_level = ?, health_goals = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.profile.age.map(|v| v as i64))
        .bind(&user.profile.height)
        .bind(&user.profile.weight)
        .bind(user.profile.fitness_level.map(|v| v.to_string()))
        .bind(goals_json(&user.profile.health_goals)?)
        .bind(format_datetime(&user.updated_at))
        .bind(user.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(user)
    }

    async fn update_password_hash(
        &self,
        id: &Uuid,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(format_datetime(&Utc::now()))
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_user(email: &str) -> UserAccount {
        let now = Utc::now();
        UserAccount {
            id: Uuid::now_v7(),
            email: email.to_string(),
            password_hash: "$2b$12$fakehash".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            is_verified: false,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
            profile: UserProfile::default(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let user = make_user("a@example.com");
        repo.create(&user).await.unwrap();

        let found = repo.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, user.password_hash);
        assert!(!found.is_verified);
        assert!(found.is_active);
        assert!(found.last_login.is_none());
        assert!(found.profile.health_goals.is_empty());

        let by_id = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@example.com");

        assert!(repo.find_by_email("missing@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        repo.create(&make_user("dup@example.com")).await.unwrap();
        let err = repo.create(&make_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_mark_verified_and_last_login() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let user = make_user("verify@example.com");
        repo.create(&user).await.unwrap();

        assert!(repo.mark_verified("verify@example.com").await.unwrap());
        assert!(!repo.mark_verified("nobody@example.com").await.unwrap());

        assert!(repo.update_last_login(&user.id).await.unwrap());

        let found = repo.find_by_email("verify@example.com").await.unwrap().unwrap();
        assert!(found.is_verified);
        assert!(found.last_login.is_some());
    }

    #[tokio::test]
    async fn test_update_profile_merges_fields() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let user = make_user("profile@example.com");
        repo.create(&user).await.unwrap();

        let updated = repo
            .update_profile(
                &user.id,
                &ProfileUpdate {
                    age: Some(40),
                    fitness_level: Some(FitnessLevel::Intermediate),
                    health_goals: Some(vec!["weight_loss".to_string()]),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.profile.age, Some(40));

        // A second partial update leaves earlier fields alone.
        let updated = repo
            .update_profile(
                &user.id,
                &ProfileUpdate {
                    weight: Some("90kg".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.profile.age, Some(40));
        assert_eq!(updated.profile.weight.as_deref(), Some("90kg"));
        assert_eq!(updated.profile.fitness_level, Some(FitnessLevel::Intermediate));
        assert_eq!(updated.profile.health_goals, vec!["weight_loss".to_string()]);

        let found = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(found.profile.weight.as_deref(), Some("90kg"));
    }

    #[tokio::test]
    async fn test_update_profile_missing_user() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let err = repo
            .update_profile(&Uuid::now_v7(), &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_password_hash() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let user = make_user("pw@example.com");
        repo.create(&user).await.unwrap();

        repo.update_password_hash(&user.id, "$2b$12$newhash").await.unwrap();
        let found = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(found.password_hash, "$2b$12$newhash");
    }
}
