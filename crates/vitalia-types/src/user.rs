//! User account and profile types.
//!
//! `UserAccount` is the persistence-facing record (including the password
//! hash); `UserPublic` is the API-facing projection that never carries
//! credential material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Self-reported fitness level.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (fitness_level IN ('beginner', 'intermediate', 'advanced'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitnessLevel::Beginner => write!(f, "beginner"),
            FitnessLevel::Intermediate => write!(f, "intermediate"),
            FitnessLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for FitnessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(FitnessLevel::Beginner),
            "intermediate" => Ok(FitnessLevel::Intermediate),
            "advanced" => Ok(FitnessLevel::Advanced),
            other => Err(format!("invalid fitness level: '{other}'")),
        }
    }
}

/// Optional health/fitness profile attributes attached to a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: Option<u8>,
    /// Free-form, e.g. "188cm" or "6ft 2in".
    pub height: Option<String>,
    /// Free-form, e.g. "82kg" or "180lbs".
    pub weight: Option<String>,
    pub fitness_level: Option<FitnessLevel>,
    /// e.g. "weight_loss", "muscle_gain".
    pub health_goals: Vec<String>,
}

/// A user account.
///
/// Created unverified and active at signup; `is_verified` flips after the
/// signup code is consumed. Accounts are never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    /// Bcrypt hash. Never serialized; the API exposes `UserPublic` instead.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub profile: UserProfile,
}

/// API-facing projection of a user account (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub age: Option<u8>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub fitness_level: Option<FitnessLevel>,
    pub health_goals: Vec<String>,
}

impl From<&UserAccount> for UserPublic {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_verified: user.is_verified,
            is_active: user.is_active,
            created_at: user.created_at,
            age: user.profile.age,
            height: user.profile.height.clone(),
            weight: user.profile.weight.clone(),
            fitness_level: user.profile.fitness_level,
            health_goals: user.profile.health_goals.clone(),
        }
    }
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<u8>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub fitness_level: Option<FitnessLevel>,
    pub health_goals: Option<Vec<String>>,
}
