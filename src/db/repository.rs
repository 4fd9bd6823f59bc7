use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{plan::TravelPlan, profile::Profile, user::UserAccount};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("document conversion failed: {0}")]
    Conversion(String),
    #[error("{0} already exists")]
    Duplicate(String),
}

/// Plans are always scoped to their owner; a plan id owned by someone else
/// behaves exactly like a missing one.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn insert_plan(&self, plan: TravelPlan) -> Result<TravelPlan, RepositoryError>;

    /// Newest first.
    async fn list_plans(&self, user_id: &str) -> Result<Vec<TravelPlan>, RepositoryError>;

    async fn find_plan(
        &self,
        user_id: &str,
        plan_id: &str,
    ) -> Result<Option<TravelPlan>, RepositoryError>;

    /// Returns whether a plan was removed.
    async fn delete_plan(&self, user_id: &str, plan_id: &str) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>, RepositoryError>;
    async fn upsert_profile(&self, profile: Profile) -> Result<Profile, RepositoryError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Duplicate` when the email is taken.
    async fn insert_user(&self, user: UserAccount) -> Result<UserAccount, RepositoryError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, RepositoryError>;
    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<UserAccount>, RepositoryError>;
    async fn record_signin(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), RepositoryError>;
    async fn record_failed_signin(&self, user_id: &str) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait Store: PlanRepository + ProfileRepository + UserRepository {
    async fn ping(&self) -> Result<(), RepositoryError>;
    fn backend(&self) -> &'static str;
}
