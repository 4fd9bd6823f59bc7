use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::db::repository::{
    PlanRepository, ProfileRepository, RepositoryError, Store, UserRepository,
};
use crate::models::{plan::TravelPlan, profile::Profile, user::UserAccount};

/// In-process store used when no MongoDB URI is configured. Nothing survives
/// a restart.
#[derive(Default)]
pub struct MemoryStore {
    plans: RwLock<Vec<TravelPlan>>,
    profiles: RwLock<HashMap<String, Profile>>,
    users: RwLock<Vec<UserAccount>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanRepository for MemoryStore {
    async fn insert_plan(&self, plan: TravelPlan) -> Result<TravelPlan, RepositoryError> {
        self.plans.write().await.push(plan.clone());
        Ok(plan)
    }

    async fn list_plans(&self, user_id: &str) -> Result<Vec<TravelPlan>, RepositoryError> {
        // Reverse before the stable sort so equal timestamps list the newest insert first.
        let mut plans: Vec<TravelPlan> = self
            .plans
            .read()
            .await
            .iter()
            .rev()
            .filter(|plan| plan.user_id == user_id)
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(plans)
    }

    async fn find_plan(
        &self,
        user_id: &str,
        plan_id: &str,
    ) -> Result<Option<TravelPlan>, RepositoryError> {
        Ok(self
            .plans
            .read()
            .await
            .iter()
            .find(|plan| plan.id == plan_id && plan.user_id == user_id)
            .cloned())
    }

    async fn delete_plan(&self, user_id: &str, plan_id: &str) -> Result<bool, RepositoryError> {
        let mut plans = self.plans.write().await;
        let before = plans.len();
        plans.retain(|plan| !(plan.id == plan_id && plan.user_id == user_id));
        Ok(plans.len() < before)
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: UserAccount) -> Result<UserAccount, RepositoryError> {
        let mut users = self.users.write().await;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Duplicate(user.email));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn record_signin(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        if let Some(user) = self.users.write().await.iter_mut().find(|u| u.id == user_id) {
            user.last_signin = Some(at);
            user.failed_signins = 0;
        }
        Ok(())
    }

    async fn record_failed_signin(&self, user_id: &str) -> Result<(), RepositoryError> {
        if let Some(user) = self.users.write().await.iter_mut().find(|u| u.id == user_id) {
            user.failed_signins += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
