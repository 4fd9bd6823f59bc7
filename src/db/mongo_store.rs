use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::mongo::create_mongo_client;
use crate::db::repository::{
    PlanRepository, ProfileRepository, RepositoryError, Store, UserRepository,
};
use crate::models::{
    plan::{CostBreakdown, TravelPlan, TravelStyle},
    profile::Profile,
    user::UserAccount,
};

const PLANS: &str = "TravelPlans";
const PROFILES: &str = "Profiles";
const USERS: &str = "Users";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Serialize, Deserialize)]
struct PlanDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    user_id: ObjectId,
    destination: String,
    duration: u32,
    people_count: u32,
    travel_style: TravelStyle,
    ai_recommendation: Option<Value>,
    total_cost: f64,
    cost_breakdown: Option<CostBreakdown>,
    created_at: bson::DateTime,
}

impl PlanDocument {
    fn from_plan(plan: &TravelPlan) -> Result<Self, RepositoryError> {
        Ok(Self {
            id: parse_id(&plan.id)?,
            user_id: parse_id(&plan.user_id)?,
            destination: plan.destination.clone(),
            duration: plan.duration,
            people_count: plan.people_count,
            travel_style: plan.travel_style,
            ai_recommendation: plan.ai_recommendation.clone(),
            total_cost: plan.total_cost,
            cost_breakdown: plan.cost_breakdown.clone(),
            created_at: to_bson_datetime(plan.created_at),
        })
    }

    fn into_plan(self) -> TravelPlan {
        TravelPlan {
            id: self.id.to_hex(),
            user_id: self.user_id.to_hex(),
            destination: self.destination,
            duration: self.duration,
            people_count: self.people_count,
            travel_style: self.travel_style,
            ai_recommendation: self.ai_recommendation,
            total_cost: self.total_cost,
            cost_breakdown: self.cost_breakdown,
            created_at: to_chrono(self.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProfileDocument {
    #[serde(rename = "_id")]
    user_id: ObjectId,
    full_name: String,
    favorite_style: Option<TravelStyle>,
    avatar_url: Option<String>,
    updated_at: bson::DateTime,
}

impl ProfileDocument {
    fn into_profile(self) -> Profile {
        Profile {
            user_id: self.user_id.to_hex(),
            full_name: self.full_name,
            favorite_style: self.favorite_style,
            avatar_url: self.avatar_url,
            updated_at: to_chrono(self.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    email: String,
    password: String,
    last_signin: Option<bson::DateTime>,
    #[serde(default)]
    failed_signins: i32,
    created_at: bson::DateTime,
}

impl UserDocument {
    fn into_account(self) -> UserAccount {
        UserAccount {
            id: self.id.to_hex(),
            email: self.email,
            password_hash: self.password,
            last_signin: self.last_signin.map(to_chrono),
            failed_signins: self.failed_signins,
            created_at: to_chrono(self.created_at),
        }
    }
}

fn parse_id(id: &str) -> Result<ObjectId, RepositoryError> {
    ObjectId::parse_str(id).map_err(|e| RepositoryError::Conversion(format!("invalid id {}: {}", id, e)))
}

fn to_bson_datetime(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError { code, .. })) if *code == DUPLICATE_KEY
    )
}

fn to_chrono(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

/// MongoDB-backed store.
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, RepositoryError> {
        let client = create_mongo_client(uri, database).await?;
        let store = Self {
            client,
            database: database.to_string(),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// Unique emails are enforced by the index, not by a lookup before insert.
    async fn ensure_indexes(&self) -> Result<(), RepositoryError> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users().create_index(unique_email).await?;
        Ok(())
    }

    fn plans(&self) -> Collection<PlanDocument> {
        self.client.database(&self.database).collection(PLANS)
    }

    fn profiles(&self) -> Collection<ProfileDocument> {
        self.client.database(&self.database).collection(PROFILES)
    }

    fn users(&self) -> Collection<UserDocument> {
        self.client.database(&self.database).collection(USERS)
    }
}

#[async_trait]
impl PlanRepository for MongoStore {
    async fn insert_plan(&self, plan: TravelPlan) -> Result<TravelPlan, RepositoryError> {
        let document = PlanDocument::from_plan(&plan)?;
        self.plans().insert_one(&document).await?;
        Ok(plan)
    }

    async fn list_plans(&self, user_id: &str) -> Result<Vec<TravelPlan>, RepositoryError> {
        let user_id = parse_id(user_id)?;
        let cursor = self
            .plans()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        let documents: Vec<PlanDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(PlanDocument::into_plan).collect())
    }

    async fn find_plan(
        &self,
        user_id: &str,
        plan_id: &str,
    ) -> Result<Option<TravelPlan>, RepositoryError> {
        let user_id = parse_id(user_id)?;
        let Ok(plan_id) = ObjectId::parse_str(plan_id) else {
            return Ok(None);
        };
        let document = self
            .plans()
            .find_one(doc! { "_id": plan_id, "user_id": user_id })
            .await?;
        Ok(document.map(PlanDocument::into_plan))
    }

    async fn delete_plan(&self, user_id: &str, plan_id: &str) -> Result<bool, RepositoryError> {
        let user_id = parse_id(user_id)?;
        let Ok(plan_id) = ObjectId::parse_str(plan_id) else {
            return Ok(false);
        };
        let result = self
            .plans()
            .delete_one(doc! { "_id": plan_id, "user_id": user_id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl ProfileRepository for MongoStore {
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>, RepositoryError> {
        let user_id = parse_id(user_id)?;
        let document = self.profiles().find_one(doc! { "_id": user_id }).await?;
        Ok(document.map(ProfileDocument::into_profile))
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let user_id = parse_id(&profile.user_id)?;
        let document = ProfileDocument {
            user_id,
            full_name: profile.full_name.clone(),
            favorite_style: profile.favorite_style,
            avatar_url: profile.avatar_url.clone(),
            updated_at: to_bson_datetime(profile.updated_at),
        };
        self.profiles()
            .replace_one(doc! { "_id": user_id }, &document)
            .upsert(true)
            .await?;
        Ok(profile)
    }
}

#[async_trait]
impl UserRepository for MongoStore {
    async fn insert_user(&self, user: UserAccount) -> Result<UserAccount, RepositoryError> {
        let document = UserDocument {
            id: parse_id(&user.id)?,
            email: user.email.clone(),
            password: user.password_hash.clone(),
            last_signin: user.last_signin.map(to_bson_datetime),
            failed_signins: user.failed_signins,
            created_at: to_bson_datetime(user.created_at),
        };
        match self.users().insert_one(&document).await {
            Ok(_) => Ok(user),
            Err(err) if is_duplicate_key(&err) => Err(RepositoryError::Duplicate(user.email)),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, RepositoryError> {
        let document = self.users().find_one(doc! { "email": email }).await?;
        Ok(document.map(UserDocument::into_account))
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<UserAccount>, RepositoryError> {
        let Ok(user_id) = ObjectId::parse_str(user_id) else {
            return Ok(None);
        };
        let document = self.users().find_one(doc! { "_id": user_id }).await?;
        Ok(document.map(UserDocument::into_account))
    }

    async fn record_signin(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let user_id = parse_id(user_id)?;
        let update = doc! {
            "$set": {
                "last_signin": to_bson_datetime(at),
                "failed_signins": 0
            }
        };
        self.users().update_one(doc! { "_id": user_id }, update).await?;
        Ok(())
    }

    async fn record_failed_signin(&self, user_id: &str) -> Result<(), RepositoryError> {
        let user_id = parse_id(user_id)?;
        let update = doc! { "$inc": { "failed_signins": 1 } };
        self.users().update_one(doc! { "_id": user_id }, update).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.client
            .database(&self.database)
            .run_command(doc! {"ping": 1})
            .await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}
