//! App-shell cache mirroring the browser service worker.
//!
//! `install` fills the current cache generation with the shell assets,
//! `activate` drops every other generation, and `respond` serves
//! cache-first, then network, then the cached root document.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use actix_web::web::Bytes;
use async_trait::async_trait;
use log::{info, warn};
use thiserror::Error;
use tokio::sync::RwLock;

pub const CACHE_NAME: &str = "journeygo-cache-v1";
pub const APP_SHELL_ASSETS: [&str; 5] = [
    "/",
    "/index.html",
    "/manifest.json",
    "/icons/icon-192.png",
    "/icons/icon-512.png",
];
pub const FALLBACK_DOCUMENT: &str = "/index.html";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },
    #[error("{path} responded with status {status}")]
    BadStatus { path: String, status: u16 },
    #[error("{0} is not available offline")]
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl CachedResponse {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network side of the shell. Any HTTP status is a successful fetch; only
/// failing to get a response is an error.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<CachedResponse, CacheError>;
}

pub struct OriginFetcher {
    client: reqwest::Client,
    origin: String,
}

impl OriginFetcher {
    pub fn new(origin: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AssetFetcher for OriginFetcher {
    async fn fetch(&self, path: &str) -> Result<CachedResponse, CacheError> {
        let url = format!("{}{}", self.origin, path);
        let fetch_error = |e: reqwest::Error| CacheError::Fetch {
            path: path.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(&url).send().await.map_err(fetch_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(fetch_error)?;

        Ok(CachedResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Named cache generations, each mapping request path to response.
#[derive(Default)]
pub struct CacheStorage {
    caches: RwLock<BTreeMap<String, HashMap<String, CachedResponse>>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, name: &str) {
        self.caches.write().await.entry(name.to_string()).or_default();
    }

    pub async fn put_all(&self, name: &str, entries: Vec<(String, CachedResponse)>) {
        self.caches
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .extend(entries);
    }

    /// Looks the path up across every generation, oldest name first.
    pub async fn match_path(&self, path: &str) -> Option<CachedResponse> {
        self.caches
            .read()
            .await
            .values()
            .find_map(|cache| cache.get(path).cloned())
    }

    pub async fn keys(&self) -> Vec<String> {
        self.caches.read().await.keys().cloned().collect()
    }

    pub async fn delete(&self, name: &str) -> bool {
        self.caches.write().await.remove(name).is_some()
    }
}

pub struct CacheShell {
    name: String,
    assets: Vec<String>,
    storage: Arc<CacheStorage>,
    fetcher: Arc<dyn AssetFetcher>,
}

impl CacheShell {
    pub fn new(storage: Arc<CacheStorage>, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            name: CACHE_NAME.to_string(),
            assets: APP_SHELL_ASSETS.iter().map(|a| a.to_string()).collect(),
            storage,
            fetcher,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All-or-nothing: a single failed or non-2xx asset leaves the cache untouched.
    pub async fn install(&self) -> Result<(), CacheError> {
        info!("Caching app shell into {}", self.name);

        let mut entries = Vec::with_capacity(self.assets.len());
        for path in &self.assets {
            let response = self.fetcher.fetch(path).await?;
            if !response.is_ok() {
                return Err(CacheError::BadStatus {
                    path: path.clone(),
                    status: response.status,
                });
            }
            entries.push((path.clone(), response));
        }

        self.storage.open(&self.name).await;
        self.storage.put_all(&self.name, entries).await;
        Ok(())
    }

    /// Deletes every cache generation except the current one; returns the deleted names.
    pub async fn activate(&self) -> Vec<String> {
        let mut deleted = Vec::new();
        for key in self.storage.keys().await {
            if key != self.name && self.storage.delete(&key).await {
                info!("Deleting old cache: {}", key);
                deleted.push(key);
            }
        }
        deleted
    }

    pub async fn respond(&self, path: &str) -> Result<CachedResponse, CacheError> {
        if let Some(hit) = self.storage.match_path(path).await {
            return Ok(hit);
        }

        match self.fetcher.fetch(path).await {
            Ok(response) => Ok(response),
            Err(err) => {
                warn!("Network unavailable for {}: {}", path, err);
                self.storage
                    .match_path(FALLBACK_DOCUMENT)
                    .await
                    .ok_or_else(|| CacheError::Unavailable(path.to_string()))
            }
        }
    }
}

/// Browser service worker implementing the same install/activate/fetch
/// cycle against the browser's cache storage.
pub fn service_worker_script() -> String {
    let assets = APP_SHELL_ASSETS
        .iter()
        .map(|asset| format!("  \"{}\"", asset))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"const CACHE_NAME = "{name}";
const urlsToCache = [
{assets}
];

self.addEventListener("install", (event) => {{
  event.waitUntil(
    caches.open(CACHE_NAME).then((cache) => cache.addAll(urlsToCache))
  );
  self.skipWaiting();
}});

self.addEventListener("activate", (event) => {{
  event.waitUntil(
    caches.keys().then((keys) =>
      Promise.all(
        keys.filter((key) => key !== CACHE_NAME).map((key) => caches.delete(key))
      )
    )
  );
  self.clients.claim();
}});

self.addEventListener("fetch", (event) => {{
  event.respondWith(
    caches.match(event.request).then(
      (response) =>
        response || fetch(event.request).catch(() => caches.match("{fallback}"))
    )
  );
}});
"#,
        name = CACHE_NAME,
        assets = assets,
        fallback = FALLBACK_DOCUMENT,
    )
}
