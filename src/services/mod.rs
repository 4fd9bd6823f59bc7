pub mod completion_client;
pub mod estimate_service;
pub mod offline_cache;
pub mod prompts;
pub mod recommendation_service;
