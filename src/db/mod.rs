pub mod memory_store;
pub mod mongo;
pub mod mongo_store;
pub mod repository;
