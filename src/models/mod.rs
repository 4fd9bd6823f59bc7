pub mod estimate;
pub mod plan;
pub mod profile;
pub mod recommendation;
pub mod user;
