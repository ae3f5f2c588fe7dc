//! Typed access to the farm service REST API.
//!
//! One [`ApiClient`] per process. Endpoint methods are grouped by resource
//! in the submodules, each declaring the cache tags it provides or
//! invalidates.

mod attendance;
mod auth;
pub mod backend;
pub mod cache;
pub mod client;
mod coffee;
mod face;
pub mod farms;
mod farmers;
mod statistics;
mod testdata;

pub use backend::FarmBackend;
pub use cache::{QueryCache, Tag, TagId, TagKind};
pub use client::ApiClient;
pub use farms::FarmQuery;
