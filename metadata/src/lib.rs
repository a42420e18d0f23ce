//! # srtk metadata
//!
//! Serves the metadata document of every srtk token.
//!
//! ## Endpoints
//! - `GET /api/{token_id}` - `{ name, description, img }` of the token

pub mod config;
pub mod resolver;
mod router;

pub use config::Config;
pub use resolver::{Resolver, TokenMetadata};
pub use router::create as create_router;
