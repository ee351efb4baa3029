//! Data models shared by the shelter backend and the client core.
//!
//! Field names follow the JSON contract the mobile client already speaks (`_id`, `latitude`,
//! `longitude`), so the same types serialize on the server and deserialize in the core.

mod admin;
mod shelter;

pub use admin::*;
pub use shelter::*;
