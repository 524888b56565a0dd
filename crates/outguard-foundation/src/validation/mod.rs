//! Response validation
//!
//! - **`json_island`**: balanced-bracket extraction of JSON embedded in text
//! - **`schema`**: contract rule checks and secret detection

pub mod json_island;
pub mod schema;

pub use json_island::{JsonIsland, extract_json, strip_json_islands};
pub use schema::{JSON_ONLY_ERROR, SchemaValidator};
