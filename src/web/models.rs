// Request/response bodies for the HTTP API

use serde::{Deserialize, Serialize};

/// Query parameters for POST /resize
///
/// Signed so that negative values reach dimension validation instead of
/// failing as a query parse error.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResizeQuery {
    pub width: i64,
    pub height: i64,
}

/// Body returned by GET /hi
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub message: String,
}
