// Database type definitions

use paramparser_scanner::ObjectId;
use serde::{Deserialize, Serialize};

/// A persisted parameter row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredParam {
    pub database_name: String,
    pub object_id: ObjectId,
    pub name: String,
    pub default_value: String,
    pub extracted_at: i64, // Unix timestamp
}

/// Row counts for one database file
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DatabaseStats {
    pub total_modules: i64,
    pub total_params: i64,
    pub params_with_defaults: i64,
    pub database_names: Vec<String>,
}
