use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServiceError;

/// Parameters of one assembly invocation. `read_libraries` holds the
/// names of paired-end library objects in `workspace_name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSpadesParams {
    pub workspace_name: String,
    pub read_libraries: Vec<String>,
    pub output_contigset_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dna_source: Option<String>,
}

impl RunSpadesParams {
    /// Checks a raw parameter mapping in fixed order, then decodes it.
    /// The first failing check wins and its message is returned
    /// verbatim; callers run this before any side effect.
    pub fn from_value(params: &Value) -> Result<Self, ServiceError> {
        match params.get("workspace_name") {
            None | Some(Value::Null) => {
                return Err(ServiceError::Validation(
                    "workspace_name parameter is required".to_string(),
                ));
            }
            Some(_) => {}
        }
        let libraries = match params.get("read_libraries") {
            None => {
                return Err(ServiceError::Validation(
                    "read_libraries parameter is required".to_string(),
                ));
            }
            Some(value) => value,
        };
        let libraries = match libraries.as_array() {
            None => {
                return Err(ServiceError::Validation(
                    "read_libraries must be a list".to_string(),
                ));
            }
            Some(list) => list,
        };
        if libraries.is_empty() {
            return Err(ServiceError::Validation(
                "At least one reads library must be provided".to_string(),
            ));
        }
        match params.get("output_contigset_name") {
            None | Some(Value::Null) => {
                return Err(ServiceError::Validation(
                    "output_contigset_name parameter is required".to_string(),
                ));
            }
            Some(Value::String(name)) if name.is_empty() => {
                return Err(ServiceError::Validation(
                    "output_contigset_name parameter is required".to_string(),
                ));
            }
            Some(_) => {}
        }
        serde_json::from_value(params.clone())
            .map_err(|err| ServiceError::Validation(format!("invalid parameters: {}", err)))
    }
}
