// src/application/dto/hooks.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathRevalidation {
    pub path: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevalidateResponseDto {
    pub success: bool,
    pub revalidated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<PathRevalidation>>,
    pub message: String,
}
