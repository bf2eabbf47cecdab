use actix_web::{get, HttpResponse};
use serde::{Deserialize, Serialize};

pub mod report;

/// Uniform response wrapper; absent fields are left out of the JSON.
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn data(data: T) -> ApiEnvelope<T> {
        ApiEnvelope {
            success: true,
            count: None,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> ApiEnvelope<T> {
        ApiEnvelope {
            success: true,
            count: None,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }
}

impl<T> ApiEnvelope<Vec<T>> {
    pub fn list(data: Vec<T>) -> ApiEnvelope<Vec<T>> {
        ApiEnvelope {
            success: true,
            count: Some(data.len()),
            message: None,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiEnvelope<()> {
    pub fn failure(message: impl Into<String>) -> ApiEnvelope<()> {
        ApiEnvelope {
            success: false,
            count: None,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }

    pub fn server_error(error: impl std::fmt::Display) -> ApiEnvelope<()> {
        ApiEnvelope {
            success: false,
            count: None,
            message: Some("Server error".to_string()),
            data: None,
            error: Some(error.to_string()),
        }
    }
}

#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("PulsePoint API is running")
}
