use axum::Json;
use serde::Serialize;

/// Uniform `{ success, data?, message? }` wrapper for successful responses.
/// Failures are rendered by `Error::into_response` with the same shape.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        })
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            message: Some(message.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shapes() {
        let Json(body) = ApiResponse::ok(vec!["Pop"]);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": ["Pop"] }));

        let Json(body) = ApiResponse::message("Song deleted");
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "message": "Song deleted" }));
    }
}
