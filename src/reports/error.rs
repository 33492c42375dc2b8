use axum::{response::IntoResponse, Json};

#[derive(Debug, thiserror::Error)]
pub enum ReportsError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportsError {
    /// No record matched the request filters. Distinct from a query failure.
    pub fn no_data() -> Self {
        Self::NotFound("No data found for the specified filters".to_string())
    }

    /// Pool checkout failed. The cause is logged; the caller sees a fixed message.
    pub fn connection(err: impl std::fmt::Display) -> Self {
        log::error!("DB connection error: {}", err);
        Self::Connection("Failed to connect to database".to_string())
    }

    /// Query execution failed. The cause is logged; raw database error text
    /// never reaches the caller.
    pub fn database(err: diesel::result::Error) -> Self {
        log::error!("Database error: {}", err);
        Self::Database("Database error occurred".to_string())
    }
}

impl IntoResponse for ReportsError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Self::Connection(msg) | Self::Database(msg) | Self::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
