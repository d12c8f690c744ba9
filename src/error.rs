use reqwest::StatusCode;
use thiserror::Error;

pub const EXCEPTION_MESSAGE: &str = "Error: Exception during API call. See console for details.";

#[derive(Debug, Error)]
pub enum LlmApiError {
    #[error("API key not provided")]
    MissingApiKey,
    #[error("API Error: {status}, {body}")]
    ApiError { status: StatusCode, body: String },
    #[error("Parse Error: {message} (status {status})")]
    ParseError {
        status: StatusCode,
        body: String,
        message: String,
    },
    #[error("Request Error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Image Error: {0}")]
    ImageError(String),
    #[error("PNG Error: {0}")]
    Png(#[from] image::ImageError),
}

impl LlmApiError {
    /// Short string handed back to the host. Details go to the log instead.
    pub fn user_message(&self) -> String {
        match self {
            LlmApiError::MissingApiKey => "Error: API key not provided".to_string(),
            LlmApiError::ApiError { status, .. } => format!(
                "Error: API call failed with status {}. See console for details.",
                status.as_u16()
            ),
            LlmApiError::ParseError { .. } => {
                "Error: Failed to parse API response. See console for details.".to_string()
            }
            LlmApiError::RequestError(_) | LlmApiError::ImageError(_) | LlmApiError::Png(_) => {
                EXCEPTION_MESSAGE.to_string()
            }
        }
    }
}
