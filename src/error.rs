//! Error taxonomy for the client.
//!
//! Every variant is recovered locally: the controller logs it and at most
//! shows a transient notification. Process setup (terminal, logging) uses
//! `anyhow` instead.

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// Sign-in or sign-out was rejected by the identity collaborator
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    /// A library action was attempted without a signed-in identity
    #[error("Sign in required")]
    NotAuthenticated,

    /// Search, trending or radio request failed
    #[error("Network error: {0}")]
    NetworkFailure(String),

    /// The audio source could not be loaded or played
    #[error("Media failed to load: {0}")]
    MediaLoadFailure(String),

    /// Document store write or persistence failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// The platform rejected a capability request (e.g. fullscreen)
    #[error("Platform error: {0}")]
    Platform(String),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::NetworkFailure(e.to_string())
    }
}

impl AppError {
    /// Message suitable for the notification line.
    pub fn user_message(&self) -> String {
        match self {
            AppError::AuthFailure(_) => "Authentication failed.".to_string(),
            AppError::NotAuthenticated => "Please sign in to like songs".to_string(),
            AppError::NetworkFailure(_) => "Could not reach the music service".to_string(),
            AppError::MediaLoadFailure(_) => "Preview could not be played".to_string(),
            AppError::Storage(_) => "Failed to update library".to_string(),
            AppError::Platform(e) => format!("Error: {}", e),
        }
    }
}
