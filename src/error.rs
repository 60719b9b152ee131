use crate::form::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Product id is required")]
    MissingId,

    #[error("New products must not carry an id (got {0})")]
    UnexpectedId(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No such page: {0}")]
    UnknownRoute(String),

    #[error("View closed before the request completed")]
    ViewClosed,
}

impl Error {
    /// Network or API failure of any kind.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Api { .. } | Error::Transport(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Text shown to the user in a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(errors) => errors.to_string(),
            Error::NotFound(id) => format!("Product {} no longer exists", id),
            Error::MissingId
            | Error::UnexpectedId(_)
            | Error::InvalidUrl(_)
            | Error::UnknownRoute(_) => self.to_string(),
            Error::Http(_) | Error::Api { .. } | Error::Transport(_) => {
                "Could not reach the product service, please try again".to_string()
            }
            Error::ViewClosed => String::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
