use actix_web::{http::StatusCode, HttpResponse, ResponseError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Anmeldeinformationen konnten nicht validiert werden.")]
    Unauthorized,

    #[error("Ungültiger Benutzername oder Passwort.")]
    InvalidCredentials,

    #[error("Zugriff auf diese Ressource ist nicht erlaubt.")]
    Forbidden,

    #[error("{0} nicht gefunden.")]
    NotFound(&'static str),

    #[error("Benutzername existiert bereits.")]
    UsernameTaken,

    #[error("{0} ist bereits mit diesem Charakter verknüpft.")]
    AlreadyAttached(&'static str),

    #[error("Ungültiger Klassenname. Erlaubte Klassen sind: {0}")]
    InvalidClass(String),

    #[error("Provided data could not be validated")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Anfrage an einen externen Dienst ist fehlgeschlagen.")]
    Upstream(#[from] reqwest::Error),

    #[error("Externer Dienst hat eine unerwartete Antwort geliefert.")]
    UpstreamPayload,

    #[error("The given password could not be hashed")]
    PasswordHashError(argon2::password_hash::Error),

    #[error("The database query failed")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("No database connection available")]
    PoolError(#[from] r2d2::Error),

    #[error("Background database task failed")]
    RuntimeError(#[from] actix_web::error::BlockingError),

    #[error("Could not [de]serialize data")]
    SerializationError(#[from] serde_json::Error),

    #[error("Could not [en|de]code data for token")]
    TokenError(#[from] branca::errors::Error),
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::PasswordHashError(value)
    }
}

impl Error {
    // Stable machine-readable code carried in every error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized | Self::TokenError(_) => "INVALID_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::UsernameTaken => "USERNAME_ALREADY_EXISTS",
            Self::AlreadyAttached(_) => "ALREADY_ATTACHED",
            Self::InvalidClass(_) => "INVALID_CLASS_NAME",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Upstream(_) | Self::UpstreamPayload => "UPSTREAM_FAILURE",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials | Self::TokenError(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UsernameTaken | Self::AlreadyAttached(_) => StatusCode::CONFLICT,
            Self::InvalidClass(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream(_) | Self::UpstreamPayload => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }))
    }
}
