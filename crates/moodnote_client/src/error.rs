//! Client error type.

use crate::token::TokenStoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of a backend call.
///
/// `Display` yields the message meant for the user: the backend `detail`
/// when present, otherwise `HTTP <status>: <reason>`.
#[derive(Debug)]
pub enum ClientError {
    /// Transport, timeout or body decoding failure.
    Http(reqwest::Error),
    /// Non-2xx response.
    Api { status: u16, message: String },
    /// Upload rejected locally because the MIME type has the wrong family.
    UnsupportedMedia {
        expected: &'static str,
        content_type: String,
    },
    /// Link preview failed now or on an earlier, cached attempt.
    LinkPreview { url: String, message: String },
    Token(TokenStoreError),
    /// Response decoded but cannot map onto the domain model.
    InvalidResponse(String),
}

impl ClientError {
    /// HTTP status of an API rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "{err}"),
            Self::Api { message, .. } => write!(f, "{message}"),
            Self::UnsupportedMedia {
                expected,
                content_type,
            } => write!(f, "file must be {expected}*, got `{content_type}`"),
            Self::LinkPreview { message, .. } => write!(f, "{message}"),
            Self::Token(err) => write!(f, "{err}"),
            Self::InvalidResponse(details) => write!(f, "invalid response: {details}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Token(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<TokenStoreError> for ClientError {
    fn from(value: TokenStoreError) -> Self {
        Self::Token(value)
    }
}
