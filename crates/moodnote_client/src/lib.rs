//! Async REST client for the MoodNote backend.
//!
//! Wire bodies mirror the backend schemas; [`wire::NoteResponse::into_note`]
//! and the `From<&Note>` impls bridge them to `moodnote_core` types.

pub mod api;
pub mod config;
pub mod error;
pub mod token;
pub mod wire;

pub use api::{ApiClient, DEFAULT_NOTES_LIMIT};
pub use config::{ClientConfig, API_URL_ENV, DEFAULT_API_URL};
pub use error::{ClientError, ClientResult};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
pub use wire::{
    FileUploadResponse, HealthResponse, LabelCreate, LabelResponse, LinkPreview, MessageResponse,
    NoteCreate, NoteResponse, NoteUpdate, UserCreate, UserLogin, UserResponse,
};
