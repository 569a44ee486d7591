//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI and client layers decoupled from storage details.

pub mod label_service;
pub mod note_service;
