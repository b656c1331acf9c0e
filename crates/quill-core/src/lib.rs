//! # Quill Core
//!
//! Domain model, ports and use cases of the Quill blog backend.
//! Nothing here touches a database, a mail server or the filesystem.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
