//! Domain core for the todo item service.
//!
//! # Overview
//! Everything the HTTP layer needs to serve the four item operations, with no
//! transport concerns: identifiers, title validation, the persistence gateway
//! and the service façade that ties them together.
//!
//! # Design
//! - `ItemService` is the unit callers invoke. It holds no per-request state
//!   and is cheap to clone, so the server shares one instance across requests.
//! - Storage sits behind the `TodoStore` trait. `MemoryStore` lives here;
//!   relational backends live with the binary that owns the connection pool.
//! - Errors are tagged enums. `ServiceError::kind` collapses them into the
//!   four-way taxonomy the boundary uses to pick a status code.

pub mod error;
pub mod id;
pub mod service;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{ErrorKind, MalformedId, ServiceError, StoreError, TitleError};
pub use id::{IdGenerator, ItemId};
pub use service::{ItemService, DEFAULT_OPERATION_TIMEOUT};
pub use store::{MemoryStore, TodoStore};
pub use types::TodoItem;
pub use validate::{validate_title, MAX_TITLE_LEN, MIN_TITLE_LEN};
