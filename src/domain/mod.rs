//! Domain models and types.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ItemId`], [`FolderId`])
//! - **Remote document model** ([`RemoteItem`], [`RemoteItemPayload`])
//! - **Error types** ([`SyncError`], [`DriveError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so a folder id can never be used as a
//! ledger key:
//!
//! ```rust
//! use transcript_syncer::domain::{FolderId, ItemId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let item = ItemId::new("1AbC")?;
//! let folder = FolderId::new("108_9MeB")?;
//!
//! // This won't compile
//! // let wrong: ItemId = folder;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod item;
pub mod result;

pub use errors::{DriveError, SyncError};
pub use ids::{FolderId, ItemId};
pub use item::{RemoteItem, RemoteItemPayload, GOOGLE_DOC_MIME_TYPE, MARKDOWN_MIME_TYPE};
pub use result::Result;
