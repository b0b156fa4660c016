pub mod bookmark;
pub mod folder;
pub mod tag;

#[cfg(feature = "diesel")]
pub mod schema;

#[cfg(feature = "diesel")]
pub use schema::*;

// Re-export for convenience
pub use bookmark::{Bookmark, BookmarkFields, BookmarkPayload, Created, Reference};
pub use folder::{CreateFolder, Folder, FolderCount, ModifyFolder};
pub use tag::{Summary, Tag};
