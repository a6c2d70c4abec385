//! Session registry and upload file management

mod files;
mod id;
mod registry;
mod store;

pub use files::{purge_stale_uploads, remove_backing_files, secure_filename};
pub use id::SessionId;
pub use registry::{SessionRecord, SessionRegistry};
pub use store::{MemoryStore, SessionStore};
