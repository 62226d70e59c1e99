pub mod error;
pub mod schema;
pub mod store;

// Re-export commonly used items
pub use crate::error::{Result, StoreError};
pub use crate::schema::{canonical_header, read_rows, write_rows};
pub use crate::store::{decode_file_stem, sanitize_segment, FileRecordStore, RecordStore};
