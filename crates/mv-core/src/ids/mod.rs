//! ID type wrappers for type safety.

mod blob_id;
mod id_macro;

pub use blob_id::BlobId;
