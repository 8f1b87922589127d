pub mod asset_row;
pub mod blob_file_row;

pub use asset_row::{AssetRow, NewAssetRow};
pub use blob_file_row::{BlobFileRow, NewBlobChunkRow, NewBlobFileRow};
