mod asset_mapper;
mod blob_file_mapper;
pub mod time;

pub use asset_mapper::AssetRowMapper;
pub use blob_file_mapper::BlobFileRowMapper;
