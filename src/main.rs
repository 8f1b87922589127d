//! ModelVault server binary.
//!
//! Configuration comes from `modelvault.toml` (or `$MODELVAULT_CONFIG`),
//! `.env` and `MODELVAULT_*` / `PORT` environment variables.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mv_server::bootstrap::run().await
}
