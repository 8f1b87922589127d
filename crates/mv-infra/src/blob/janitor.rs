//! Orphan chunk janitor.
//! 孤儿分块清理器。
//!
//! A write that fails after some chunks landed leaves rows in
//! `blob_chunks` with no `blob_files` row. Those chunks are invisible to
//! readers; this task reclaims them once they are older than the grace
//! period. A live write re-stamps its chunks on every batch, so only a
//! write stalled past the grace period can lose chunks, and its commit then
//! fails instead of publishing a hole.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use mv_core::ports::ClockPort;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::db::ports::{run_blocking, DbExecutor};
use crate::db::schema::{blob_chunks, blob_files};

pub struct OrphanChunkJanitor<E>
where
    E: DbExecutor,
{
    executor: E,
    clock: Arc<dyn ClockPort>,
    grace_period: Duration,
}

impl<E> OrphanChunkJanitor<E>
where
    E: DbExecutor,
{
    pub fn new(executor: E, clock: Arc<dyn ClockPort>, grace_period: Duration) -> Self {
        Self {
            executor,
            clock,
            grace_period,
        }
    }

    /// Delete uncommitted chunks older than the grace period. Returns the
    /// number of chunk rows removed.
    pub async fn run_once(&self) -> Result<usize> {
        let grace_ms = i64::try_from(self.grace_period.as_millis()).unwrap_or(i64::MAX);
        let cutoff_ms = self.clock.now_ms().saturating_sub(grace_ms);

        let removed = run_blocking(&self.executor, move |conn| {
            let committed = blob_files::table.select(blob_files::blob_id);
            let removed = diesel::delete(
                blob_chunks::table
                    .filter(blob_chunks::created_at_ms.lt(cutoff_ms))
                    .filter(blob_chunks::blob_id.ne_all(committed)),
            )
            .execute(conn)?;
            Ok(removed)
        })
        .await?;

        if removed > 0 {
            info!(removed, cutoff_ms, "Removed orphaned blob chunks");
        } else {
            debug!(cutoff_ms, "No orphaned blob chunks");
        }
        Ok(removed)
    }

    /// Run `run_once` every `interval` until the handle is aborted.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = self.run_once().await {
                    warn!(error = %err, "Orphan chunk cleanup failed");
                }
            }
        })
    }
}
