//! # Feature: Typing-Delayed Replies
//!
//! Delivers bot replies after a "typing" delay. Each session owns one worker
//! task fed by a FIFO queue, so replies land in the order they were scheduled
//! and never overlap. Every reply carries a cancellation token; cancelling it
//! (session reset) or tearing the scheduler down drops the reply silently.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Serialized delivery queue with per-reset cancellation

use anyhow::{Context, Result};
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::state_machine::BotReply;

#[derive(Debug)]
pub struct ScheduledReply {
    pub reply: BotReply,
    pub delay: Duration,
    pub token: CancellationToken,
}

pub struct ReplyScheduler {
    queue: mpsc::UnboundedSender<ScheduledReply>,
    teardown: CancellationToken,
    worker: JoinHandle<()>,
}

impl ReplyScheduler {
    /// Spawn the delivery worker on the current tokio runtime. Cancelling
    /// `teardown` stops the worker and every reply it still holds.
    ///
    /// `deliver` runs once per reply whose delay elapsed before its token was
    /// cancelled. It should re-check the token under whatever lock guards the
    /// state it mutates.
    pub fn spawn<F, Fut>(teardown: CancellationToken, deliver: F) -> Result<Self>
    where
        F: Fn(ScheduledReply) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = Handle::try_current()
            .context("reply scheduler must be started inside a tokio runtime")?;

        let (queue, pending) = mpsc::unbounded_channel();
        let worker = handle.spawn(run(pending, teardown.clone(), deliver));

        Ok(ReplyScheduler {
            queue,
            teardown,
            worker,
        })
    }

    /// Token for a new batch of replies; cancelled along with the scheduler
    pub fn new_epoch(&self) -> CancellationToken {
        self.teardown.child_token()
    }

    /// Queue a reply behind any already waiting. Returns false once shut down.
    pub fn schedule(&self, job: ScheduledReply) -> bool {
        if self.teardown.is_cancelled() {
            return false;
        }
        match self.queue.send(job) {
            Ok(()) => true,
            Err(_) => {
                warn!("⚠️ Reply worker is gone, dropping reply");
                false
            }
        }
    }

    pub fn shutdown(&self) {
        self.teardown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.teardown.is_cancelled()
    }
}

impl Drop for ReplyScheduler {
    fn drop(&mut self) {
        self.teardown.cancel();
        self.worker.abort();
    }
}

async fn run<F, Fut>(
    mut pending: mpsc::UnboundedReceiver<ScheduledReply>,
    teardown: CancellationToken,
    deliver: F,
) where
    F: Fn(ScheduledReply) -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        let job = tokio::select! {
            _ = teardown.cancelled() => break,
            job = pending.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };

        if job.token.is_cancelled() {
            debug!("🗑️ Skipping cancelled reply");
            continue;
        }

        tokio::select! {
            _ = job.token.cancelled() => {
                debug!("🗑️ Reply cancelled while typing");
                continue;
            }
            _ = sleep(job.delay) => {}
        }

        deliver(job).await;
    }

    debug!("⏹️ Reply worker stopped");
}
