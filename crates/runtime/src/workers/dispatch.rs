//! Per-trigger dispatch tasks.
//!
//! Each trigger runs as its own Tokio task: locate the actor, query the store,
//! broadcast. Tasks share nothing but the store and the sinks, so a stalled
//! host lookup only stalls its own dispatch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use interaction_core::{ActorId, InteractionStore};
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, trace, warn};

use crate::api::{ActorHost, Broadcaster, Channel, Result, RuntimeError};
use crate::events::InteractionEvent;

/// How a single dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The channel was not registered when the trigger arrived, or the
    /// runtime had shut down.
    Dropped,
    /// The host could not resolve the actor; nothing was broadcast.
    Aborted,
    /// The event was handed to every sink.
    Delivered {
        matches: usize,
        failed_sinks: usize,
    },
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}

/// Runs dispatches against a shared store, host and sink list.
pub(crate) struct Dispatcher {
    store: Arc<InteractionStore>,
    host: Arc<dyn ActorHost>,
    sinks: Arc<[Arc<dyn Broadcaster>]>,
    tasks: Mutex<JoinSet<DispatchOutcome>>,
    /// Set by [`drain`](Self::drain) under the `tasks` lock.
    closed: AtomicBool,
    handle: Handle,
}

impl Dispatcher {
    pub(crate) fn new(
        store: Arc<InteractionStore>,
        host: Arc<dyn ActorHost>,
        sinks: Vec<Arc<dyn Broadcaster>>,
        handle: Handle,
    ) -> Self {
        Self {
            store,
            host,
            sinks: sinks.into(),
            tasks: Mutex::new(JoinSet::new()),
            closed: AtomicBool::new(false),
            handle,
        }
    }

    /// Spawns a dispatch for an already-resolved channel.
    ///
    /// Tasks run on the runtime the dispatcher was built on, so any thread may
    /// call this. Returns `false` once the dispatcher has been drained.
    pub(crate) fn spawn(
        self: &Arc<Self>,
        channel: Arc<Channel>,
        actor: ActorId,
        payload: serde_json::Value,
    ) -> bool {
        let this = Arc::clone(self);
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);

        if self.closed.load(Ordering::Acquire) {
            debug!(
                target: "runtime::dispatch",
                channel = channel.name(),
                %actor,
                "trigger after shutdown dropped"
            );
            return false;
        }

        // Reap finished dispatches so the set only tracks in-flight work.
        reap_finished(&mut tasks);

        tasks.spawn_on(
            async move { this.dispatch(&channel, actor, payload).await },
            &self.handle,
        );
        true
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Runs one dispatch to completion on the current task.
    pub(crate) async fn dispatch(
        &self,
        channel: &Channel,
        actor: ActorId,
        payload: serde_json::Value,
    ) -> DispatchOutcome {
        let location = match self.host.locate(actor).await {
            Ok(location) => location,
            Err(error) => {
                debug!(
                    target: "runtime::dispatch",
                    channel = channel.name(),
                    %actor,
                    %error,
                    "actor lookup failed, dispatch aborted"
                );
                return DispatchOutcome::Aborted;
            }
        };

        let interactions = self.store.query(location.position, location.dimension);
        let matches = interactions.len();

        let event = InteractionEvent {
            channel: channel.name().to_string(),
            actor,
            interactions,
            payload,
        };

        let mut failed_sinks = 0;
        for sink in self.sinks.iter() {
            if let Err(error) = sink.broadcast(&event).await {
                failed_sinks += 1;
                warn!(
                    target: "runtime::dispatch",
                    channel = channel.name(),
                    sink = sink.name(),
                    %error,
                    "broadcast failed, continuing with remaining sinks"
                );
            }
        }

        trace!(
            target: "runtime::dispatch",
            channel = channel.name(),
            generation = channel.generation(),
            %actor,
            dimension = %location.dimension,
            matches,
            failed_sinks,
            "dispatch delivered"
        );

        DispatchOutcome::Delivered {
            matches,
            failed_sinks,
        }
    }

    /// Number of dispatches that have been spawned and not yet reaped.
    pub(crate) fn in_flight(&self) -> usize {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        reap_finished(&mut tasks);
        tasks.len()
    }

    /// Closes the dispatcher and waits for every spawned dispatch to finish.
    ///
    /// Every task is awaited even if some failed; the first failure is
    /// returned.
    pub(crate) async fn drain(&self) -> Result<()> {
        let mut tasks = {
            let mut guard = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            self.closed.store(true, Ordering::Release);
            std::mem::take(&mut *guard)
        };

        let mut first_failure = None;
        while let Some(joined) = tasks.join_next().await {
            if let Err(join_error) = joined {
                log_join_error(&join_error);
                first_failure.get_or_insert(join_error);
            }
        }

        match first_failure {
            Some(join_error) => Err(RuntimeError::DispatchJoin(join_error)),
            None => Ok(()),
        }
    }
}

fn reap_finished(tasks: &mut JoinSet<DispatchOutcome>) {
    while let Some(joined) = tasks.try_join_next() {
        if let Err(join_error) = joined {
            log_join_error(&join_error);
        }
    }
}

fn log_join_error(join_error: &JoinError) {
    error!(
        target: "runtime::dispatch",
        error = %join_error,
        panicked = join_error.is_panic(),
        "dispatch task failed"
    );
}
