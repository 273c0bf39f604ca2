//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;

use crate::instance::Instance;

/// Cadence at which the timer engine fires (§4.4, §5).
pub const HELLO_INTERVAL: Duration = Duration::from_secs(5);

/// A handle to the dedicated timer thread driving [`Instance::tick`]
/// (§4.4, §5). The source's timer loop has no coordinated shutdown path
/// (§9 open question (e)); this handle adds the shutdown flag the design
/// notes ask for, checked between sleeps.
pub struct TimerHandle {
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Spawns the timer loop on the current Tokio runtime.
    pub fn spawn(instance: Arc<Instance>) -> TimerHandle {
        let shutdown = Arc::new(Notify::new());
        let shutdown_rx = Arc::clone(&shutdown);

        let task = tokio::spawn(
            async move {
                let mut interval = tokio::time::interval(HELLO_INTERVAL);
                // A late tick should not cause a burst of catch-up ticks;
                // the engine only ever cares about the current state, not
                // how many intervals were missed.
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            instance.tick(Instant::now());
                        }
                        _ = shutdown_rx.notified() => {
                            break;
                        }
                    }
                }
            }
            .in_current_span(),
        );

        TimerHandle { shutdown, task }
    }

    /// Signals the timer loop to stop after its current tick, then waits
    /// for it to finish. Mirrors §5 destroy semantics: the engine lock is
    /// no longer acquired by the timer thread once this returns.
    pub async fn shutdown(self) {
        self.shutdown.notify_one();
        let _ = self.task.await;
    }
}
