use std::time::Duration;

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { generation: u64, remaining: u32 },
    Expired { generation: u64 },
}

impl TimerEvent {
    pub fn generation(&self) -> u64 {
        match self {
            TimerEvent::Tick { generation, .. } | TimerEvent::Expired { generation } => *generation,
        }
    }
}

/// Per-question countdown running as a tokio task. Emits one `Tick` per
/// second and a final `Expired`. Aborted when cancelled or dropped.
pub struct CountdownTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    pub fn start(generation: u64, seconds: u32, events: UnboundedSender<TimerEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut remaining = seconds;
            while remaining > 0 {
                tokio::time::sleep(Duration::from_secs(1)).await;
                remaining -= 1;
                if events
                    .send(TimerEvent::Tick {
                        generation,
                        remaining,
                    })
                    .is_err()
                {
                    return;
                }
            }
            let _ = events.send(TimerEvent::Expired { generation });
        });

        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
