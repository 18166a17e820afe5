use crate::runtime::event::AppEvent;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum SchedulerCommand {
    /// Re-arms the timer for `key`; only the most recently armed event fires.
    Debounce {
        key: String,
        delay: Duration,
        event: AppEvent,
    },
    Cancel {
        key: String,
    },
}

#[derive(Debug, Clone)]
struct Guard {
    key: String,
    version: u64,
}

#[derive(Debug, Clone)]
struct DelayedTask {
    due_at: Instant,
    guard: Guard,
    event: AppEvent,
}

/// Timer wheel for debounced events, owned by the runtime loop.
#[derive(Default)]
pub struct Scheduler {
    delayed: Vec<DelayedTask>,
    key_versions: HashMap<String, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, command: SchedulerCommand, now: Instant) {
        match command {
            SchedulerCommand::Debounce { key, delay, event } => {
                let version = self.bump_version(&key);
                self.delayed.retain(|task| task.guard.key != key);
                self.delayed.push(DelayedTask {
                    due_at: now + delay,
                    guard: Guard { key, version },
                    event,
                });
            }
            SchedulerCommand::Cancel { key } => {
                self.bump_version(&key);
                self.delayed.retain(|task| task.guard.key != key);
            }
        }
    }

    pub fn drain_ready(&mut self, now: Instant) -> Vec<AppEvent> {
        let mut ready = Vec::new();
        let mut idx = 0usize;
        while idx < self.delayed.len() {
            if self.delayed[idx].due_at <= now {
                let task = self.delayed.swap_remove(idx);
                if self.task_is_valid(&task) {
                    ready.push(task.event);
                }
            } else {
                idx += 1;
            }
        }

        ready
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        let mut next = default_timeout;

        for task in &self.delayed {
            let due_in = task.due_at.saturating_duration_since(now);
            if due_in < next {
                next = due_in;
            }
        }

        next
    }

    pub fn is_armed(&self, key: &str) -> bool {
        self.delayed.iter().any(|task| task.guard.key == key)
    }

    /// Drops every pending timer. Versions keep counting so a
    /// guard minted before the clear can never validate again.
    pub fn clear(&mut self) {
        for task in self.delayed.drain(..) {
            let entry = self.key_versions.entry(task.guard.key).or_insert(0);
            *entry = entry.saturating_add(1);
        }
    }

    fn task_is_valid(&self, task: &DelayedTask) -> bool {
        let current = *self.key_versions.get(&task.guard.key).unwrap_or(&0);
        current == task.guard.version
    }

    fn bump_version(&mut self, key: &str) -> u64 {
        let entry = self.key_versions.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }
}

#[cfg(test)]
mod tests {
    use super::{Scheduler, SchedulerCommand};
    use crate::runtime::event::AppEvent;
    use std::time::{Duration, Instant};

    fn due(query: &str) -> AppEvent {
        AppEvent::LookupDue {
            query: query.to_string(),
        }
    }

    fn debounce(query: &str) -> SchedulerCommand {
        SchedulerCommand::Debounce {
            key: "search".to_string(),
            delay: Duration::from_millis(400),
            event: due(query),
        }
    }

    fn queries(events: Vec<AppEvent>) -> Vec<String> {
        events
            .into_iter()
            .filter_map(|event| match event {
                AppEvent::LookupDue { query } => Some(query),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn only_last_trigger_in_quiet_window_fires() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(debounce("a"), start);
        scheduler.schedule(debounce("al"), start + Duration::from_millis(100));
        scheduler.schedule(debounce("ali"), start + Duration::from_millis(200));

        assert!(scheduler.drain_ready(start + Duration::from_millis(450)).is_empty());
        let fired = queries(scheduler.drain_ready(start + Duration::from_millis(600)));
        assert_eq!(fired, vec!["ali".to_string()]);
        assert!(scheduler.drain_ready(start + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn cancel_disarms_pending_timer() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(debounce("ali"), start);
        scheduler.schedule(
            SchedulerCommand::Cancel {
                key: "search".to_string(),
            },
            start,
        );

        assert!(!scheduler.is_armed("search"));
        assert!(scheduler.drain_ready(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(debounce("ali"), start);
        scheduler.schedule(
            SchedulerCommand::Debounce {
                key: "other".to_string(),
                delay: Duration::from_millis(10),
                event: due("now"),
            },
            start,
        );
        scheduler.clear();

        assert!(scheduler.drain_ready(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn poll_timeout_tracks_nearest_timer() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        let idle = Duration::from_millis(120);
        assert_eq!(scheduler.poll_timeout(start, idle), idle);

        scheduler.schedule(
            SchedulerCommand::Debounce {
                key: "search".to_string(),
                delay: Duration::from_millis(50),
                event: due("a"),
            },
            start,
        );
        assert_eq!(
            scheduler.poll_timeout(start, idle),
            Duration::from_millis(50)
        );
    }
}
