use crate::search::lookup::{LookupCompletion, LookupRequest, LookupService};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Runs lookups on worker threads and hands completions back to the loop.
/// Nothing is ever aborted; stale completions are filtered by the race guard.
pub struct LookupExecutor {
    service: Arc<dyn LookupService>,
    completion_tx: Sender<LookupCompletion>,
    completion_rx: Receiver<LookupCompletion>,
    in_flight: usize,
}

impl LookupExecutor {
    pub fn new(service: Arc<dyn LookupService>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<LookupCompletion>();
        Self {
            service,
            completion_tx,
            completion_rx,
            in_flight: 0,
        }
    }

    pub fn spawn(&mut self, request: LookupRequest) {
        let completion_tx = self.completion_tx.clone();
        let service = Arc::clone(&self.service);
        self.in_flight = self.in_flight.saturating_add(1);
        std::thread::spawn(move || {
            let outcome = service.search(request.query.as_str());
            let _ = completion_tx.send(LookupCompletion {
                token: request.token,
                query: request.query,
                outcome,
            });
        });
    }

    pub fn drain_ready(&mut self) -> Vec<LookupCompletion> {
        let mut out = Vec::<LookupCompletion>::new();
        loop {
            match self.completion_rx.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.in_flight = self.in_flight.saturating_sub(out.len());
        out
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
