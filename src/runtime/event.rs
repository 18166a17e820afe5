use crate::runtime::command::Command;
use crate::search::LookupCompletion;
use crate::terminal::TerminalEvent;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Terminal(TerminalEvent),
    Command(Command),
    /// Debounce window for `query` elapsed; time to issue the lookup.
    LookupDue {
        query: String,
    },
    LookupCompleted(LookupCompletion),
}
