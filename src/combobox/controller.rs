use crate::combobox::input::{InputChange, TextInput};
use crate::combobox::state::{ComboEvent, InteractionState, Phase, transition};
use crate::navigation::NavigationCommitter;
use crate::runtime::effect::Effect;
use crate::runtime::event::AppEvent;
use crate::runtime::scheduler::SchedulerCommand;
use crate::search::{
    Candidate, LookupCompletion, LookupRequest, RaceGuard, Settled, SuggestionStore,
};
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

pub const SEARCH_DEBOUNCE_KEY: &str = "player_search";

/// Search-as-you-type player box.
///
/// Handlers never touch the terminal or the network. They mutate the
/// combobox and return effects (debounce timers, lookups, navigation) for the
/// runtime to carry out, so the whole interaction can be driven from tests.
pub struct Combobox {
    input: TextInput,
    state: InteractionState,
    store: SuggestionStore,
    guard: RaceGuard,
    committer: NavigationCommitter,
    debounce: Duration,
}

impl Combobox {
    pub fn new(debounce: Duration) -> Self {
        Self {
            input: TextInput::new(),
            state: InteractionState::default(),
            store: SuggestionStore::new(),
            guard: RaceGuard::new(),
            committer: NavigationCommitter::new(),
            debounce,
        }
    }

    pub fn query(&self) -> &str {
        self.store.query()
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase(self.candidates().len())
    }

    /// Candidates as displayed; empty while a lookup is outstanding.
    pub fn candidates(&self) -> &[Candidate] {
        if self.store.is_loading() {
            &[]
        } else {
            self.store.candidates()
        }
    }

    pub fn failure(&self) -> Option<&str> {
        self.store.failure()
    }

    pub fn is_navigating(&self) -> bool {
        self.state.is_navigating
    }

    pub fn highlighted_candidate(&self) -> Option<&Candidate> {
        self.state
            .highlighted
            .and_then(|index| self.candidates().get(index))
    }

    /// Programmatic replacement of the input text; works without focus.
    pub fn set_query(&mut self, text: &str) -> Vec<Effect> {
        if self.is_navigating() {
            return Vec::new();
        }
        self.input.set_value(text);
        self.text_changed()
    }

    /// Focus selects the whole input, so the next keystroke starts a new query.
    pub fn on_focus(&mut self) -> Vec<Effect> {
        if self.is_navigating() {
            return Vec::new();
        }
        self.input.select_all();
        let has_query = !self.query().is_empty();
        self.apply(ComboEvent::Focus { has_query });
        vec![Effect::RequestRender]
    }

    pub fn on_blur(&mut self) -> Vec<Effect> {
        if self.is_navigating() {
            return Vec::new();
        }
        self.apply(ComboEvent::Blur);
        vec![Effect::RequestRender]
    }

    pub fn on_key_down(&mut self, key: KeyEvent) -> Vec<Effect> {
        if !self.accepts_input() {
            return Vec::new();
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Down => self.highlight_next(),
            KeyCode::Char('n') if ctrl => self.highlight_next(),
            KeyCode::Up => self.highlight_prev(),
            KeyCode::Char('p') if ctrl => self.highlight_prev(),
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => self.dismiss(),
            _ => match self.input.handle_key(key) {
                InputChange::Value => self.text_changed(),
                InputChange::Cursor => vec![Effect::RequestRender],
                InputChange::None => Vec::new(),
            },
        }
    }

    /// Replaces the whole input text, as a paste would. Ignored without focus.
    pub fn on_change(&mut self, value: &str) -> Vec<Effect> {
        if !self.accepts_input() {
            return Vec::new();
        }
        self.set_query(value)
    }

    pub fn on_item_click(&mut self, index: usize) -> Vec<Effect> {
        if self.is_navigating() || !self.state.is_open {
            return Vec::new();
        }
        match self.candidates().get(index) {
            Some(candidate) => {
                let name = candidate.name.clone();
                self.commit_candidate(name)
            }
            None => Vec::new(),
        }
    }

    pub fn on_item_hover(&mut self, index: usize) -> Vec<Effect> {
        let before = self.state;
        let count = self.candidates().len();
        self.apply(ComboEvent::Hover { index, count });
        if self.state == before {
            Vec::new()
        } else {
            vec![Effect::RequestRender]
        }
    }

    pub fn highlight_next(&mut self) -> Vec<Effect> {
        let count = self.candidates().len();
        self.apply(ComboEvent::HighlightNext { count });
        vec![Effect::RequestRender]
    }

    pub fn highlight_prev(&mut self) -> Vec<Effect> {
        let count = self.candidates().len();
        self.apply(ComboEvent::HighlightPrev { count });
        vec![Effect::RequestRender]
    }

    pub fn dismiss(&mut self) -> Vec<Effect> {
        self.apply(ComboEvent::Dismiss);
        vec![Effect::RequestRender]
    }

    /// Enter: the highlighted candidate if any, otherwise the typed text as-is.
    pub fn submit(&mut self) -> Vec<Effect> {
        if self.is_navigating() {
            return Vec::new();
        }
        match self.highlighted_candidate() {
            Some(candidate) => {
                let name = candidate.name.clone();
                self.commit_candidate(name)
            }
            None => {
                let query = self.query().to_string();
                self.commit(query.as_str())
            }
        }
    }

    /// Debounce window elapsed for `query`: issue the guarded lookup.
    pub fn on_lookup_due(&mut self, query: String) -> Vec<Effect> {
        if self.is_navigating() || query.is_empty() || query != self.query() {
            log::debug!("dropping due lookup for {query:?}");
            return Vec::new();
        }
        let request = self.guard.guard(|token| LookupRequest { token, query });
        log::debug!("issuing lookup {} for {:?}", request.token, request.query);
        vec![Effect::Lookup(request)]
    }

    pub fn on_lookup_completed(&mut self, completion: LookupCompletion) -> Vec<Effect> {
        let LookupCompletion {
            token,
            query,
            outcome,
        } = completion;

        if query != self.query() {
            log::trace!("discarding lookup {token} for outdated query {query:?}");
            return Vec::new();
        }

        match self.guard.settle(token, outcome) {
            Settled::Superseded => {
                log::trace!("discarding stale lookup {token} for {query:?}");
                Vec::new()
            }
            Settled::Accepted(candidates) => {
                log::debug!("lookup {token} for {query:?}: {} results", candidates.len());
                self.store.set_candidates(candidates);
                self.apply(ComboEvent::ResultsAccepted);
                vec![Effect::RequestRender]
            }
            Settled::Failed(err) => {
                log::warn!("lookup {token} for {query:?} failed: {err}");
                self.store.set_failure(err.to_string());
                self.apply(ComboEvent::LookupFailed);
                vec![Effect::RequestRender]
            }
        }
    }

    /// Unmount: pending timers are cancelled and outstanding lookups go inert.
    pub fn teardown(&mut self) -> Vec<Effect> {
        self.guard.invalidate();
        vec![cancel_debounce()]
    }

    fn text_changed(&mut self) -> Vec<Effect> {
        let query = self.input.value().trim().to_string();
        if query == self.query() {
            return vec![Effect::RequestRender];
        }

        self.store.set_query(query.as_str());
        self.guard.invalidate();
        self.apply(ComboEvent::Edited {
            has_query: !query.is_empty(),
        });

        if query.is_empty() {
            self.store.clear();
            return vec![cancel_debounce(), Effect::RequestRender];
        }

        self.store.set_loading(true);
        vec![
            Effect::Schedule(SchedulerCommand::Debounce {
                key: SEARCH_DEBOUNCE_KEY.to_string(),
                delay: self.debounce,
                event: AppEvent::LookupDue { query },
            }),
            Effect::RequestRender,
        ]
    }

    fn commit_candidate(&mut self, name: String) -> Vec<Effect> {
        self.input.set_value(name.as_str());
        self.store.set_query(name.as_str());
        self.commit(name.as_str())
    }

    fn commit(&mut self, identifier: &str) -> Vec<Effect> {
        let Some(request) = self.committer.commit(identifier) else {
            return Vec::new();
        };
        self.apply(ComboEvent::Commit);
        self.guard.invalidate();
        self.store.set_loading(false);
        vec![
            cancel_debounce(),
            Effect::Navigate(request),
            Effect::RequestRender,
        ]
    }

    fn accepts_input(&self) -> bool {
        self.state.is_focused && !self.is_navigating()
    }

    fn apply(&mut self, event: ComboEvent) {
        self.state = transition(self.state, event);
    }
}

fn cancel_debounce() -> Effect {
    Effect::Schedule(SchedulerCommand::Cancel {
        key: SEARCH_DEBOUNCE_KEY.to_string(),
    })
}
