/// What the view renders from. Owned by the combobox controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub is_open: bool,
    pub highlighted: Option<usize>,
    pub is_loading: bool,
    pub is_navigating: bool,
    pub is_focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    OpenLoading,
    OpenResults,
    OpenEmpty,
    Navigating,
}

impl InteractionState {
    /// Highlight as a signed index, `-1` when nothing is highlighted.
    pub fn highlighted_index(&self) -> isize {
        self.highlighted.map_or(-1, |index| index as isize)
    }

    pub fn phase(&self, candidate_count: usize) -> Phase {
        if self.is_navigating {
            Phase::Navigating
        } else if !self.is_open {
            Phase::Closed
        } else if self.is_loading {
            Phase::OpenLoading
        } else if candidate_count > 0 {
            Phase::OpenResults
        } else {
            Phase::OpenEmpty
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboEvent {
    Focus { has_query: bool },
    Blur,
    Edited { has_query: bool },
    ResultsAccepted,
    LookupFailed,
    HighlightNext { count: usize },
    HighlightPrev { count: usize },
    Hover { index: usize, count: usize },
    Dismiss,
    Commit,
}

/// Pure transition function. `Navigating` absorbs every event.
pub fn transition(state: InteractionState, event: ComboEvent) -> InteractionState {
    if state.is_navigating {
        return state;
    }

    let mut next = state;
    match event {
        ComboEvent::Focus { has_query } => {
            next.is_focused = true;
            next.is_open = has_query;
        }
        ComboEvent::Blur => {
            next.is_focused = false;
            next.is_open = false;
            next.highlighted = None;
        }
        ComboEvent::Edited { has_query } => {
            next.is_open = next.is_focused;
            next.is_loading = has_query;
            next.highlighted = None;
        }
        ComboEvent::ResultsAccepted | ComboEvent::LookupFailed => {
            next.is_loading = false;
            next.highlighted = None;
        }
        ComboEvent::HighlightNext { count } => {
            if count == 0 || !next.is_focused {
                return state;
            }
            next.is_open = true;
            next.highlighted = Some(match next.highlighted {
                Some(index) if index + 1 < count => index + 1,
                _ => 0,
            });
        }
        ComboEvent::HighlightPrev { count } => {
            if count == 0 || !next.is_focused {
                return state;
            }
            next.is_open = true;
            next.highlighted = Some(match next.highlighted {
                Some(index) if index > 0 && index < count => index - 1,
                _ => count - 1,
            });
        }
        ComboEvent::Hover { index, count } => {
            if next.is_open && index < count {
                next.highlighted = Some(index);
            }
        }
        ComboEvent::Dismiss => {
            next.is_open = false;
            next.highlighted = None;
        }
        ComboEvent::Commit => {
            next.is_navigating = true;
            next.is_open = false;
            next.is_loading = false;
            next.highlighted = None;
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::{ComboEvent, InteractionState, Phase, transition};

    fn focused() -> InteractionState {
        transition(
            InteractionState::default(),
            ComboEvent::Focus { has_query: false },
        )
    }

    fn run(state: InteractionState, events: &[ComboEvent]) -> InteractionState {
        events.iter().fold(state, |acc, event| transition(acc, *event))
    }

    #[test]
    fn typing_opens_loading_then_results_or_empty() {
        let state = transition(focused(), ComboEvent::Edited { has_query: true });
        assert_eq!(state.phase(0), Phase::OpenLoading);

        let accepted = transition(state, ComboEvent::ResultsAccepted);
        assert_eq!(accepted.phase(3), Phase::OpenResults);
        assert_eq!(accepted.phase(0), Phase::OpenEmpty);

        let cleared = transition(state, ComboEvent::Edited { has_query: false });
        assert_eq!(cleared.phase(0), Phase::OpenEmpty);
    }

    #[test]
    fn typing_without_focus_stays_closed() {
        let state = transition(
            InteractionState::default(),
            ComboEvent::Edited { has_query: true },
        );
        assert_eq!(state.phase(0), Phase::Closed);
    }

    #[test]
    fn arrow_down_wraps_circularly() {
        let m = 3;
        for k in 1..=10usize {
            let events = vec![ComboEvent::HighlightNext { count: m }; k];
            let state = run(focused(), &events);
            assert_eq!(state.highlighted, Some((k - 1) % m), "after {k} presses");
        }
    }

    #[test]
    fn arrow_up_from_none_lands_on_last() {
        let state = run(
            focused(),
            &[
                ComboEvent::HighlightPrev { count: 3 },
                ComboEvent::HighlightPrev { count: 3 },
            ],
        );
        assert_eq!(state.highlighted, Some(1));
        let wrapped = run(
            state,
            &[
                ComboEvent::HighlightPrev { count: 3 },
                ComboEvent::HighlightPrev { count: 3 },
            ],
        );
        assert_eq!(wrapped.highlighted, Some(2));
    }

    #[test]
    fn arrows_ignore_empty_lists() {
        let state = transition(focused(), ComboEvent::HighlightNext { count: 0 });
        assert_eq!(state.highlighted_index(), -1);
    }

    #[test]
    fn escape_and_blur_close() {
        let open = run(
            focused(),
            &[
                ComboEvent::Edited { has_query: true },
                ComboEvent::ResultsAccepted,
                ComboEvent::HighlightNext { count: 2 },
            ],
        );
        assert_eq!(open.phase(2), Phase::OpenResults);

        let dismissed = transition(open, ComboEvent::Dismiss);
        assert_eq!(dismissed.phase(2), Phase::Closed);
        assert_eq!(dismissed.highlighted, None);

        let blurred = transition(open, ComboEvent::Blur);
        assert_eq!(blurred.phase(2), Phase::Closed);
        assert!(!blurred.is_focused);
    }

    #[test]
    fn hover_only_applies_to_open_lists() {
        let closed = transition(focused(), ComboEvent::Hover { index: 1, count: 3 });
        assert_eq!(closed.highlighted, None);

        let open = run(
            focused(),
            &[
                ComboEvent::Edited { has_query: true },
                ComboEvent::ResultsAccepted,
                ComboEvent::Hover { index: 1, count: 3 },
            ],
        );
        assert_eq!(open.highlighted, Some(1));
        assert_eq!(
            transition(open, ComboEvent::Hover { index: 7, count: 3 }).highlighted,
            Some(1)
        );
    }

    #[test]
    fn navigating_is_terminal() {
        let navigating = transition(focused(), ComboEvent::Commit);
        assert_eq!(navigating.phase(5), Phase::Navigating);

        let after = run(
            navigating,
            &[
                ComboEvent::Edited { has_query: true },
                ComboEvent::Blur,
                ComboEvent::HighlightNext { count: 3 },
                ComboEvent::Dismiss,
            ],
        );
        assert_eq!(after, navigating);
    }
}
