use std::fmt;

/// Marker minted per issued lookup. Tokens compare by issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GuardToken(u64);

impl GuardToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GuardToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T, E> {
    Accepted(T),
    Failed(E),
    /// A newer lookup was issued (or the guard was invalidated); the outcome
    /// must not touch visible state.
    Superseded,
}

impl<T, E> Settled<T, E> {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

/// Last-issued-wins guard for one logical input.
///
/// Every call to [`RaceGuard::issue`] makes the new token the only current one.
/// Outcomes are fed back through [`RaceGuard::settle`], which passes through
/// exactly the outcome of the current token and swallows everything else,
/// including failures. The underlying request is never aborted.
#[derive(Debug, Default)]
pub struct RaceGuard {
    sequence: u64,
    current: Option<GuardToken>,
}

impl RaceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> GuardToken {
        self.sequence = self.sequence.saturating_add(1);
        let token = GuardToken(self.sequence);
        self.current = Some(token);
        token
    }

    /// Mints a token and hands it to `factory`, which starts the request.
    pub fn guard<R>(&mut self, factory: impl FnOnce(GuardToken) -> R) -> R {
        let token = self.issue();
        factory(token)
    }

    pub fn current(&self) -> Option<GuardToken> {
        self.current
    }

    pub fn is_current(&self, token: GuardToken) -> bool {
        self.current == Some(token)
    }

    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }

    pub fn settle<T, E>(&mut self, token: GuardToken, outcome: Result<T, E>) -> Settled<T, E> {
        if !self.is_current(token) {
            return Settled::Superseded;
        }
        self.current = None;
        match outcome {
            Ok(value) => Settled::Accepted(value),
            Err(err) => Settled::Failed(err),
        }
    }

    /// Makes every outstanding token stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}
