mod executor;
mod guard;
mod highlight;
mod lookup;
mod store;

pub use executor::LookupExecutor;
pub use guard::{GuardToken, RaceGuard, Settled};
pub use highlight::highlight_ranges;
pub use lookup::{
    HttpLookup, LookupCompletion, LookupError, LookupRequest, LookupService, StaticLookup,
};
pub use store::{Candidate, SuggestionStore, rank_candidates};
