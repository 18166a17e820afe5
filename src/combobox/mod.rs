mod controller;
mod input;
mod state;

pub use controller::{Combobox, SEARCH_DEBOUNCE_KEY};
pub use input::{InputChange, TextInput};
pub use state::{ComboEvent, InteractionState, Phase, transition};
