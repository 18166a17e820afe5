use crate::terminal::KeyEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    ToggleFocus,
    InputKey(KeyEvent),
}
