use crate::combobox::Combobox;
use crate::navigation::Navigator;
use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::event::AppEvent;
use crate::runtime::key_bindings::KeyBindings;
use crate::runtime::scheduler::Scheduler;
use crate::search::LookupExecutor;
use crate::terminal::{Terminal, TerminalEvent};
use crate::ui::Renderer;
use std::io;
use std::time::{Duration, Instant};

const IDLE_POLL: Duration = Duration::from_millis(120);
const BUSY_POLL: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The user committed to a player; carries the committed identifier.
    Navigated(String),
    Exited,
}

pub struct Runtime<N: Navigator> {
    combobox: Combobox,
    terminal: Terminal,
    scheduler: Scheduler,
    executor: LookupExecutor,
    key_bindings: KeyBindings,
    renderer: Renderer,
    navigator: N,
    outcome: Option<RunOutcome>,
}

impl<N: Navigator> Runtime<N> {
    pub fn new(
        combobox: Combobox,
        terminal: Terminal,
        executor: LookupExecutor,
        navigator: N,
        renderer: Renderer,
    ) -> Self {
        Self {
            combobox,
            terminal,
            scheduler: Scheduler::new(),
            executor,
            key_bindings: KeyBindings::new(),
            renderer,
            navigator,
            outcome: None,
        }
    }

    pub fn with_key_bindings(mut self, key_bindings: KeyBindings) -> Self {
        self.key_bindings = key_bindings;
        self
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn run(&mut self) -> io::Result<RunOutcome> {
        self.terminal.enter()?;

        let run_result = (|| -> io::Result<()> {
            let effects = self.combobox.on_focus();
            self.apply_effects(effects)?;
            self.render()?;

            while self.outcome.is_none() {
                self.process_ready_events()?;
                if self.outcome.is_some() {
                    break;
                }

                let now = Instant::now();
                let timeout = self.scheduler.poll_timeout(now, self.idle_timeout());
                let event = self.terminal.poll_event(timeout)?;

                self.dispatch_app_event(AppEvent::Terminal(event))?;
            }

            Ok(())
        })();

        self.teardown();
        let exit_result = self.terminal.exit();
        run_result.and(exit_result)?;
        Ok(self.outcome.take().unwrap_or(RunOutcome::Exited))
    }

    fn idle_timeout(&self) -> Duration {
        if self.executor.in_flight() > 0 {
            BUSY_POLL
        } else {
            IDLE_POLL
        }
    }

    fn process_ready_events(&mut self) -> io::Result<()> {
        for event in self.scheduler.drain_ready(Instant::now()) {
            self.dispatch_app_event(event)?;
        }
        for completion in self.executor.drain_ready() {
            self.dispatch_app_event(AppEvent::LookupCompleted(completion))?;
        }
        Ok(())
    }

    fn dispatch_app_event(&mut self, event: AppEvent) -> io::Result<()> {
        let effects = match event {
            AppEvent::Terminal(TerminalEvent::Resize(size)) => {
                self.terminal.set_size(size);
                vec![Effect::RequestRender]
            }
            AppEvent::Terminal(TerminalEvent::Key(key)) => {
                let command = self
                    .key_bindings
                    .resolve(key)
                    .unwrap_or(Command::InputKey(key));
                return self.process_command(command);
            }
            AppEvent::Terminal(TerminalEvent::Click { row, .. }) => {
                match self.renderer.item_at_row(row) {
                    Some(index) => self.combobox.on_item_click(index),
                    None => Vec::new(),
                }
            }
            AppEvent::Terminal(TerminalEvent::Hover { row, .. }) => {
                match self.renderer.item_at_row(row) {
                    Some(index) => self.combobox.on_item_hover(index),
                    None => Vec::new(),
                }
            }
            AppEvent::Terminal(TerminalEvent::FocusGained) => self.combobox.on_focus(),
            AppEvent::Terminal(TerminalEvent::FocusLost) => self.combobox.on_blur(),
            AppEvent::Terminal(TerminalEvent::Tick) => Vec::new(),
            AppEvent::Command(command) => return self.process_command(command),
            AppEvent::LookupDue { query } => self.combobox.on_lookup_due(query),
            AppEvent::LookupCompleted(completion) => self.combobox.on_lookup_completed(completion),
        };
        self.apply_effects(effects)
    }

    fn process_command(&mut self, command: Command) -> io::Result<()> {
        let effects = match command {
            Command::Exit => {
                self.outcome = Some(RunOutcome::Exited);
                Vec::new()
            }
            Command::ToggleFocus => {
                if self.combobox.state().is_focused {
                    self.combobox.on_blur()
                } else {
                    self.combobox.on_focus()
                }
            }
            Command::InputKey(key) => self.combobox.on_key_down(key),
        };
        self.apply_effects(effects)
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) -> io::Result<()> {
        let mut render_requested = false;

        for effect in effects {
            match effect {
                Effect::Schedule(cmd) => {
                    self.scheduler.schedule(cmd, Instant::now());
                }
                Effect::Lookup(request) => {
                    self.executor.spawn(request);
                }
                Effect::Navigate(request) => {
                    self.navigator.go_to(request.identifier.as_str());
                    self.outcome = Some(RunOutcome::Navigated(request.identifier));
                }
                Effect::RequestRender => {
                    render_requested = true;
                }
            }
        }

        if render_requested {
            self.render()?;
        }

        Ok(())
    }

    fn teardown(&mut self) {
        let now = Instant::now();
        for effect in self.combobox.teardown() {
            if let Effect::Schedule(cmd) = effect {
                self.scheduler.schedule(cmd, now);
            }
        }
        self.scheduler.clear();
        log::debug!(
            "search torn down with {} lookup(s) still in flight",
            self.executor.in_flight()
        );
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = self.renderer.render(&self.combobox);
        self.terminal.render_frame(&frame)
    }
}
