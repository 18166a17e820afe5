use crate::combobox::Combobox;
use crate::search::highlight_ranges;
use crate::terminal::CursorPos;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use unicode_width::UnicodeWidthStr;

pub const PLACEHOLDER: &str = "Type player name, e.g. \"MegaDestroyer3000\"";

const PROMPT: &str = "› ";
const NAVIGATING_NOTE: &str = "  opening...";
const HEADER_ROWS: u16 = 2;

#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

/// Where the candidate rows of the last frame landed on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MenuRows {
    first_row: u16,
    first_index: usize,
    count: usize,
}

pub struct Renderer {
    max_visible: usize,
    scroll_offset: usize,
    hints: Vec<(String, &'static str)>,
    menu_rows: Option<MenuRows>,
}

impl Renderer {
    pub fn new(max_visible: usize) -> Self {
        Self {
            max_visible: max_visible.max(1),
            scroll_offset: 0,
            hints: Vec::new(),
            menu_rows: None,
        }
    }

    pub fn with_hints(mut self, hints: Vec<(String, &'static str)>) -> Self {
        self.hints = hints;
        self
    }

    /// Maps a screen row of the last frame back to a candidate index.
    pub fn item_at_row(&self, row: u16) -> Option<usize> {
        let menu = self.menu_rows?;
        let offset = row.checked_sub(menu.first_row)? as usize;
        (offset < menu.count).then_some(menu.first_index + offset)
    }

    pub fn render(&mut self, combobox: &Combobox) -> RenderFrame {
        let mut frame = RenderFrame::default();
        self.menu_rows = None;

        frame.lines.push(self.header_line());

        let (input_line, cursor_col) = self.input_line(combobox);
        frame.lines.push(input_line);
        let state = combobox.state();
        if state.is_focused && !state.is_navigating {
            frame.cursor = Some(CursorPos {
                col: cursor_col,
                row: HEADER_ROWS - 1,
            });
        }

        if state.is_open {
            self.menu_lines(combobox, &mut frame.lines);
        }

        frame
    }

    fn header_line(&self) -> SpanLine {
        let mut line = vec![Span::styled(
            "Player search",
            Style::new().color(Color::Cyan).bold(),
        )];
        let dim = Style::new().color(Color::DarkGrey);
        let mut hints = vec![
            "↑/↓ select".to_string(),
            "Enter open".to_string(),
            "Esc close".to_string(),
        ];
        hints.extend(
            self.hints
                .iter()
                .map(|(key, action)| format!("{key} {action}")),
        );
        line.push(Span::styled(format!("  {}", hints.join(" · ")), dim));
        line
    }

    fn input_line(&self, combobox: &Combobox) -> (SpanLine, u16) {
        let input = combobox.input();
        let mut line = vec![Span::styled(PROMPT, Style::new().color(Color::Green))];

        if input.value().is_empty() {
            line.push(Span::styled(
                PLACEHOLDER,
                Style::new().color(Color::DarkGrey),
            ));
        } else {
            let style = if combobox.is_navigating() {
                Style::new().color(Color::DarkGrey)
            } else if input.is_selected() {
                Style::new().background(Color::DarkGrey)
            } else {
                Style::new()
            };
            line.push(Span::styled(input.value(), style));
        }

        if combobox.is_navigating() {
            line.push(Span::styled(NAVIGATING_NOTE, Style::new().color(Color::Cyan)));
        }

        let before_cursor: String = input.value().chars().take(input.cursor()).collect();
        let col = UnicodeWidthStr::width(PROMPT) + UnicodeWidthStr::width(before_cursor.as_str());
        (line, col.min(u16::MAX as usize) as u16)
    }

    fn menu_lines(&mut self, combobox: &Combobox, lines: &mut Vec<SpanLine>) {
        let dim = Style::new().color(Color::DarkGrey);
        let state = combobox.state();

        if state.is_loading {
            lines.push(vec![Span::styled("  Loading...", dim)]);
            return;
        }
        if let Some(failure) = combobox.failure() {
            lines.push(vec![Span::styled(
                format!("  Lookup failed: {failure}"),
                Style::new().color(Color::Red),
            )]);
            return;
        }

        let candidates = combobox.candidates();
        if candidates.is_empty() {
            let message = if combobox.query().is_empty() {
                "  Specify your request"
            } else {
                "  Nothing found"
            };
            lines.push(vec![Span::styled(message, dim)]);
            return;
        }

        self.ensure_visible(state.highlighted, candidates.len());
        let end = (self.scroll_offset + self.max_visible).min(candidates.len());
        self.menu_rows = Some(MenuRows {
            first_row: lines.len() as u16,
            first_index: self.scroll_offset,
            count: end - self.scroll_offset,
        });

        let match_style = Style::new().bold().underline();
        for (index, candidate) in candidates
            .iter()
            .enumerate()
            .take(end)
            .skip(self.scroll_offset)
        {
            let active = state.highlighted == Some(index);
            let (marker, base) = if active {
                (
                    Span::styled("› ", Style::new().color(Color::Cyan)),
                    Style::new().color(Color::Cyan),
                )
            } else {
                (Span::new("  "), Style::new())
            };
            let mut line = vec![marker];
            line.extend(render_text_spans(
                candidate.name.as_str(),
                &highlight_ranges(candidate.name.as_str(), combobox.query()),
                base,
                match_style,
            ));
            lines.push(line);
        }

        if candidates.len() > self.max_visible {
            lines.push(vec![Span::styled(
                format!(
                    "  {}-{} of {}",
                    self.scroll_offset + 1,
                    end,
                    candidates.len()
                ),
                dim,
            )]);
        }
    }

    fn ensure_visible(&mut self, highlighted: Option<usize>, len: usize) {
        let max_offset = len.saturating_sub(self.max_visible);
        match highlighted {
            None => self.scroll_offset = 0,
            Some(index) if index < self.scroll_offset => self.scroll_offset = index,
            Some(index) if index >= self.scroll_offset + self.max_visible => {
                self.scroll_offset = index + 1 - self.max_visible;
            }
            Some(_) => {}
        }
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}

/// Splits `text` into spans, applying `highlight_style` over byte `ranges`.
fn render_text_spans(
    text: &str,
    ranges: &[(usize, usize)],
    base_style: Style,
    highlight_style: Style,
) -> Vec<Span> {
    let mut spans = Vec::<Span>::new();
    let mut cursor = 0usize;
    for &(start, end) in ranges {
        let start = start.clamp(cursor, text.len());
        let end = end.clamp(start, text.len());
        if start > cursor {
            spans.push(Span::styled(&text[cursor..start], base_style));
        }
        if end > start {
            spans.push(Span::styled(
                &text[start..end],
                base_style.merge(highlight_style),
            ));
        }
        cursor = end;
    }
    if cursor < text.len() || spans.is_empty() {
        spans.push(Span::styled(&text[cursor..], base_style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::{PLACEHOLDER, Renderer, render_text_spans};
    use crate::combobox::Combobox;
    use crate::runtime::effect::Effect;
    use crate::search::{Candidate, LookupCompletion, LookupError};
    use crate::terminal::{KeyCode, KeyEvent};
    use crate::ui::span::line_text;
    use crate::ui::style::{Color, Style};
    use std::time::Duration;

    fn combobox_with(query: &str, outcome: Result<Vec<&str>, LookupError>) -> Combobox {
        let mut combobox = Combobox::new(Duration::from_millis(10));
        combobox.on_focus();
        combobox.set_query(query);
        let effects = combobox.on_lookup_due(query.to_string());
        let Some(Effect::Lookup(request)) = effects.into_iter().next() else {
            panic!("lookup should be issued");
        };
        combobox.on_lookup_completed(LookupCompletion {
            token: request.token,
            query: request.query,
            outcome: outcome.map(|names| names.into_iter().map(Candidate::new).collect()),
        });
        combobox
    }

    fn texts(renderer: &mut Renderer, combobox: &Combobox) -> Vec<String> {
        renderer.render(combobox).lines.iter().map(line_text).collect()
    }

    #[test]
    fn empty_input_shows_placeholder_and_no_menu() {
        let mut combobox = Combobox::new(Duration::from_millis(10));
        combobox.on_focus();
        let mut renderer = Renderer::new(5);
        let lines = texts(&mut renderer, &combobox);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], format!("› {PLACEHOLDER}"));
    }

    #[test]
    fn menu_messages_follow_state() {
        let mut renderer = Renderer::new(5);

        let mut loading = Combobox::new(Duration::from_millis(10));
        loading.on_focus();
        loading.set_query("ali");
        assert_eq!(texts(&mut renderer, &loading)[2], "  Loading...");

        let empty = combobox_with("zzz", Ok(vec![]));
        assert_eq!(texts(&mut renderer, &empty)[2], "  Nothing found");

        let failed = combobox_with("ali", Err(LookupError::Status(502)));
        assert_eq!(
            texts(&mut renderer, &failed)[2],
            "  Lookup failed: lookup service returned status 502"
        );

        let mut cleared = combobox_with("ali", Ok(vec!["Alice"]));
        cleared.on_key_down(KeyEvent::plain(KeyCode::Backspace));
        cleared.on_key_down(KeyEvent::plain(KeyCode::Backspace));
        cleared.on_key_down(KeyEvent::plain(KeyCode::Backspace));
        assert_eq!(texts(&mut renderer, &cleared)[2], "  Specify your request");
    }

    #[test]
    fn rows_map_back_to_candidates_through_scrolling() {
        let mut combobox = combobox_with("a", Ok(vec!["a1", "a2", "a3", "a4"]));
        let mut renderer = Renderer::new(2);

        let lines = texts(&mut renderer, &combobox);
        assert_eq!(lines[2], "  a1");
        assert_eq!(lines[4], "  1-2 of 4");
        assert_eq!(renderer.item_at_row(3), Some(1));
        assert_eq!(renderer.item_at_row(4), None);
        assert_eq!(renderer.item_at_row(1), None);

        for _ in 0..3 {
            combobox.on_key_down(KeyEvent::plain(KeyCode::Down));
        }
        let lines = texts(&mut renderer, &combobox);
        assert_eq!(lines[2], "  a2");
        assert_eq!(lines[3], "› a3");
        assert_eq!(renderer.item_at_row(3), Some(2));
    }

    #[test]
    fn navigating_shows_busy_note_and_hides_cursor() {
        let mut combobox = combobox_with("ali", Ok(vec!["Alice"]));
        combobox.submit();

        let frame = Renderer::new(5).render(&combobox);
        assert!(frame.cursor.is_none());
        assert_eq!(frame.lines.len(), 2);
        assert_eq!(line_text(&frame.lines[1]), "› ali  opening...");
    }

    #[test]
    fn refocused_query_renders_selected() {
        let mut combobox = combobox_with("ali", Ok(vec!["Alice"]));
        combobox.on_blur();
        combobox.on_focus();

        let frame = Renderer::new(5).render(&combobox);
        let query = &frame.lines[1][1];
        assert_eq!(query.text, "ali");
        assert_eq!(query.style.background, Some(Color::DarkGrey));
    }

    #[test]
    fn cursor_tracks_display_width() {
        let mut combobox = Combobox::new(Duration::from_millis(10));
        combobox.on_focus();
        combobox.set_query("日本");
        let frame = Renderer::new(5).render(&combobox);
        let cursor = frame.cursor.expect("focused input shows a cursor");
        assert_eq!((cursor.row, cursor.col), (1, 6));
    }

    #[test]
    fn text_spans_split_on_ranges() {
        let base = Style::new();
        let hl = Style::new().bold();
        let spans = render_text_spans("AliBali", &[(0, 3), (4, 7)], base, hl);
        let parts: Vec<(&str, bool)> = spans
            .iter()
            .map(|span| (span.text.as_str(), span.style.bold))
            .collect();
        assert_eq!(parts, vec![("Ali", true), ("B", false), ("ali", true)]);

        let plain = render_text_spans("", &[], base, hl);
        assert_eq!(plain.len(), 1);
    }
}
