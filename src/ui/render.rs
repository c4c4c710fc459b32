use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};

use crate::models::usage::format_duration;
use crate::tracker::accumulator::MonitorState;
use crate::tracker::clock::Clock;
use crate::tracker::identity::FocusProbe;
use crate::ui::app::App;
use crate::ui::icons::PLACEHOLDER_GLYPH;

pub fn draw<P: FocusProbe, C: Clock>(app: &App<P, C>, f: &mut Frame) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(6)])
        .split(size);

    draw_status(app, f, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    draw_usage_list(app, f, body[0]);
    draw_details(app, f, body[1]);

    draw_logs(app, f, chunks[2]);
}

fn draw_status<P: FocusProbe, C: Clock>(app: &App<P, C>, f: &mut Frame, area: Rect) {
    let (status, color) = match app.accumulator.state() {
        MonitorState::Running => {
            let current = app
                .accumulator
                .current()
                .map(|identity| identity.label.as_str())
                .unwrap_or("no focused app");
            (format!("● Running - {}", current), Color::Green)
        }
        MonitorState::Stopped => ("○ Stopped".to_string(), Color::DarkGray),
    };

    let text = format!(
        "{} | Total {} | [s] Start [x] Stop [r] Reset [↑/↓] Select [q] Quit",
        status,
        format_duration(app.accumulator.total())
    );
    let widget = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(widget, area);
}

fn draw_usage_list<P: FocusProbe, C: Clock>(app: &App<P, C>, f: &mut Frame, area: Rect) {
    let selected = app.selected_key.as_deref();
    let items: Vec<ListItem> = app
        .accumulator
        .records()
        .iter()
        .map(|record| {
            let icon = app.icon(record.key());
            let glyph = icon.map_or(PLACEHOLDER_GLYPH, |i| i.glyph);
            let is_selected = selected == Some(record.key());
            let prefix = if is_selected { "→ " } else { "  " };
            let display = format!(
                "{}{} {:<32} {}",
                prefix,
                glyph,
                truncate(record.display_name(), 32),
                record.formatted_total()
            );

            let style = if is_selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(icon.map_or(Color::White, |i| i.color))
            };
            ListItem::new(Line::from(display)).style(style)
        })
        .collect();

    let title = format!("Applications ({})", items.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_details<P: FocusProbe, C: Clock>(app: &App<P, C>, f: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Details");

    let Some(record) = app.selected_record() else {
        let hint = Paragraph::new("Select an application with ↑/↓ to see its details.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(hint, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(inner);

    let icon = app.icon(record.key());
    let category = icon.map_or("Other", |i| i.category);
    let glyph = icon.map_or(PLACEHOLDER_GLYPH, |i| i.glyph);
    let lines = vec![
        Line::from(format!("{} {}", glyph, record.display_name())),
        Line::from(format!("Process: {}", record.key())),
        Line::from(format!("Category: {}", category)),
        Line::from(format!("Total Time: {}", record.formatted_total())),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[0]);

    let total = app.accumulator.total().num_milliseconds();
    let ratio = if total > 0 {
        (record.total().num_milliseconds() as f64 / total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(icon.map_or(Color::White, |i| i.color)))
        .ratio(ratio)
        .label(format!("{:.0}% of tracked time", ratio * 100.0));
    f.render_widget(gauge, rows[1]);
}

fn draw_logs<P: FocusProbe, C: Clock>(app: &App<P, C>, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .logs
        .iter()
        .rev()
        .take(visible)
        .map(|log| ListItem::new(Line::from(log.clone())))
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Logs"));
    f.render_widget(list, area);
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::accumulator::UsageAccumulator;
    use crate::tracker::test_support::{ManualClock, ScriptedProbe};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_draws_records_and_details() {
        let probe = ScriptedProbe::new();
        let clock = ManualClock::new();
        let mut app = App::new(
            UsageAccumulator::new(probe.clone(), clock.clone()),
            Duration::from_secs(1),
        );
        probe.focus_labelled("notepad", "Notepad");
        app.start();
        clock.advance_secs(65);
        app.stop();
        app.select_next();

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Stopped"));
        assert!(text.contains("Applications (1)"));
        assert!(text.contains("Total Time: 00:01:05"));
        assert!(text.contains("Process: notepad"));
    }

    #[test]
    fn test_draws_empty_state() {
        let app = App::new(
            UsageAccumulator::new(ScriptedProbe::new(), ManualClock::new()),
            Duration::from_secs(1),
        );
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();

        assert!(screen_text(&terminal).contains("Applications (0)"));
    }
}
