use chrono::Local;
use ratatui::{prelude::*, widgets::*};

use crate::app::{App, SettingsField, View};
use crate::engine::Phase;

#[derive(Clone, Copy)]
pub struct Theme {
    pub idle_color: Color,
    pub work_color: Color,
    pub break_color: Color,
    pub border_color: Color,
    pub accent_color: Color,
}

pub const THEME_NAMES: &[&str] = &["default", "nord", "dracula", "gruvbox"];

pub fn theme_by_name(name: &str) -> Theme {
    match name {
        "nord" => Theme {
            idle_color: Color::Rgb(216, 222, 233),
            work_color: Color::Rgb(136, 192, 208),
            break_color: Color::Rgb(163, 190, 140),
            border_color: Color::Rgb(94, 129, 172),
            accent_color: Color::Rgb(180, 142, 173),
        },
        "dracula" => Theme {
            idle_color: Color::Rgb(248, 248, 242),
            work_color: Color::Rgb(189, 147, 249),
            break_color: Color::Rgb(80, 250, 123),
            border_color: Color::Rgb(98, 114, 164),
            accent_color: Color::Rgb(255, 121, 198),
        },
        "gruvbox" => Theme {
            idle_color: Color::Rgb(235, 219, 178),
            work_color: Color::Rgb(254, 128, 25),
            break_color: Color::Rgb(184, 187, 38),
            border_color: Color::Rgb(213, 196, 161),
            accent_color: Color::Rgb(250, 189, 47),
        },
        _ => Theme {
            idle_color: Color::Gray,
            work_color: Color::Rgb(100, 181, 246),
            break_color: Color::Rgb(129, 199, 132),
            border_color: Color::Rgb(0, 200, 255),
            accent_color: Color::Rgb(255, 112, 67),
        },
    }
}

pub fn cycle_theme_name(current: &str, forward: bool) -> String {
    let idx = THEME_NAMES.iter().position(|&t| t == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % THEME_NAMES.len()
    } else {
        (idx + THEME_NAMES.len() - 1) % THEME_NAMES.len()
    };
    THEME_NAMES[next].into()
}

fn phase_color(theme: &Theme, phase: Phase) -> Color {
    match phase {
        Phase::Idle => theme.idle_color,
        Phase::Working => theme.work_color,
        Phase::OnBreak => theme.break_color,
    }
}

pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn draw(f: &mut Frame, app: &App) {
    match app.view {
        View::Timer => render_timer(f, app),
        View::Settings => render_settings(f, app),
        View::Help => render_help(f, app),
    }
}

fn render_timer(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    let header = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.border_color))
        .title(Span::styled(
            " 🍅 TOMATE ",
            Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(header, chunks[0]);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(12),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Percentage(12),
        ])
        .split(chunks[1]);

    let color = phase_color(&app.theme, app.engine.phase());

    f.render_widget(
        Paragraph::new(app.engine.phase().label())
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[1],
    );

    f.render_widget(
        Paragraph::new(format_clock(app.engine.remaining()))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[3],
    );

    let now = Local::now();
    let date_lines = vec![
        Line::from(Span::styled(
            now.format("%A, %B %d, %Y").to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            now.format("%H:%M").to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(date_lines).alignment(Alignment::Center), sections[5]);

    let (status, status_color) = if app.engine.running() {
        ("● RUNNING", Color::Green)
    } else if app.engine.phase() == Phase::OnBreak {
        ("⏸ PAUSED", Color::Yellow)
    } else {
        ("○ READY", Color::Gray)
    };
    f.render_widget(
        Paragraph::new(status)
            .style(Style::default().fg(status_color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[7],
    );

    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .percent((app.engine.progress() * 100.0) as u16),
        sections[9],
    );

    let cycle_text = format!(
        "Cycle {} of {}",
        app.engine.current_cycle(),
        app.engine.total_cycles()
    );
    f.render_widget(
        Paragraph::new(cycle_text)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        sections[11],
    );

    let controls = vec![
        Line::from(vec![
            span_key("Space", app),
            Span::raw(" Start / Pause Break  •  "),
            span_key("Space ×2", app),
            Span::raw(" Skip Break"),
        ]),
        Line::from(vec![
            span_key("S", app),
            Span::raw(" Settings  •  "),
            span_key("H", app),
            Span::raw(" Help  •  "),
            span_key("Q", app),
            Span::raw(" Quit"),
        ]),
    ];
    f.render_widget(
        Paragraph::new(controls)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn span_key<'a>(text: &'a str, app: &App) -> Span<'a> {
    Span::styled(
        text,
        Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD),
    )
}

fn render_settings(f: &mut Frame, app: &App) {
    let area = centered_rect(70, 80, f.size());

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "⚙️  SETTINGS",
            Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  ↑↓/jk: Navigate  •  ←→/hl: Adjust  •  Esc: Save & Close",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ];

    let rows = [
        (
            SettingsField::WorkDuration,
            "🎯 Work Duration",
            format!("{} min", app.draft.work_duration / 60),
        ),
        (
            SettingsField::BreakDuration,
            "☕ Break Duration",
            format!("{} min", app.draft.break_duration / 60),
        ),
        (
            SettingsField::TotalCycles,
            "🔄 Cycles",
            format!("{}", app.draft.total_cycles),
        ),
        (SettingsField::Theme, "🎨 Theme", app.draft.theme.clone()),
    ];

    for (field, label, value) in rows {
        let selected = app.settings_field == field;
        let (prefix, label_style, value_style) = if selected {
            (
                "  > ",
                Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )
        } else {
            (
                "    ",
                Style::default().fg(Color::Gray),
                Style::default().fg(Color::DarkGray),
            )
        };

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(prefix, label_style),
            Span::styled(label, label_style),
        ]));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("< {} >", value), value_style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Closing restarts the session with the new values",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Settings ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.theme.border_color)),
        ),
        area,
    );
}

fn render_help(f: &mut Frame, app: &App) {
    let area = centered_rect(70, 80, f.size());

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "⌨️  KEYBOARD SHORTCUTS",
            Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Timer:"),
        help_line("Space / Enter", "Start the timer, or pause a running break"),
        help_line("Space ×2", "Skip the rest of a break (press twice quickly)"),
        Line::from(""),
        Line::from("  Navigation:"),
        help_line("S", "Open settings (applies on close)"),
        help_line("H / ?", "Toggle this help"),
        help_line("Q / Esc", "Quit / Go back"),
        help_line("Ctrl+C", "Force quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  A session is your configured number of work+break cycles.",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(
        Paragraph::new(help_text).alignment(Alignment::Left).block(
            Block::default()
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.theme.border_color)),
        ),
        area,
    );
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("    "),
        Span::styled(key, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", desc)),
    ])
}

fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(v[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock_zero_pads() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(300), "05:00");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn test_theme_name_cycling_wraps() {
        assert_eq!(cycle_theme_name("default", true), "nord");
        assert_eq!(cycle_theme_name("gruvbox", true), "default");
        assert_eq!(cycle_theme_name("default", false), "gruvbox");
        assert_eq!(cycle_theme_name("unknown", true), "nord");
    }
}
