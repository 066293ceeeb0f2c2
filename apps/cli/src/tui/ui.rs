use cliplet_captions::CaptionFrame;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use super::app::{App, LoginForm, Mode};

const STYLE_PANEL_WIDTH: u16 = 26;

pub fn draw(frame: &mut Frame, app: &App) {
    let [header_area, body_area, timeline_area, status_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [stage_area, panel_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(STYLE_PANEL_WIDTH)])
            .areas(body_area);

    render_header(frame, app, header_area);
    render_stage(frame, app, stage_area);
    render_style_panel(frame, app, panel_area);
    render_timeline(frame, app, timeline_area);
    render_status(frame, app, status_area);
    render_hints(frame, app, hint_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = if app.paused { "⏸ PAUSED" } else { "▶ PLAYING" };
    let account = match &app.identity {
        Some(id) => format!("{} ({} credits)", id.username, id.credits),
        None => "not logged in".to_string(),
    };
    let text = format!(
        " job {} | clip {}/{} | {} | {} ",
        app.job_id,
        app.clip_pos + 1,
        app.clips.len(),
        state,
        account
    );
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

/// The stage stands in for the video: one caption line anchored at the
/// style's position percentages, active word highlighted.
fn render_stage(frame: &mut Frame, app: &App, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let caption = app.frame();
    if caption.is_empty() {
        if app.loading {
            let row = anchored_row(area, 50);
            frame.render_widget(
                Paragraph::new("loading words...")
                    .style(Style::default().fg(Color::DarkGray))
                    .centered(),
                row,
            );
        }
        return;
    }

    let spans = caption_spans(&caption);
    let width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let line_area = anchored_line(
        area,
        caption.style.pos_x_pct as u16,
        caption.style.pos_y_pct as u16,
        width as u16,
    );
    frame.render_widget(Paragraph::new(Line::from(spans)), line_area);
}

fn caption_spans(caption: &CaptionFrame) -> Vec<Span<'_>> {
    let text_color = hex_color(&caption.style.text_color).unwrap_or(Color::White);
    let highlight = hex_color(&caption.style.highlight_color).unwrap_or(Color::Yellow);

    let mut spans = Vec::with_capacity(caption.spans.len() * 2);
    for (i, word) in caption.spans.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        if word.active {
            spans.push(Span::styled(
                format!(" {} ", word.text),
                Style::default()
                    .fg(Color::Black)
                    .bg(highlight)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                word.text.clone(),
                Style::default().fg(text_color).add_modifier(Modifier::DIM),
            ));
        }
    }
    spans
}

fn render_style_panel(frame: &mut Frame, app: &App, area: Rect) {
    let style = app.preview.style();

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" style ", Style::default().fg(Color::DarkGray)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        row("font", format!("{}px", style.font_size_px)),
        row("position", format!("{}%, {}%", style.pos_x_pct, style.pos_y_pct)),
        row("window", format!("{} words", style.window_size)),
        row(
            "stroke",
            format!("{}px {}", style.stroke_width_px, style.stroke_color),
        ),
        swatch_row("highlight", &style.highlight_color),
        swatch_row("text", &style.text_color),
        Line::raw(""),
        Line::from(vec![
            Span::styled("words ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.preview.words().len().to_string()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

fn row(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name:<10}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn swatch_row(name: &str, hex: &str) -> Line<'static> {
    let color = hex_color(hex).unwrap_or(Color::White);
    Line::from(vec![
        Span::styled(format!("{name:<10}"), Style::default().fg(Color::DarkGray)),
        Span::styled("██ ", Style::default().fg(color)),
        Span::raw(hex.to_string()),
    ])
}

fn render_timeline(frame: &mut Frame, app: &App, area: Rect) {
    let duration = app.current_clip().map(|c| c.duration()).unwrap_or(0.0);
    let time = app.preview.time();
    let ratio = if duration > 0.0 {
        (time / duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let label = format!("{} / {}", format_time(time), format_time(duration));
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    match &app.mode {
        Mode::EditCaptions { input } => {
            let visible = tail(input, area.width.saturating_sub(14) as usize);
            let line = Line::from(vec![
                Span::styled(" captions ", Style::default().fg(Color::Black).bg(Color::Yellow)),
                Span::raw(" "),
                Span::raw(visible),
                Span::styled("▏", Style::default().fg(Color::Yellow)),
            ]);
            frame.render_widget(Paragraph::new(line), area);
        }
        Mode::Login(form) => render_login_form(frame, form, area),
        Mode::Play => {
            let text = app.status.clone().unwrap_or_default();
            frame.render_widget(
                Paragraph::new(format!(" {text}")).style(Style::default().fg(Color::Yellow)),
                area,
            );
        }
    }
}

fn render_login_form(frame: &mut Frame, form: &LoginForm, area: Rect) {
    let active = Style::default().fg(Color::Black).bg(Color::Yellow);
    let idle = Style::default().fg(Color::DarkGray);
    let masked = "•".repeat(form.password.chars().count());

    let mut spans = vec![
        Span::styled(" log in ", Style::default().fg(Color::Black).bg(Color::Yellow)),
        Span::raw("  "),
        Span::styled("username ", if form.on_password { idle } else { active }),
        Span::raw(form.username.clone()),
        Span::raw("  "),
        Span::styled("password ", if form.on_password { active } else { idle }),
        Span::raw(masked),
    ];
    if form.busy {
        spans.push(Span::styled(
            "  signing in...",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_hints(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.mode {
        Mode::Play => {
            " [Space] pause  [←/→] seek  [n/p] clip  [+/-] font  [[/]] window  [h/j/k/l] move  [s] stroke  [c] color  [e] edit  [r] reload  [q] quit "
        }
        Mode::EditCaptions { .. } => " [Enter] save  [Esc] cancel  type \\n for a line break ",
        Mode::Login(_) => " [Tab] switch field  [Enter] submit  [Esc] cancel ",
    };
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

/// One-row rect whose midpoint sits at (`x_pct`, `y_pct`) of `area`,
/// clamped so the row stays inside.
fn anchored_line(area: Rect, x_pct: u16, y_pct: u16, width: u16) -> Rect {
    let width = width.min(area.width).max(1);
    let free = area.width - width;
    let center = (u32::from(area.width.saturating_sub(1)) * u32::from(x_pct) / 100) as u16;
    let x = center
        .saturating_sub(width / 2)
        .min(free);
    let row = anchored_row(area, y_pct);
    Rect {
        x: area.x + x,
        y: row.y,
        width,
        height: row.height,
    }
}

fn anchored_row(area: Rect, y_pct: u16) -> Rect {
    let y = (u32::from(area.height.saturating_sub(1)) * u32::from(y_pct) / 100) as u16;
    Rect {
        x: area.x,
        y: area.y + y,
        width: area.width,
        height: area.height.min(1),
    }
}

/// `m:ss.t` for short clip times.
fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0) as u64;
    let rest = seconds - minutes as f64 * 60.0;
    format!("{minutes}:{rest:04.1}")
}

/// `#rrggbb` to a terminal color; anything else is `None`.
fn hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Last `max_chars` of `s`, so the end of a long input stays visible.
fn tail(s: &str, max_chars: usize) -> &str {
    let count = s.chars().count();
    if count <= max_chars {
        return s;
    }
    match s.char_indices().nth(count - max_chars) {
        Some((i, _)) => &s[i..],
        None => s,
    }
}
