use color_eyre::eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};
use ratatui::widgets::*;
use spinwheel::app::AppSnapshot;
use spinwheel::geometry::{self, CENTER, LABEL_RADIUS, RADIUS};
use spinwheel::palette::Rgb;
use spinwheel::wheel::{ItemId, MIN_ITEMS};
use std::io::stdout;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

pub enum UserEvent {
    Quit,
    Spin,
    ConfirmAdd { label: String },
    ConfirmDelete { id: ItemId },
    Redraw,
}

#[derive(Debug, Default)]
pub struct UiState {
    mode: Mode,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

#[derive(Clone, Debug, Default)]
enum Mode {
    #[default]
    Normal,
    AddModal(AddState),
    DeleteModal(DeleteState),
    QuitModal,
}

#[derive(Clone, Debug, Default)]
struct AddState {
    input: String,
}

#[derive(Clone, Debug, Default)]
struct DeleteState {
    idx: usize,
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    // Create a single persistent Terminal to preserve buffers across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    Ok(())
}

/// Drain one pending key press without blocking.
///
/// The animation ticker drives the loop, so this polls with a zero timeout
/// instead of parking on `event::read`; a turning wheel never stalls on the
/// keyboard.
pub fn poll_event(state: &mut UiState, snap: &AppSnapshot) -> Result<Option<UserEvent>> {
    while event::poll(Duration::ZERO)? {
        let Event::Key(k) = event::read()? else { continue };
        if k.kind != KeyEventKind::Press {
            continue;
        }
        match &mut state.mode {
            Mode::AddModal(add) => match k.code {
                KeyCode::Esc => {
                    state.mode = Mode::Normal;
                    return Ok(Some(UserEvent::Redraw));
                }
                KeyCode::Enter => {
                    // Blank input keeps the dialog open rather than adding.
                    if add.input.trim().is_empty() {
                        continue;
                    }
                    let label = add.input.clone();
                    state.mode = Mode::Normal;
                    return Ok(Some(UserEvent::ConfirmAdd { label }));
                }
                KeyCode::Backspace => {
                    add.input.pop();
                    return Ok(Some(UserEvent::Redraw));
                }
                KeyCode::Char(c) => {
                    add.input.push(c);
                    return Ok(Some(UserEvent::Redraw));
                }
                _ => {}
            },
            Mode::DeleteModal(del) => match k.code {
                KeyCode::Esc => {
                    state.mode = Mode::Normal;
                    return Ok(Some(UserEvent::Redraw));
                }
                KeyCode::Up => {
                    if del.idx > 0 {
                        del.idx -= 1;
                    }
                    return Ok(Some(UserEvent::Redraw));
                }
                KeyCode::Down => {
                    let max = snap.items.len().saturating_sub(1);
                    del.idx = (del.idx + 1).min(max);
                    return Ok(Some(UserEvent::Redraw));
                }
                KeyCode::Enter => {
                    if let Some(item) = snap.items.get(del.idx) {
                        let id = item.id;
                        state.mode = Mode::Normal;
                        return Ok(Some(UserEvent::ConfirmDelete { id }));
                    }
                    return Ok(Some(UserEvent::Redraw));
                }
                _ => {}
            },
            Mode::QuitModal => match k.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(Some(UserEvent::Quit)),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    state.mode = Mode::Normal;
                    return Ok(Some(UserEvent::Redraw));
                }
                _ => {}
            },
            Mode::Normal => match k.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    state.mode = Mode::QuitModal;
                    return Ok(Some(UserEvent::Redraw));
                }
                KeyCode::Char(' ') | KeyCode::Char('s') => return Ok(Some(UserEvent::Spin)),
                KeyCode::Char('a') => {
                    state.mode = Mode::AddModal(AddState::default());
                    return Ok(Some(UserEvent::Redraw));
                }
                KeyCode::Char('d') => {
                    state.mode = Mode::DeleteModal(DeleteState::default());
                    return Ok(Some(UserEvent::Redraw));
                }
                _ => {}
            },
        }
    }
    Ok(None)
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    // Clear the whole frame to avoid leftover fragments
    f.render_widget(Clear, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // status
            Constraint::Min(16),   // wheel
            Constraint::Length(4), // errors
            Constraint::Length(3), // help
        ])
        .split(f.area());

    draw_status(f, chunks[0], snap);
    draw_wheel(f, chunks[1], snap);
    draw_errors(f, chunks[2], snap);
    draw_help(f, chunks[3]);
    draw_result(f, snap);
    draw_modals(f, state, snap);
}

fn draw_status(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let turning = if snap.spinning { " | spinning" } else { "" };
    let status = Paragraph::new(format!(
        "Options: {} | Rotation: {:.0}\u{b0}{}\n{}",
        snap.items.len(),
        geometry::normalize_degrees(snap.rotation),
        turning,
        snap.status,
    ))
    .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_wheel(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let block = Block::default().borders(Borders::ALL).title("Wheel");
    let inner = block.inner(area);
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, 100.0])
        .y_bounds([0.0, 100.0])
        .paint(|ctx| paint_wheel(ctx, snap, inner.width));
    f.render_widget(canvas, area);
}

/// Canvas y grows upward while the slice geometry uses screen coordinates,
/// so every point flips here.
fn flip(point: geometry::Point) -> (f64, f64) {
    (point.x, 100.0 - point.y)
}

fn paint_wheel(ctx: &mut Context, snap: &AppSnapshot, columns: u16) {
    let n = snap.items.len();
    if n == 0 {
        return;
    }
    let rotation = snap.rotation;
    let winning = snap.result.as_ref().map(|result| result.index);

    for (i, item) in snap.items.iter().enumerate() {
        let color = tui_color(item.color);
        let path = geometry::slice_path(i, n);
        let start = path.start_angle + rotation;
        let end = path.end_angle + rotation;

        // Concentric arc bands stand in for a filled wedge.
        for radius in [RADIUS, RADIUS * 0.8, RADIUS * 0.6, RADIUS * 0.4] {
            let coords: Vec<(f64, f64)> = geometry::arc_points(start, end, radius, 2.0)
                .into_iter()
                .map(flip)
                .collect();
            ctx.draw(&Points {
                coords: &coords,
                color,
            });
        }

        // Divider along the slice's leading edge.
        let hub = flip(geometry::point_at(0.0, 0.0));
        let edge = flip(geometry::point_at(start, RADIUS));
        ctx.draw(&CanvasLine {
            x1: hub.0,
            y1: hub.1,
            x2: edge.0,
            y2: edge.1,
            color: Color::Gray,
        });

        // Winning slice gets a bright rim while the result is showing.
        if winning == Some(i) {
            let coords: Vec<(f64, f64)> = geometry::arc_points(start, end, RADIUS * 0.92, 1.0)
                .into_iter()
                .map(flip)
                .collect();
            ctx.draw(&Points {
                coords: &coords,
                color: Color::White,
            });
        }
    }

    // Labels sit at the rotated slice midpoints, width-centered.
    let units_per_cell = if columns > 0 { 100.0 / columns as f64 } else { 1.0 };
    for (i, item) in snap.items.iter().enumerate() {
        let placement = geometry::label_placement(i, n);
        let midpoint =
            geometry::slice_path(i, n).start_angle + geometry::slice_angle(n) / 2.0 + rotation;
        let anchor = flip(geometry::point_at(midpoint, LABEL_RADIUS));
        let offset = item.label.width() as f64 / 2.0 * units_per_cell;
        let style = if placement.font_size <= geometry::MIN_FONT_SIZE {
            Style::default().fg(tui_color(item.color))
        } else {
            Style::default()
                .fg(tui_color(item.color))
                .add_modifier(Modifier::BOLD)
        };
        ctx.print(
            anchor.0 - offset,
            anchor.1,
            Line::styled(item.label.clone(), style),
        );
    }

    // Fixed pointer at 12 o'clock.
    let tip = flip(geometry::point_at(0.0, RADIUS * 0.84));
    let left = (CENTER - 3.0, 100.0);
    let right = (CENTER + 3.0, 100.0);
    for (from, to) in [(left, tip), (right, tip), (left, right)] {
        ctx.draw(&CanvasLine {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            color: Color::Yellow,
        });
    }
}

fn draw_errors(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let mut lines: Vec<Line> = Vec::new();
    if snap.errors.is_empty() {
        lines.push(Line::from("No errors"));
    } else {
        for e in &snap.errors {
            lines.push(Line::from(e.clone()));
        }
    }
    let color = if snap.errors.is_empty() {
        Color::DarkGray
    } else {
        Color::Red
    };
    let errors = Paragraph::new(lines)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title("Errors"));
    f.render_widget(errors, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new("space/s spin | a add option | d delete option | q/Esc quit")
        .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn draw_result(f: &mut Frame, snap: &AppSnapshot) {
    let Some(result) = &snap.result else { return };
    let area = centered_rect(40, 20, f.area());
    let block = Block::default().borders(Borders::ALL).title("Winner");
    let text = Paragraph::new(Line::styled(
        result.label.clone(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(Clear, area);
    f.render_widget(block.clone(), area);
    f.render_widget(text, block.inner(area));
}

fn draw_modals(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    match &state.mode {
        Mode::AddModal(add) => {
            let area = centered_rect(50, 25, f.area());
            let block = Block::default().borders(Borders::ALL).title("Add Option");
            let p = Paragraph::new(format!("Label: {}_\nEnter=add Esc=cancel", add.input));
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(p, block.inner(area));
        }
        Mode::DeleteModal(del) => {
            let area = centered_rect(50, 50, f.area());
            let block = Block::default().borders(Borders::ALL).title("Delete Option");
            let mut lines = Vec::new();
            for (i, item) in snap.items.iter().enumerate() {
                let cursor = if i == del.idx { ">" } else { " " };
                lines.push(Line::styled(
                    format!("{} {}", cursor, item.label),
                    Style::default().fg(tui_color(item.color)),
                ));
            }
            lines.push(Line::from(format!(
                "Enter=delete Esc=close (keeps at least {MIN_ITEMS})"
            )));
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(Paragraph::new(lines), block.inner(area));
        }
        Mode::QuitModal => {
            let area = centered_rect(40, 20, f.area());
            let block = Block::default().borders(Borders::ALL).title("Confirm Quit");
            let p = Paragraph::new("Quit? (Y/N)");
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(p, block.inner(area));
        }
        Mode::Normal => {}
    }
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1]);

    vertical[1]
}

fn tui_color(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}
