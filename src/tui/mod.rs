mod boxes;
mod help;
mod state;

use crate::cli::{self, Cli};
use crate::model::{Algorithm, SortEvent};
use crate::orchestrator::{self, session::Session, UiCommand};
use crate::speed::DelayMapping;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Terminal,
};
use state::{apply_event, RunState, UiState};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const SPEED_STEP: u8 = 5;
const SIZE_STEP: usize = 5;

pub async fn run(args: Cli) -> Result<()> {
    // Unbounded channels so the engine never waits on the renderer.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<SortEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let session = cli::build_session(&args);

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(event_rx, cmd_tx));

    let res = orchestrator::run_controller(session, args.start_on_launch, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// What a key press asks of the UI loop.
#[derive(Debug, PartialEq)]
enum KeyAction {
    Send(UiCommand),
    Tab(usize),
    Quit,
    Ignore,
}

/// Map a key to an action. Speed and size steps start from the last settings the
/// controller reported, so the request is always relative to what is on screen.
fn key_action(k: KeyEvent, state: &UiState) -> KeyAction {
    let settings = state.settings;
    match (k.modifiers, k.code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => KeyAction::Quit,
        (_, KeyCode::Char('s')) | (_, KeyCode::Enter) => KeyAction::Send(UiCommand::Start),
        (_, KeyCode::Char('x')) | (_, KeyCode::Esc) => KeyAction::Send(UiCommand::Stop),
        (_, KeyCode::Char('g')) => KeyAction::Send(UiCommand::Generate),
        (_, KeyCode::Char('a')) => {
            KeyAction::Send(UiCommand::SelectAlgorithm(settings.algorithm.next()))
        }
        (_, KeyCode::Char('A')) => {
            KeyAction::Send(UiCommand::SelectAlgorithm(settings.algorithm.prev()))
        }
        (_, KeyCode::Char(c @ '1'..='9')) => c
            .to_digit(10)
            .and_then(|d| Algorithm::from_index(d as usize))
            .map(|a| KeyAction::Send(UiCommand::SelectAlgorithm(a)))
            .unwrap_or(KeyAction::Ignore),
        (_, KeyCode::Left) => KeyAction::Send(UiCommand::SetSpeed(DelayMapping::clamp_speed(
            settings.speed.saturating_sub(SPEED_STEP),
        ))),
        (_, KeyCode::Right) => KeyAction::Send(UiCommand::SetSpeed(DelayMapping::clamp_speed(
            settings.speed.saturating_add(SPEED_STEP),
        ))),
        (_, KeyCode::Char('-')) => KeyAction::Send(UiCommand::Resize(Session::clamp_size(
            settings.size.saturating_sub(SIZE_STEP),
        ))),
        (_, KeyCode::Char('+')) | (_, KeyCode::Char('=')) => KeyAction::Send(UiCommand::Resize(
            Session::clamp_size(settings.size + SIZE_STEP),
        )),
        (_, KeyCode::Tab) => KeyAction::Tab((state.tab + 1) % 2),
        (_, KeyCode::Char('?')) => KeyAction::Tab(1),
        _ => KeyAction::Ignore,
    }
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    mut event_rx: UnboundedReceiver<SortEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState::default();

    let tick_rate = Duration::from_millis(33);
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain events without blocking; a fast run may queue several frames per tick.
        let mut disconnected = false;
        loop {
            match event_rx.try_recv() {
                Ok(ev) => apply_event(&mut state, ev),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if disconnected {
            tracing::warn!("controller went away, closing UI");
            break Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match key_action(k, &state) {
                    KeyAction::Quit => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                    KeyAction::Send(cmd) => {
                        tracing::debug!(?cmd, "ui command");
                        let _ = cmd_tx.send(cmd);
                    }
                    KeyAction::Tab(tab) => state.tab = tab,
                    KeyAction::Ignore => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Visualizer"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title("sortviz"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_visualizer(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }
}

fn run_state_style(run_state: RunState) -> Style {
    let color = match run_state {
        RunState::Idle => Color::Gray,
        RunState::Sorting => Color::Yellow,
        RunState::Stopping => Color::Red,
        RunState::Sorted => Color::Green,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn draw_visualizer(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Percentage(50),
                Constraint::Min(6),
                Constraint::Length(4),
            ]
            .as_ref(),
        )
        .split(area);

    draw_controls(rows[0], f, state);
    boxes::draw_boxes(rows[1], f, state);
    boxes::draw_bars(rows[2], f, state);
    draw_status(rows[3], f, state);
}

fn draw_controls(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let s = &state.settings;
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::Cyan);
    // Greyed out while sorting: the controller refuses changes until the run ends.
    let locked = if state.is_running() {
        Style::default().fg(Color::DarkGray)
    } else {
        value
    };

    let line = Line::from(vec![
        Span::styled("Algorithm: ", label),
        Span::styled(s.algorithm.label(), locked),
        Span::styled(if s.algorithm.is_stable() { " (stable)" } else { "" }, label),
        Span::raw("   "),
        Span::styled("Speed: ", label),
        Span::styled(format!("{}", s.speed), locked),
        Span::styled(
            format!(" ({}/step)", humantime::format_duration(s.delay)),
            label,
        ),
        Span::raw("   "),
        Span::styled("Size: ", label),
        Span::styled(format!("{}", s.size), locked),
        Span::raw("   "),
        Span::styled(state.run_state.label(), run_state_style(state.run_state)),
    ]);
    let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(p, area);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let step_text = state
        .step
        .as_ref()
        .map(|s| s.describe())
        .unwrap_or_default();
    let elapsed = match (state.is_running(), state.run_start) {
        (true, Some(t)) => format!("{:.1}s", t.elapsed().as_secs_f64()),
        _ => state
            .last_result
            .as_ref()
            .map(|r| format!("{:.1}s", r.elapsed_ms as f64 / 1000.0))
            .unwrap_or_else(|| "-".into()),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(state.info.clone(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Steps: ", Style::default().fg(Color::Gray)),
            Span::raw(format!("{}", state.frames)),
            Span::raw("   "),
            Span::styled("Elapsed: ", Style::default().fg(Color::Gray)),
            Span::raw(elapsed),
            Span::raw("   "),
            Span::styled(step_text, Style::default().fg(Color::Yellow)),
            Span::raw("   "),
            Span::styled(
                "s start · x stop · g new · a algo · ←/→ speed · -/+ size · ? help",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, area);
}
