// src/ui.rs

pub mod chat;
pub mod footer;
pub mod header;
pub mod quit_confirm;
pub mod welcome;

use crate::api::AskClient;
use crate::app::{App, AppState};
use crate::constants::TICK_RATE;
use crate::conversation::ConversationEvent;
use crate::errors::AskmeResult;
use crate::key_handlers::handle_key;
use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Runs the terminal UI until the user quits.
pub async fn run_ui(
    app: App,
    conversation_events: UnboundedReceiver<ConversationEvent>,
    client: AskClient,
) -> AskmeResult<()> {
    install_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Probe the service once; the answer only feeds the header.
    let (health_tx, health_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let result = client.health().await.map_err(|e| {
            log::warn!("health check failed: {}", e);
            e.to_string()
        });
        let _ = health_tx.send(result);
    });

    let res = run_app(&mut terminal, app, conversation_events, health_rx).await;

    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        log::error!("ui loop ended with error: {}", err);
    }
    res
}

fn restore_terminal() -> AskmeResult<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Main loop of the application.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut conversation_events: UnboundedReceiver<ConversationEvent>,
    mut health_rx: UnboundedReceiver<Result<crate::models::HealthStatus, String>>,
) -> AskmeResult<()> {
    let (tx, mut rx) = mpsc::channel::<CEvent>(100);

    // Spawn a task to read user input
    tokio::spawn(async move {
        loop {
            match event::poll(Duration::from_millis(50)) {
                Ok(true) => {
                    if let Ok(event) = event::read() {
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                }
                Ok(false) => {
                    if tx.is_closed() {
                        return;
                    }
                    tokio::task::yield_now().await;
                }
                Err(e) => {
                    log::error!("terminal input failed: {}", e);
                    return;
                }
            }
        }
    });

    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        terminal.draw(|f| draw(f, &mut app))?;

        tokio::select! {
            Some(event) = rx.recv() => {
                match event {
                    CEvent::Key(key) if key.kind == KeyEventKind::Press => handle_key(key, &mut app),
                    _ => {}
                }
            }
            Some(event) = conversation_events.recv() => {
                app.on_conversation_event(event);
            }
            Some(result) = health_rx.recv() => {
                app.server_status = result.into();
            }
            _ = ticker.tick() => {
                app.on_tick(Instant::now());
            }
        }

        if app.state == AppState::Quit {
            break;
        }
    }

    Ok(())
}

/// Renders the UI components.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(1),    // Conversation
            Constraint::Length(1), // Status
            Constraint::Length(3), // Input
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    header::draw_header(f, chunks[0], app);

    if app.chat.conversation().messages().is_empty() {
        welcome::draw_welcome(f, chunks[1]);
    } else {
        chat::draw_messages(f, chunks[1], app);
    }

    app.status_indicator.render(f, chunks[2]);
    chat::draw_input(f, chunks[3], app);
    footer::draw_footer(f, chunks[4], app);

    if app.state == AppState::QuitConfirm {
        quit_confirm::draw_quit_confirm(f, f.area());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn test_empty_conversation_shows_welcome() {
        let (mut app, _rx, _clipboard) = test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();

        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Where should we begin?"));
        assert!(text.contains("Send a message..."));
    }

    #[tokio::test]
    async fn test_conversation_is_drawn_after_submit() {
        let (mut app, _rx, _clipboard) = test_app();
        "hello".chars().for_each(|c| app.chat.push_char(c));
        app.submit();
        app.on_conversation_event(ConversationEvent::ResponseReceived {
            request: 1,
            answer: "see ```sh\nls\n```".to_string(),
        });
        app.on_conversation_event(ConversationEvent::RevealFinish { request: 1 });

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("hello"));
        assert!(text.contains("[1] copy"));
        assert!(!text.contains("Where should we begin?"));
    }

    #[tokio::test]
    async fn test_quit_confirm_overlay() {
        let (mut app, _rx, _clipboard) = test_app();
        app.state = AppState::QuitConfirm;
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();

        terminal.draw(|f| draw(f, &mut app)).unwrap();

        assert!(screen_text(&terminal).contains("Quit askme?"));
    }
}
