use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::constants::{UI_PAGE_LINES, UI_SCROLL_LINES};
use crate::models::AssistantService;
use crate::session::{Exchange, RejectReason, SubmitOutcome};
use crate::tui::app::App;
use crate::tui::input::{InputAction, InputHandler};
use crate::tui::render::render_ui;
use crate::utils::{log_error, AppError};

/// The one request that may be outstanding
struct InFlight {
    exchange: Exchange,
    task: JoinHandle<Result<String, AppError>>,
}

/// Run the terminal UI
pub async fn run_ui(
    mut app: App,
    service: Arc<dyn AssistantService>,
    tick: Duration,
) -> Result<()> {
    // Check if we have an interactive terminal
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("FinanceGuru requires an interactive terminal.");
        eprintln!("   Use --prompt for one-shot questions from scripts.");
        return Err(AppError::UIError("No interactive terminal available".to_string()).into());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let res = run_app(&mut terminal, &mut app, service, tick).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        log_error("❌", format!("Terminal UI stopped: {}", err));
    }

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    service: Arc<dyn AssistantService>,
    tick: Duration,
) -> Result<()> {
    let input = InputHandler::new();
    let mut in_flight: Option<InFlight> = None;

    while app.running {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(started) = handle_action(app, input.handle_key(key), &service) {
                        in_flight = Some(started);
                    }
                }
            }
        }

        if in_flight.as_ref().is_some_and(|f| f.task.is_finished()) {
            if let Some(finished) = in_flight.take() {
                finish(app, finished).await;
            }
        }

        // Let the request task make progress between polls
        tokio::task::yield_now().await;
    }

    // Quitting mid-request: nothing is waiting for the answer any more
    if let Some(InFlight { task, .. }) = in_flight {
        task.abort();
    }

    Ok(())
}

/// Apply one input action. Returns the request when a submission was accepted.
fn handle_action(
    app: &mut App,
    action: InputAction,
    service: &Arc<dyn AssistantService>,
) -> Option<InFlight> {
    match action {
        InputAction::Submit => match app.session.begin_pending() {
            Ok(exchange) => {
                app.selected_suggestion = None;
                app.scroll_to_bottom();
                app.set_status("FinanceGuru is thinking...");
                return Some(spawn_request(exchange, Arc::clone(service)));
            }
            Err(RejectReason::Busy) => app.set_status("Still waiting for the previous answer"),
            Err(RejectReason::Blank | RejectReason::Foreign) => {}
        },
        InputAction::Quit => app.quit(),
        InputAction::Insert(c) => app.session.edit_input(|input| input.push(c)),
        InputAction::Delete => app.session.edit_input(|input| {
            input.pop();
        }),
        InputAction::ClearInput => {
            app.session.set_input(String::new());
            app.selected_suggestion = None;
            app.clear_status();
        }
        InputAction::NextSuggestion => app.cycle_suggestion(true),
        InputAction::PrevSuggestion => app.cycle_suggestion(false),
        InputAction::ScrollUp => app.scroll_up(UI_SCROLL_LINES),
        InputAction::ScrollDown => app.scroll_down(UI_SCROLL_LINES),
        InputAction::PageUp => app.scroll_up(UI_PAGE_LINES),
        InputAction::PageDown => app.scroll_down(UI_PAGE_LINES),
        InputAction::None => {}
    }
    None
}

/// Ask the service on a background task so the UI keeps drawing
fn spawn_request(exchange: Exchange, service: Arc<dyn AssistantService>) -> InFlight {
    let message = exchange.message().to_string();
    let history = exchange.history().to_vec();
    let task = tokio::spawn(async move { service.reply(&message, &history).await });
    InFlight { exchange, task }
}

/// Record the finished request. A panicked task still releases the guard.
async fn finish(app: &mut App, finished: InFlight) {
    let result = match finished.task.await {
        Ok(result) => result,
        Err(join_err) => Err(AppError::AssistantUnreachable(format!(
            "request task failed: {}",
            join_err
        ))),
    };

    match app.session.complete(finished.exchange, result) {
        SubmitOutcome::FellBack => app.set_status("Assistant service unreachable"),
        _ => app.clear_status(),
    }
    app.scroll_to_bottom();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MockAssistantService;
    use crate::session::Session;

    fn app() -> App {
        let url = "http://localhost:5000";
        App::new(Session::for_service(url), url, true)
    }

    fn service(reply: Result<&'static str, ()>) -> Arc<dyn AssistantService> {
        let mut mock = MockAssistantService::new();
        mock.expect_reply().returning(move |_, _| match reply {
            Ok(text) => Ok(text.to_string()),
            Err(()) => Err(AppError::AssistantUnreachable("HTTP 500".to_string())),
        });
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_submit_runs_in_background_and_completes() {
        let mut app = app();
        let service = service(Ok("Here is a plan"));
        app.session.set_input("budget help");

        let started = handle_action(&mut app, InputAction::Submit, &service).unwrap();
        assert!(app.session.is_in_flight());
        assert_eq!(app.session.pending_input(), "");

        // A second submission while waiting changes nothing
        app.session.set_input("another");
        assert!(handle_action(&mut app, InputAction::Submit, &service).is_none());
        assert_eq!(app.session.transcript().len(), 2);

        finish(&mut app, started).await;
        assert!(!app.session.is_in_flight());
        assert_eq!(app.session.transcript()[2].content(), "Here is a plan");
        assert_eq!(app.status_message, None);
    }

    #[tokio::test]
    async fn test_failure_shows_fallback() {
        let mut app = app();
        let service = service(Err(()));
        app.session.set_input("budget help");

        let started = handle_action(&mut app, InputAction::Submit, &service).unwrap();
        finish(&mut app, started).await;

        assert_eq!(app.session.transcript().len(), 3);
        assert_eq!(
            app.session.transcript()[2].content(),
            app.session.fallback_text()
        );
        assert!(!app.session.is_in_flight());
    }

    #[tokio::test]
    async fn test_aborted_task_still_releases_guard() {
        let mut app = app();
        let exchange = app.session.begin("budget help").unwrap();
        let task = tokio::spawn(async {
            std::future::pending::<()>().await;
            Ok(String::new())
        });
        task.abort();

        finish(&mut app, InFlight { exchange, task }).await;
        assert!(!app.session.is_in_flight());
        assert_eq!(app.session.transcript().len(), 3);
    }

    #[test]
    fn test_typing_and_clearing() {
        let mut app = app();
        let service = service(Ok("unused"));

        for c in "hi!".chars() {
            handle_action(&mut app, InputAction::Insert(c), &service);
        }
        handle_action(&mut app, InputAction::Delete, &service);
        assert_eq!(app.session.pending_input(), "hi");

        handle_action(&mut app, InputAction::ClearInput, &service);
        assert_eq!(app.session.pending_input(), "");

        handle_action(&mut app, InputAction::Submit, &service);
        assert!(!app.session.is_in_flight());

        handle_action(&mut app, InputAction::Quit, &service);
        assert!(!app.running);
    }
}
