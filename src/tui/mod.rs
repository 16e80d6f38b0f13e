pub mod action;
pub mod state;
pub mod view;

use crate::client::{ApiConfig, BoardClient, FileTokenStore, StaticToken, TokenProvider};
use crate::config::Config;
use crate::controller::BoardController;
use crate::drag::DropPlan;
use crate::error::ActionError;
use crate::metrics::PortfolioMetrics;
use crate::model::{BoardPatch, CardPatch, Credentials, NewBoard, NewCard, NewUser};
use crate::tui::action::{Action, AppEvent};
use crate::tui::state::{AppState, Focus, InputMode};
use crate::tui::view::draw;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::sync::Arc;
use std::{env, io, time::Duration};
use tokio::sync::mpsc;

/// Entry point of the `taskmy` binary.
///
/// `taskmy login <user> <password>` stores a token and exits, `taskmy logout`
/// forgets it and `taskmy register ...` creates a colleague's account. With no
/// arguments the board UI starts.
pub async fn run() -> Result<()> {
    let config = Config::load().unwrap_or_else(|_| Config::default());
    let _log_guard = crate::logging::init_file_logging(&config.log_level)?;

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("login") => return login(&config, &args[2..]).await,
        Some("logout") => return logout(),
        Some("register") => return register(&config, &args[2..]).await,
        _ => {}
    }

    let tokens = token_provider(&config)?;
    if tokens.token().is_none() {
        eprintln!("Not logged in. Run: taskmy login <username> <password>");
        eprintln!(
            "Or set `token` in {}",
            Config::path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "config.toml".to_string())
        );
        return Ok(());
    }
    let client = BoardClient::new(&ApiConfig::from(&config), tokens)?;

    // Panic Hook
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        tracing::error!("PANIC: {:?}", info);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new();
    let (action_tx, action_rx) = mpsc::channel(10);
    let (event_tx, mut event_rx) = mpsc::channel(10);

    tokio::spawn(run_actor(
        BoardController::new(client),
        config.default_board.clone(),
        action_rx,
        event_tx,
    ));

    loop {
        terminal.draw(|f| draw(f, &mut app_state))?;

        while let Ok(event) = event_rx.try_recv() {
            match event {
                AppEvent::Snapshot {
                    boards,
                    active,
                    board,
                } => app_state.apply_snapshot(boards, active, board),
                AppEvent::UsersLoaded(users) => app_state.users = users,
                AppEvent::PortfolioLoaded(p) => app_state.portfolio = Some(p),
                AppEvent::Error(msg) => {
                    app_state.message = format!("Error: {}", msg);
                    app_state.loading = false;
                }
                AppEvent::Status(msg) => app_state.message = msg,
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Mouse(mouse_event) => match mouse_event.kind {
                    MouseEventKind::ScrollDown => app_state.next(),
                    MouseEventKind::ScrollUp => app_state.previous(),
                    _ => {}
                },
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !handle_key(&mut app_state, key.code, &action_tx).await {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

async fn login(config: &Config, args: &[String]) -> Result<()> {
    let (username, password) = match args {
        [user, pass, ..] => (user.clone(), pass.clone()),
        _ => return Err(anyhow!("Usage: taskmy login <username> <password>")),
    };
    let client = BoardClient::anonymous(&ApiConfig::from(config))?;
    let token = client
        .login(&Credentials { username, password })
        .await
        .map_err(|e| anyhow!("{} ({})", crate::error::UserAction::Login.failure_message(), e))?;
    let path = FileTokenStore::default_path().context("No data directory available")?;
    FileTokenStore::open(path.clone()).save(&token)?;
    println!("Logged in. Token stored in {}", path.display());
    Ok(())
}

/// A token from the config file wins over the one saved by `login`.
fn token_provider(config: &Config) -> Result<Arc<dyn TokenProvider>> {
    Ok(match &config.token {
        Some(token) => Arc::new(StaticToken::new(token.clone())),
        None => {
            let path = FileTokenStore::default_path().context("No data directory available")?;
            Arc::new(FileTokenStore::open(path))
        }
    })
}

fn logout() -> Result<()> {
    let path = FileTokenStore::default_path().context("No data directory available")?;
    FileTokenStore::open(path).clear()?;
    println!("Logged out.");
    Ok(())
}

async fn register(config: &Config, args: &[String]) -> Result<()> {
    let draft = match args {
        [username, password, email, role, name @ ..] if !name.is_empty() => NewUser {
            username: username.clone(),
            password: password.clone(),
            email: email.clone(),
            role: role.clone(),
            full_name: name.join(" "),
            ..NewUser::default()
        },
        _ => {
            return Err(anyhow!(
                "Usage: taskmy register <username> <password> <email> <role> <full name>"
            ));
        }
    };
    let username = draft.username.clone();
    let client = BoardClient::new(&ApiConfig::from(config), token_provider(config)?)?;
    BoardController::new(client)
        .register_user(draft)
        .await
        .map_err(|e| anyhow!(e.detail()))?;
    println!("User {} created.", username);
    Ok(())
}

/// Returns false when the UI should exit.
async fn handle_key(state: &mut AppState, code: KeyCode, tx: &mpsc::Sender<Action>) -> bool {
    match state.mode {
        InputMode::ConfirmDeleteBoard => {
            if let KeyCode::Char('y') | KeyCode::Char('Y') = code {
                let _ = tx.send(Action::DeleteBoard).await;
            }
            state.mode = InputMode::Normal;
        }
        InputMode::CreatingCard
        | InputMode::CreatingList
        | InputMode::CreatingBoard
        | InputMode::EditingBoard
        | InputMode::EditingCard => match code {
            KeyCode::Enter => {
                let text = state.input_buffer.trim().to_string();
                if !text.is_empty() {
                    let action = match state.mode {
                        InputMode::CreatingBoard => Some(Action::CreateBoard(text)),
                        InputMode::EditingBoard => Some(Action::EditBoard(text)),
                        InputMode::CreatingList => Some(Action::CreateList(text)),
                        InputMode::CreatingCard => state
                            .selected_list()
                            .map(|l| Action::CreateCard(l.id, text)),
                        InputMode::EditingCard => state
                            .selected_card()
                            .map(|c| Action::EditCard(c.id, text)),
                        _ => None,
                    };
                    if let Some(action) = action {
                        let _ = tx.send(action).await;
                    }
                }
                state.mode = InputMode::Normal;
                state.reset_input();
            }
            KeyCode::Esc => {
                state.mode = InputMode::Normal;
                state.reset_input();
            }
            KeyCode::Char(c) => state.enter_char(c),
            KeyCode::Backspace => state.delete_char(),
            KeyCode::Left => state.move_cursor_left(),
            KeyCode::Right => state.move_cursor_right(),
            _ => {}
        },
        InputMode::Normal if state.carrying.is_some() => match code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                let target = state.drop_target();
                state.carrying = None;
                let _ = tx.send(Action::Drop(target)).await;
            }
            KeyCode::Esc => {
                state.carrying = None;
                let _ = tx.send(Action::Drop(None)).await;
            }
            KeyCode::Down | KeyCode::Char('j') => state.next(),
            KeyCode::Up | KeyCode::Char('k') => state.previous(),
            KeyCode::Right | KeyCode::Char('l') => state.column_right(),
            KeyCode::Left | KeyCode::Char('h') => state.column_left(),
            _ => {}
        },
        InputMode::Normal => match code {
            KeyCode::Char('q') => {
                let _ = tx.send(Action::Quit).await;
                return false;
            }
            KeyCode::Tab => state.toggle_focus(),
            KeyCode::Down | KeyCode::Char('j') => state.next(),
            KeyCode::Up | KeyCode::Char('k') => state.previous(),
            KeyCode::Right | KeyCode::Char('l') => state.column_right(),
            KeyCode::Left | KeyCode::Char('h') => state.column_left(),
            KeyCode::Enter if state.active_focus == Focus::Sidebar => {
                if let Some(id) = state.selected_board() {
                    state.column = 0;
                    state.row = 0;
                    state.active_focus = Focus::Main;
                    let _ = tx.send(Action::SwitchBoard(id)).await;
                }
            }
            KeyCode::Char(' ') => {
                if let Some(card) = state.selected_card() {
                    let id = card.id;
                    state.message = format!("Dragging \"{}\"", card.title);
                    state.carrying = Some(id);
                    let _ = tx.send(Action::StartDrag(id)).await;
                }
            }
            KeyCode::Char('a') => {
                if state.selected_list().is_some() {
                    state.start_input(InputMode::CreatingCard, "");
                }
            }
            KeyCode::Char('A') => {
                if state.board.is_some() {
                    state.start_input(InputMode::CreatingList, "");
                }
            }
            KeyCode::Char('n') => state.start_input(InputMode::CreatingBoard, ""),
            KeyCode::Char('E') => {
                if let Some(text) = state.board.as_ref().map(|b| b.quick_input()) {
                    state.start_input(InputMode::EditingBoard, &text);
                }
            }
            KeyCode::Char('e') => {
                if let Some(card) = state.selected_card() {
                    let text = match &card.description {
                        Some(d) => format!("{} // {}", card.title, d),
                        None => card.title.clone(),
                    };
                    state.start_input(InputMode::EditingCard, &text);
                }
            }
            KeyCode::Char('d') => {
                if let Some(card) = state.selected_card() {
                    let _ = tx.send(Action::DeleteCard(card.id)).await;
                }
            }
            KeyCode::Char('D') => {
                if let Some(list) = state.selected_list() {
                    let _ = tx.send(Action::DeleteList(list.id)).await;
                }
            }
            KeyCode::Char('X') => {
                if state.boards.len() <= 1 {
                    state.message = "You need at least one project!".to_string();
                } else if state.board.is_some() {
                    state.mode = InputMode::ConfirmDeleteBoard;
                }
            }
            KeyCode::Char('m') => {
                state.show_metrics = !state.show_metrics;
                if state.show_metrics {
                    let _ = tx.send(Action::LoadPortfolio).await;
                }
            }
            KeyCode::Char('r') => {
                let _ = tx.send(Action::Reload).await;
            }
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                let user = state.users.get(idx).map(|u| u.id);
                if let (Some(card), Some(user)) = (state.selected_card(), user) {
                    let _ = tx.send(Action::ToggleMember(card.id, user)).await;
                }
            }
            _ => {}
        },
    }
    true
}

async fn send_snapshot(ctl: &BoardController, tx: &mpsc::Sender<AppEvent>) {
    let store = ctl.store();
    let _ = tx
        .send(AppEvent::Snapshot {
            boards: store.summaries().to_vec(),
            active: store.active_id(),
            board: store.active().cloned(),
        })
        .await;
}

async fn report(result: Result<(), ActionError>, done: &str, tx: &mpsc::Sender<AppEvent>) {
    let event = match result {
        Ok(()) => AppEvent::Status(done.to_string()),
        Err(e) => AppEvent::Error(e.detail()),
    };
    let _ = tx.send(event).await;
}

/// Owns the controller; turns UI actions into API calls and reports snapshots back.
async fn run_actor(
    mut ctl: BoardController,
    default_board: Option<String>,
    mut action_rx: mpsc::Receiver<Action>,
    event_tx: mpsc::Sender<AppEvent>,
) {
    let _ = event_tx
        .send(AppEvent::Status("Connecting...".to_string()))
        .await;

    match ctl.load_boards_or_cached().await {
        Ok(warning) => {
            if let Some(name) = default_board
                && let Err(e) = ctl.select_by_name(&name).await
            {
                let _ = event_tx.send(AppEvent::Error(e.detail())).await;
            }
            send_snapshot(&ctl, &event_tx).await;
            let status = warning.unwrap_or_else(|| {
                format!("Projects: {}", ctl.store().summaries().len())
            });
            let _ = event_tx.send(AppEvent::Status(status)).await;
        }
        Err(e) => {
            send_snapshot(&ctl, &event_tx).await;
            let _ = event_tx.send(AppEvent::Error(e.detail())).await;
        }
    }

    match ctl.list_users().await {
        Ok(users) => {
            let _ = event_tx.send(AppEvent::UsersLoaded(users.to_vec())).await;
        }
        Err(e) => tracing::warn!("Member list unavailable: {}", e.detail()),
    }

    while let Some(action) = action_rx.recv().await {
        match action {
            Action::Quit => break,
            Action::Reload => {
                let r = ctl.load_boards().await;
                report(r, "Reloaded.", &event_tx).await;
            }
            Action::SwitchBoard(id) => {
                let r = ctl.select_board(id).await;
                report(r, "Project loaded.", &event_tx).await;
            }
            Action::CreateBoard(input) => {
                let draft = NewBoard::from_quick_input(&input, Local::now().date_naive());
                let r = ctl.create_board(&draft).await.map(|_| ());
                report(r, "Project created.", &event_tx).await;
            }
            Action::EditBoard(input) => {
                let patch = BoardPatch::from_quick_input(&input, Local::now().date_naive());
                if patch.is_empty() {
                    continue;
                }
                let r = ctl.update_board(&patch).await;
                report(r, "Project updated.", &event_tx).await;
            }
            Action::DeleteBoard => {
                let r = ctl.delete_active_board().await;
                report(r, "Project deleted.", &event_tx).await;
            }
            Action::CreateList(title) => {
                let r = ctl.create_list(&title).await.map(|_| ());
                report(r, "List created.", &event_tx).await;
            }
            Action::DeleteList(list) => {
                let r = ctl.delete_list(list).await;
                report(r, "List deleted.", &event_tx).await;
            }
            Action::CreateCard(list, input) => {
                let r = ctl
                    .create_card(list, &NewCard::from_input(&input))
                    .await
                    .map(|_| ());
                report(r, "Card created.", &event_tx).await;
            }
            Action::EditCard(card, input) => {
                let parsed = NewCard::from_input(&input);
                let patch = CardPatch {
                    title: Some(parsed.title),
                    description: Some(parsed.description.unwrap_or_default()),
                };
                let r = ctl.update_card(card, &patch).await;
                report(r, "Card updated.", &event_tx).await;
            }
            Action::DeleteCard(card) => {
                let r = ctl.delete_card(card).await;
                report(r, "Card deleted.", &event_tx).await;
            }
            Action::ToggleMember(card, user) => {
                let assigned = ctl
                    .board()
                    .and_then(|b| b.card(card))
                    .is_some_and(|c| c.is_assigned_to(user));
                let r = if assigned {
                    ctl.remove_member(card, user).await
                } else {
                    ctl.add_member(card, user).await
                };
                report(r, "Members updated.", &event_tx).await;
            }
            Action::StartDrag(card) => {
                if ctl.drag_start(card).is_none() {
                    let _ = event_tx
                        .send(AppEvent::Status("Card is no longer on the board.".to_string()))
                        .await;
                }
                continue;
            }
            Action::Drop(target) => {
                let status = match ctl.drag_end(target).await {
                    Ok(DropPlan::Move { .. }) => AppEvent::Status("Card moved.".to_string()),
                    Ok(DropPlan::Reorder { .. }) => AppEvent::Status("Card reordered.".to_string()),
                    Ok(_) => AppEvent::Status("Drag cancelled.".to_string()),
                    Err(e) => AppEvent::Error(e.detail()),
                };
                let _ = event_tx.send(status).await;
            }
            Action::LoadPortfolio => {
                let boards = ctl.fetch_all_boards().await;
                let metrics = PortfolioMetrics::from_boards(&boards, Local::now().date_naive());
                let _ = event_tx.send(AppEvent::PortfolioLoaded(metrics)).await;
                continue;
            }
        }
        send_snapshot(&ctl, &event_tx).await;
    }
}
