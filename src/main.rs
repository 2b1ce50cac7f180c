mod api;
mod app;
mod chat;
mod config;
mod events;
mod logging;
mod models;
mod progress;
mod proxy;
mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use api::RecipeClient;
use app::{App, Focus};
use events::AppEvent;
use models::{AppConfig, ThemeConfig};
use proxy::BackendClient;

#[derive(Debug, Parser)]
#[command(name = "recipechat", version, about = "Extract recipes and chat about them")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the terminal client (default)
    Tui(TuiArgs),
    /// Run the HTTP proxy in front of the recipe service
    Serve(ServeArgs),
}

#[derive(Debug, Default, Args)]
struct TuiArgs {
    /// Proxy base URL, e.g. http://127.0.0.1:3000
    #[arg(long, value_name = "URL")]
    proxy_url: Option<String>,

    /// Start the proxy inside this process
    #[arg(long)]
    with_proxy: bool,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to listen on, e.g. 0.0.0.0:3000
    #[arg(long, value_name = "ADDR")]
    listen: Option<String>,

    /// Recipe service base URL; overrides BACKEND_URL
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or_else(|| Command::Tui(TuiArgs::default())) {
        Command::Serve(args) => run_serve(config, args, &cli.log_level).await,
        Command::Tui(args) => run_tui(config, args, &cli.log_level).await,
    }
}

fn backend_client(config: &AppConfig) -> Result<BackendClient> {
    let backend_url = config
        .backend_url
        .as_deref()
        .context("No recipe service configured: set BACKEND_URL or backend_url in the config file")?;

    BackendClient::new(backend_url)
}

async fn run_serve(mut config: AppConfig, args: ServeArgs, log_level: &str) -> Result<()> {
    logging::init_stdout(log_level)?;

    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if let Some(backend_url) = args.backend_url {
        config.backend_url = Some(backend_url);
    }

    let backend = backend_client(&config)?;
    let listener = proxy::bind(&config.listen_addr).await?;
    proxy::serve(listener, backend).await
}

async fn run_tui(mut config: AppConfig, args: TuiArgs, log_level: &str) -> Result<()> {
    let _log_guard = logging::init_file(log_level, &config::get_log_path()?)?;

    if args.with_proxy {
        let backend = backend_client(&config)?;
        let listener = proxy::bind(&config.listen_addr).await?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read proxy address")?;
        config.proxy_url = format!("http://{local_addr}");

        tokio::spawn(async move {
            if let Err(e) = proxy::serve(listener, backend).await {
                error!(error = ?e, "Embedded proxy stopped");
            }
        });
    }
    if let Some(proxy_url) = args.proxy_url {
        config.proxy_url = proxy_url;
    }

    let client = RecipeClient::new(&config.proxy_url, config.request_timeout)?;
    if client.health_check().await {
        info!(proxy = client.base_url(), "Connected to recipe proxy");
    } else {
        warn!(
            proxy = client.base_url(),
            "Recipe proxy is not reachable; requests will fail until it is running"
        );
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();

    // Create channel for async events
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    let res = run_app(&mut terminal, &mut app, &client, &config.theme, &tx, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "Terminal client failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn handle_app_event(app: &mut App, event: AppEvent, now: Instant) {
    match event {
        AppEvent::RecipeProcessed(result) => {
            app.finish_recipe(result.map(|recipe| *recipe), now);
        }
        AppEvent::ChatReply { session, reply } => match app.chat.dialog_for_session(session) {
            Some(dialog) => dialog.receive_reply(reply),
            None => debug!(%session, "Discarding reply for a closed chat"),
        },
    }
}

const fn handle_help_keys(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> bool {
    if !app.show_help {
        return false;
    }

    match key {
        KeyCode::Char('h') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.toggle_help();
        }
        KeyCode::Esc => {
            app.show_help = false;
        }
        _ => {}
    }
    true
}

fn handle_keyboard_input(
    app: &mut App,
    key: KeyCode,
    modifiers: KeyModifiers,
    client: &RecipeClient,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) -> Option<JoinHandle<()>> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match key {
        KeyCode::Char('c') if ctrl => {
            app.show_help = false;
            if app.exit_pending {
                app.quit();
            } else {
                app.exit_pending = true;
            }
            return None;
        }
        KeyCode::Char('q') if ctrl => {
            app.quit();
            return None;
        }
        KeyCode::Esc if app.exit_pending => {
            app.exit_pending = false;
            return None;
        }
        _ if app.exit_pending => {
            // Any other key cancels pending exit
            app.exit_pending = false;
        }
        _ => {}
    }

    if handle_help_keys(app, key, modifiers) {
        return None;
    }

    match key {
        KeyCode::Char('h') if ctrl => {
            app.toggle_help();
            None
        }
        KeyCode::Char('t') if ctrl => {
            app.toggle_chat(Instant::now());
            None
        }
        _ if app.chat.is_open() => handle_chat_keys(app, key, client, event_tx),
        _ => handle_page_keys(app, key, client, event_tx),
    }
}

fn handle_page_keys(
    app: &mut App,
    key: KeyCode,
    client: &RecipeClient,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) -> Option<JoinHandle<()>> {
    match (app.focus, key) {
        (_, KeyCode::Tab | KeyCode::BackTab) => app.toggle_focus(),
        (Focus::UrlInput, KeyCode::Enter) => {
            let recipe_url = app.submit_recipe(Instant::now())?;
            return Some(process_recipe(client, event_tx, recipe_url));
        }
        (Focus::UrlInput, KeyCode::Backspace) => {
            app.url_input.pop();
        }
        (Focus::UrlInput, KeyCode::Char(c)) => app.url_input.push(c),
        (Focus::Recipe, KeyCode::Right | KeyCode::Char('l')) => app.next_tab(),
        (Focus::Recipe, KeyCode::Left | KeyCode::Char('h')) => app.previous_tab(),
        (Focus::Recipe, KeyCode::Up | KeyCode::Char('k')) => app.scroll_up(1),
        (Focus::Recipe, KeyCode::Down | KeyCode::Char('j')) => app.scroll_down(1),
        (Focus::Recipe, KeyCode::PageUp) => app.scroll_up(10),
        (Focus::Recipe, KeyCode::PageDown) => app.scroll_down(10),
        _ => {}
    }
    None
}

fn handle_chat_keys(
    app: &mut App,
    key: KeyCode,
    client: &RecipeClient,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) -> Option<JoinHandle<()>> {
    if key == KeyCode::Esc {
        app.chat.close(Instant::now());
        return None;
    }

    let recipe_url = app.chat_recipe_url();
    let dialog = app.chat.active_dialog_mut()?;

    match key {
        KeyCode::Enter => {
            let text = dialog.submit()?;
            return Some(send_chat_message(
                client,
                event_tx,
                dialog.session(),
                recipe_url,
                text,
            ));
        }
        KeyCode::Backspace if !dialog.is_loading() => {
            dialog.input.pop();
        }
        KeyCode::Char(c) if !dialog.is_loading() => dialog.input.push(c),
        KeyCode::Up => dialog.scroll_up(1),
        KeyCode::Down => dialog.scroll_down(1),
        KeyCode::PageUp => dialog.scroll_up(10),
        KeyCode::PageDown => dialog.scroll_down(10),
        KeyCode::End => dialog.scroll_to_bottom(),
        _ => {}
    }
    None
}

fn process_recipe(
    client: &RecipeClient,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
    recipe_url: String,
) -> JoinHandle<()> {
    let client = client.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let result = client
            .process_recipe(&recipe_url)
            .await
            .map(Box::new)
            .map_err(|e| {
                error!(recipe_url = %recipe_url, error = ?e, "Error processing recipe");
                e.to_string()
            });
        let _ = tx.send(AppEvent::RecipeProcessed(result));
    })
}

fn send_chat_message(
    client: &RecipeClient,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
    session: uuid::Uuid,
    recipe_url: String,
    text: String,
) -> JoinHandle<()> {
    let client = client.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let reply = client.chat(&recipe_url, &text).await.map_err(|e| {
            error!(error = ?e, "Error sending message");
            e.to_string()
        });
        let _ = tx.send(AppEvent::ChatReply { session, reply });
    })
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &RecipeClient,
    theme: &ThemeConfig,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        let now = Instant::now();
        app.on_tick(now);
        terminal.draw(|f| ui::render(f, app, theme, now))?;

        // Drain finished requests before reading input
        while let Ok(app_event) = event_rx.try_recv() {
            handle_app_event(app, app_event, Instant::now());
        }

        // ~60fps keeps the chat animation smooth
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_keyboard_input(app, key.code, key.modifiers, client, event_tx);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RecipeClient {
        RecipeClient::new("http://127.0.0.1:1", 5).unwrap()
    }

    fn type_text(app: &mut App, text: &str, tx: &mpsc::UnboundedSender<AppEvent>) {
        for c in text.chars() {
            handle_keyboard_input(app, KeyCode::Char(c), KeyModifiers::NONE, &client(), tx);
        }
    }

    #[test]
    fn test_cli_parses_serve() {
        let cli = Cli::try_parse_from([
            "recipechat",
            "serve",
            "--listen",
            "0.0.0.0:8080",
            "--backend-url",
            "http://backend:5000",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.listen.as_deref(), Some("0.0.0.0:8080"));
                assert_eq!(args.backend_url.as_deref(), Some("http://backend:5000"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_defaults_to_tui() {
        let cli = Cli::try_parse_from(["recipechat"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_serve_requires_backend() {
        let config = AppConfig::default();
        assert!(backend_client(&config).is_err());
    }

    #[tokio::test]
    async fn test_enter_with_empty_url_sends_nothing() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new();

        let handle =
            handle_keyboard_input(&mut app, KeyCode::Enter, KeyModifiers::NONE, &client(), &tx);

        assert!(handle.is_none());
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn test_enter_with_url_reports_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new();
        type_text(&mut app, "https://example.com/pasta", &tx);

        let handle =
            handle_keyboard_input(&mut app, KeyCode::Enter, KeyModifiers::NONE, &client(), &tx);
        handle.unwrap().await.unwrap();

        assert!(app.is_loading());
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, AppEvent::RecipeProcessed(Err(_))));
    }

    #[tokio::test]
    async fn test_chat_failure_appends_fallback() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new();
        handle_keyboard_input(&mut app, KeyCode::Char('t'), KeyModifiers::CONTROL, &client(), &tx);
        type_text(&mut app, "hello", &tx);

        let handle =
            handle_keyboard_input(&mut app, KeyCode::Enter, KeyModifiers::NONE, &client(), &tx);
        handle.unwrap().await.unwrap();
        let event = rx.recv().await.unwrap();
        handle_app_event(&mut app, event, Instant::now());

        let dialog = app.chat.dialog().unwrap();
        assert_eq!(dialog.messages().len(), 3);
        assert_eq!(dialog.messages()[1].content, "hello");
        assert_eq!(dialog.messages()[2].content, chat::FALLBACK_REPLY);
    }

    #[test]
    fn test_reply_for_closed_chat_is_discarded() {
        let mut app = App::new();
        app.toggle_chat(Instant::now());
        let stale = uuid::Uuid::new_v4();

        handle_app_event(
            &mut app,
            AppEvent::ChatReply {
                session: stale,
                reply: Ok("late".to_string()),
            },
            Instant::now(),
        );

        assert_eq!(app.chat.dialog().unwrap().messages().len(), 1);
    }

    #[test]
    fn test_ctrl_c_twice_quits() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new();

        handle_keyboard_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &client(), &tx);
        assert!(app.exit_pending);
        assert!(!app.should_quit);

        handle_keyboard_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &client(), &tx);
        assert!(app.should_quit);
    }

    #[test]
    fn test_quit_keys_work_while_help_is_open() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new();
        app.show_help = true;

        handle_keyboard_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &client(), &tx);
        assert!(app.exit_pending);
        assert!(!app.show_help);
        handle_keyboard_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &client(), &tx);
        assert!(app.should_quit);

        let mut app = App::new();
        app.show_help = true;
        handle_keyboard_input(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL, &client(), &tx);
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_swallows_other_keys() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new();
        app.show_help = true;

        type_text(&mut app, "abc", &tx);
        assert!(app.url_input.is_empty());

        handle_keyboard_input(&mut app, KeyCode::Esc, KeyModifiers::NONE, &client(), &tx);
        assert!(!app.show_help);
    }

    #[test]
    fn test_typing_goes_to_chat_when_open() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new();
        app.toggle_chat(Instant::now());

        type_text(&mut app, "hi", &tx);

        assert!(app.url_input.is_empty());
        assert_eq!(app.chat.dialog().unwrap().input, "hi");
    }
}
