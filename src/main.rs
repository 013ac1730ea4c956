//! Pokedex TUI - browse PokeAPI nine entries at a time

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind, Keybindings,
    TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api;
use pokedex::effect::Effect;
use pokedex::reducer::reducer;
use pokedex::sprite::decode_sprite;
use pokedex::state::AppState;
use pokedex::ui::{handle_global_key, CatalogComponentId, CatalogContext, CatalogUi};

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse the PokeAPI catalog nine entries at a time")]
struct Args {
    /// Base URL of the PokeAPI-compatible server
    #[arg(long, default_value = api::API_BASE)]
    api_base: String,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    api::configure(&args.api_base);
    tracing::info!(api_base = %args.api_base, "starting");

    let debug = DebugSession::new(args.debug);

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

/// The terminal belongs to the UI, so logs only go to an explicit file.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pokedex=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(CatalogUi::new()));
    let mut bus: EventBus<AppState, Action, CatalogComponentId, CatalogContext> = EventBus::new();
    let keybindings: Keybindings<CatalogContext> = Keybindings::new();

    let ui_search = Rc::clone(&ui);
    bus.register(CatalogComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_grid = Rc::clone(&ui);
    bus.register(CatalogComponentId::Grid, move |event, state| {
        ui_grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(CatalogComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    let ui_notice = Rc::clone(&ui);
    bus.register(CatalogComponentId::Notice, move |event, state| {
        ui_notice
            .borrow_mut()
            .handle_notice_event(&event.kind, state)
    });

    let ui_mouse = Rc::clone(&ui);
    bus.register_global(move |event, state| match event.kind {
        EventKind::Mouse(_) => ui_mouse
            .borrow_mut()
            .handle_mouse_event(&event.kind, state),
        _ => handle_global_key(&event.kind, state),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, _render_ctx, event_ctx| {
                ui.borrow_mut().render(frame, area, state, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadPage { offset } => {
            // One key for all pages: a newer request cancels the older one.
            ctx.tasks().spawn(TaskKey::new("page"), async move {
                match api::client().fetch_page(offset).await {
                    Ok(page) => {
                        tracing::info!(offset, entries = page.items.len(), "page loaded");
                        Action::PageDidLoad { offset, page }
                    }
                    Err(err) => {
                        tracing::warn!(offset, error = %err, "page failed");
                        Action::PageDidError {
                            offset,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::SearchEntry { term, id } => {
            ctx.tasks().spawn(TaskKey::new("search"), async move {
                match api::client().fetch_entry(&id).await {
                    Ok(entry) => Action::SearchDidLoad { term, entry },
                    Err(err) => {
                        tracing::info!(term = %term, error = %err, "search failed");
                        Action::SearchDidError {
                            term,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadSprite { url } => {
            let key = format!("sprite_{url}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                let decoded = match api::client().fetch_bytes(&url).await {
                    Ok(bytes) => decode_sprite(&bytes),
                    Err(err) => Err(err.to_string()),
                };
                match decoded {
                    Ok(sprite) => Action::SpriteDidLoad { url, sprite },
                    Err(error) => {
                        tracing::warn!(url = %url, error = %error, "sprite failed");
                        Action::SpriteDidError { url, error }
                    }
                }
            });
        }
    }
}
