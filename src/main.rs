//! WorldWise terminal client

use std::io;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventOutcome, RenderContext,
    TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use worldwise::action::Action;
use worldwise::api::{CityApi, HttpCityApi};
use worldwise::config::{ApiConfig, DEFAULT_BASE_URL};
use worldwise::effect::Effect;
use worldwise::logging;
use worldwise::reducer::reducer;
use worldwise::state::AppState;
use worldwise::ui;

/// WorldWise - keep track of the cities you visited
#[derive(Parser, Debug)]
#[command(name = "worldwise")]
#[command(about = "A terminal client for the WorldWise cities backend")]
struct Args {
    /// Base URL of the cities REST backend
    #[arg(long, env = "WORLDWISE_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Give up on a request after this many seconds (default: wait forever)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

/// Backend client shared by effect tasks.
static API: OnceLock<Arc<dyn CityApi>> = OnceLock::new();

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_url,
        timeout_secs,
        debug: debug_args,
    } = Args::parse();

    logging::init_tracing();

    let mut config = ApiConfig::new(api_url);
    if let Some(secs) = timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let api = HttpCityApi::new(config).map_err(io::Error::other)?;
    info!(base_url = %api.config().base_url, "using cities backend");
    API.get_or_init(|| Arc::new(api));

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::new()) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
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
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

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
    debug
        .run_effect_app(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            // The city list loads once per run.
            Some(Action::CitiesFetch),
            Some(Action::Quit),
            |_runtime| {},
            |frame, area, state, render_ctx: RenderContext| {
                ui::render(frame, area, state, render_ctx);
            },
            |event, state| -> EventOutcome<Action> { ui::handle_event(event, state) },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning keyed tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    let Some(api) = API.get().cloned() else {
        warn!(?effect, "no backend client configured, dropping effect");
        return;
    };
    let key = TaskKey::new(effect.task_key());
    ctx.tasks().spawn(key, effect.perform(api));
}
