mod app;
mod event;
mod ui;

use std::sync::Arc;

use cliplet_client::{ApiClient, Clip, Identity, LoginGate};
use cliplet_http::ReqwestClient;

use crate::commands::CommandError;
use crate::config::Config;

use app::App;
use event::{AppEvent, EventHandler};

/// Everything the preview loop needs, resolved by the preview command
/// before the terminal is taken over.
pub struct Launch {
    pub config: Config,
    pub http: ReqwestClient,
    pub api: Arc<ApiClient<ReqwestClient>>,
    pub gate: Arc<LoginGate>,
    pub identity: Option<Identity>,
    pub job_id: String,
    pub clips: Vec<Clip>,
    pub start_clip: u32,
}

fn setup_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        original(info);
    }));
}

pub async fn run(launch: Launch) -> Result<(), CommandError> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    setup_panic_hook();
    let mut terminal = ratatui::init();
    event::spawn_input(tx.clone());

    let mut app = App::new(launch, tx);
    let mut events = EventHandler::new(rx);
    app.start();

    loop {
        terminal.draw(|frame| ui::draw(frame, &app)).ok();

        match events.next().await {
            Some(AppEvent::Key(key)) => app.handle_key(key),
            Some(AppEvent::Tick) => app.handle_tick(),
            Some(AppEvent::Resize) => {}
            Some(event) => app.handle_task_event(event),
            None => break,
        }

        if app.should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}
