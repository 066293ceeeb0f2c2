use std::time::{Duration, Instant};

use cliplet_captions::{ClipKey, Word};
use cliplet_client::{Error as ApiError, Identity};
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

pub const TICK: Duration = Duration::from_millis(50);

/// Everything the preview loop reacts to, funneled through one channel:
/// terminal input, the playback tick, and completions from spawned tasks.
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    WordsLoaded(ClipKey, Result<Vec<Word>, ApiError>),
    SrtLoaded(ClipKey, Result<String, ApiError>),
    SaveFinished(ClipKey, Result<(), ApiError>),
    LoginPrompt,
    LoginFinished(Result<Identity, ApiError>),
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new(rx: mpsc::UnboundedReceiver<AppEvent>) -> Self {
        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Forward terminal input and a steady tick into the channel from a
/// dedicated thread; crossterm's poll doubles as the tick timer. The thread
/// ends once the receiver is gone.
pub fn spawn_input(tx: mpsc::UnboundedSender<AppEvent>) {
    std::thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = TICK.saturating_sub(last_tick.elapsed());
            let ready = match crossterm::event::poll(timeout) {
                Ok(ready) => ready,
                Err(_) => return,
            };

            if ready {
                let forwarded = match crossterm::event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        tx.send(AppEvent::Key(key))
                    }
                    Ok(Event::Resize(_, _)) => tx.send(AppEvent::Resize),
                    Ok(_) => Ok(()),
                    Err(_) => return,
                };
                if forwarded.is_err() {
                    return;
                }
            }

            if last_tick.elapsed() >= TICK {
                last_tick = Instant::now();
                if tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        }
    });
}
