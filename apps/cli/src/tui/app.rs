use std::sync::Arc;
use std::time::Instant;

use cliplet_captions::{CaptionFrame, ClipKey, LoadOutcome, Preview, Word};
use cliplet_client::{ApiClient, Clip, Error as ApiError, Identity, LoginGate, LoginSurface};
use cliplet_http::ReqwestClient;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use super::Launch;
use super::event::AppEvent;
use crate::config::Config;

/// Highlight colors the `c` key cycles through.
const HIGHLIGHTS: [&str; 5] = ["#fde047", "#86efac", "#93c5fd", "#f9a8d4", "#fca5a5"];

const FONT_STEP: i32 = 2;
const SEEK_STEP: f64 = 1.0;
const STROKE_CYCLE: u32 = 5;

/// What the keyboard is currently driving.
pub enum Mode {
    Play,
    EditCaptions { input: String },
    Login(LoginForm),
}

#[derive(Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub on_password: bool,
    pub busy: bool,
}

/// Login surface for the preview: asks the event loop to raise the in-app
/// login form instead of leaving the terminal.
struct FormSurface {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl LoginSurface for FormSurface {
    fn open(&self) -> Result<(), cliplet_http::Error> {
        self.tx
            .send(AppEvent::LoginPrompt)
            .map_err(|_| "preview loop is gone".into())
    }
}

pub struct App {
    pub preview: Preview,
    pub job_id: String,
    pub clips: Vec<Clip>,
    pub clip_pos: usize,
    pub identity: Option<Identity>,
    pub mode: Mode,
    pub paused: bool,
    pub loading: bool,
    pub saving: bool,
    pub status: Option<String>,
    pub should_quit: bool,
    highlight_pos: usize,
    last_tick: Instant,
    config: Config,
    http: ReqwestClient,
    api: Arc<ApiClient<ReqwestClient>>,
    gate: Arc<LoginGate>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(launch: Launch, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let Launch {
            config,
            http,
            api,
            gate,
            identity,
            job_id,
            clips,
            start_clip,
        } = launch;

        let clip_pos = clips
            .iter()
            .position(|c| c.index == start_clip)
            .unwrap_or(0);

        let mut preview = Preview::new();
        preview.set_job(job_id.clone());
        if let Some(clip) = clips.get(clip_pos) {
            preview.set_clip(clip.index);
        }

        Self {
            preview,
            job_id,
            clips,
            clip_pos,
            identity,
            mode: Mode::Play,
            paused: false,
            loading: false,
            saving: false,
            status: None,
            should_quit: false,
            highlight_pos: 0,
            last_tick: Instant::now(),
            config,
            http,
            api,
            gate,
            tx,
        }
    }

    pub fn start(&mut self) {
        self.reload_words();
    }

    pub fn frame(&self) -> CaptionFrame {
        self.preview.frame()
    }

    pub fn current_clip(&self) -> Option<&Clip> {
        self.clips.get(self.clip_pos)
    }

    fn clip_duration(&self) -> f64 {
        self.current_clip().map(Clip::duration).unwrap_or(0.0)
    }

    // Playback.

    pub fn handle_tick(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        self.advance(dt);
    }

    fn advance(&mut self, dt: f64) {
        if self.paused || !matches!(self.mode, Mode::Play) {
            return;
        }
        let duration = self.clip_duration();
        let mut time = self.preview.time() + dt;
        if duration > 0.0 && time >= duration {
            time %= duration;
        }
        self.preview.seek(time);
    }

    fn seek_by(&mut self, delta: f64) {
        let duration = self.clip_duration();
        let time = (self.preview.time() + delta).clamp(0.0, duration.max(0.0));
        self.preview.seek(time);
    }

    // Keyboard.

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Play => self.handle_play_key(key),
            Mode::EditCaptions { .. } => self.handle_edit_key(key),
            Mode::Login(_) => self.handle_login_key(key),
        }
    }

    fn handle_play_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Left if shift => self.nudge(-1, 0),
            KeyCode::Right if shift => self.nudge(1, 0),
            KeyCode::Up if shift => self.nudge(0, -1),
            KeyCode::Down if shift => self.nudge(0, 1),
            KeyCode::Left => self.seek_by(-SEEK_STEP),
            KeyCode::Right => self.seek_by(SEEK_STEP),
            KeyCode::Home => self.preview.seek(0.0),
            KeyCode::Char('n') => self.switch_clip(1),
            KeyCode::Char('p') => self.switch_clip(-1),
            KeyCode::Char('+') | KeyCode::Char('=') => self.bump_font(FONT_STEP),
            KeyCode::Char('-') | KeyCode::Char('_') => self.bump_font(-FONT_STEP),
            KeyCode::Char(']') => self.bump_window(1),
            KeyCode::Char('[') => self.bump_window(-1),
            KeyCode::Char('h') => self.nudge(-1, 0),
            KeyCode::Char('l') => self.nudge(1, 0),
            KeyCode::Char('k') => self.nudge(0, -1),
            KeyCode::Char('j') => self.nudge(0, 1),
            KeyCode::Char('s') => self.cycle_stroke(),
            KeyCode::Char('c') => self.cycle_highlight(),
            KeyCode::Char('e') => self.open_editor(),
            KeyCode::Char('r') => self.reload_words(),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Mode::EditCaptions { input } = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Play;
                self.status = None;
            }
            KeyCode::Enter => {
                let text = decode_multiline(input);
                self.mode = Mode::Play;
                self.save_captions(text);
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        let Mode::Login(form) = &mut self.mode else {
            return;
        };
        if form.busy {
            return;
        }
        match key.code {
            KeyCode::Esc => {
                self.gate.resolve(false);
                self.mode = Mode::Play;
                self.status = Some("login canceled".to_string());
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                form.on_password = !form.on_password;
            }
            KeyCode::Enter if !form.on_password => form.on_password = true,
            KeyCode::Enter => {
                form.busy = true;
                let username = form.username.clone();
                let password = form.password.clone();
                let api = self.api.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.login(&username, &password).await;
                    let _ = tx.send(AppEvent::LoginFinished(result));
                });
            }
            KeyCode::Backspace => {
                let field = if form.on_password {
                    &mut form.password
                } else {
                    &mut form.username
                };
                field.pop();
            }
            KeyCode::Char(c) => {
                let field = if form.on_password {
                    &mut form.password
                } else {
                    &mut form.username
                };
                field.push(c);
            }
            _ => {}
        }
    }

    // Style.

    fn bump_font(&mut self, delta: i32) {
        let style = self.preview.style_mut();
        style.set_font_size(style.font_size_px.saturating_add_signed(delta));
    }

    fn bump_window(&mut self, delta: isize) {
        let style = self.preview.style_mut();
        style.set_window_size(style.window_size.saturating_add_signed(delta));
    }

    fn nudge(&mut self, dx: i32, dy: i32) {
        let style = self.preview.style_mut();
        style.set_pos_x(style.pos_x_pct.saturating_add_signed(dx));
        style.set_pos_y(style.pos_y_pct.saturating_add_signed(dy));
    }

    fn cycle_stroke(&mut self) {
        let style = self.preview.style_mut();
        style.set_stroke_width((style.stroke_width_px + 1) % STROKE_CYCLE);
    }

    fn cycle_highlight(&mut self) {
        self.highlight_pos = (self.highlight_pos + 1) % HIGHLIGHTS.len();
        self.preview.style_mut().highlight_color = HIGHLIGHTS[self.highlight_pos].to_string();
    }

    // Clips and loads.

    fn switch_clip(&mut self, step: isize) {
        let len = self.clips.len() as isize;
        if len == 0 {
            return;
        }
        let pos = (self.clip_pos as isize + step).rem_euclid(len) as usize;
        if pos == self.clip_pos {
            return;
        }
        self.clip_pos = pos;
        self.preview.set_clip(self.clips[pos].index);
        self.preview.seek(0.0);
        self.reload_words();
    }

    fn reload_words(&mut self) {
        match self.preview.begin_load() {
            Ok(key) => {
                self.loading = true;
                self.status = None;
                let api = self.api.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.clip_words(&key).await;
                    let _ = tx.send(AppEvent::WordsLoaded(key, result));
                });
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn open_editor(&mut self) {
        if self.saving {
            self.status = Some("still saving the last edit".to_string());
            return;
        }
        match self.preview.begin_load() {
            Ok(key) => {
                self.status = Some("fetching captions...".to_string());
                let api = self.api.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.captions_srt(&key).await;
                    let _ = tx.send(AppEvent::SrtLoaded(key, result));
                });
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn save_captions(&mut self, text: String) {
        let key = match self.preview.begin_load() {
            Ok(key) => key,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };

        self.saving = true;
        self.status = Some("saving captions...".to_string());

        let api = self.api.clone();
        let gate = self.gate.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = save_with_login(&api, &gate, &tx, &key, &text).await;
            let _ = tx.send(AppEvent::SaveFinished(key, result));
        });
    }

    // Task completions.

    pub fn handle_task_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::WordsLoaded(key, result) => self.on_words_loaded(key, result),
            AppEvent::SrtLoaded(key, result) => self.on_srt_loaded(key, result),
            AppEvent::SaveFinished(key, result) => self.on_save_finished(key, result),
            AppEvent::LoginPrompt => self.on_login_prompt(),
            AppEvent::LoginFinished(result) => self.on_login_finished(result),
            AppEvent::Key(_) | AppEvent::Resize | AppEvent::Tick => {}
        }
    }

    fn on_words_loaded(&mut self, key: ClipKey, result: Result<Vec<Word>, ApiError>) {
        self.loading = false;
        match result {
            Ok(words) => {
                if self.preview.finish_load(key, words) == LoadOutcome::Applied {
                    self.status = None;
                } else {
                    tracing::debug!("discarded a word load for a stale clip");
                }
            }
            Err(e) => {
                tracing::warn!("word load failed: {e}");
                if self.preview.fail_load(&key) == LoadOutcome::Applied {
                    self.status = Some(format!("captions unavailable: {e}"));
                }
            }
        }
    }

    fn on_srt_loaded(&mut self, key: ClipKey, result: Result<String, ApiError>) {
        if self.preview.session().key().as_ref() != Some(&key) {
            tracing::debug!("discarded an SRT fetch for a stale clip");
            return;
        }
        match result {
            Ok(srt) => {
                self.status = None;
                self.mode = Mode::EditCaptions {
                    input: encode_multiline(&srt),
                };
            }
            Err(e) => self.status = Some(format!("could not fetch captions: {e}")),
        }
    }

    fn on_save_finished(&mut self, key: ClipKey, result: Result<(), ApiError>) {
        self.saving = false;
        match result {
            Ok(()) => {
                // The edit changed the word timings; reload them at the
                // current playback time.
                if self.preview.session().key().as_ref() == Some(&key) {
                    self.reload_words();
                }
                self.status = Some("captions saved".to_string());
            }
            Err(e) => self.status = Some(format!("captions not saved: {e}")),
        }
    }

    fn on_login_prompt(&mut self) {
        self.mode = Mode::Login(LoginForm::default());
        self.status = Some("session expired, log in to continue".to_string());
    }

    fn on_login_finished(&mut self, result: Result<Identity, ApiError>) {
        match result {
            Ok(identity) => {
                self.identity = Some(identity);
                self.gate.resolve(true);
                if let Some(cookie) = self.http.session_cookie() {
                    if let Err(e) = self.config.save_cookie(&cookie) {
                        tracing::warn!("could not cache the session cookie: {e}");
                    }
                }
                self.mode = Mode::Play;
                self.status = Some("logged in".to_string());
            }
            Err(e) => {
                if let Mode::Login(form) = &mut self.mode {
                    form.busy = false;
                    form.password.clear();
                }
                self.status = Some(format!("login failed: {e}"));
            }
        }
    }
}

/// Save once; if the session expired mid-preview, suspend on the login gate
/// until the in-app form resolves it, then retry the save.
async fn save_with_login(
    api: &ApiClient<ReqwestClient>,
    gate: &LoginGate,
    tx: &mpsc::UnboundedSender<AppEvent>,
    key: &ClipKey,
    text: &str,
) -> Result<(), ApiError> {
    match api.save_captions(key, text).await {
        Err(ApiError::AuthRequired(_)) => {
            let surface = FormSurface { tx: tx.clone() };
            if gate.ensure_logged_in(api, &surface).await? {
                api.save_captions(key, text).await
            } else {
                Err(ApiError::AuthRequired("login dismissed".to_string()))
            }
        }
        result => result,
    }
}

/// The caption editor is a single input line; literal `\n` stands for a
/// line break and `\\` for a backslash.
fn encode_multiline(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\n', "\\n")
}

fn decode_multiline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
