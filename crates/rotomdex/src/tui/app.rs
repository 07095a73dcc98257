//! Main application state and event loop

use super::image::{decode_image, ImageProtocol};
use super::input::TextInput;
use super::ui;
use super::worker::{spawn_load_worker, spawn_sprite_worker, SpriteRequest, SpriteResponse};
use anyhow::Result;
use arboard::Clipboard;
use crossterm::{
    cursor::{SetCursorStyle, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::ListState, Terminal};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};
use rotomdex_catalog::{Catalog, CatalogConfig, CatalogEntry, LoadState};
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

const PAGE: usize = 20;

/// Toast notification state
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
    pub is_error: bool,
}

impl Toast {
    pub fn new(message: String, duration: Duration) -> Self {
        Self {
            message,
            expires_at: Instant::now() + duration,
            is_error: false,
        }
    }

    pub fn error(message: String, duration: Duration) -> Self {
        Self {
            is_error: true,
            ..Self::new(message, duration)
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// App-side ends of the worker channels
pub struct Channels {
    pub reload_tx: Sender<()>,
    pub state_rx: Receiver<LoadState>,
    pub sprite_tx: Sender<SpriteRequest>,
    pub sprite_rx: Receiver<SpriteResponse>,
}

pub struct App {
    pub search_input: TextInput,
    pub catalog: Catalog,
    pub list_state: ListState,
    pub should_quit: bool,
    pub toast: Option<Toast>,
    /// When the current load began, drives the spinner
    pub load_started: Instant,
    /// Query last applied to the catalog
    last_query: String,
    channels: Channels,
    /// Sprite URL we are waiting on
    pending_sprite: Option<String>,
    /// Sprite URL currently decoded into `sprite`
    sprite_url: Option<String>,
    pub sprite: Option<StatefulProtocol>,
    pub image_protocol: ImageProtocol,
    /// Image picker for decoding (None if images are off or unsupported)
    pub picker: Option<Picker>,
    clipboard: Option<Clipboard>,
}

impl App {
    pub fn new(config: CatalogConfig, images: bool) -> Self {
        let (reload_tx, reload_rx) = mpsc::channel::<()>();
        let (state_tx, state_rx) = mpsc::channel::<LoadState>();
        let (sprite_tx, sprite_req_rx) = mpsc::channel::<SpriteRequest>();
        let (sprite_resp_tx, sprite_rx) = mpsc::channel::<SpriteResponse>();

        let image_protocol = if images {
            ImageProtocol::detect()
        } else {
            ImageProtocol::None
        };
        let picker = if image_protocol.is_supported() {
            Picker::from_query_stdio().ok()
        } else {
            None
        };

        if picker.is_some() {
            spawn_sprite_worker(config.clone(), sprite_req_rx, sprite_resp_tx);
        }
        spawn_load_worker(config, reload_rx, state_tx);

        let channels = Channels {
            reload_tx,
            state_rx,
            sprite_tx,
            sprite_rx,
        };
        Self::from_parts(channels, image_protocol, picker, Clipboard::new().ok())
    }

    pub fn from_parts(
        channels: Channels,
        image_protocol: ImageProtocol,
        picker: Option<Picker>,
        clipboard: Option<Clipboard>,
    ) -> Self {
        Self {
            search_input: TextInput::new(),
            catalog: Catalog::new(),
            list_state: ListState::default(),
            should_quit: false,
            toast: None,
            load_started: Instant::now(),
            last_query: String::new(),
            channels,
            pending_sprite: None,
            sprite_url: None,
            sprite: None,
            image_protocol,
            picker,
            clipboard,
        }
    }

    pub fn visible(&self) -> Vec<&CatalogEntry> {
        self.catalog.visible()
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        let idx = self.list_state.selected()?;
        self.catalog.visible().get(idx).copied()
    }

    /// Install finished loads from the worker (non-blocking)
    fn poll_load(&mut self) {
        while let Ok(state) = self.channels.state_rx.try_recv() {
            if let Some(msg) = state.status.failure() {
                log::debug!("Catalog load failed: {}", msg);
            }
            self.catalog.apply(state);
            self.clamp_selection();
            self.request_sprite();
        }
    }

    /// Re-filter when the search text changed since the last frame
    fn sync_query(&mut self) {
        if self.search_input.text == self.last_query {
            return;
        }
        self.last_query = self.search_input.text.clone();
        self.catalog.set_query(&self.last_query);

        let first = (!self.catalog.visible().is_empty()).then_some(0);
        self.list_state.select(first);
        self.request_sprite();
    }

    fn clamp_selection(&mut self) {
        let len = self.catalog.visible().len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(sel) if sel >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            Some(_) => {}
        }
    }

    fn select_by(&mut self, delta: isize) {
        let len = self.catalog.visible().len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.list_state.select(Some(next));
        self.request_sprite();
    }

    fn select_first(&mut self) {
        if !self.catalog.visible().is_empty() {
            self.list_state.select(Some(0));
            self.request_sprite();
        }
    }

    fn select_last(&mut self) {
        let len = self.catalog.visible().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
            self.request_sprite();
        }
    }

    /// Ask the sprite worker for the selected entry's sprite.
    /// The previous sprite stays on screen until the new one arrives.
    fn request_sprite(&mut self) {
        if self.picker.is_none() {
            return;
        }
        let url = self.selected_entry().and_then(|e| e.image_ref.clone());
        let Some(url) = url else {
            self.pending_sprite = None;
            self.sprite_url = None;
            self.sprite = None;
            return;
        };

        if self.sprite_url.as_ref() == Some(&url) || self.pending_sprite.as_ref() == Some(&url) {
            return;
        }
        self.pending_sprite = Some(url.clone());
        if self.channels.sprite_tx.send(SpriteRequest { url }).is_err() {
            log::debug!("Sprite worker is gone, sprites disabled");
            self.pending_sprite = None;
            self.picker = None;
        }
    }

    fn poll_sprites(&mut self) {
        while let Ok(resp) = self.channels.sprite_rx.try_recv() {
            // Ignore sprites for entries no longer selected
            if self.pending_sprite.as_ref() != Some(&resp.url) {
                continue;
            }
            self.pending_sprite = None;
            self.sprite = match (&self.picker, resp.bytes) {
                (Some(picker), Some(bytes)) => decode_image(&bytes, picker),
                _ => None,
            };
            self.sprite_url = Some(resp.url);
        }
    }

    fn reload(&mut self) {
        if self.catalog.status().is_loading() {
            return;
        }
        if self.channels.reload_tx.send(()).is_err() {
            self.toast = Some(Toast::error(
                "Loader is not running".to_string(),
                Duration::from_secs(2),
            ));
            return;
        }
        self.catalog.begin_reload();
        self.load_started = Instant::now();
    }

    /// Copy selected entry's name to clipboard
    fn copy_selected(&mut self) {
        let Some(name) = self.selected_entry().map(|e| e.name.clone()) else {
            return;
        };

        let toast = match self
            .clipboard
            .as_mut()
            .map(|clipboard| clipboard.set_text(&name).is_ok())
        {
            Some(true) => {
                Toast::new(format!("Copied: {}", name), Duration::from_secs(2))
            }
            Some(false) => Toast::error(
                "Failed to copy to clipboard".to_string(),
                Duration::from_secs(2),
            ),
            None => Toast::error(
                "Clipboard not available".to_string(),
                Duration::from_secs(2),
            ),
        };
        self.toast = Some(toast);
    }

    fn update_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    /// Handle input event (mouse scroll handled separately in run_loop)
    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.should_quit = true,
            // Esc clears the query first, quits on an empty one
            (KeyCode::Esc, _) if !self.search_input.text.is_empty() => self.search_input.clear(),
            (KeyCode::Esc, _) => self.should_quit = true,
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => self.reload(),
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::CONTROL) => self.select_by(-1),
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::CONTROL) => self.select_by(1),
            (KeyCode::PageUp, _) | (KeyCode::Char('b'), KeyModifiers::CONTROL) => {
                self.select_by(-(PAGE as isize))
            }
            (KeyCode::PageDown, _) | (KeyCode::Char('f'), KeyModifiers::CONTROL) => {
                self.select_by(PAGE as isize)
            }
            (KeyCode::Home, _) => self.select_first(),
            (KeyCode::End, _) => self.select_last(),
            (KeyCode::Enter, _) => self.copy_selected(),
            _ => {
                self.search_input.handle_key(key.code, key.modifiers);
            }
        }
    }

    /// One frame of background work: apply input, then drain workers
    fn tick(&mut self) {
        self.sync_query();
        self.update_toast();
        self.poll_load();
        self.poll_sprites();
    }
}

/// Run the browser until the user quits
pub fn run(config: CatalogConfig, images: bool) -> Result<()> {
    enable_raw_mode()?;
    restoring(|| run_in_terminal(config, images), restore_terminal)
}

/// Run `body`, then `restore` whether or not `body` failed.
/// The body's error wins over a restore error.
fn restoring<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn run_in_terminal(config: CatalogConfig, images: bool) -> Result<()> {
    execute!(
        io::stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        SetCursorStyle::BlinkingBar
    )?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, images);
    run_loop(&mut terminal, &mut app)
}

fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode();
    execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        SetCursorStyle::DefaultUserShape,
        Show
    )?;
    raw?;
    Ok(())
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // ~60Hz is plenty for a list browser
    const FRAME_TIME: Duration = Duration::from_micros(16_667);

    loop {
        let frame_start = Instant::now();

        // Drain all pending events first (lowest latency for input)
        let mut scroll_delta: isize = 0;
        let mut events_processed = 0usize;
        while event::poll(Duration::from_millis(0))? && events_processed < 100 {
            let ev = event::read()?;
            match &ev {
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => scroll_delta += 1,
                    MouseEventKind::ScrollUp => scroll_delta -= 1,
                    _ => {}
                },
                _ => app.handle_event(ev),
            }
            events_processed += 1;
            if app.should_quit {
                break;
            }
        }

        if app.should_quit {
            break;
        }

        if scroll_delta != 0 {
            app.select_by(scroll_delta.clamp(-10, 10));
        }

        app.tick();

        terminal.draw(|f| ui::render(f, app))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - elapsed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use rotomdex_catalog::LoadReport;

    struct Harness {
        app: App,
        state_tx: Sender<LoadState>,
        reload_rx: Receiver<()>,
        sprite_req_rx: Receiver<SpriteRequest>,
        sprite_resp_tx: Sender<SpriteResponse>,
    }

    fn harness() -> Harness {
        let (reload_tx, reload_rx) = mpsc::channel();
        let (state_tx, state_rx) = mpsc::channel();
        let (sprite_tx, sprite_req_rx) = mpsc::channel();
        let (sprite_resp_tx, sprite_rx) = mpsc::channel();
        let channels = Channels {
            reload_tx,
            state_rx,
            sprite_tx,
            sprite_rx,
        };
        Harness {
            app: App::from_parts(channels, ImageProtocol::None, None, None),
            state_tx,
            reload_rx,
            sprite_req_rx,
            sprite_resp_tx,
        }
    }

    /// Harness whose app draws sprites with the halfblocks protocol
    fn harness_with_sprites() -> Harness {
        let mut h = harness();
        h.app.image_protocol = ImageProtocol::Supported;
        h.app.picker = Some(Picker::from_fontsize((8, 16)));
        h
    }

    fn with_sprites(names: &[&str]) -> LoadState {
        let mut state = ready(names);
        for entry in &mut state.entries {
            entry.image_ref = Some(format!("http://sprites/{}.png", entry.name));
        }
        state
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0xf1, 0x22, 0x28, 0xff]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn ready(names: &[&str]) -> LoadState {
        let entries: Vec<_> = names.iter().map(|n| CatalogEntry::new(*n)).collect();
        let report = LoadReport {
            requested: entries.len(),
            loaded: entries.len(),
            failures: Vec::new(),
        };
        LoadState::ready(entries, report)
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_event(Event::Key(KeyEvent::new(code, modifiers)));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    fn visible_names(app: &App) -> Vec<String> {
        app.visible().iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_load_selects_first_entry() {
        let mut h = harness();
        assert!(h.app.catalog.status().is_loading());
        assert!(h.app.selected_entry().is_none());

        h.state_tx.send(ready(&["bulbasaur", "ivysaur"])).unwrap();
        h.app.tick();

        assert!(h.app.catalog.status().is_ready());
        assert_eq!(h.app.selected_entry().unwrap().name, "bulbasaur");
    }

    #[test]
    fn test_typing_filters_and_resets_selection() {
        let mut h = harness();
        h.state_tx
            .send(ready(&["bulbasaur", "charmander", "charizard", "pikachu"]))
            .unwrap();
        h.app.tick();
        press(&mut h.app, KeyCode::Down, KeyModifiers::NONE);
        press(&mut h.app, KeyCode::Down, KeyModifiers::NONE);
        press(&mut h.app, KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(h.app.selected_entry().unwrap().name, "pikachu");

        type_text(&mut h.app, "CHAR");
        h.app.tick();

        assert_eq!(visible_names(&h.app), vec!["charmander", "charizard"]);
        assert_eq!(h.app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_no_match_clears_selection() {
        let mut h = harness();
        h.state_tx.send(ready(&["eevee"])).unwrap();
        h.app.tick();

        type_text(&mut h.app, "zzz");
        h.app.tick();

        assert!(h.app.visible().is_empty());
        assert!(h.app.selected_entry().is_none());
        press(&mut h.app, KeyCode::Down, KeyModifiers::NONE);
        assert!(h.app.list_state.selected().is_none());
    }

    #[test]
    fn test_esc_clears_query_then_quits() {
        let mut h = harness();
        h.state_tx.send(ready(&["pikachu", "eevee"])).unwrap();
        h.app.tick();
        type_text(&mut h.app, "pika");
        h.app.tick();
        assert_eq!(h.app.visible().len(), 1);

        press(&mut h.app, KeyCode::Esc, KeyModifiers::NONE);
        h.app.tick();
        assert!(!h.app.should_quit);
        assert_eq!(h.app.visible().len(), 2);

        press(&mut h.app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(h.app.should_quit);
    }

    #[test]
    fn test_selection_clamps_at_edges() {
        let mut h = harness();
        h.state_tx.send(ready(&["a", "b", "c"])).unwrap();
        h.app.tick();

        press(&mut h.app, KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(h.app.list_state.selected(), Some(0));
        press(&mut h.app, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(h.app.list_state.selected(), Some(2));
        press(&mut h.app, KeyCode::Home, KeyModifiers::NONE);
        assert_eq!(h.app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_reload_keeps_entries_and_reapplies_query() {
        let mut h = harness();
        h.state_tx.send(ready(&["pikachu", "raichu"])).unwrap();
        h.app.tick();
        type_text(&mut h.app, "chu");
        h.app.tick();

        press(&mut h.app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(h.reload_rx.try_recv().is_ok());
        assert!(h.app.catalog.status().is_loading());
        assert_eq!(h.app.visible().len(), 2);

        // A second request while loading is ignored
        press(&mut h.app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(h.reload_rx.try_recv().is_err());

        h.state_tx.send(ready(&["pichu", "eevee"])).unwrap();
        h.app.tick();
        assert_eq!(visible_names(&h.app), vec!["pichu"]);
        assert_eq!(h.app.selected_entry().unwrap().name, "pichu");
    }

    #[test]
    fn test_failed_load_shows_nothing() {
        let mut h = harness();
        h.state_tx
            .send(LoadState::failed("index down", LoadReport::default()))
            .unwrap();
        h.app.tick();

        assert_eq!(h.app.catalog.status().failure(), Some("index down"));
        assert!(h.app.visible().is_empty());
        assert!(h.app.selected_entry().is_none());
    }

    #[test]
    fn test_copy_without_clipboard_reports_error() {
        let mut h = harness();
        h.state_tx.send(ready(&["eevee"])).unwrap();
        h.app.tick();

        press(&mut h.app, KeyCode::Enter, KeyModifiers::NONE);
        let toast = h.app.toast.as_ref().unwrap();
        assert!(toast.is_error);
        assert_eq!(toast.message, "Clipboard not available");
    }

    #[test]
    fn test_failed_reload_keeps_list() {
        let mut h = harness();
        h.state_tx.send(ready(&["pikachu", "raichu"])).unwrap();
        h.app.tick();
        press(&mut h.app, KeyCode::Down, KeyModifiers::NONE);

        press(&mut h.app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        h.state_tx
            .send(LoadState::failed("index down", LoadReport::default()))
            .unwrap();
        h.app.tick();

        assert_eq!(h.app.catalog.status().failure(), Some("index down"));
        assert_eq!(visible_names(&h.app), vec!["pikachu", "raichu"]);
        assert_eq!(h.app.selected_entry().unwrap().name, "raichu");
    }

    #[test]
    fn test_sprite_response_is_decoded_for_selection() {
        let mut h = harness_with_sprites();
        h.state_tx.send(with_sprites(&["pikachu", "eevee"])).unwrap();
        h.app.tick();

        let req = h.sprite_req_rx.try_recv().unwrap();
        assert_eq!(req.url, "http://sprites/pikachu.png");

        // A late answer for another entry is ignored
        h.sprite_resp_tx
            .send(SpriteResponse {
                url: "http://sprites/eevee.png".into(),
                bytes: Some(png_bytes()),
            })
            .unwrap();
        h.app.tick();
        assert!(h.app.sprite.is_none());

        h.sprite_resp_tx
            .send(SpriteResponse {
                url: req.url,
                bytes: Some(png_bytes()),
            })
            .unwrap();
        h.app.tick();
        assert!(h.app.sprite.is_some());

        // Same sprite is not requested twice
        press(&mut h.app, KeyCode::Down, KeyModifiers::NONE);
        press(&mut h.app, KeyCode::Up, KeyModifiers::NONE);
        let next = h.sprite_req_rx.try_recv().unwrap();
        assert_eq!(next.url, "http://sprites/eevee.png");
        assert!(h.sprite_req_rx.try_recv().is_err());
    }

    #[test]
    fn test_sprites_disabled_when_worker_is_gone() {
        let Harness {
            mut app,
            state_tx,
            sprite_req_rx,
            ..
        } = harness_with_sprites();
        drop(sprite_req_rx);

        state_tx.send(with_sprites(&["pikachu", "eevee"])).unwrap();
        app.tick();

        assert!(app.picker.is_none());
        assert!(app.pending_sprite.is_none());
        press(&mut app, KeyCode::Down, KeyModifiers::NONE);
        assert!(app.pending_sprite.is_none());
    }

    #[test]
    fn test_restoring_runs_after_failed_body() {
        let mut restored = false;
        let result: Result<()> = restoring(
            || anyhow::bail!("terminal setup failed"),
            || {
                restored = true;
                Ok(())
            },
        );

        assert!(restored);
        assert_eq!(result.unwrap_err().to_string(), "terminal setup failed");
    }

    #[test]
    fn test_restoring_reports_restore_error() {
        let result = restoring(|| Ok(7), || anyhow::bail!("restore failed"));
        assert_eq!(result.unwrap_err().to_string(), "restore failed");
    }
}
