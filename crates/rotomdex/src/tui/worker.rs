//! Background threads feeding the browser

use rotomdex_catalog::{CatalogConfig, CatalogLoader, HttpSource, LoadState};
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Request to download the sprite at `url`
#[derive(Debug)]
pub struct SpriteRequest {
    pub url: String,
}

/// Downloaded sprite, `None` when the download failed
#[derive(Debug)]
pub struct SpriteResponse {
    pub url: String,
    pub bytes: Option<Vec<u8>>,
}

/// Runs the initial load, then one load per reload request.
///
/// Reload requests that arrive while a load is running collapse into a single
/// follow-up load. The thread exits when either channel is closed.
pub fn spawn_load_worker(
    config: CatalogConfig,
    reload_rx: Receiver<()>,
    state_tx: Sender<LoadState>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let loader = match CatalogLoader::from_config(&config) {
            Ok(loader) => loader,
            Err(e) => {
                let _ = state_tx.send(LoadState::failed(e.describe(), Default::default()));
                return;
            }
        };

        loop {
            log::debug!("Loading {} entries from {}", config.limit, config.index_url());
            if state_tx.send(loader.load(config.limit)).is_err() {
                return;
            }

            if reload_rx.recv().is_err() {
                return;
            }
            while reload_rx.try_recv().is_ok() {}
        }
    })
}

/// Downloads sprites on demand, keeping only the latest pending request
pub fn spawn_sprite_worker(
    config: CatalogConfig,
    req_rx: Receiver<SpriteRequest>,
    resp_tx: Sender<SpriteResponse>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let source = match HttpSource::new(&config) {
            Ok(source) => source,
            Err(e) => {
                log::debug!("Sprite worker disabled: {}", e);
                return;
            }
        };

        while let Ok(mut req) = req_rx.recv() {
            while let Ok(next) = req_rx.try_recv() {
                req = next;
            }

            let bytes = source
                .fetch_bytes(&req.url)
                .inspect_err(|e| log::debug!("Failed to fetch sprite {}: {}", req.url, e))
                .ok();

            if resp_tx.send(SpriteResponse { url: req.url, bytes }).is_err() {
                return;
            }
        }
    })
}
