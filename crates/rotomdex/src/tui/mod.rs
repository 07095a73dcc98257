//! Interactive catalog browser
//!
//! Architecture:
//! - Main thread: input handling, filtering and rendering
//! - Load worker: runs the catalog loader (initial load and reloads)
//! - Sprite worker: downloads the selected entry's sprite
//! - Communication via mpsc channels
//!
//! Layout:
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ RotomDex                                                  │
//! ├───────────────────────────────────────────────────────────┤
//! │ Search: [char_______]                                     │
//! ├──────────────────────────────────┬────────────────────────┤
//! │ #004 charmander  FIRE            │ charmander  #004       │
//! │ #005 charmeleon  FIRE            │ FIRE                   │
//! │ #006 charizard   FIRE FLYING     │ 0.6 m · 8.5 kg         │
//! │                                  │ [sprite]               │
//! ├──────────────────────────────────┴────────────────────────┤
//! │ 3 / 151 │ 151 of 151 loaded │ ↑↓ select │ Esc quit         │
//! └───────────────────────────────────────────────────────────┘
//! ```

mod app;
mod image;
mod input;
mod ui;
mod worker;

pub use app::run;
