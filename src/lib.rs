// Library root
// -----------
// This crate exposes the pieces of the card helper as a library so the
// session loop can be tested without a terminal. The binary (`main.rs`) only
// wires the real terminal and tools together.
//
// Module responsibilities:
// - `lookup`, `audio`, `browser`, `picture`: adapters around the external
//   translation tool, the text-to-speech download, the browser and the
//   picture answer. `fetch` holds the download helpers they share.
// - `api`: the AnkiConnect client and note building.
// - `draft`: the card being built for one word.
// - `editor` and `ui`: prompts and field editing.
// - `toolkit` and `session`: the seam over all side effects and the loop
//   that drives one card per word.
pub mod api;
pub mod audio;
pub mod browser;
pub mod config;
pub mod draft;
pub mod editor;
pub mod error;
pub mod fetch;
pub mod lookup;
pub mod picture;
pub mod session;
pub mod toolkit;
pub mod ui;
