// Library surface for the binary, headless drivers and integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod game;
pub mod geometry;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod transition;
pub mod ui;
pub mod util;
