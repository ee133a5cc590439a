// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod config;
pub mod flash;
pub mod game;
pub mod generator;
pub mod logging;
pub mod runtime;
pub mod scorer;
pub mod session;
pub mod setup;
pub mod ui;
