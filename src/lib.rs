// Library surface for headless/integration tests and reuse.
// The binary in main.rs only owns the terminal and the CLI.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod history;
pub mod leaderboard;
pub mod logging;
pub mod passages;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod store;
pub mod ui;
