//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with model status and session summary
//! - Lifestyle form input
//! - Prediction result with recommendation
//! - Session history charts

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::ObescanTheme;
