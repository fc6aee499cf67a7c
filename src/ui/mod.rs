//! Ratatui front-end. The app is a frame-driven state machine: each frame
//! samples the directional input once, advances the current mode (list,
//! rename, save, notice), draws, and waits for the next tick.

mod app;
mod forms;
mod helpers;
pub mod input;
mod screens;
mod terminal;

pub use app::App;
pub use forms::EditError;
pub use screens::WINDOW_SIZE;
pub use terminal::{drive, run_app, FrameClock, IntervalClock};
