pub mod app;
pub mod config;
pub mod error;
pub mod keybinding;
pub mod session;
pub mod shell;
pub mod theme;

pub use app::{App, Dispatch, Event};
pub use error::{Error, Result};
