//! 终端界面

pub mod render;
pub mod terminal;

pub use terminal::TerminalPresenter;
