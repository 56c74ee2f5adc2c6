mod app;
pub mod cli;
pub mod library;
pub mod logging;
pub mod session;
pub mod settings;
pub mod slideshow;

pub use app::App;
