pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod models;
pub mod preview;
pub mod render;
pub mod view;

pub use cli::*;
pub use config::AppConfig;
pub use controller::{HealthTicket, PredictTicket, ViewController, ViewState};
pub use models::*;
pub use preview::{PreviewHandle, PreviewStore};
pub use view::{PredictionRow, ResultsView};
