// Module declarations
mod app;
pub mod components;
pub mod creator;
pub mod developer;
pub mod landing;
pub mod utils;
pub mod views;
// Re-exports for external use
pub use app::{App, Portal, UIConfig, run};
