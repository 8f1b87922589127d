mod analyze;
mod health;
mod models;

pub use analyze::analyze_model;
pub use health::health;
pub use models::{add_model, get_all_models, get_model};
