use mv_app::UseCases;

/// Shared handler state. Cloned per request; the use cases are behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub use_cases: UseCases,
}

impl AppState {
    pub fn new(use_cases: UseCases) -> Self {
        Self { use_cases }
    }
}
