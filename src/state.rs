use crate::chart::Figure;
use crate::models::Analysis;
use std::sync::Arc;

/// Read-only results shared with the chart handlers
#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<Analysis>,
    pub figure: Arc<Figure>,
}

impl AppState {
    pub fn new(analysis: Analysis, figure: Figure) -> Self {
        Self {
            analysis: Arc::new(analysis),
            figure: Arc::new(figure),
        }
    }
}
