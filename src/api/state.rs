use std::sync::Arc;

use crate::briefing::BriefingService;
use crate::campus::CampusDirectory;
use crate::models::Language;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BriefingService>,
    pub campuses: Arc<CampusDirectory>,
    pub default_language: Language,
}
