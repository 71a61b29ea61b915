use crate::i18n::Catalog;
use crate::settings::SiteSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Active,
    Inactive,
}

impl SchedulerState {
    pub fn label(&self) -> &'static str {
        match self {
            SchedulerState::Active => "Active",
            SchedulerState::Inactive => "Inactive",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SchedulerState::Active => "green",
            SchedulerState::Inactive => "red",
        }
    }
}

/// The scheduler runs for a site only when nothing switches it off:
/// not globally disabled, not in maintenance, not paused, and enabled
/// in the site's settings.
pub fn is_scheduler_inactive(disabled_globally: bool, settings: &SiteSettings) -> bool {
    disabled_globally
        || settings.maintenance_mode
        || settings.pause_scheduler
        || !settings.enable_scheduler
}

pub fn scheduler_state(disabled_globally: bool, settings: &SiteSettings) -> SchedulerState {
    if is_scheduler_inactive(disabled_globally, settings) {
        SchedulerState::Inactive
    } else {
        SchedulerState::Active
    }
}

/// `[label, color]`, label translated for `lang`.
pub fn status_pair(state: SchedulerState, catalog: &Catalog, lang: &str) -> [String; 2] {
    [
        catalog.translate(lang, state.label()).to_string(),
        state.color().to_string(),
    ]
}
