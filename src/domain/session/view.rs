//! Authenticated app views.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main view shown to a logged-in visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppView {
    #[default]
    Dashboard,
    Lab,
    Subscription,
}

impl AppView {
    /// Header title for the view.
    pub fn title(&self) -> &'static str {
        match self {
            AppView::Dashboard => "Operations Center",
            AppView::Lab => "Regimen Generator",
            AppView::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for AppView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppView::Dashboard => "dashboard",
            AppView::Lab => "lab",
            AppView::Subscription => "subscription",
        };
        write!(f, "{}", s)
    }
}
