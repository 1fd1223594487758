//! Root application component with routing and context providers.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use wizard::config::DEFAULT_ORIGIN;
use wizard::{BackendConfig, WizardState};

use crate::pages::wizard::WizardPage;
use crate::state::ui::UiState;

/// Backend configuration baked in at build time.
///
/// `KEYCHAIN_BACKEND_ORIGIN` overrides the default local origin; an invalid
/// value falls back to the default with a warning.
pub fn backend_config() -> BackendConfig {
    config_from_origin(option_env!("KEYCHAIN_BACKEND_ORIGIN"))
}

fn config_from_origin(origin: Option<&str>) -> BackendConfig {
    let origin = origin.unwrap_or(DEFAULT_ORIGIN);
    match BackendConfig::new(origin) {
        Ok(config) => config,
        Err(e) => {
            leptos::logging::warn!("{e}; using {DEFAULT_ORIGIN}");
            BackendConfig::default()
        }
    }
}

/// Root application component.
///
/// Provides the wizard state, UI state, and backend configuration as context.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    provide_context(RwSignal::new(WizardState::new()));
    provide_context(RwSignal::new(UiState::default()));
    provide_context(backend_config());

    view! {
        <Title text="3D KeyChain Maker"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=WizardPage/>
            </Routes>
        </Router>
    }
}
