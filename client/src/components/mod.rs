//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render one wizard stage or overlay each, reading shared state
//! from Leptos context and reporting user intent through callbacks. Backend
//! calls stay in `pages::wizard`.

pub mod error_banner;
pub mod image_editor;
pub mod loading_overlay;
pub mod result_panel;
pub mod review_panel;
pub mod stage_progress;
pub mod upload_panel;
