//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (files, object URLs, image
//! loading, downloads, pointer mapping) from page and component logic.

pub mod canvas_input;
pub mod files;
pub mod image_load;
