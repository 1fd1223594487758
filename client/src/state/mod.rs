//! Client-side state modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! The wizard's domain state is `wizard::WizardState`, provided as an
//! `RwSignal` by the app root. This module only holds presentation state the
//! wizard model does not know about.

pub mod ui;
