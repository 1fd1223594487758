//! Networking for the generation backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` implements `wizard::Backend` over `gloo-net`. Envelope parsing and
//! endpoint layout come from the `wizard` crate so the CLI speaks the same
//! protocol.

pub mod api;
