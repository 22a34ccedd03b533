//! # service-builder-core
//!
//! The parsed representation of a service-builder model definition file.
//!
//! An [`Application`](types::Application) owns its models in declaration
//! order. Each [`Model`](types::Model) carries ordered fields plus optional
//! pagination and REST action settings. Downstream generators consume these
//! values; nothing in this crate reads source text.

pub mod types;
