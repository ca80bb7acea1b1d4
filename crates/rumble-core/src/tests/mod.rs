//! Controller behaviour tests against a scripted world.
//!
//! - `helpers.rs`: [`ScriptedWorld`](helpers::ScriptedWorld) and factories
//! - `integration.rs`: state machine, ground probe, impacts and observers
//! - `determinism.rs`: identical intent scripts produce identical traffic

pub(crate) mod helpers;
