//! Campaign Engine — data-driven interactive narrative.
//!
//! Loads declaratively authored campaign packs (a graph of scenes joined
//! by labeled choices), validates their structure, and exposes a
//! navigable session over the scene graph. A companion dice engine
//! parses and rolls tabletop formulas such as `2d6+1`.

pub mod core;
pub mod schema;
