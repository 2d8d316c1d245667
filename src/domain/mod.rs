// Domain layer: migration records, the ports the orchestrator talks through, and pure rules.

pub mod model;
pub mod ports;
pub mod services;
