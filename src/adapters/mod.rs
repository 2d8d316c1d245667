// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod azure;
pub mod http;
pub mod openai;
pub mod storage;
