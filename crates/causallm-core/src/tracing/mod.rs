//! Observability for CausalLLM.
//! `tracing` with an `EnvFilter` read from `CAUSALLM_LOG`.

pub mod setup;

pub use setup::init_tracing;
