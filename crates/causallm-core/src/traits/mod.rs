//! Trait seams between the core algorithms and their collaborators.

pub mod cancellation;
pub mod capability;
pub mod independence;
pub mod oracle;

pub use cancellation::{Cancellable, CancellationToken};
pub use capability::CapabilityProvider;
pub use independence::IndependenceTest;
pub use oracle::{
    CausalOracle, NoOracle, OracleQuestion, OracleRequest, OracleResponse, Orientation,
    ProposedEdge, VariableDescriptor,
};
