//! Small dense numeric toolkit shared by independence testing and estimation.

pub mod combinations;
pub mod ols;
pub mod summary;

pub use combinations::Combinations;
pub use ols::{ols, OlsFit};
pub use summary::{correlation_matrix, mean, precision_matrix, quantile_sorted, variance};
