//! Optional capability detection (e.g. enterprise licensing).

/// Process-wide capability query.
///
/// Has no effect on algorithm behavior; callers use it only to report
/// what is available.
pub trait CapabilityProvider: Send + Sync {
    /// Whether extended capabilities are licensed.
    fn is_licensed(&self) -> bool;

    /// Names of the licensed extended features.
    fn features(&self) -> Vec<String>;
}
