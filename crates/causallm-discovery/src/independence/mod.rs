//! Conditional-independence tests.
//!
//! Each test returns a raw `TestStatistic`; applying a significance
//! threshold is the caller's job (`IndependenceResult::judge`).

pub mod contingency;
pub mod partial_correlation;

pub use contingency::{ChiSquaredTest, GTest};
pub use partial_correlation::FisherZTest;

use tracing::debug;

use causallm_core::config::CiTestSelection;
use causallm_core::errors::InsufficientDataError;
use causallm_core::models::{Dataset, IndependenceResult, TestStatistic, Variable};
use causallm_core::traits::IndependenceTest;

/// Picks a concrete test from the variable kinds and the configured selection.
///
/// `Auto` uses the G-test when every involved variable is categorical and
/// partial correlation otherwise. A contingency test requested for
/// continuous variables falls back to partial correlation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalIndependenceTest {
    selection: CiTestSelection,
}

impl ConditionalIndependenceTest {
    pub fn new(selection: CiTestSelection) -> Self {
        Self { selection }
    }

    pub fn selection(&self) -> CiTestSelection {
        self.selection
    }

    /// Run the test and judge it at `alpha`.
    pub fn judge(
        &self,
        x: &Variable,
        y: &Variable,
        conditioning_set: &[&Variable],
        data: &Dataset,
        alpha: f64,
    ) -> Result<IndependenceResult, InsufficientDataError> {
        let raw = self.test(x, y, conditioning_set, data)?;
        let names: Vec<&str> = conditioning_set.iter().map(|v| v.name()).collect();
        Ok(IndependenceResult::judge(x.name(), y.name(), &names, &raw, alpha))
    }
}

impl IndependenceTest for ConditionalIndependenceTest {
    fn test(
        &self,
        x: &Variable,
        y: &Variable,
        conditioning_set: &[&Variable],
        data: &Dataset,
    ) -> Result<TestStatistic, InsufficientDataError> {
        let all_categorical = x.is_categorical()
            && y.is_categorical()
            && conditioning_set.iter().all(|v| v.is_categorical());

        match (self.selection, all_categorical) {
            (CiTestSelection::Auto | CiTestSelection::GTest, true) => {
                GTest.test(x, y, conditioning_set, data)
            }
            (CiTestSelection::ChiSquared, true) => ChiSquaredTest.test(x, y, conditioning_set, data),
            (CiTestSelection::GTest | CiTestSelection::ChiSquared, false) => {
                debug!(x = x.name(), y = y.name(), "contingency test needs categorical data, using partial correlation");
                FisherZTest.test(x, y, conditioning_set, data)
            }
            (CiTestSelection::Auto | CiTestSelection::PartialCorrelation, _) => {
                FisherZTest.test(x, y, conditioning_set, data)
            }
        }
    }
}
