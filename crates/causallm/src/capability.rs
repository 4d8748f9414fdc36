//! Optional-capability reporting.

use serde::{Deserialize, Serialize};

use causallm_core::traits::CapabilityProvider;

/// The open-source build: nothing extended is licensed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommunityEdition;

impl CapabilityProvider for CommunityEdition {
    fn is_licensed(&self) -> bool {
        false
    }

    fn features(&self) -> Vec<String> {
        Vec::new()
    }
}

/// What `enterprise_info` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterpriseInfo {
    pub licensed: bool,
    pub features: Vec<String>,
    pub info: String,
}

impl EnterpriseInfo {
    pub fn from_provider(provider: &dyn CapabilityProvider) -> Self {
        let licensed = provider.is_licensed();
        Self {
            licensed,
            features: if licensed { provider.features() } else { Vec::new() },
            info: if licensed {
                "extended capabilities are available".to_string()
            } else {
                "extended capabilities are not available in this build".to_string()
            },
        }
    }
}
