use crate::Result;
use async_trait::async_trait;
use report_protocol::AddressSuggestion;
use std::collections::HashMap;

/// Provider of the candidate addresses for a district.
#[async_trait]
pub trait DistrictAccountSource: Send + Sync {
    async fn district_accounts(&self, district: &str) -> Result<Vec<AddressSuggestion>>;
}

/// In-memory accounts keyed by district. Unknown districts have no accounts.
#[derive(Debug, Clone, Default)]
pub struct StaticAccountSource {
    accounts: HashMap<String, Vec<AddressSuggestion>>,
}

impl StaticAccountSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_district(
        mut self,
        district: impl Into<String>,
        accounts: Vec<AddressSuggestion>,
    ) -> Self {
        self.accounts.insert(district.into(), accounts);
        self
    }
}

#[async_trait]
impl DistrictAccountSource for StaticAccountSource {
    async fn district_accounts(&self, district: &str) -> Result<Vec<AddressSuggestion>> {
        Ok(self.accounts.get(district).cloned().unwrap_or_default())
    }
}
