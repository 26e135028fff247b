use report_protocol::AddressSuggestion;

/// Candidate addresses for one district, queried by case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct SuggestionIndex {
    entries: Vec<AddressSuggestion>,
    // Lowercased service addresses, parallel to `entries`.
    folded: Vec<String>,
}

impl SuggestionIndex {
    pub fn new(entries: Vec<AddressSuggestion>) -> Self {
        let folded = entries
            .iter()
            .map(|entry| entry.service_address.to_lowercase())
            .collect();
        Self { entries, folded }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AddressSuggestion] {
        &self.entries
    }

    /// Entries whose service address contains `text`, in index order, at most `limit`.
    pub fn query(&self, text: &str, limit: usize) -> Vec<AddressSuggestion> {
        let needle = text.to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        self.entries
            .iter()
            .zip(&self.folded)
            .filter(|(_, folded)| folded.contains(&needle))
            .map(|(entry, _)| entry.clone())
            .take(limit)
            .collect()
    }
}
