use crate::{
    AddressConfig, DebouncedQuery, DistrictAccountSource, DistrictCatalog, Result,
    SuggestionIndex,
};
use log::{debug, info, warn};
use report_protocol::{Address, AddressSuggestion};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistrictLoadState {
    Idle,
    Loading,
    Error(String),
}

/// Address fields that can be edited without side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Line2,
    City,
    State,
    Zip,
}

/// Published after every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressSnapshot {
    pub address: Address,
    pub suggestions: Vec<AddressSuggestion>,
    pub suggestions_visible: bool,
    pub district_load_state: DistrictLoadState,
    pub district_account_count: usize,
}

struct AddressState {
    address: Address,
    accounts: SuggestionIndex,
    suggestions: Vec<AddressSuggestion>,
    suggestions_visible: bool,
    load_state: DistrictLoadState,
    // Bumped whenever the account set is invalidated; a load only applies if
    // its generation is still current.
    load_generation: u64,
}

impl AddressState {
    fn initial(load_generation: u64) -> Self {
        Self {
            address: Address::default(),
            accounts: SuggestionIndex::empty(),
            suggestions: Vec::new(),
            suggestions_visible: false,
            load_state: DistrictLoadState::Idle,
            load_generation,
        }
    }

    fn snapshot(&self) -> AddressSnapshot {
        AddressSnapshot {
            address: self.address.clone(),
            suggestions: self.suggestions.clone(),
            suggestions_visible: self.suggestions_visible,
            district_load_state: self.load_state.clone(),
            district_account_count: self.accounts.len(),
        }
    }

    fn invalidate_accounts(&mut self) -> u64 {
        self.accounts = SuggestionIndex::empty();
        self.load_generation += 1;
        self.load_generation
    }
}

/// Owns the address being reported and keeps it consistent with the selected
/// district and its account set.
///
/// District loads and debounced queries run as Tokio tasks, so mutating
/// operations must be called from within a runtime. Dropping the controller
/// cancels the pending query and aborts any in-flight load.
pub struct AddressResolutionController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: AddressConfig,
    catalog: Arc<DistrictCatalog>,
    source: Arc<dyn DistrictAccountSource>,
    state: Mutex<AddressState>,
    debounce: DebouncedQuery,
    load_task: Mutex<Option<JoinHandle<()>>>,
    changes: watch::Sender<AddressSnapshot>,
}

impl AddressResolutionController {
    pub fn new(
        source: Arc<dyn DistrictAccountSource>,
        catalog: Arc<DistrictCatalog>,
        config: AddressConfig,
    ) -> Self {
        let state = AddressState::initial(0);
        let (changes, _) = watch::channel(state.snapshot());
        Self {
            inner: Arc::new(ControllerInner {
                debounce: DebouncedQuery::new(config.debounce()),
                config,
                catalog,
                source,
                state: Mutex::new(state),
                load_task: Mutex::new(None),
                changes,
            }),
        }
    }

    pub fn with_defaults(source: Arc<dyn DistrictAccountSource>) -> Self {
        Self::new(
            source,
            Arc::new(DistrictCatalog::builtin()),
            AddressConfig::default(),
        )
    }

    pub fn catalog(&self) -> &DistrictCatalog {
        &self.inner.catalog
    }

    pub fn config(&self) -> &AddressConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn snapshot(&self) -> AddressSnapshot {
        self.inner.lock_state().snapshot()
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.inner.lock_state().address.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AddressSnapshot> {
        self.inner.changes.subscribe()
    }

    pub fn is_query_pending(&self) -> bool {
        self.inner.debounce.is_pending()
    }

    /// Select a district by catalog key, or unset it with `""`. Keys the
    /// catalog does not know are ignored.
    pub fn set_district(&self, value: &str) {
        let load = {
            let mut state = self.inner.lock_state();
            if state.address.district == value {
                return;
            }
            if !value.is_empty() && !self.inner.catalog.contains(value) {
                warn!("Ignoring unknown district {value:?}");
                return;
            }
            self.inner.debounce.cancel();

            let previous = std::mem::replace(&mut state.address.district, value.to_string());
            state.address.line1.clear();
            state.suggestions.clear();
            state.suggestions_visible = false;
            apply_district_defaults(&self.inner.catalog, &mut state.address, &previous, value);

            let generation = state.invalidate_accounts();
            let load = if value.is_empty() {
                state.load_state = DistrictLoadState::Idle;
                None
            } else {
                state.load_state = DistrictLoadState::Loading;
                Some(generation)
            };
            self.inner.publish(&state);
            load
        };

        match load {
            Some(generation) => self.spawn_district_load(value.to_string(), generation),
            None => self.inner.abort_district_load(),
        }
    }

    pub fn set_address_line1(&self, text: &str) {
        let min_chars = self.inner.config.min_query_chars.max(1);
        let qualifies = text.chars().count() >= min_chars;
        if !qualifies {
            self.inner.debounce.cancel();
        }

        {
            let mut state = self.inner.lock_state();
            state.address.line1 = text.to_string();
            if !qualifies {
                state.suggestions.clear();
                state.suggestions_visible = false;
            }
            self.inner.publish(&state);
        }

        if qualifies {
            let weak = Arc::downgrade(&self.inner);
            let query = text.to_string();
            debug!("Scheduling address query {query:?}");
            self.inner.debounce.schedule(async move {
                if let Some(inner) = weak.upgrade() {
                    inner.run_query(&query);
                }
            });
        }
    }

    pub fn select_suggestion(&self, suggestion: &AddressSuggestion) {
        self.inner.debounce.cancel();

        let load = {
            let mut state = self.inner.lock_state();
            let address = &mut state.address;
            address.line1 = suggestion.service_address.clone();
            overwrite_if_present(&mut address.city, suggestion.city.as_deref());
            overwrite_if_present(&mut address.state, suggestion.state.as_deref());
            overwrite_if_present(&mut address.zip, suggestion.zip.as_deref());

            let mut load = None;
            if let Some(district) = non_empty(suggestion.district.as_deref()) {
                if !self.inner.catalog.contains(district) {
                    warn!("Suggestion names unknown district {district:?}; keeping current district");
                } else if district != state.address.district {
                    state.address.district = district.to_string();
                    let generation = state.invalidate_accounts();
                    state.load_state = DistrictLoadState::Loading;
                    load = Some((district.to_string(), generation));
                }
            }

            state.suggestions.clear();
            state.suggestions_visible = false;
            self.inner.publish(&state);
            load
        };

        if let Some((district, generation)) = load {
            self.spawn_district_load(district, generation);
        }
    }

    pub fn set_field(&self, field: AddressField, value: &str) {
        let mut state = self.inner.lock_state();
        let slot = match field {
            AddressField::Line2 => &mut state.address.line2,
            AddressField::City => &mut state.address.city,
            AddressField::State => &mut state.address.state,
            AddressField::Zip => &mut state.address.zip,
        };
        *slot = value.to_string();
        self.inner.publish(&state);
    }

    /// Hide the dropdown but keep the last suggestion set.
    pub fn dismiss_suggestions(&self) {
        let mut state = self.inner.lock_state();
        state.suggestions_visible = false;
        self.inner.publish(&state);
    }

    /// Show the last suggestion set again, if there is one.
    pub fn reopen_suggestions(&self) {
        let mut state = self.inner.lock_state();
        state.suggestions_visible = !state.suggestions.is_empty();
        self.inner.publish(&state);
    }

    pub fn reset(&self) {
        self.inner.debounce.cancel();
        self.inner.abort_district_load();

        let mut state = self.inner.lock_state();
        let generation = state.load_generation + 1;
        *state = AddressState::initial(generation);
        self.inner.publish(&state);
    }

    fn spawn_district_load(&self, district: String, generation: u64) {
        info!("Loading accounts for district {district}");
        let weak: Weak<ControllerInner> = Arc::downgrade(&self.inner);
        let source = Arc::clone(&self.inner.source);
        let handle = tokio::spawn(async move {
            let result = source.district_accounts(&district).await;
            if let Some(inner) = weak.upgrade() {
                inner.finish_district_load(&district, generation, result);
            }
        });

        if let Some(previous) = self.inner.lock_load_task().replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for AddressResolutionController {
    fn drop(&mut self) {
        self.inner.debounce.cancel();
        self.inner.abort_district_load();
    }
}

impl ControllerInner {
    fn lock_state(&self) -> MutexGuard<'_, AddressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_load_task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.load_task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &AddressState) {
        self.changes.send_replace(state.snapshot());
    }

    fn abort_district_load(&self) {
        if let Some(handle) = self.lock_load_task().take() {
            handle.abort();
        }
    }

    fn run_query(&self, query: &str) {
        let mut state = self.lock_state();
        if state.address.line1 != query {
            debug!("Skipping superseded address query {query:?}");
            return;
        }

        let results = state.accounts.query(query, self.config.max_suggestions);
        debug!(
            "Address query {query:?} matched {} of {} accounts",
            results.len(),
            state.accounts.len()
        );
        state.suggestions = results;
        state.suggestions_visible = true;
        self.publish(&state);
    }

    fn finish_district_load(
        &self,
        district: &str,
        generation: u64,
        result: Result<Vec<AddressSuggestion>>,
    ) {
        let mut state = self.lock_state();
        if state.load_generation != generation || state.address.district != district {
            debug!("Dropping stale account load for district {district}");
            return;
        }

        match result {
            Ok(accounts) => {
                info!("Loaded {} accounts for district {district}", accounts.len());
                state.accounts = SuggestionIndex::new(accounts);
                state.load_state = DistrictLoadState::Idle;
            }
            Err(err) => {
                warn!("Failed to load accounts for district {district}: {err}");
                state.accounts = SuggestionIndex::empty();
                state.load_state = DistrictLoadState::Error(err.to_string());
            }
        }
        self.publish(&state);
    }
}

fn apply_district_defaults(
    catalog: &DistrictCatalog,
    address: &mut Address,
    previous: &str,
    next: &str,
) {
    match catalog.default_location(next) {
        Some(location) => {
            address.city = location.city.clone();
            address.state = location.state.clone();
            address.zip = location.zip.clone();
        }
        None if catalog.default_location(previous).is_some() => {
            address.city.clear();
            address.state.clear();
            address.zip.clear();
        }
        None => {}
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn overwrite_if_present(slot: &mut String, value: Option<&str>) {
    if let Some(value) = non_empty(value) {
        *slot = value.to_string();
    }
}
