use crate::{
    ReportTransport, SubmissionAssembler, SubmissionOutcome, Violation, ViolationListController,
    ViolationPatch, ViolationTypeCatalog,
};
use log::debug;
use report_address::AddressResolutionController;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStatus {
    pub submitting: bool,
    pub error: Option<String>,
    pub success_message: Option<String>,
}

/// One violation report being filled in: the address, the violation list and
/// the submission state.
pub struct ReportForm {
    address: AddressResolutionController,
    violations: Mutex<ViolationListController>,
    violation_types: ViolationTypeCatalog,
    assembler: SubmissionAssembler,
    submitting: AtomicBool,
    messages: Mutex<FormStatus>,
}

impl ReportForm {
    pub fn new(address: AddressResolutionController, transport: Arc<dyn ReportTransport>) -> Self {
        Self {
            address,
            violations: Mutex::new(ViolationListController::new()),
            violation_types: ViolationTypeCatalog::builtin(),
            assembler: SubmissionAssembler::new(transport),
            submitting: AtomicBool::new(false),
            messages: Mutex::new(FormStatus::default()),
        }
    }

    #[must_use]
    pub fn with_violation_types(mut self, catalog: ViolationTypeCatalog) -> Self {
        self.violation_types = catalog;
        self
    }

    pub fn address(&self) -> &AddressResolutionController {
        &self.address
    }

    pub fn violation_types(&self) -> &ViolationTypeCatalog {
        &self.violation_types
    }

    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        self.lock_violations().snapshot()
    }

    #[must_use]
    pub fn subscribe_violations(&self) -> watch::Receiver<Vec<Violation>> {
        self.lock_violations().subscribe()
    }

    pub fn add_violation(&self) -> u32 {
        self.lock_violations().add()
    }

    pub fn update_violation(&self, id: u32, patch: ViolationPatch) -> bool {
        self.lock_violations().update(id, patch)
    }

    pub fn remove_violation(&self, id: u32) -> bool {
        self.lock_violations().remove(id)
    }

    pub fn can_remove_violation(&self) -> bool {
        self.lock_violations().can_remove()
    }

    #[must_use]
    pub fn status(&self) -> FormStatus {
        FormStatus {
            submitting: self.submitting.load(Ordering::Acquire),
            ..self.lock_messages().clone()
        }
    }

    /// Validate and send the report.
    ///
    /// Returns `None` without doing anything while another submission is in
    /// flight. On success the whole form is reset; on failure it is left as
    /// is so the reporter can fix it and resubmit.
    pub async fn submit(&self) -> Option<SubmissionOutcome> {
        let Some(_in_flight) = InFlight::acquire(&self.submitting) else {
            debug!("Ignoring submit while another submission is in flight");
            return None;
        };

        {
            let mut messages = self.lock_messages();
            messages.error = None;
            messages.success_message = None;
        }

        let address = self.address.address();
        let violations = self.violations();
        let outcome = self
            .assembler
            .validate_and_submit(&address, &violations)
            .await;

        match &outcome {
            SubmissionOutcome::Success { report_id } => {
                self.address.reset();
                self.lock_violations().reset();
                self.lock_messages().success_message = Some(format!(
                    "Report submitted successfully! Report ID: {report_id}"
                ));
            }
            SubmissionOutcome::ValidationFailure { message }
            | SubmissionOutcome::TransportFailure { message } => {
                self.lock_messages().error = Some(message.clone());
            }
        }

        Some(outcome)
    }

    fn lock_violations(&self) -> MutexGuard<'_, ViolationListController> {
        self.violations.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_messages(&self) -> MutexGuard<'_, FormStatus> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the in-flight flag for the duration of one submission.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
