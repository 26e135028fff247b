use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Photo attached to a violation. The bytes are passed through untouched.
#[derive(Clone, PartialEq, Eq)]
pub struct ViolationImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

impl ViolationImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ViolationImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViolationImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub id: u32,
    /// Violation type key; empty until the reporter picks one.
    pub kind: String,
    pub image: Option<ViolationImage>,
    pub notes: String,
}

impl Violation {
    pub fn empty(id: u32) -> Self {
        Self {
            id,
            kind: String::new(),
            image: None,
            notes: String::new(),
        }
    }
}

/// Fields to merge into an existing violation. `None` leaves a field alone;
/// `image: Some(None)` removes the photo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationPatch {
    pub kind: Option<String>,
    pub image: Option<Option<ViolationImage>>,
    pub notes: Option<String>,
}

impl ViolationPatch {
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn image(mut self, image: ViolationImage) -> Self {
        self.image = Some(Some(image));
        self
    }

    #[must_use]
    pub fn clear_image(mut self) -> Self {
        self.image = Some(None);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    fn apply(self, violation: &mut Violation) {
        if let Some(kind) = self.kind {
            violation.kind = kind;
        }
        if let Some(image) = self.image {
            violation.image = image;
        }
        if let Some(notes) = self.notes {
            violation.notes = notes;
        }
    }
}

/// Ordered violation entries of one report. Never holds fewer than one entry.
pub struct ViolationListController {
    entries: Vec<Violation>,
    changes: watch::Sender<Vec<Violation>>,
}

impl ViolationListController {
    pub fn new() -> Self {
        let entries = vec![Violation::empty(1)];
        let (changes, _) = watch::channel(entries.clone());
        Self { entries, changes }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.entries
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Violation> {
        self.entries.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Violation>> {
        self.changes.subscribe()
    }

    pub fn get(&self, id: u32) -> Option<&Violation> {
        self.entries.iter().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a remove control should be offered.
    pub fn can_remove(&self) -> bool {
        self.entries.len() > 1
    }

    /// Append an empty entry and return its id.
    pub fn add(&mut self) -> u32 {
        let id = self.entries.iter().map(|v| v.id).max().map_or(1, |max| max + 1);
        self.entries.push(Violation::empty(id));
        self.publish();
        id
    }

    pub fn update(&mut self, id: u32, patch: ViolationPatch) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|v| v.id == id) else {
            return false;
        };
        patch.apply(entry);
        self.publish();
        true
    }

    pub fn remove(&mut self, id: u32) -> bool {
        if !self.can_remove() {
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|v| v.id != id);
        if self.entries.len() == before {
            return false;
        }
        self.publish();
        true
    }

    pub fn reset(&mut self) {
        self.entries = vec![Violation::empty(1)];
        self.publish();
    }

    fn publish(&self) {
        self.changes.send_replace(self.entries.clone());
    }
}

impl Default for ViolationListController {
    fn default() -> Self {
        Self::new()
    }
}
