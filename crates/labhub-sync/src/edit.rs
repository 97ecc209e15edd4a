//! The per-catalog view/create/edit state machine.

use serde::{Deserialize, Serialize};

use labhub_core::document::{Document, DocumentId, FieldMap, Value};

/// Mutually exclusive editing states; exactly one is active per catalog.
///
/// Transitions happen only through explicit user intent. An incoming
/// snapshot replacement never changes the mode: an in-progress edit
/// survives concurrent remote updates (including updates to the document
/// being edited, which the eventual save overwrites).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditMode {
    /// Browsing the snapshot, optionally with one item selected.
    Viewing { selected: Option<DocumentId> },
    /// Composing a new item; the draft has no id yet.
    Creating,
    /// Editing an existing item in place.
    Editing { target: DocumentId },
}

impl EditMode {
    pub fn viewing_none() -> Self {
        EditMode::Viewing { selected: None }
    }

    pub fn is_viewing(&self) -> bool {
        matches!(self, EditMode::Viewing { .. })
    }

    /// True while a draft is live (Creating or Editing).
    pub fn has_draft(&self) -> bool {
        !self.is_viewing()
    }
}

/// Owns the draft under construction and the mode gating it.
///
/// At most one draft is ever live per catalog per session. The session
/// never reads the snapshot itself; item lookups happen in the controller
/// against the collection mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditSession {
    mode: EditMode,
    draft: FieldMap,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self {
            mode: EditMode::viewing_none(),
            draft: FieldMap::new(),
        }
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn draft(&self) -> &FieldMap {
        &self.draft
    }

    pub fn selected(&self) -> Option<&DocumentId> {
        match &self.mode {
            EditMode::Viewing { selected } => selected.as_ref(),
            _ => None,
        }
    }

    /// Begin composing a new item from the catalog's initial values. Any
    /// previous draft is replaced outright.
    pub fn start_create(&mut self, initial: FieldMap) {
        self.mode = EditMode::Creating;
        self.draft = initial;
    }

    /// Begin editing an existing item from a full copy of its fields.
    pub fn start_edit(&mut self, item: &Document) {
        self.mode = EditMode::Editing {
            target: item.id.clone(),
        };
        self.draft = item.fields.clone();
    }

    /// Select an item while viewing. No-op in any other mode; the wiki
    /// exception is arbitrated by the controller.
    pub fn select(&mut self, id: DocumentId) {
        if self.mode.is_viewing() {
            self.mode = EditMode::Viewing { selected: Some(id) };
        }
    }

    /// Discard the draft and return to viewing nothing.
    pub fn cancel(&mut self) {
        self.mode = EditMode::viewing_none();
        self.draft.clear();
    }

    /// Set one draft field. Meaningful only while a draft is live.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.draft.insert(name.into(), value);
    }

    /// Clear the selection if it points at the given id (after a delete).
    pub fn deselect(&mut self, id: &DocumentId) {
        if self.selected() == Some(id) {
            self.mode = EditMode::viewing_none();
        }
    }

    /// A successful persist returns to viewing nothing with no draft.
    pub fn finish_save(&mut self) {
        self.mode = EditMode::viewing_none();
        self.draft.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labhub_core::document::Timestamp;

    fn item(id: &str, title: &str) -> Document {
        let mut fields = FieldMap::new();
        fields.insert("title".into(), Value::text(title));
        Document {
            id: DocumentId::new(id),
            fields,
            created_at: Timestamp::from_tick(1),
            updated_at: Timestamp::from_tick(1),
        }
    }

    #[test]
    fn starts_viewing_nothing() {
        let session = EditSession::new();
        assert_eq!(*session.mode(), EditMode::viewing_none());
        assert!(session.draft().is_empty());
    }

    #[test]
    fn exactly_one_mode_at_a_time() {
        let mut session = EditSession::new();

        session.start_create(FieldMap::new());
        assert_eq!(*session.mode(), EditMode::Creating);

        let doc = item("p1", "Pilot");
        session.start_edit(&doc);
        assert_eq!(
            *session.mode(),
            EditMode::Editing {
                target: DocumentId::new("p1")
            }
        );

        session.cancel();
        assert_eq!(*session.mode(), EditMode::viewing_none());
    }

    #[test]
    fn create_after_edit_leaves_no_residual_draft() {
        let mut session = EditSession::new();
        session.start_edit(&item("p1", "Pilot"));
        assert_eq!(session.draft().get("title"), Some(&Value::text("Pilot")));

        let mut initial = FieldMap::new();
        initial.insert("status".into(), Value::text("Planning"));
        session.start_create(initial);
        assert_eq!(*session.mode(), EditMode::Creating);
        assert!(session.draft().get("title").is_none());
        assert_eq!(session.draft().get("status"), Some(&Value::text("Planning")));
    }

    #[test]
    fn select_only_applies_while_viewing() {
        let mut session = EditSession::new();
        session.select(DocumentId::new("w1"));
        assert_eq!(session.selected(), Some(&DocumentId::new("w1")));

        session.select(DocumentId::new("w1"));
        assert_eq!(session.selected(), Some(&DocumentId::new("w1")));

        session.start_create(FieldMap::new());
        session.select(DocumentId::new("w2"));
        assert_eq!(*session.mode(), EditMode::Creating);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn cancel_discards_the_draft() {
        let mut session = EditSession::new();
        session.start_create(FieldMap::new());
        session.set_field("title", Value::text("half-typed"));
        session.cancel();
        assert!(session.draft().is_empty());
        assert_eq!(*session.mode(), EditMode::viewing_none());
    }

    #[test]
    fn deselect_clears_only_the_matching_selection() {
        let mut session = EditSession::new();
        session.select(DocumentId::new("w1"));

        session.deselect(&DocumentId::new("w2"));
        assert_eq!(session.selected(), Some(&DocumentId::new("w1")));

        session.deselect(&DocumentId::new("w1"));
        assert_eq!(*session.mode(), EditMode::viewing_none());
    }

    #[test]
    fn edit_mode_serde_round_trip() {
        let modes = vec![
            EditMode::viewing_none(),
            EditMode::Viewing {
                selected: Some(DocumentId::new("w1")),
            },
            EditMode::Creating,
            EditMode::Editing {
                target: DocumentId::new("p1"),
            },
        ];
        for mode in &modes {
            let json = serde_json::to_string(mode).unwrap();
            let back: EditMode = serde_json::from_str(&json).unwrap();
            assert_eq!(*mode, back);
        }
    }

    #[test]
    fn finish_save_returns_to_viewing_nothing() {
        let mut session = EditSession::new();
        session.start_edit(&item("p1", "Pilot"));
        session.finish_save();
        assert_eq!(*session.mode(), EditMode::viewing_none());
        assert!(session.draft().is_empty());
    }
}
