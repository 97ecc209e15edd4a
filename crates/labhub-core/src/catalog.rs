//! Catalog schema descriptors.
//!
//! One schema per catalog parametrizes the generic controller engine:
//! required fields, initial draft values, per-field normalization, sort
//! order, authorship stamping, and search behavior.

use serde::{Deserialize, Serialize};

use crate::document::{FieldMap, Value};
use crate::normalize::{normalize_tags, year_or_current};
use crate::ordering::SortKey;

/// The four parallel resource catalogs of the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Catalog {
    Projects,
    Experiments,
    Wiki,
    References,
}

impl Catalog {
    pub const ALL: [Catalog; 4] = [
        Catalog::Projects,
        Catalog::Experiments,
        Catalog::Wiki,
        Catalog::References,
    ];

    /// Collection name inside the store namespace.
    pub fn collection(&self) -> &'static str {
        match self {
            Catalog::Projects => "projects",
            Catalog::Experiments => "experiments",
            Catalog::Wiki => "wiki",
            Catalog::References => "references",
        }
    }

    /// The schema descriptor for this catalog.
    pub fn schema(&self) -> CatalogSchema {
        match self {
            Catalog::Projects => projects_schema(),
            Catalog::Experiments => experiments_schema(),
            Catalog::Wiki => wiki_schema(),
            Catalog::References => references_schema(),
        }
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

/// Supported field shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    TextList,
}

/// Per-field normalization applied before persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalize {
    /// Trim entries and drop empties; a comma-delimited string becomes a
    /// list. Always yields a list, even when the field was absent.
    Tags,
    /// A blank or missing year becomes the current calendar year.
    YearOrCurrent,
}

/// A field definition within a catalog schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    /// Seeded into a fresh draft on create.
    pub initial: Option<Value>,
    /// Closed set of accepted values, when the field is an enumeration.
    pub allowed: Option<Vec<String>>,
    pub normalize: Option<Normalize>,
}

impl FieldDef {
    fn text(name: &str) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Text,
            required: false,
            initial: None,
            allowed: None,
            normalize: None,
        }
    }

    fn required_text(name: &str) -> Self {
        Self {
            required: true,
            ..Self::text(name)
        }
    }

    fn with_initial(mut self, value: &str) -> Self {
        self.initial = Some(Value::text(value));
        self
    }

    fn with_normalize(mut self, normalize: Normalize) -> Self {
        self.normalize = Some(normalize);
        self
    }
}

/// Validation error for a draft against its catalog schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "field '{}': {}", self.field, self.message)
    }
}

/// Schema descriptor: the configuration data for one catalog instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSchema {
    pub catalog: Catalog,
    pub fields: Vec<FieldDef>,
    pub order: SortKey,
    /// Overwritten with the session's short id on every save; authorship is
    /// not user-editable.
    pub author_field: String,
    /// Selection and editing exclude each other at the list level (wiki).
    pub exclusive_selection: bool,
    /// Fields matched by client-side substring search; empty disables
    /// filtering.
    pub search_fields: Vec<String>,
}

impl CatalogSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field values a fresh draft starts from.
    pub fn initial_draft(&self) -> FieldMap {
        self.fields
            .iter()
            .filter_map(|f| f.initial.clone().map(|v| (f.name.clone(), v)))
            .collect()
    }

    /// Apply per-field normalization, producing the field map actually
    /// persisted.
    pub fn normalized(&self, draft: &FieldMap) -> FieldMap {
        let mut out = draft.clone();
        for def in &self.fields {
            match def.normalize {
                Some(Normalize::Tags) => {
                    let tags = draft
                        .get(&def.name)
                        .map(normalize_tags)
                        .unwrap_or_default();
                    out.insert(def.name.clone(), Value::list(tags));
                }
                Some(Normalize::YearOrCurrent) => {
                    out.insert(
                        def.name.clone(),
                        Value::text(year_or_current(draft.get(&def.name))),
                    );
                }
                None => {}
            }
        }
        out
    }

    /// Validate a (normalized) draft. Unknown fields are rejected; required
    /// fields must be present and non-blank; list fields must hold lists.
    pub fn validate(&self, draft: &FieldMap) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for name in draft.keys() {
            if self.field(name).is_none() {
                errors.push(ValidationError {
                    field: name.clone(),
                    message: "unknown field".into(),
                });
            }
        }

        for def in &self.fields {
            match draft.get(&def.name) {
                None => {
                    if def.required {
                        errors.push(ValidationError {
                            field: def.name.clone(),
                            message: "required field missing".into(),
                        });
                    }
                }
                Some(value) => {
                    if def.required && value.is_blank() {
                        errors.push(ValidationError {
                            field: def.name.clone(),
                            message: "required field is empty".into(),
                        });
                    }
                    if !type_matches(def.field_type, value) {
                        errors.push(ValidationError {
                            field: def.name.clone(),
                            message: format!("expected {:?}", def.field_type),
                        });
                    }
                    if let (Some(allowed), Some(text)) = (&def.allowed, value.as_text()) {
                        if !allowed.iter().any(|a| a == text) {
                            errors.push(ValidationError {
                                field: def.name.clone(),
                                message: format!("must be one of: {}", allowed.join(", ")),
                            });
                        }
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn type_matches(field_type: FieldType, value: &Value) -> bool {
    matches!(
        (field_type, value),
        (FieldType::Text, Value::Text(_)) | (FieldType::TextList, Value::TextList(_))
    )
}

/// Workflow stage of a project. Stages carry a display tone; there is no
/// enforced transition order between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Planning,
    DataCollection,
    Analysis,
    Writing,
    Published,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Planning,
        ProjectStatus::DataCollection,
        ProjectStatus::Analysis,
        ProjectStatus::Writing,
        ProjectStatus::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::DataCollection => "Data Collection",
            ProjectStatus::Analysis => "Analysis",
            ProjectStatus::Writing => "Writing",
            ProjectStatus::Published => "Published",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == s)
    }

    /// Tone used by status badges.
    pub fn color(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "slate",
            ProjectStatus::DataCollection => "blue",
            ProjectStatus::Analysis => "amber",
            ProjectStatus::Writing => "purple",
            ProjectStatus::Published => "emerald",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active research projects, newest first.
pub fn projects_schema() -> CatalogSchema {
    CatalogSchema {
        catalog: Catalog::Projects,
        fields: vec![
            FieldDef::required_text("title"),
            FieldDef::text("description"),
            FieldDef {
                allowed: Some(
                    ProjectStatus::ALL
                        .iter()
                        .map(|s| s.as_str().to_string())
                        .collect(),
                ),
                ..FieldDef::text("status").with_initial(ProjectStatus::Planning.as_str())
            },
            FieldDef::text("data_link"),
            FieldDef::text("repo_link"),
            FieldDef::text("lead"),
        ],
        order: SortKey::descending("created_at"),
        author_field: "lead".into(),
        exclusive_selection: false,
        search_fields: vec![],
    }
}

/// Runnable experiment tasks, newest first.
pub fn experiments_schema() -> CatalogSchema {
    CatalogSchema {
        catalog: Catalog::Experiments,
        fields: vec![
            FieldDef::required_text("title"),
            FieldDef::text("description"),
            FieldDef::text("live_link"),
            FieldDef::text("repo_link"),
            FieldDef::text("author"),
        ],
        order: SortKey::descending("created_at"),
        author_field: "author".into(),
        exclusive_selection: false,
        search_fields: vec![],
    }
}

/// Wiki documents, alphabetical. Selecting and editing exclude each other.
pub fn wiki_schema() -> CatalogSchema {
    CatalogSchema {
        catalog: Catalog::Wiki,
        fields: vec![
            FieldDef::required_text("title"),
            FieldDef::text("content"),
            FieldDef::text("category").with_initial("General"),
            FieldDef::text("last_edited_by"),
        ],
        order: SortKey::ascending("title"),
        author_field: "last_edited_by".into(),
        exclusive_selection: true,
        search_fields: vec![],
    }
}

/// Bibliographic references, newest year first, searchable.
pub fn references_schema() -> CatalogSchema {
    CatalogSchema {
        catalog: Catalog::References,
        fields: vec![
            FieldDef::required_text("title"),
            FieldDef::text("authors"),
            FieldDef::text("year").with_normalize(Normalize::YearOrCurrent),
            FieldDef::text("url"),
            FieldDef {
                field_type: FieldType::TextList,
                ..FieldDef::text("tags").with_normalize(Normalize::Tags)
            },
            FieldDef::text("ai_summary"),
            FieldDef::text("added_by"),
        ],
        order: SortKey::descending("year"),
        author_field: "added_by".into(),
        exclusive_selection: false,
        search_fields: vec!["title".into(), "authors".into(), "tags".into()],
    }
}
