//! Section resolution — turns a result document into the ordered, schema-stable view model.

use serde::Serialize;
use serde_json::Value;

use crate::jobs::models::ResultDocument;
use crate::normalizer::fields::{project_items, project_merged, DisplayItem, FieldSpec};
use crate::normalizer::path::{first_non_empty, ROOT};
use crate::normalizer::tables::{RESUME_SECTIONS, REVIEW_SECTIONS};

/// Declarative description of one display section.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub key: &'static str,
    pub title: &'static str,
    /// Tried in order; the first non-empty value is the section's data.
    pub candidate_paths: &'static [&'static str],
    /// Keep the section (rendered as "no data") even when nothing resolves.
    pub always_show: bool,
    /// The section is a single record whose fields may also sit at the document
    /// root. Each field is looked up in the resolved object first, then in the root.
    pub root_fields: bool,
    pub fields: &'static [FieldSpec],
}

/// Outcome of resolving one `SectionSpec` against a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSection<'a> {
    /// Candidate path that supplied the data.
    pub path: Option<&'static str>,
    pub data: Option<&'a Value>,
}

impl ResolvedSection<'_> {
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }
}

/// Resolves `spec` against `document`. A section nothing resolves for is simply empty.
pub fn resolve_section<'a>(document: &'a Value, spec: &SectionSpec) -> ResolvedSection<'a> {
    match first_non_empty(document, spec.candidate_paths) {
        Some((path, data)) => ResolvedSection {
            path: Some(path),
            data: Some(data),
        },
        None => ResolvedSection {
            path: None,
            data: None,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModelSection {
    pub key: &'static str,
    pub title: &'static str,
    pub is_empty: bool,
    /// Resolved value as found in the document; `null` when empty. A section built
    /// only from root-level fields holds an object of just those fields.
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<&'static str>,
    pub items: Vec<DisplayItem>,
}

/// Canonical display model of one result document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewModel {
    pub sections: Vec<ViewModelSection>,
    pub review: Vec<ViewModelSection>,
}

impl ViewModel {
    pub fn section(&self, key: &str) -> Option<&ViewModelSection> {
        self.sections.iter().find(|s| s.key == key)
    }

    pub fn review_section(&self, key: &str) -> Option<&ViewModelSection> {
        self.review.iter().find(|s| s.key == key)
    }
}

/// Builds sections for `table` in declared order. Empty sections are kept only
/// when `always_show` is set.
pub fn build_sections(document: &Value, table: &[SectionSpec]) -> Vec<ViewModelSection> {
    table
        .iter()
        .filter_map(|spec| {
            let section = build_section(document, spec);
            (!section.is_empty || spec.always_show).then_some(section)
        })
        .collect()
}

fn build_section(document: &Value, spec: &SectionSpec) -> ViewModelSection {
    let resolved = resolve_section(document, spec);
    let section = ViewModelSection {
        key: spec.key,
        title: spec.title,
        is_empty: true,
        data: Value::Null,
        source_path: None,
        items: Vec::new(),
    };

    if spec.root_fields {
        let sources: Vec<&Value> = resolved.data.into_iter().chain([document]).collect();
        return match (resolved.data, project_merged(&sources, spec.fields)) {
            (Some(data), merged) => ViewModelSection {
                is_empty: false,
                data: data.clone(),
                source_path: resolved.path,
                items: match merged {
                    Some((item, _)) => vec![item],
                    None => project_items(data, spec.fields),
                },
                ..section
            },
            // Only loose top-level fields: the section's data is what was gathered.
            (None, Some((item, gathered))) => ViewModelSection {
                is_empty: false,
                data: Value::Object(gathered),
                source_path: Some(ROOT),
                items: vec![item],
                ..section
            },
            (None, None) => section,
        };
    }

    match resolved.data {
        Some(data) => ViewModelSection {
            is_empty: false,
            data: data.clone(),
            source_path: resolved.path,
            items: project_items(data, spec.fields),
            ..section
        },
        None => section,
    }
}

/// Normalizes a result document with the built-in resume and review tables.
/// Pure: the same document always yields an identical view model.
pub fn build_view_model(document: &ResultDocument) -> ViewModel {
    ViewModel {
        sections: build_sections(document.resume_root(), RESUME_SECTIONS),
        review: document
            .review
            .as_ref()
            .map(|review| build_sections(review, REVIEW_SECTIONS))
            .unwrap_or_default(),
    }
}
