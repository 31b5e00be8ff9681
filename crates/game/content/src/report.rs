//! Load-time content diagnostics.
//!
//! Effect documents are parsed when content loads. Fields the parser cannot
//! understand are skipped, and each one is recorded here with the id of the
//! skill or node it came from.

use std::fmt;

use arena_core::EffectDiagnostic;
use arena_core::error::{ErrorSeverity, GameError};

/// Kind of definition an effect document belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DefinitionKind {
    Skill,
    Passive,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill => f.write_str("skill"),
            Self::Passive => f.write_str("passive"),
        }
    }
}

/// One skipped field, tagged with its owning definition.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("{kind} {id}: {diagnostic}")]
pub struct ContentDiagnostic {
    pub kind: DefinitionKind,
    pub id: String,
    pub diagnostic: EffectDiagnostic,
}

impl ContentDiagnostic {
    pub fn new(kind: DefinitionKind, id: impl Into<String>, diagnostic: EffectDiagnostic) -> Self {
        Self {
            kind,
            id: id.into(),
            diagnostic,
        }
    }

    /// Logs the diagnostic at `warn!`.
    pub fn emit(&self) {
        tracing::warn!(
            kind = %self.kind,
            id = %self.id,
            path = %self.diagnostic.path,
            code = self.diagnostic.error_code(),
            "skipped effect field: {}",
            self.diagnostic.problem
        );
    }
}

impl GameError for ContentDiagnostic {
    fn severity(&self) -> ErrorSeverity {
        self.diagnostic.severity()
    }

    fn error_code(&self) -> &'static str {
        self.diagnostic.error_code()
    }
}

/// Every diagnostic produced while loading one content set.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContentReport {
    diagnostics: Vec<ContentDiagnostic>,
}

impl ContentReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: ContentDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = ContentDiagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn diagnostics(&self) -> &[ContentDiagnostic] {
        &self.diagnostics
    }

    /// Diagnostics raised by the definition with `id`.
    pub fn for_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ContentDiagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.id == id)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::effects::EffectProblem;

    fn unknown(path: &str) -> EffectDiagnostic {
        EffectDiagnostic {
            path: path.to_owned(),
            problem: EffectProblem::UnknownKey,
        }
    }

    #[test]
    fn display_names_the_owner() {
        let diagnostic = ContentDiagnostic::new(DefinitionKind::Passive, "N33", unknown("globalCap"));
        assert_eq!(diagnostic.to_string(), "passive N33: globalCap: unknown key");
        assert_eq!(diagnostic.error_code(), "EFFECT_UNKNOWN_KEY");
        assert_eq!(diagnostic.severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn report_filters_by_id() {
        let mut report = ContentReport::new();
        assert!(report.is_clean());
        report.push(ContentDiagnostic::new(DefinitionKind::Skill, "Spark", unknown("a")));
        report.push(ContentDiagnostic::new(DefinitionKind::Skill, "Cleave", unknown("b")));
        report.push(ContentDiagnostic::new(DefinitionKind::Skill, "Spark", unknown("c")));

        assert_eq!(report.len(), 3);
        assert_eq!(report.for_id("Spark").count(), 2);
        assert_eq!(report.for_id("Missing").count(), 0);
    }
}
