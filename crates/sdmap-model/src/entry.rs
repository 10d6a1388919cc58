use serde::{Deserialize, Serialize};

/// A row of the curated mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MappingEntry {
    pub study_description: String,
    /// Single modality or a comma-joined list such as `NM,PT`.
    pub modality: String,
    pub loinc_code: String,
    pub long_common_name: String,
}

impl MappingEntry {
    pub fn new(
        study_description: impl Into<String>,
        modality: impl Into<String>,
        loinc_code: impl Into<String>,
        long_common_name: impl Into<String>,
    ) -> Self {
        Self {
            study_description: study_description.into(),
            modality: modality.into(),
            loinc_code: loinc_code.into(),
            long_common_name: long_common_name.into(),
        }
    }

    pub fn key(&self) -> CompositeKey {
        CompositeKey::new(&self.study_description, &self.modality)
    }
}

/// A StudyDescription/Modality combination reported by a contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub study_description: String,
    pub modality: String,
    pub frequency: Option<String>,
    pub contributor: String,
}

impl CandidateEntry {
    pub fn new(
        study_description: impl Into<String>,
        modality: impl Into<String>,
        contributor: impl Into<String>,
    ) -> Self {
        Self {
            study_description: study_description.into(),
            modality: modality.into(),
            frequency: None,
            contributor: contributor.into(),
        }
    }

    #[must_use]
    pub fn with_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = Some(frequency.into());
        self
    }

    pub fn key(&self) -> CompositeKey {
        CompositeKey::new(&self.study_description, &self.modality)
    }
}

/// Matching key: (StudyDescription, Modality).
///
/// Holds whatever strings it is built from; callers normalize first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompositeKey {
    pub study_description: String,
    pub modality: String,
}

impl CompositeKey {
    pub fn new(study_description: &str, modality: &str) -> Self {
        Self {
            study_description: study_description.to_string(),
            modality: modality.to_string(),
        }
    }
}

impl std::fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.study_description, self.modality)
    }
}
