// src/types/optimization.rs
//! CV optimization result as returned by the optimize endpoint

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Missing fields already fall back to the container default; this covers explicit `null`s
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ===== Top level (camelCase on the wire) =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationResult {
    pub optimization_id: Option<i64>,
    pub quality_score: Option<f64>,
    pub grade: Option<String>,
    pub file_name: Option<String>,
    pub download_url: Option<String>,
    pub metadata: Option<CvMetadata>,
    pub contact_info: Option<ContactInfo>,
    pub summary: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience_analyzed: Vec<ExperienceEntry>,
    pub experience_fix_stats: Option<ExperienceFixStats>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills_detected: BTreeMap<String, Vec<String>>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    pub evaluation: Option<Evaluation>,
    pub validation: Option<Validation>,
}

impl OptimizationResult {
    /// Download link, if the server provided a non-empty one
    pub fn download_link(&self) -> Option<&str> {
        self.download_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn quality_report(&self) -> Option<&QualityReport> {
        self.evaluation.as_ref()?.quality_report.as_ref()
    }

    pub fn summary_evaluation(&self) -> Option<&SummaryEvaluation> {
        self.evaluation.as_ref()?.summary.as_ref()
    }

    pub fn candidate_name(&self) -> Option<&str> {
        self.metadata.as_ref()?.candidate_name.as_deref()
    }
}

// ===== Nested sections (snake_case on the wire) =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvMetadata {
    pub original_filename: Option<String>,
    pub file_type: Option<String>,
    pub candidate_name: Option<String>,
    pub page_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedHeader {
    pub title: Option<String>,
    pub company: Option<String>,
    pub dates: Option<String>,
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    /// 0 to 10
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub feedback: Vec<String>,
    pub fixed: Option<String>,
    pub fixed_score: Option<f64>,
    pub changes: Option<Vec<String>>,
    pub was_fixed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub headers: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub achievements: Vec<Achievement>,
    pub parsed_header: Option<ParsedHeader>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceFixStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total_bullets: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub fixed_bullets: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub fixes_applied: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryEvaluation {
    #[serde(deserialize_with = "null_as_default")]
    pub word_count: u32,
    pub readability_score: Option<f64>,
    pub quality_score: Option<f64>,
    pub grade: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEvaluation {
    #[serde(deserialize_with = "null_as_default")]
    pub total_bullets: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub average_score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub strong_percentage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub overall_score: f64,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityBreakdownItem {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityReport {
    /// 0 to 100
    #[serde(deserialize_with = "null_as_default")]
    pub quality_score: f64,
    pub grade: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub breakdown: Vec<QualityBreakdownItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evaluation {
    pub summary: Option<SummaryEvaluation>,
    pub experience_original: Option<ExperienceEvaluation>,
    pub experience_fixed: Option<ExperienceEvaluation>,
    pub quality_report: Option<QualityReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Validation {
    #[serde(deserialize_with = "null_as_default")]
    pub is_valid: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub issues: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
}
