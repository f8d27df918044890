//! Proposal record: the structured data contract shared by the extractor,
//! the completer, the fallback generator and the document assembler.
//!
//! Field names follow the camelCase JSON the model is prompted to produce.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Advisory display limit for `Problem::title`.
pub const PROBLEM_TITLE_MAX_CHARS: usize = 15;
/// Advisory display limit for `Solution::name`.
pub const SOLUTION_NAME_MAX_CHARS: usize = 10;
/// Advisory upper bound on the number of problems.
pub const MAX_PROBLEMS: usize = 7;
/// Advisory upper bound on the number of solutions.
pub const MAX_SOLUTIONS: usize = 8;

/// The root record, one per pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRecord {
    pub company_info: CompanyInfo,
    pub problems: Vec<Problem>,
    pub solutions: Vec<Solution>,
    pub system_architecture: SystemArchitecture,
    pub effects: Effects,
    pub schedule: Schedule,
    pub cost: Cost,
    pub next_actions: Vec<String>,
    pub proposal: ProposalTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub current_situation: String,
}

/// Severity / priority scale. Serialized as `high|medium|low`; parsing is
/// lenient (see `Level::parse`), so an unexpected label never drops its entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    #[default]
    Medium,
    Low,
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Level::parse).unwrap_or_default())
    }
}

impl Level {
    /// Case-insensitive; the model is prompted in Japanese, so `高|中|低` are
    /// accepted too. Anything else reads as `Medium`.
    pub fn parse(raw: &str) -> Level {
        match raw.trim().to_lowercase().as_str() {
            "high" | "高" => Level::High,
            "low" | "低" => Level::Low,
            _ => Level::Medium,
        }
    }

    /// Label shown on the rendered page.
    pub fn label(self) -> &'static str {
        match self {
            Level::High => "高",
            Level::Medium => "中",
            Level::Low => "低",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub pain_level: Level,
    #[serde(default)]
    pub related_pattern: String,
}

impl CompanyInfo {
    /// An object with every field blank carries nothing worth keeping.
    pub fn is_usable(&self) -> bool {
        [&self.name, &self.industry, &self.size, &self.current_situation]
            .iter()
            .any(|s| !s.trim().is_empty())
    }
}

impl Problem {
    /// A problem must carry at least one detail line.
    pub fn is_usable(&self) -> bool {
        !self.details.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Treated as a set: duplicates are removed on completion, first occurrence wins.
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, rename = "expectedKPI")]
    pub expected_kpi: String,
    #[serde(default)]
    pub priority: Level,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemArchitecture {
    #[serde(default)]
    pub core: String,
    #[serde(default)]
    pub apps: Vec<String>,
    #[serde(default)]
    pub integrations: Vec<String>,
    #[serde(default)]
    pub ai_components: Vec<String>,
    #[serde(default)]
    pub data_flow: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    #[serde(default)]
    pub quantitative: Vec<QuantitativeEffect>,
    #[serde(default)]
    pub qualitative: Vec<String>,
}

impl Effects {
    pub fn is_usable(&self) -> bool {
        !self.quantitative.is_empty() || !self.qualitative.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitativeEffect {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub after: String,
    #[serde(default)]
    pub improvement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub total_weeks: u32,
    pub phases: Vec<Phase>,
}

impl Schedule {
    /// Total and per-phase durations must be positive. The phase sum is not
    /// required to match `total_weeks`.
    pub fn is_usable(&self) -> bool {
        self.total_weeks > 0 && self.phases.iter().all(|p| p.weeks > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    #[serde(default)]
    pub name: String,
    pub weeks: u32,
    #[serde(default)]
    pub description: String,
}

/// Cost figures are whole yen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cost {
    #[serde(deserialize_with = "deserialize_amount")]
    pub initial: u64,
    #[serde(default)]
    pub initial_details: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub monthly: u64,
    #[serde(default)]
    pub monthly_details: String,
    #[serde(default)]
    pub licenses: String,
    #[serde(default)]
    pub subsidy: String,
    #[serde(default)]
    pub roi: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalTitle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

impl ProposalTitle {
    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Accepts `3000000`, `3000000.0` and `"¥3,000,000"` alike.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_amount(&value).ok_or_else(|| de::Error::custom(format!("invalid amount: {value}")))
}

pub(crate) fn parse_amount(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        Value::String(s) => {
            let digits: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | '¥' | '￥' | '円' | ' ' | '〜'))
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}
