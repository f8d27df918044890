//! Validator/Completer: turns an untyped, possibly partial candidate into a
//! schema-complete `ProposalRecord`.
//!
//! Rules, applied field by field:
//! - Object fields that are absent, null, not an object, or unusable (no
//!   content, zero-week schedule, missing cost amounts) are replaced by the
//!   whole canonical default object. Missing leaves inside a supplied object
//!   read as empty; there is no per-leaf merge with the defaults.
//! - List fields are padded up to their minimum with `pool[current_len]`.
//!   Supplied entries are never reordered, and lists are never truncated.

use std::collections::HashSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::proposal::defaults::DefaultTables;
use crate::proposal::record::{
    CompanyInfo, Effects, Problem, ProposalRecord, ProposalTitle, Schedule, Solution,
    MAX_PROBLEMS, MAX_SOLUTIONS, PROBLEM_TITLE_MAX_CHARS, SOLUTION_NAME_MAX_CHARS,
};

/// Minimum number of entries guaranteed per list field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCardinalities {
    pub problems: usize,
    pub solutions: usize,
    pub next_actions: usize,
}

impl Default for MinCardinalities {
    fn default() -> Self {
        Self {
            problems: 3,
            solutions: 4,
            next_actions: 1,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefaultsError {
    #[error("minimum for {field} must be at least 1")]
    ZeroMinimum { field: &'static str },

    #[error("default pool for {field} has {pool} entries but the minimum is {minimum}")]
    PoolTooSmall {
        field: &'static str,
        pool: usize,
        minimum: usize,
    },
}

/// Checks that every minimum is positive and reachable from its pool.
pub fn check_pools(tables: &DefaultTables, mins: &MinCardinalities) -> Result<(), DefaultsError> {
    let checks = [
        ("problems", tables.problems.len(), mins.problems),
        ("solutions", tables.solutions.len(), mins.solutions),
        ("nextActions", tables.next_actions.len(), mins.next_actions),
    ];
    for (field, pool, minimum) in checks {
        if minimum == 0 {
            return Err(DefaultsError::ZeroMinimum { field });
        }
        if pool < minimum {
            return Err(DefaultsError::PoolTooSmall {
                field,
                pool,
                minimum,
            });
        }
    }
    Ok(())
}

/// Completes candidate records against a fixed set of default tables.
///
/// Construction validates the pools against the minimums, so `complete` is
/// total: every record it returns satisfies the lower bounds.
#[derive(Debug, Clone)]
pub struct Completer {
    tables: Arc<DefaultTables>,
    mins: MinCardinalities,
}

impl Completer {
    pub fn new(tables: Arc<DefaultTables>, mins: MinCardinalities) -> Result<Self, DefaultsError> {
        check_pools(&tables, &mins)?;
        Ok(Self { tables, mins })
    }

    pub fn tables(&self) -> &DefaultTables {
        &self.tables
    }

    /// Produces a complete record from `candidate`. A missing or non-object
    /// candidate yields the canonical defaults padded to the minimums.
    pub fn complete(&self, candidate: Option<&Value>) -> ProposalRecord {
        let empty = Map::new();
        let fields = candidate.and_then(Value::as_object).unwrap_or(&empty);
        let field = |key: &str| fields.get(key).filter(|v| !v.is_null());
        let tables = &*self.tables;

        let mut company_info: CompanyInfo =
            object_or_default(
            field("companyInfo"),
            "companyInfo",
            &tables.company_info,
            CompanyInfo::is_usable,
        );
        if company_info.name.trim().is_empty() {
            company_info.name = tables.company_info.name.clone();
        }

        let problems = pad(
            list_entries(field("problems"), "problems", Problem::is_usable),
            &tables.problems,
            self.mins.problems,
            "problems",
        );

        let mut solutions: Vec<Solution> =
            list_entries(field("solutions"), "solutions", |_: &Solution| true);
        for solution in &mut solutions {
            dedup_preserving_order(&mut solution.tools);
        }
        let solutions = pad(solutions, &tables.solutions, self.mins.solutions, "solutions");

        let next_actions = pad(
            list_entries(field("nextActions"), "nextActions", |a: &String| {
                !a.trim().is_empty()
            }),
            &tables.next_actions,
            self.mins.next_actions,
            "nextActions",
        );

        let record = ProposalRecord {
            company_info,
            problems,
            solutions,
            system_architecture: object_or_default(
                field("systemArchitecture"),
                "systemArchitecture",
                &tables.system_architecture,
                |_| true,
            ),
            effects: object_or_default(
                field("effects"),
                "effects",
                &tables.effects,
                Effects::is_usable,
            ),
            schedule: object_or_default(
                field("schedule"),
                "schedule",
                &tables.schedule,
                Schedule::is_usable,
            ),
            cost: object_or_default(field("cost"), "cost", &tables.cost, |_| true),
            next_actions,
            proposal: object_or_default(
                field("proposal"),
                "proposal",
                &tables.proposal,
                ProposalTitle::is_usable,
            ),
        };

        flag_advisory_limits(&record);
        record
    }
}

/// Deserializes `value` strictly, substituting the whole default on absence or failure.
fn object_or_default<T>(value: Option<&Value>, field: &str, default: &T, usable: fn(&T) -> bool) -> T
where
    T: DeserializeOwned + Clone,
{
    let Some(value) = value else {
        debug!("{field} absent: using canonical default");
        return default.clone();
    };

    match T::deserialize(value) {
        Ok(parsed) if usable(&parsed) => parsed,
        Ok(_) => {
            warn!("{field} failed validation: replacing with canonical default");
            default.clone()
        }
        Err(e) => {
            warn!("{field} is malformed ({e}): replacing with canonical default");
            default.clone()
        }
    }
}

/// Deserializes each array element on its own, dropping the ones that don't fit.
/// A non-array value counts as absent.
fn list_entries<T>(value: Option<&Value>, field: &str, usable: fn(&T) -> bool) -> Vec<T>
where
    T: DeserializeOwned,
{
    let Some(value) = value else {
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        warn!("{field} is not an array: treating as absent");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match T::deserialize(item) {
            Ok(entry) if usable(&entry) => Some(entry),
            Ok(_) => {
                warn!("{field}[{i}] failed validation: dropped");
                None
            }
            Err(e) => {
                warn!("{field}[{i}] is malformed ({e}): dropped");
                None
            }
        })
        .collect()
}

/// Appends `pool[items.len()]` until `items` reaches `minimum`.
fn pad<T: Clone>(mut items: Vec<T>, pool: &[T], minimum: usize, field: &str) -> Vec<T> {
    let supplied = items.len();
    while items.len() < minimum {
        match pool.get(items.len()) {
            Some(entry) => items.push(entry.clone()),
            // Unreachable for pools accepted by `check_pools`.
            None => break,
        }
    }
    if items.len() > supplied {
        warn!(
            "{field}: {supplied} supplied, padded with {} canonical entries",
            items.len() - supplied
        );
    }
    items
}

fn dedup_preserving_order(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

fn flag_advisory_limits(record: &ProposalRecord) {
    if record.problems.len() > MAX_PROBLEMS {
        warn!(
            "{} problems exceeds advisory maximum of {MAX_PROBLEMS}",
            record.problems.len()
        );
    }
    if record.solutions.len() > MAX_SOLUTIONS {
        warn!(
            "{} solutions exceeds advisory maximum of {MAX_SOLUTIONS}",
            record.solutions.len()
        );
    }
    for problem in &record.problems {
        if problem.title.chars().count() > PROBLEM_TITLE_MAX_CHARS {
            debug!("Problem title longer than {PROBLEM_TITLE_MAX_CHARS} chars: {:?}", problem.title);
        }
    }
    for solution in &record.solutions {
        if solution.name.chars().count() > SOLUTION_NAME_MAX_CHARS {
            debug!("Solution name longer than {SOLUTION_NAME_MAX_CHARS} chars: {:?}", solution.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::record::Level;
    use serde_json::json;

    fn completer() -> Completer {
        Completer::new(DefaultTables::canonical(), MinCardinalities::default()).unwrap()
    }

    fn supplied_problem() -> Value {
        json!({
            "icon": "🧾",
            "title": "請求書処理の遅延",
            "details": ["紙の請求書", "二重入力"],
            "painLevel": "高",
            "relatedPattern": "事務作業3時間事例"
        })
    }

    #[test]
    fn test_absent_candidate_yields_padded_defaults() {
        let c = completer();
        let record = c.complete(None);
        let tables = DefaultTables::canonical();
        assert_eq!(record.problems, tables.problems[..3].to_vec());
        assert_eq!(record.solutions, tables.solutions[..4].to_vec());
        assert_eq!(record.next_actions, tables.next_actions[..1].to_vec());
        assert_eq!(record.company_info, tables.company_info);
        assert_eq!(record.cost, tables.cost);
    }

    #[test]
    fn test_one_problem_is_padded_with_pool_entries_one_and_two() {
        let c = completer();
        let candidate = json!({ "problems": [supplied_problem()] });
        let record = c.complete(Some(&candidate));
        let tables = DefaultTables::canonical();

        assert_eq!(record.problems.len(), 3);
        assert_eq!(record.problems[0].title, "請求書処理の遅延");
        assert_eq!(record.problems[0].pain_level, Level::High);
        assert_eq!(record.problems[1], tables.problems[1]);
        assert_eq!(record.problems[2], tables.problems[2]);
    }

    #[test]
    fn test_padding_is_deterministic() {
        let c = completer();
        let candidate = json!({ "solutions": [
            {"icon": "🧮", "name": "会計連携", "description": "freee連携", "tools": ["freee"],
             "features": [], "expectedKPI": "入力50%削減", "priority": "中"}
        ]});
        let first = c.complete(Some(&candidate));
        let second = c.complete(Some(&candidate));
        assert_eq!(first.solutions, second.solutions);
        assert_eq!(first.solutions[1..], DefaultTables::canonical().solutions[1..4]);
    }

    #[test]
    fn test_over_length_lists_pass_through() {
        let c = completer();
        let problems: Vec<Value> = (0..9).map(|_| supplied_problem()).collect();
        let candidate = json!({ "problems": problems });
        let record = c.complete(Some(&candidate));
        assert_eq!(record.problems.len(), 9);
    }

    #[test]
    fn test_partial_company_info_keeps_supplied_values() {
        let c = completer();
        let candidate = json!({ "companyInfo": { "name": "サンプル商事", "industry": "小売" } });
        let record = c.complete(Some(&candidate));
        assert_eq!(record.company_info.name, "サンプル商事");
        assert_eq!(record.company_info.industry, "小売");
        assert_eq!(record.company_info.size, "");
    }

    #[test]
    fn test_problems_with_missing_leaves_are_kept() {
        let c = completer();
        let candidate = json!({ "problems": [
            {"title": "在庫管理の属人化", "details": ["担当者しか把握していない"], "impact": "high"},
            {"icon": "📦", "title": "発注ミス", "details": ["手入力"], "painLevel": "High"}
        ]});
        let record = c.complete(Some(&candidate));
        let titles: Vec<&str> = record.problems.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles[..2], ["在庫管理の属人化", "発注ミス"]);
        assert_eq!(record.problems[0].pain_level, Level::Medium);
        assert_eq!(record.problems[1].pain_level, Level::High);
        assert_eq!(record.problems[2], DefaultTables::canonical().problems[2]);
    }

    #[test]
    fn test_partial_solution_and_title_are_kept() {
        let c = completer();
        let candidate = json!({
            "solutions": [{"name": "在庫DB", "tools": ["kintone"], "priority": "HIGH"}],
            "proposal": {"title": "在庫DX提案"}
        });
        let record = c.complete(Some(&candidate));
        assert_eq!(record.solutions[0].name, "在庫DB");
        assert_eq!(record.solutions[0].priority, Level::High);
        assert_eq!(record.solutions.len(), 4);
        assert_eq!(record.proposal.title, "在庫DX提案");
        assert_eq!(record.proposal.subtitle, "");
    }

    #[test]
    fn test_empty_objects_are_replaced_whole() {
        let c = completer();
        let candidate = json!({ "companyInfo": {}, "effects": {}, "proposal": {"subtitle": "副題"} });
        let record = c.complete(Some(&candidate));
        let tables = DefaultTables::canonical();
        assert_eq!(record.company_info, tables.company_info);
        assert_eq!(record.effects, tables.effects);
        assert_eq!(record.proposal, tables.proposal);
    }

    #[test]
    fn test_cost_without_amounts_is_replaced_whole() {
        let c = completer();
        let candidate = json!({ "cost": { "initial": 1200000 } });
        let record = c.complete(Some(&candidate));
        assert_eq!(record.cost, DefaultTables::canonical().cost);
    }

    #[test]
    fn test_complete_object_is_kept() {
        let c = completer();
        let candidate = json!({ "cost": {
            "initial": "¥1,200,000",
            "initialDetails": "設計・構築",
            "monthly": 30000,
            "monthlyDetails": "保守",
            "licenses": "kintone 1,500円/人",
            "subsidy": "IT導入補助金50%",
            "roi": "8ヶ月で回収"
        }});
        let record = c.complete(Some(&candidate));
        assert_eq!(record.cost.initial, 1_200_000);
        assert_eq!(record.cost.monthly, 30_000);
        assert_eq!(record.cost.roi, "8ヶ月で回収");
    }

    #[test]
    fn test_zero_week_schedule_is_replaced() {
        let c = completer();
        let candidate = json!({ "schedule": {
            "totalWeeks": 8,
            "phases": [{"name": "構築", "weeks": 0, "description": "開発"}]
        }});
        let record = c.complete(Some(&candidate));
        assert_eq!(record.schedule, DefaultTables::canonical().schedule);
    }

    #[test]
    fn test_malformed_entries_are_dropped_before_padding() {
        let c = completer();
        let candidate = json!({ "problems": [
            "not an object",
            supplied_problem(),
            {"icon": "❓", "title": "詳細なし", "details": [], "painLevel": "低", "relatedPattern": ""}
        ]});
        let record = c.complete(Some(&candidate));
        assert_eq!(record.problems.len(), 3);
        assert_eq!(record.problems[0].title, "請求書処理の遅延");
        assert_eq!(record.problems[1], DefaultTables::canonical().problems[1]);
    }

    #[test]
    fn test_non_array_list_counts_as_absent() {
        let c = completer();
        let candidate = json!({ "nextActions": "デモ実施" });
        let record = c.complete(Some(&candidate));
        assert_eq!(record.next_actions, DefaultTables::canonical().next_actions[..1].to_vec());
    }

    #[test]
    fn test_blank_company_name_uses_placeholder() {
        let c = completer();
        let candidate = json!({ "companyInfo": {
            "name": "  ", "industry": "製造業", "size": "50名", "currentSituation": "Excel管理"
        }});
        let record = c.complete(Some(&candidate));
        assert_eq!(record.company_info.name, "御社");
        assert_eq!(record.company_info.industry, "製造業");
    }

    #[test]
    fn test_tools_are_deduplicated() {
        let c = completer();
        let candidate = json!({ "solutions": [
            {"icon": "💼", "name": "顧客管理", "description": "一元管理",
             "tools": ["kintone", "Slack", "kintone"], "features": ["検索"],
             "expectedKPI": "70%削減", "priority": "high"}
        ]});
        let record = c.complete(Some(&candidate));
        assert_eq!(record.solutions[0].tools, vec!["kintone", "Slack"]);
    }

    #[test]
    fn test_non_object_candidate_is_treated_as_empty() {
        let c = completer();
        let record = c.complete(Some(&json!([1, 2, 3])));
        assert_eq!(record, c.complete(None));
    }

    #[test]
    fn test_completion_is_idempotent() {
        let c = completer();
        let candidate = json!({
            "problems": [supplied_problem()],
            "nextActions": ["現場視察", "お見積りの作成"]
        });
        let once = c.complete(Some(&candidate));
        let twice = c.complete(Some(&serde_json::to_value(&once).unwrap()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_smaller_injected_pool_is_honoured() {
        let mut tables = (*DefaultTables::canonical()).clone();
        tables.problems.truncate(1);
        let mins = MinCardinalities {
            problems: 1,
            solutions: 1,
            next_actions: 1,
        };
        let c = Completer::new(Arc::new(tables), mins).unwrap();
        let record = c.complete(None);
        assert_eq!(record.problems.len(), 1);
        assert_eq!(record.solutions.len(), 1);
    }

    #[test]
    fn test_pool_smaller_than_minimum_is_rejected() {
        let mut tables = (*DefaultTables::canonical()).clone();
        tables.solutions.truncate(2);
        let err = Completer::new(Arc::new(tables), MinCardinalities::default()).unwrap_err();
        assert_eq!(
            err,
            DefaultsError::PoolTooSmall {
                field: "solutions",
                pool: 2,
                minimum: 4
            }
        );
    }

    #[test]
    fn test_zero_minimum_is_rejected() {
        let mins = MinCardinalities {
            next_actions: 0,
            ..MinCardinalities::default()
        };
        let err = Completer::new(DefaultTables::canonical(), mins).unwrap_err();
        assert_eq!(err, DefaultsError::ZeroMinimum { field: "nextActions" });
    }
}
