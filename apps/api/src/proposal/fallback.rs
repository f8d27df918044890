//! Fallback Generator: a complete record built from the transcript alone.
//!
//! Used whenever the model call or extraction fails. It cannot fail itself.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::proposal::defaults::DefaultTables;
use crate::proposal::record::{CompanyInfo, ProposalRecord};

/// A company marker followed by a run of characters up to whitespace or punctuation.
/// Best effort: whatever follows the first marker is taken as the name.
static COMPANY_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:株式会社|会社)\s*([^\s、。,]+)").expect("company name regex is valid")
});

/// Returns the first name captured after a company marker, if any.
pub fn guess_company_name(transcript: &str) -> Option<&str> {
    COMPANY_NAME
        .captures(transcript)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Builds the fallback record: canonical tables used whole, with the company
/// name taken from the transcript when one can be found.
pub fn fallback_record(transcript: &str, tables: &DefaultTables) -> ProposalRecord {
    let name = guess_company_name(transcript)
        .map(str::to_string)
        .unwrap_or_else(|| tables.company_info.name.clone());

    ProposalRecord {
        company_info: CompanyInfo {
            name,
            ..tables.company_info.clone()
        },
        problems: tables.problems.clone(),
        solutions: tables.solutions.clone(),
        system_architecture: tables.system_architecture.clone(),
        effects: tables.effects.clone(),
        schedule: tables.schedule.clone(),
        cost: tables.cost.clone(),
        next_actions: tables.next_actions.clone(),
        proposal: tables.proposal.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::defaults::COMPANY_PLACEHOLDER;

    #[test]
    fn test_company_name_after_kabushiki_kaisha() {
        let record = fallback_record(
            "本日は株式会社サンプルの田中様と打ち合わせ。",
            &DefaultTables::canonical(),
        );
        assert_eq!(record.company_info.name, "サンプルの田中様と打ち合わせ");
    }

    #[test]
    fn test_company_name_stops_at_whitespace() {
        assert_eq!(guess_company_name("株式会社サンプル 営業部"), Some("サンプル"));
        assert_eq!(guess_company_name("株式会社サンプル"), Some("サンプル"));
    }

    #[test]
    fn test_company_name_stops_at_punctuation() {
        assert_eq!(guess_company_name("会社 ABC、来週訪問"), Some("ABC"));
        assert_eq!(guess_company_name("株式会社テスト。以上"), Some("テスト"));
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            guess_company_name("株式会社アルファ と 株式会社ベータ"),
            Some("アルファ")
        );
    }

    #[test]
    fn test_placeholder_when_no_marker() {
        let record = fallback_record("来週までに見積もりを送付する。", &DefaultTables::canonical());
        assert_eq!(record.company_info.name, COMPANY_PLACEHOLDER);
    }

    #[test]
    fn test_fallback_uses_full_pools() {
        let tables = DefaultTables::canonical();
        let record = fallback_record("", &tables);
        assert_eq!(record.problems, tables.problems);
        assert_eq!(record.solutions, tables.solutions);
        assert_eq!(record.effects, tables.effects);
        assert_eq!(record.company_info.industry, tables.company_info.industry);
    }
}
