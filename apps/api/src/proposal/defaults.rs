//! Canonical default tables.
//!
//! One immutable, versioned set of hand-authored values shared by every
//! request. The list pools serve two purposes: the completer pads short lists
//! with `pool[current_len]`, and the fallback generator uses the pools whole.
//! Custom tables may be injected wherever the canonical set is accepted.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::proposal::record::{
    CompanyInfo, Cost, Effects, Level, Phase, Problem, ProposalTitle, QuantitativeEffect,
    Schedule, Solution, SystemArchitecture,
};

/// Bumped whenever a canonical value changes.
pub const DEFAULTS_VERSION: &str = "2024.11";

/// Honorific used when the client company's name is unknown.
pub const COMPANY_PLACEHOLDER: &str = "御社";

#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTables {
    pub version: &'static str,
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

static CANONICAL: Lazy<Arc<DefaultTables>> = Lazy::new(|| Arc::new(build_canonical()));

impl DefaultTables {
    /// The shared canonical tables.
    pub fn canonical() -> Arc<DefaultTables> {
        Arc::clone(&CANONICAL)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn problem(icon: &str, title: &str, details: &[&str], pain_level: Level, pattern: &str) -> Problem {
    Problem {
        icon: icon.to_string(),
        title: title.to_string(),
        details: strings(details),
        pain_level,
        related_pattern: pattern.to_string(),
    }
}

fn solution(
    icon: &str,
    name: &str,
    description: &str,
    tools: &[&str],
    features: &[&str],
    kpi: &str,
    priority: Level,
) -> Solution {
    Solution {
        icon: icon.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        tools: strings(tools),
        features: strings(features),
        expected_kpi: kpi.to_string(),
        priority,
    }
}

fn effect(label: &str, before: &str, after: &str, improvement: &str) -> QuantitativeEffect {
    QuantitativeEffect {
        label: label.to_string(),
        before: before.to_string(),
        after: after.to_string(),
        improvement: improvement.to_string(),
    }
}

fn phase(name: &str, weeks: u32, description: &str) -> Phase {
    Phase {
        name: name.to_string(),
        weeks,
        description: description.to_string(),
    }
}

fn build_canonical() -> DefaultTables {
    DefaultTables {
        version: DEFAULTS_VERSION,
        company_info: CompanyInfo {
            name: COMPANY_PLACEHOLDER.to_string(),
            industry: "（業界）".to_string(),
            size: "（規模）".to_string(),
            current_situation: "業務効率化とデジタル化が急務な状況".to_string(),
        },
        problems: vec![
            problem(
                "📊",
                "情報の分散管理",
                &["Excelでの個別管理", "同時編集ができない", "最新版が不明"],
                Level::High,
                "Excel分散管理の事例",
            ),
            problem(
                "⏰",
                "事務作業の負荷",
                &["手作業が多い", "繰り返し作業", "残業の常態化"],
                Level::High,
                "事務作業3時間の事例",
            ),
            problem(
                "🔍",
                "情報検索の困難",
                &["過去データが見つからない", "履歴が追えない", "属人化"],
                Level::Medium,
                "検索時間30分の事例",
            ),
            problem(
                "📝",
                "議事録作成負荷",
                &["作成に時間がかかる", "共有が遅い", "タスク漏れ"],
                Level::High,
                "議事録2時間の事例",
            ),
        ],
        solutions: vec![
            solution(
                "💼",
                "顧客管理システム",
                "kintoneで顧客情報を一元管理し、全社で情報共有",
                &["kintone"],
                &["クラウド管理", "同時編集", "履歴管理"],
                "検索時間70%削減",
                Level::High,
            ),
            solution(
                "🤖",
                "AI議事録",
                "Zoom録画を自動で文字起こし・要約し、タスクも自動抽出",
                &["Zoom", "Claude API"],
                &["自動文字起こし", "要約生成", "タスク抽出"],
                "議事録作成100%自動化",
                Level::High,
            ),
            solution(
                "📋",
                "タスク管理",
                "タスクの見える化と自動リマインドで確実な実行",
                &["kintone", "Slack"],
                &["カンバンボード", "自動通知", "進捗管理"],
                "タスク実行率85%向上",
                Level::Medium,
            ),
            solution(
                "🔄",
                "ワークフロー",
                "申請・承認フローを電子化し、処理時間を短縮",
                &["kintone"],
                &["電子承認", "自動通知", "履歴管理"],
                "承認時間60%削減",
                Level::Medium,
            ),
            solution(
                "📊",
                "ダッシュボード",
                "リアルタイムで経営指標を可視化",
                &["kintone"],
                &["リアルタイム更新", "グラフ表示", "KPI管理"],
                "レポート作成90%削減",
                Level::Low,
            ),
        ],
        system_architecture: SystemArchitecture {
            core: "kintone".to_string(),
            apps: strings(&["顧客管理", "案件管理", "タスク管理", "議事録管理", "申請管理"]),
            integrations: strings(&["Google Calendar", "Zoom", "LINE", "Slack", "メール"]),
            ai_components: strings(&["議事録AI", "検索AI", "分析AI"]),
            data_flow: "全データをkintoneに集約、必要に応じて各ツールと自動連携".to_string(),
        },
        effects: Effects {
            quantitative: vec![
                effect("事務作業時間", "3時間/日", "30分/日", "80%削減"),
                effect("情報検索時間", "30分/回", "3分/回", "90%削減"),
                effect("議事録作成", "2時間/回", "0分", "100%自動化"),
            ],
            qualitative: strings(&[
                "情報の一元化で属人化を解消",
                "リアルタイムな情報共有を実現",
                "顧客対応スピードの向上",
                "データに基づく意思決定",
                "働き方改革の推進",
            ]),
        },
        schedule: Schedule {
            total_weeks: 12,
            phases: vec![
                phase("要件定義", 2, "現状分析とゴール設定"),
                phase("設計", 2, "システム・データ設計"),
                phase("構築", 4, "アプリ開発・連携構築"),
                phase("テスト", 2, "動作確認・調整"),
                phase("導入", 2, "データ移行・研修"),
            ],
        },
        cost: Cost {
            initial: 3_000_000,
            initial_details: "要件定義・設計・構築・導入支援".to_string(),
            monthly: 50_000,
            monthly_details: "保守サポート・機能追加対応".to_string(),
            licenses: "kintone: 1,500円/ユーザー/月".to_string(),
            subsidy: "IT導入補助金で最大50%補助（最大450万円）".to_string(),
            roi: "6ヶ月で投資回収見込み".to_string(),
        },
        next_actions: strings(&[
            "詳細ヒアリングの実施（現場課題の深掘り）",
            "デモンストレーション実施",
            "概算見積りとROI試算の提示",
        ]),
        proposal: ProposalTitle {
            title: "業務効率化システム導入提案書".to_string(),
            subtitle: "kintone×AIで実現する次世代DX".to_string(),
        },
    }
}
