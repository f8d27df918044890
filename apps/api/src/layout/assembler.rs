//! Document Assembler: projects a complete `ProposalRecord` onto the nine
//! fixed pages.
//!
//! Single pass, no state, no reflow: a long section stays on its page.
//! Every page ends its content with exactly one image slot.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::layout::columns::{columns, SectionKind};
use crate::layout::document::{
    Block, Card, Document, EditableField, Footer, ImageSlot, Page, PageRole,
};
use crate::proposal::record::ProposalRecord;

const DEFAULT_IMAGE_HINT: &str = "画像を追加（クリックまたはドラッグ&ドロップ）";
const ARCHITECTURE_IMAGE_HINT: &str = "システム構成図を追加";

/// The organisation issuing the proposal. Shown on the cover, in every footer
/// and on the contact page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuer {
    pub name: String,
    pub department: String,
    pub email: String,
    pub phone: String,
}

impl Default for Issuer {
    fn default() -> Self {
        Self {
            name: "株式会社ままよろ".to_string(),
            department: "営業部".to_string(),
            email: "contact@mamayoro.com".to_string(),
            phone: "000-0000-0000".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Assembler {
    issuer: Issuer,
}

impl Assembler {
    pub fn new(issuer: Issuer) -> Self {
        Self { issuer }
    }

    pub fn assemble(&self, record: &ProposalRecord, issued_on: NaiveDate) -> Document {
        let pages = PageRole::ORDER
            .iter()
            .map(|role| self.page(*role, record, issued_on))
            .collect();

        let document = Document {
            id: Uuid::new_v4(),
            title: format!("{}様向け提案書", record.company_info.name),
            issuer: self.issuer.name.clone(),
            issued_on,
            pages,
        };
        debug_assert!(document.is_well_formed(), "assembled document breaks the page contract");
        document
    }

    fn page(&self, role: PageRole, record: &ProposalRecord, issued_on: NaiveDate) -> Page {
        let mut content = Vec::new();
        if let Some(text) = role.heading() {
            content.push(heading(1, text));
        }

        content.extend(match role {
            PageRole::Cover => self.cover(record, issued_on),
            PageRole::Index => index(),
            PageRole::Problems => problems(record),
            PageRole::Solutions => solutions(record),
            PageRole::Architecture => architecture(record),
            PageRole::Effects => effects(record),
            PageRole::Schedule => schedule(record),
            PageRole::Cost => cost(record),
            PageRole::NextSteps => self.next_steps(record),
        });

        let hint = match role {
            PageRole::Architecture => ARCHITECTURE_IMAGE_HINT,
            _ => DEFAULT_IMAGE_HINT,
        };
        content.push(Block::ImageSlot(ImageSlot {
            hint: hint.to_string(),
        }));

        let footer = (role != PageRole::Cover).then(|| Footer {
            label: self.issuer.name.clone(),
            page_number: role.number(),
        });

        Page {
            role,
            number: role.number(),
            content,
            footer,
        }
    }

    fn cover(&self, record: &ProposalRecord, issued_on: NaiveDate) -> Vec<Block> {
        vec![
            field("document.issuer", &self.issuer.name),
            field("proposal.title", &record.proposal.title),
            field("proposal.subtitle", &record.proposal.subtitle),
            field(
                "companyInfo.name",
                format!("{}様", record.company_info.name),
            ),
            field("document.issuedOn", format_date(issued_on)),
        ]
    }

    fn next_steps(&self, record: &ProposalRecord) -> Vec<Block> {
        let actions = record
            .next_actions
            .iter()
            .enumerate()
            .map(|(i, action)| {
                card(vec![
                    label((i + 1).to_string()),
                    field(format!("nextActions[{i}]"), action),
                ])
            })
            .collect();

        let contact = [
            ("会社名", "contact.company", &self.issuer.name),
            ("担当", "contact.department", &self.issuer.department),
            ("メール", "contact.email", &self.issuer.email),
            ("電話", "contact.phone", &self.issuer.phone),
        ]
        .into_iter()
        .map(|(caption, path, value)| card(vec![label(caption), field(path, value)]))
        .collect();

        vec![
            grid(SectionKind::NextActions, actions),
            heading(2, "お問い合わせ・ご相談窓口"),
            grid(SectionKind::Contact, contact),
            label("ご不明な点がございましたら、お気軽にお問い合わせください"),
        ]
    }
}

fn index() -> Vec<Block> {
    PageRole::ORDER
        .iter()
        .filter_map(|role| {
            role.index_label().map(|text| Block::IndexEntry {
                label: text.to_string(),
                page: role.number(),
            })
        })
        .collect()
}

fn problems(record: &ProposalRecord) -> Vec<Block> {
    let cards = record
        .problems
        .iter()
        .enumerate()
        .map(|(i, problem)| {
            let mut blocks = vec![
                label(&problem.icon),
                field(format!("problems[{i}].title"), &problem.title),
                label(format!("深刻度: {}", problem.pain_level.label())),
            ];
            blocks.extend(
                problem
                    .details
                    .iter()
                    .enumerate()
                    .map(|(j, detail)| field(format!("problems[{i}].details[{j}]"), detail)),
            );
            card(blocks)
        })
        .collect();

    vec![grid(SectionKind::Problems, cards)]
}

fn solutions(record: &ProposalRecord) -> Vec<Block> {
    let cards = record
        .solutions
        .iter()
        .enumerate()
        .map(|(i, solution)| {
            let mut blocks = vec![
                label(&solution.icon),
                field(format!("solutions[{i}].name"), &solution.name),
                field(format!("solutions[{i}].description"), &solution.description),
            ];
            blocks.extend(
                solution
                    .features
                    .iter()
                    .enumerate()
                    .map(|(j, feature)| field(format!("solutions[{i}].features[{j}]"), feature)),
            );
            blocks.push(field(
                format!("solutions[{i}].expectedKPI"),
                &solution.expected_kpi,
            ));
            blocks.extend(solution.tools.iter().map(label));
            blocks.push(label(format!("優先度: {}", solution.priority.label())));
            card(blocks)
        })
        .collect();

    vec![grid(SectionKind::Solutions, cards)]
}

fn architecture(record: &ProposalRecord) -> Vec<Block> {
    let arch = &record.system_architecture;
    vec![
        heading(2, format!("{}を中心とした統合システム", arch.core)),
        label("コアシステム"),
        field("systemArchitecture.core", &arch.core),
        label("構築アプリ"),
        field("systemArchitecture.apps", arch.apps.join("、")),
        label("外部連携"),
        field("systemArchitecture.integrations", arch.integrations.join("、")),
        label("AI機能"),
        field("systemArchitecture.aiComponents", arch.ai_components.join("、")),
        label("データフロー"),
        field("systemArchitecture.dataFlow", &arch.data_flow),
    ]
}

fn effects(record: &ProposalRecord) -> Vec<Block> {
    let quantitative = record
        .effects
        .quantitative
        .iter()
        .enumerate()
        .map(|(i, effect)| {
            let path = |leaf: &str| format!("effects.quantitative[{i}].{leaf}");
            card(vec![
                field(path("improvement"), &effect.improvement),
                field(path("label"), &effect.label),
                field(path("before"), &effect.before),
                label("→"),
                field(path("after"), &effect.after),
            ])
        })
        .collect();

    let qualitative = record
        .effects
        .qualitative
        .iter()
        .enumerate()
        .map(|(i, text)| card(vec![label("✅"), field(format!("effects.qualitative[{i}]"), text)]))
        .collect();

    vec![
        grid(SectionKind::Effects, quantitative),
        heading(2, "定性効果"),
        grid(SectionKind::QualitativeEffects, qualitative),
    ]
}

fn schedule(record: &ProposalRecord) -> Vec<Block> {
    let phases = record
        .schedule
        .phases
        .iter()
        .enumerate()
        .map(|(i, phase)| {
            card(vec![
                label((i + 1).to_string()),
                field(format!("schedule.phases[{i}].name"), &phase.name),
                field(
                    format!("schedule.phases[{i}].weeks"),
                    format!("{}週間", phase.weeks),
                ),
                field(format!("schedule.phases[{i}].description"), &phase.description),
            ])
        })
        .collect();

    vec![
        label("全体期間"),
        field(
            "schedule.totalWeeks",
            format!("{}週間", record.schedule.total_weeks),
        ),
        grid(SectionKind::Phases, phases),
    ]
}

fn cost(record: &ProposalRecord) -> Vec<Block> {
    let cost = &record.cost;
    let cards = vec![
        card(vec![
            label("初期費用"),
            field("cost.initial", format_yen(cost.initial)),
            field("cost.initialDetails", &cost.initial_details),
            field("cost.subsidy", &cost.subsidy),
        ]),
        card(vec![
            label("月額費用"),
            field("cost.monthly", format!("{}〜", format_yen(cost.monthly))),
            field("cost.monthlyDetails", &cost.monthly_details),
            label("※構築後3ヶ月間無料"),
        ]),
    ];

    vec![
        grid(SectionKind::Costs, cards),
        heading(2, "ライセンス"),
        field("cost.licenses", &cost.licenses),
        heading(2, "ROI（投資対効果）"),
        field("cost.roi", &cost.roi),
    ]
}

fn heading(level: u8, text: impl Into<String>) -> Block {
    Block::Heading {
        level,
        text: text.into(),
    }
}

fn label(text: impl Into<String>) -> Block {
    Block::Static { text: text.into() }
}

fn field(path: impl Into<String>, text: impl Into<String>) -> Block {
    Block::Field(EditableField::new(path, text))
}

fn card(blocks: Vec<Block>) -> Card {
    Card { blocks }
}

fn grid(section: SectionKind, items: Vec<Card>) -> Block {
    Block::Grid {
        section,
        columns: columns(items.len(), section),
        items,
    }
}

/// `3000000` → `¥3,000,000`.
pub fn format_yen(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("¥{grouped}")
}

/// `2024-11-05` → `2024年11月5日`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{}年{}月{}日", date.year(), date.month(), date.day())
}
