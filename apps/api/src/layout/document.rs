//! Document model handed to the renderer/exporter.
//!
//! Contract: exactly nine pages in `PageRole::ORDER`, one image slot per page
//! as the last content block, and a footer on every page but the cover.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::columns::{columns, SectionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageRole {
    Cover,
    Index,
    Problems,
    Solutions,
    Architecture,
    Effects,
    Schedule,
    Cost,
    NextSteps,
}

impl PageRole {
    pub const ORDER: [PageRole; 9] = [
        PageRole::Cover,
        PageRole::Index,
        PageRole::Problems,
        PageRole::Solutions,
        PageRole::Architecture,
        PageRole::Effects,
        PageRole::Schedule,
        PageRole::Cost,
        PageRole::NextSteps,
    ];

    /// 1-based page number, fixed by role.
    pub fn number(self) -> u8 {
        PageRole::ORDER
            .iter()
            .position(|r| *r == self)
            .map_or(0, |i| i as u8 + 1)
    }

    /// Section heading; the cover has none.
    pub fn heading(self) -> Option<&'static str> {
        match self {
            PageRole::Cover => None,
            PageRole::Index => Some("目次"),
            PageRole::Problems => Some("現状の課題"),
            PageRole::Solutions => Some("ソリューション概要"),
            PageRole::Architecture => Some("システム構成図"),
            PageRole::Effects => Some("期待される導入効果"),
            PageRole::Schedule => Some("導入スケジュール"),
            PageRole::Cost => Some("導入費用"),
            PageRole::NextSteps => Some("次のステップ"),
        }
    }

    /// Label used for this page in the index.
    pub fn index_label(self) -> Option<&'static str> {
        match self {
            PageRole::Cover | PageRole::Index => None,
            PageRole::NextSteps => Some("お問い合わせ"),
            other => other.heading(),
        }
    }
}

/// A leaf text value meant for in-place human editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableField {
    /// Record path, e.g. `problems[0].details[1]`.
    pub path: String,
    pub text: String,
}

impl EditableField {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSlot {
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Fixed heading. `level` 1 is the page title.
    Heading { level: u8, text: String },
    /// Structural text: icons, labels, tags. Not editable.
    Static { text: String },
    /// Index row pointing at another page.
    IndexEntry { label: String, page: u8 },
    Field(EditableField),
    Grid {
        section: SectionKind,
        columns: u8,
        items: Vec<Card>,
    },
    ImageSlot(ImageSlot),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    pub label: String,
    pub page_number: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub role: PageRole,
    pub number: u8,
    pub content: Vec<Block>,
    pub footer: Option<Footer>,
}

impl Page {
    /// All editable fields on the page, in reading order.
    pub fn editable_fields(&self) -> Vec<&EditableField> {
        let mut fields = Vec::new();
        collect_fields(&self.content, &mut fields);
        fields
    }

    pub fn image_slot_count(&self) -> usize {
        count_image_slots(&self.content)
    }

    /// Grid shapes on the page as `(section, columns, item count)`.
    pub fn grids(&self) -> Vec<(SectionKind, u8, usize)> {
        self.content
            .iter()
            .filter_map(|block| match block {
                Block::Grid {
                    section,
                    columns,
                    items,
                } => Some((*section, *columns, items.len())),
                _ => None,
            })
            .collect()
    }
}

fn collect_fields<'a>(blocks: &'a [Block], out: &mut Vec<&'a EditableField>) {
    for block in blocks {
        match block {
            Block::Field(field) => out.push(field),
            Block::Grid { items, .. } => {
                for card in items {
                    collect_fields(&card.blocks, out);
                }
            }
            _ => {}
        }
    }
}

fn count_image_slots(blocks: &[Block]) -> usize {
    blocks
        .iter()
        .map(|block| match block {
            Block::ImageSlot(_) => 1,
            Block::Grid { items, .. } => items.iter().map(|c| count_image_slots(&c.blocks)).sum(),
            _ => 0,
        })
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    /// Browser tab / file title, e.g. `サンプル様向け提案書`.
    pub title: String,
    pub issuer: String,
    pub issued_on: NaiveDate,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page(&self, role: PageRole) -> Option<&Page> {
        self.pages.iter().find(|p| p.role == role)
    }

    /// Checks the page contract: the nine roles in order, one image slot per
    /// page as the last block, a footer everywhere but the cover, grid widths
    /// matching the column policy and a path on every editable field.
    pub fn is_well_formed(&self) -> bool {
        let roles_in_order = self.pages.len() == PageRole::ORDER.len()
            && PageRole::ORDER.iter().all(|role| {
                self.page(*role)
                    .is_some_and(|page| page.number == role.number())
            });

        roles_in_order
            && self.pages.iter().all(|page| {
                page.image_slot_count() == 1
                    && matches!(page.content.last(), Some(Block::ImageSlot(_)))
                    && page.footer.is_none() == (page.role == PageRole::Cover)
                    && page
                        .grids()
                        .into_iter()
                        .all(|(section, cols, items)| cols == columns(items, section))
                    && page.editable_fields().iter().all(|f| !f.path.is_empty())
            })
    }
}
