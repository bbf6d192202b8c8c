//! Category registry.
//!
//! Categories are kept per transaction kind. Names are unique within a kind
//! once case, accents and spacing are folded away.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ResultEngine, TransactionKind,
    util::{normalize_display, normalize_key, normalize_optional_text},
    validation,
};

pub const DEFAULT_COLOR: &str = "#000000";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub kind: TransactionKind,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNew {
    pub name: Option<String>,
    pub kind: Option<TransactionKind>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub kind: Option<TransactionKind>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl Category {
    pub fn new(input: CategoryNew) -> ResultEngine<Self> {
        let category = Self {
            id: Uuid::new_v4(),
            name: input
                .name
                .as_deref()
                .and_then(normalize_display)
                .unwrap_or_default(),
            kind: input.kind.unwrap_or(TransactionKind::Expense),
            color: input
                .color
                .map(|c| c.trim().to_string())
                .unwrap_or_else(default_color),
            icon: normalize_optional_text(input.icon.as_deref()),
            description: normalize_optional_text(input.description.as_deref()),
        };
        validation::validate_category(&category)?;
        Ok(category)
    }

    pub fn patched(&self, patch: CategoryPatch) -> ResultEngine<Self> {
        let mut category = self.clone();
        if let Some(name) = patch.name {
            category.name = normalize_display(&name).unwrap_or_default();
        }
        if let Some(kind) = patch.kind {
            category.kind = kind;
        }
        if let Some(color) = patch.color {
            category.color = color.trim().to_string();
        }
        if let Some(icon) = patch.icon {
            category.icon = normalize_optional_text(Some(&icon));
        }
        if let Some(description) = patch.description {
            category.description = normalize_optional_text(Some(&description));
        }
        validation::validate_category(&category)?;
        Ok(category)
    }

    /// Key used for uniqueness checks.
    pub(crate) fn name_key(&self) -> Option<String> {
        normalize_key(&self.name)
    }
}
