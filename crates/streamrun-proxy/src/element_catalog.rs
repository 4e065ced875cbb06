// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Element Catalog
//!
//! Maps logical inputs ("PC", "Mobile", "BRB Screen") to element ids of the
//! managed configuration, plus the id of the switch element used to route
//! between them. Rebuilt wholesale from `GET configurations/{id}`; a failed
//! fetch keeps the previous contents.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::upstream::{Element, StreamrunApi};

/// Logical input category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Desktop capture ingest.
    Pc,
    /// Phone ingest.
    Mobile,
    /// "Be right back" holding screen.
    BrbScreen,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 3] = [Category::Pc, Category::Mobile, Category::BrbScreen];

    /// Display label, also the JSON key.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Pc => "PC",
            Category::Mobile => "Mobile",
            Category::BrbScreen => "BRB Screen",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One keyword rule: a title matching any keyword and no exclusion is in `category`.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    /// Category assigned on match.
    pub category: Category,
    /// Lowercase substrings, any of which matches.
    pub keywords: &'static [&'static str],
    /// Lowercase substrings that veto the match.
    pub excludes: &'static [&'static str],
}

impl ClassificationRule {
    /// Whether a lowercased title satisfies this rule.
    pub fn matches(&self, title_lower: &str) -> bool {
        self.keywords.iter().any(|k| title_lower.contains(k))
            && !self.excludes.iter().any(|x| title_lower.contains(x))
    }
}

/// Ordered classification table. First matching rule wins.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        category: Category::Pc,
        keywords: &["pc"],
        // "PC BRB Screen" is a holding screen, not the PC ingest
        excludes: &["screen", "mobile"],
    },
    ClassificationRule {
        category: Category::Mobile,
        keywords: &["mobile"],
        excludes: &[],
    },
    ClassificationRule {
        category: Category::BrbScreen,
        keywords: &["brb", "be right back", "break"],
        excludes: &[],
    },
];

/// Classify an element title, case-insensitively.
pub fn classify(title: &str) -> Option<Category> {
    let title = title.to_lowercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.matches(&title))
        .map(|rule| rule.category)
}

/// Whether an element is the input switch.
pub fn is_switch_element(element: &Element) -> bool {
    element.element_type.eq_ignore_ascii_case("switch")
        || element.id.to_lowercase().contains("switch")
}

/// A classified element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementRecord {
    /// Element title as configured upstream.
    pub name: String,
    /// Element id.
    pub id: String,
    /// Element type.
    #[serde(rename = "type")]
    pub element_type: String,
}

impl From<&Element> for ElementRecord {
    fn from(element: &Element) -> Self {
        Self {
            name: element.title.clone(),
            id: element.id.clone(),
            element_type: element.element_type.clone(),
        }
    }
}

/// Category map as served to the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizedElements {
    /// PC ingest.
    #[serde(rename = "PC")]
    pub pc: Option<ElementRecord>,
    /// Mobile ingest.
    #[serde(rename = "Mobile")]
    pub mobile: Option<ElementRecord>,
    /// Holding screen.
    #[serde(rename = "BRB Screen")]
    pub brb_screen: Option<ElementRecord>,
}

impl CategorizedElements {
    /// Record for a category.
    pub fn get(&self, category: Category) -> Option<&ElementRecord> {
        match category {
            Category::Pc => self.pc.as_ref(),
            Category::Mobile => self.mobile.as_ref(),
            Category::BrbScreen => self.brb_screen.as_ref(),
        }
    }

    fn slot(&mut self, category: Category) -> &mut Option<ElementRecord> {
        match category {
            Category::Pc => &mut self.pc,
            Category::Mobile => &mut self.mobile,
            Category::BrbScreen => &mut self.brb_screen,
        }
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    elements: CategorizedElements,
    switch_target: Option<String>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl CatalogState {
    /// Build from an element list. Later elements overwrite earlier ones in the same slot.
    fn from_elements(elements: &[Element]) -> Self {
        let mut state = CatalogState {
            refreshed_at: Some(Utc::now()),
            ..Default::default()
        };

        for element in elements {
            if let Some(category) = classify(&element.title) {
                *state.elements.slot(category) = Some(ElementRecord::from(element));
            }
            if is_switch_element(element) {
                state.switch_target = Some(element.id.clone());
            }
        }

        state
    }
}

/// Owns the category map and switch target.
pub struct ElementCatalog {
    api: Arc<dyn StreamrunApi>,
    configuration_id: String,
    state: Mutex<CatalogState>,
}

impl ElementCatalog {
    /// Create an empty catalog. Call [`refresh`](Self::refresh) to populate it.
    pub fn new(api: Arc<dyn StreamrunApi>, configuration_id: impl Into<String>) -> Self {
        Self {
            api,
            configuration_id: configuration_id.into(),
            state: Mutex::new(CatalogState::default()),
        }
    }

    /// Re-fetch the configuration and rebuild the catalog.
    ///
    /// On failure the previous contents are kept.
    pub async fn refresh(&self) -> Result<()> {
        let document = match self.api.get_configuration(&self.configuration_id).await {
            Ok(document) => document,
            Err(e) => {
                warn!(
                    configuration_id = %self.configuration_id,
                    error = %e,
                    "Failed to fetch configuration, keeping previous catalog"
                );
                return Err(e.into());
            }
        };

        let elements = &document.configuration.elements;
        debug!(count = elements.len(), "Classifying configuration elements");
        let fresh = CatalogState::from_elements(elements);

        info!(
            pc = fresh.elements.pc.as_ref().map(|e| e.name.as_str()).unwrap_or("-"),
            mobile = fresh.elements.mobile.as_ref().map(|e| e.name.as_str()).unwrap_or("-"),
            brb_screen = fresh.elements.brb_screen.as_ref().map(|e| e.name.as_str()).unwrap_or("-"),
            switch = fresh.switch_target.as_deref().unwrap_or("-"),
            "Element catalog refreshed"
        );

        *self.state.lock().await = fresh;
        Ok(())
    }

    /// Current category map.
    pub async fn categorized(&self) -> CategorizedElements {
        self.state.lock().await.elements.clone()
    }

    /// Switch element id, if one was found.
    pub async fn switch_target(&self) -> Option<String> {
        self.state.lock().await.switch_target.clone()
    }

    /// When the catalog was last rebuilt.
    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.refreshed_at
    }
}
