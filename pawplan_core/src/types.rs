//! Core domain types for the PawPlan program model.
//!
//! A program is a tree of values:
//! - [`Program`] holds ordered [`Package`]s
//! - a [`Package`] holds ordered [`Module`]s
//! - a [`Module`] holds ordered [`ModuleEntry`]s
//! - a [`ModuleEntry`] places one [`ModuleComponent`] in the module
//!
//! Ids are only used to find things again; nothing is shared by reference.

use crate::allocation::SessionAllocation;
use crate::taxonomy::{LessonConcept, LessonFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use uuid::Uuid;

/// Tagline used when a component has nothing to describe it
pub const FALLBACK_TAGLINE: &str = "onderdeel";

fn default_include() -> bool {
    true
}

// ============================================================================
// Components
// ============================================================================

/// A reusable curriculum fragment
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ModuleComponent {
    #[serde(default)]
    pub concepts: BTreeSet<LessonConcept>,
    #[serde(default)]
    pub format: BTreeSet<LessonFormat>,
    #[serde(default)]
    pub allocation: Option<SessionAllocation>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl ModuleComponent {
    pub fn new(
        concepts: impl IntoIterator<Item = LessonConcept>,
        format: impl IntoIterator<Item = LessonFormat>,
    ) -> Self {
        ModuleComponent {
            concepts: concepts.into_iter().collect(),
            format: format.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_allocation(mut self, allocation: impl Into<SessionAllocation>) -> Self {
        self.allocation = Some(allocation.into());
        self
    }

    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = Some(tagline.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// The format that names this component in a synthesized tagline
    pub fn primary_format(&self) -> Option<LessonFormat> {
        LessonFormat::TAGLINE_PRIORITY
            .into_iter()
            .find(|f| self.format.contains(f))
    }

    /// Concept titles in alphabetical order
    pub fn concept_titles(&self) -> Vec<&'static str> {
        let mut titles: Vec<_> = self.concepts.iter().map(|c| c.title()).collect();
        titles.sort_unstable();
        titles
    }

    /// The explicit tagline, or one built from format and concepts
    pub fn display_tagline(&self) -> String {
        if let Some(tagline) = self.tagline.as_deref().map(str::trim) {
            if !tagline.is_empty() {
                return tagline.to_string();
            }
        }

        let concepts = self.concept_titles().join(", ");
        match (self.primary_format(), concepts.is_empty()) {
            (Some(format), false) => format!("{}: {}", format.title(), concepts),
            (None, false) => concepts,
            (Some(format), true) => format.title().to_string(),
            (None, true) => FALLBACK_TAGLINE.to_string(),
        }
    }
}

// ============================================================================
// Entries, modules and packages
// ============================================================================

/// Whether an entry is a core element or a swappable alternative
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Elementary,
    Exchangeable,
}

impl Placement {
    pub fn title(&self) -> &'static str {
        match self {
            Placement::Elementary => "Basis",
            Placement::Exchangeable => "Uitwisselbaar",
        }
    }
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elementary" => Ok(Placement::Elementary),
            "exchangeable" => Ok(Placement::Exchangeable),
            other => Err(format!("unknown placement '{}'", other)),
        }
    }
}

/// One component placed in a module
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ModuleEntry {
    pub id: Uuid,
    pub component: ModuleComponent,
    pub placement: Placement,
    #[serde(default = "default_include")]
    pub include: bool,
}

impl ModuleEntry {
    pub fn new(component: ModuleComponent, placement: Placement) -> Self {
        ModuleEntry {
            id: Uuid::new_v4(),
            component,
            placement,
            include: true,
        }
    }
}

/// A named group of entries within a package
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Module {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub entries: Vec<ModuleEntry>,
}

impl Module {
    pub fn new(title: Option<String>) -> Self {
        Module {
            id: Uuid::new_v4(),
            title,
            entries: Vec::new(),
        }
    }
}

/// A curriculum bundle, exported as one section of a program document
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Package {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default = "default_include")]
    pub include: bool,
}

impl Package {
    pub fn new(title: impl Into<String>) -> Self {
        Package {
            id: Uuid::new_v4(),
            title: title.into(),
            modules: Vec::new(),
            include: true,
        }
    }

    /// Entries of every module, in display order
    pub fn entries(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.modules.iter().flat_map(|m| m.entries.iter())
    }
}

/// The root aggregate being edited
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Program {
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Packages with `include` set, in program order
    pub fn included_packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter().filter(|p| p.include)
    }
}
