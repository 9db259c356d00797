//! Export overview for the external document renderer.
//!
//! The renderer receives a [`RenderBundle`]: a summary box ([`OverviewData`])
//! plus the included part of the program tree with display text already
//! resolved. Layout, styling and currency formatting are the renderer's job.
//!
//! The price shown in the document bills the tally's *high* bound plus
//! travel with no margin. This is intentionally not the interactive quote
//! from [`crate::pricing`] with its strategy and margin settings.

use crate::allocation::RangeSummary;
use crate::config::Config;
use crate::pricing::{self, PricingBreakdown, PricingInput, PricingStrategy};
use crate::tally::{self, Band};
use crate::types::{ModuleEntry, Placement, Program};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use uuid::Uuid;

/// Shown when the identity source has no name
pub const IDENTITY_PLACEHOLDER: &str = "—";

/// Used when the configured date pattern is not a valid strftime pattern
pub const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Settings for building an overview
#[derive(Clone, Debug, PartialEq)]
pub struct OverviewOptions {
    pub date: NaiveDate,
    pub date_format: String,
    pub client_name: Option<String>,
    pub dog_name: Option<String>,
    pub session_duration: u32,
    pub band: Band,
    pub placements: Vec<Placement>,
    pub include_price_in_program: bool,
    pub session_rate: f64,
    pub home_sessions: f64,
    pub travel_distance_km: f64,
    pub travel_rate_per_km: f64,
}

impl OverviewOptions {
    /// Options taken from configuration, for the given document date
    pub fn from_config(config: &Config, date: NaiveDate) -> Self {
        OverviewOptions {
            date,
            date_format: config.export.date_format.clone(),
            client_name: None,
            dog_name: None,
            session_duration: config.tally.session_duration_minutes,
            band: config.tally.band,
            placements: config.tally.placements.clone(),
            include_price_in_program: config.export.include_price_in_program,
            session_rate: config.pricing.session_rate,
            home_sessions: config.pricing.home_sessions,
            travel_distance_km: config.pricing.travel_distance_km,
            travel_rate_per_km: config.pricing.travel_rate_per_km,
        }
    }
}

/// Summary box at the top of the exported document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverviewData {
    pub date: NaiveDate,
    pub date_label: String,
    pub client_name: String,
    pub dog_name: String,
    pub estimated_sessions: Option<(i64, i64)>,
    pub included_package_titles: Option<Vec<String>>,
    pub price: Option<PricingBreakdown>,
}

/// One entry as the renderer shows it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: Uuid,
    pub tagline: String,
    pub details: Option<String>,
    pub caption: Option<String>,
    pub formats: Vec<String>,
    pub concepts: Vec<String>,
    pub placement: Placement,
    pub allocation: Option<RangeSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentModule {
    pub id: Uuid,
    pub title: Option<String>,
    pub entries: Vec<DocumentEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentPackage {
    pub id: Uuid,
    pub title: String,
    pub modules: Vec<DocumentModule>,
}

/// Everything handed to the document renderer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderBundle {
    pub overview: OverviewData,
    pub packages: Vec<DocumentPackage>,
}

/// Trim a name from the identity source, falling back to the placeholder
pub fn identity_or_placeholder(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => IDENTITY_PLACEHOLDER.to_string(),
    }
}

/// Render the date with `pattern`, or ISO format if the pattern is invalid
pub fn date_label(date: NaiveDate, pattern: &str) -> String {
    let mut label = String::new();
    let valid = !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error));
    // time fields on a plain date fail at write time rather than parse time
    if valid && write!(label, "{}", date.format(pattern)).is_ok() {
        label
    } else {
        tracing::warn!(
            "Invalid date format '{}', using {}",
            pattern,
            FALLBACK_DATE_FORMAT
        );
        date.format(FALLBACK_DATE_FORMAT).to_string()
    }
}

/// The program restricted to packages with `include` set
pub fn included_program(program: &Program) -> Program {
    Program {
        packages: program.included_packages().cloned().collect(),
    }
}

/// Build the summary box for an exported program
pub fn build_overview(program: &Program, options: &OverviewOptions) -> OverviewData {
    let program = included_program(program);

    let range = tally::sessions(
        &program,
        options.session_duration,
        options.band,
        &options.placements,
    );
    let low = range.low.round() as i64;
    let high = range.high.round() as i64;
    let estimated_sessions = if low == 0 && high == 0 {
        None
    } else {
        Some((low, high))
    };

    let titles: Vec<String> = program.packages.iter().map(|p| p.title.clone()).collect();
    let included_package_titles = if titles.is_empty() { None } else { Some(titles) };

    let priced_sessions = high.max(0) as f64;
    let price = if !options.include_price_in_program
        || (priced_sessions == 0.0 && options.home_sessions <= 0.0)
    {
        None
    } else {
        Some(pricing::price(&PricingInput {
            band_low: priced_sessions,
            band_high: priced_sessions,
            strategy: PricingStrategy::Midpoint,
            midpoint_margin_percent: 0.0,
            weighted_high_weight_percent: 100.0,
            weighted_margin_percent: 0.0,
            session_rate: options.session_rate,
            home_sessions: options.home_sessions,
            travel_distance_km: options.travel_distance_km,
            travel_rate_per_km: options.travel_rate_per_km,
        }))
    };

    tracing::debug!(
        "Overview: {} packages, sessions {:?}, priced: {}",
        program.packages.len(),
        estimated_sessions,
        price.is_some()
    );

    OverviewData {
        date: options.date,
        date_label: date_label(options.date, &options.date_format),
        client_name: identity_or_placeholder(options.client_name.as_deref()),
        dog_name: identity_or_placeholder(options.dog_name.as_deref()),
        estimated_sessions,
        included_package_titles,
        price,
    }
}

fn document_entry(entry: &ModuleEntry, session_duration: u32) -> DocumentEntry {
    let component = &entry.component;
    DocumentEntry {
        id: entry.id,
        tagline: component.display_tagline(),
        details: component.details.clone(),
        caption: component.caption.clone(),
        formats: component.format.iter().map(|f| f.title().to_string()).collect(),
        concepts: component
            .concept_titles()
            .into_iter()
            .map(String::from)
            .collect(),
        placement: entry.placement,
        allocation: component
            .allocation
            .as_ref()
            .map(|a| a.minutes().summary(session_duration)),
    }
}

/// Build the overview and the included document tree
pub fn build_bundle(program: &Program, options: &OverviewOptions) -> RenderBundle {
    let overview = build_overview(program, options);
    let packages = program
        .included_packages()
        .map(|package| DocumentPackage {
            id: package.id,
            title: package.title.clone(),
            modules: package
                .modules
                .iter()
                .map(|module| DocumentModule {
                    id: module.id,
                    title: module.title.clone(),
                    entries: module
                        .entries
                        .iter()
                        .filter(|e| e.include)
                        .map(|e| document_entry(e, options.session_duration))
                        .collect(),
                })
                .collect(),
        })
        .collect();

    RenderBundle { overview, packages }
}
