#![forbid(unsafe_code)]

//! Core domain model and business logic for PawPlan.
//!
//! This crate provides:
//! - Allocation ranges (minutes ↔ sessions)
//! - Curriculum taxonomy and the default catalog
//! - The program model and its editing operations
//! - Tally and pricing engines
//! - Export overview, render bundle and tally report

pub mod allocation;
pub mod taxonomy;
pub mod types;
pub mod program;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod tally;
pub mod pricing;
pub mod overview;
pub mod export;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use allocation::{format_sessions, MinuteRange, SessionAllocation, SessionRange};
pub use taxonomy::{LessonConcept, LessonFormat};
pub use catalog::{build_default_catalog, get_default_catalog, Catalog};
pub use config::Config;
pub use tally::Band;
pub use pricing::{price, PricingBreakdown, PricingInput, PricingStrategy};
pub use overview::{build_bundle, build_overview, OverviewData, OverviewOptions, RenderBundle};
pub use export::{load_program, save_program, write_bundle};
