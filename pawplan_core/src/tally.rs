//! Session tally across a program.
//!
//! Walks every included package → module → entry whose placement is
//! selected and sums the component allocations. The caller picks which two
//! of the three accumulated anchors (low, medium, high) form the estimate.

use crate::allocation::{MinuteRange, SessionRange};
use crate::types::{ModuleEntry, Package, Placement, Program};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which two accumulated anchors become the estimate range
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    #[default]
    LowHigh,
    LowMedium,
    MediumHigh,
}

impl Band {
    fn select(&self, totals: &SessionTotals) -> (f64, f64) {
        match self {
            Band::LowHigh => (totals.low, totals.high),
            Band::LowMedium => (totals.low, totals.medium),
            Band::MediumHigh => (totals.medium, totals.high),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Band::LowHigh => "low_high",
            Band::LowMedium => "low_medium",
            Band::MediumHigh => "medium_high",
        };
        f.write_str(name)
    }
}

impl FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "low_high" => Ok(Band::LowHigh),
            "low_medium" => Ok(Band::LowMedium),
            "medium_high" => Ok(Band::MediumHigh),
            other => Err(format!("unknown band '{}'", other)),
        }
    }
}

/// Unrounded low/medium/high session sums
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionTotals {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

fn counts(entry: &ModuleEntry, placements: &[Placement]) -> bool {
    entry.include && placements.contains(&entry.placement)
}

fn counted_minutes<'a>(
    packages: impl Iterator<Item = &'a Package>,
    placements: &'a [Placement],
) -> impl Iterator<Item = &'a MinuteRange> {
    packages
        .filter(|p| p.include)
        .flat_map(|p| p.entries())
        .filter(move |e| counts(e, placements))
        .filter_map(|e| e.component.allocation.as_ref().map(|a| a.minutes()))
}

/// Sum the low, effective medium and high sessions of every counted entry
pub fn session_totals(
    program: &Program,
    session_duration: u32,
    placements: &[Placement],
) -> SessionTotals {
    sum_sessions(program.packages.iter(), session_duration, placements)
}

fn sum_sessions<'a>(
    packages: impl Iterator<Item = &'a Package>,
    session_duration: u32,
    placements: &'a [Placement],
) -> SessionTotals {
    counted_minutes(packages, placements).fold(SessionTotals::default(), |acc, minutes| {
        let range = minutes.session_range(session_duration);
        SessionTotals {
            low: acc.low + range.low,
            medium: acc.medium + range.effective_medium(),
            high: acc.high + range.high,
        }
    })
}

fn banded(totals: &SessionTotals, band: Band) -> SessionRange {
    let (low, high) = band.select(totals);
    SessionRange::span(low.round(), high.round())
}

/// Estimated session range for the program.
///
/// The bounds are rounded half away from zero, so the result is always
/// integer valued; `medium` is never set.
pub fn sessions(
    program: &Program,
    session_duration: u32,
    band: Band,
    placements: &[Placement],
) -> SessionRange {
    let totals = session_totals(program, session_duration, placements);
    let range = banded(&totals, band);
    tracing::debug!(
        "Tally {} at {} min/session over {:?}: {:?} -> {}..{}",
        band,
        session_duration,
        placements,
        totals,
        range.low,
        range.high
    );
    range
}

/// Raw minute sums (low and high only) for the program
pub fn minutes(program: &Program, placements: &[Placement]) -> MinuteRange {
    let (low, high) = counted_minutes(program.packages.iter(), placements)
        .fold((0i64, 0i64), |(low, high), m| {
            (low + m.low() as i64, high + m.high() as i64)
        });
    MinuteRange::span(low, high)
}

/// Tally of a single package, used for breakdown reports
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PackageTally {
    pub title: String,
    pub minutes_low: u32,
    pub minutes_high: u32,
    pub sessions_low: f64,
    pub sessions_high: f64,
}

/// Per-package tallies for every included package, in program order
pub fn package_tallies(
    program: &Program,
    session_duration: u32,
    band: Band,
    placements: &[Placement],
) -> Vec<PackageTally> {
    program
        .included_packages()
        .map(|package| {
            let minutes = counted_minutes(std::iter::once(package), placements)
                .fold((0u32, 0u32), |(low, high), m| {
                    (low.saturating_add(m.low()), high.saturating_add(m.high()))
                });
            let range = banded(
                &sum_sessions(std::iter::once(package), session_duration, placements),
                band,
            );
            PackageTally {
                title: package.title.clone(),
                minutes_low: minutes.0,
                minutes_high: minutes.1,
                sessions_low: range.low,
                sessions_high: range.high,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;
    use crate::taxonomy::{LessonConcept, LessonFormat};
    use crate::types::{Module, ModuleComponent};

    const ELEMENTARY: &[Placement] = &[Placement::Elementary];
    const BOTH: &[Placement] = &[Placement::Elementary, Placement::Exchangeable];

    fn program_with(entries: Vec<(MinuteRange, Placement)>) -> Program {
        let mut module = Module::new(None);
        for (range, placement) in entries {
            module.add_entry(
                ModuleComponent::new([LessonConcept::Sit], [LessonFormat::Exercise])
                    .with_allocation(range),
                placement,
            );
        }
        let mut package = crate::types::Package::new("Test");
        package.add_module(module);
        let mut program = Program::new();
        program.add_package(package);
        program
    }

    #[test]
    fn test_single_entry_low_high() {
        crate::logging::init_test();
        let program = program_with(vec![(MinuteRange::span(60, 120), Placement::Elementary)]);
        let range = sessions(&program, 60, Band::LowHigh, ELEMENTARY);
        assert_eq!(range, SessionRange::span(1.0, 2.0));
    }

    #[test]
    fn test_excluded_entry_contributes_nothing() {
        let mut program =
            program_with(vec![(MinuteRange::span(60, 120), Placement::Elementary)]);
        let id = program.packages[0].modules[0].entries[0].id;
        program.set_entry_include(id, false);
        assert_eq!(
            sessions(&program, 60, Band::LowHigh, ELEMENTARY),
            SessionRange::span(0.0, 0.0)
        );
    }

    #[test]
    fn test_unselected_placement_contributes_nothing() {
        let program = program_with(vec![(MinuteRange::span(60, 120), Placement::Exchangeable)]);
        assert_eq!(
            sessions(&program, 60, Band::LowHigh, ELEMENTARY),
            SessionRange::span(0.0, 0.0)
        );
        assert_eq!(
            sessions(&program, 60, Band::LowHigh, BOTH),
            SessionRange::span(1.0, 2.0)
        );
    }

    #[test]
    fn test_excluded_package_contributes_nothing() {
        let mut program = program_with(vec![(MinuteRange::span(60, 120), Placement::Elementary)]);
        program.packages[0].include = false;
        assert_eq!(minutes(&program, BOTH), MinuteRange::span(0, 0));
        assert_eq!(
            sessions(&program, 60, Band::LowHigh, BOTH),
            SessionRange::span(0.0, 0.0)
        );
    }

    #[test]
    fn test_bands_select_anchors() {
        let program = program_with(vec![
            (MinuteRange::new(60, Some(90), Some(180)), Placement::Elementary),
            (MinuteRange::span(60, 120), Placement::Elementary),
        ]);
        // low = 1 + 1 = 2, medium = 1.5 + 1.5 = 3, high = 3 + 2 = 5
        let totals = session_totals(&program, 60, ELEMENTARY);
        assert_eq!(totals, SessionTotals { low: 2.0, medium: 3.0, high: 5.0 });

        assert_eq!(
            sessions(&program, 60, Band::LowHigh, ELEMENTARY),
            SessionRange::span(2.0, 5.0)
        );
        assert_eq!(
            sessions(&program, 60, Band::LowMedium, ELEMENTARY),
            SessionRange::span(2.0, 3.0)
        );
        assert_eq!(
            sessions(&program, 60, Band::MediumHigh, ELEMENTARY),
            SessionRange::span(3.0, 5.0)
        );
    }

    #[test]
    fn test_result_is_rounded_half_away_from_zero() {
        let program = program_with(vec![
            (MinuteRange::span(45, 75), Placement::Elementary),
            (MinuteRange::span(45, 75), Placement::Elementary),
            (MinuteRange::span(0, 0), Placement::Elementary),
        ]);
        // 1.5 .. 2.5 sessions
        let range = sessions(&program, 60, Band::LowHigh, ELEMENTARY);
        assert_eq!(range, SessionRange::span(2.0, 3.0));
        assert_eq!(range.medium, None);
    }

    #[test]
    fn test_entries_without_allocation_are_skipped() {
        let mut program = program_with(vec![(MinuteRange::span(60, 60), Placement::Elementary)]);
        program.packages[0].modules[0]
            .add_entry(ModuleComponent::default(), Placement::Elementary);
        assert_eq!(minutes(&program, ELEMENTARY), MinuteRange::span(60, 60));
        assert_eq!(
            sessions(&program, 60, Band::LowHigh, ELEMENTARY),
            SessionRange::span(1.0, 1.0)
        );
    }

    #[test]
    fn test_minutes_sums_low_and_high() {
        let program = program_with(vec![
            (MinuteRange::new(10, Some(15), Some(20)), Placement::Elementary),
            (MinuteRange::span(30, 50), Placement::Exchangeable),
        ]);
        assert_eq!(minutes(&program, ELEMENTARY), MinuteRange::span(10, 20));
        assert_eq!(minutes(&program, BOTH), MinuteRange::span(40, 70));
    }

    #[test]
    fn test_package_tallies_follow_program_order() {
        let catalog = get_default_catalog();
        let mut program = Program::new();
        program.add_package(catalog.instantiate_package("basic_obedience").unwrap());
        program.add_package(catalog.instantiate_package("enrichment").unwrap());
        let skipped = program.add_package(catalog.instantiate_package("puppy_start").unwrap());
        program.set_package_include(skipped, false);

        let rows = package_tallies(&program, 60, Band::LowHigh, ELEMENTARY);
        let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Basisgehoorzaamheid", "Verrijking"]);

        let total = minutes(&program, ELEMENTARY);
        assert_eq!(
            rows.iter().map(|r| r.minutes_low).sum::<u32>(),
            total.low()
        );
        assert!(rows.iter().all(|r| r.sessions_low <= r.sessions_high));
    }

    #[test]
    fn test_band_parsing() {
        assert_eq!("low-high".parse::<Band>(), Ok(Band::LowHigh));
        assert_eq!("MEDIUM_HIGH".parse::<Band>(), Ok(Band::MediumHigh));
        assert!("wide".parse::<Band>().is_err());
        assert_eq!(Band::LowMedium.to_string(), "low_medium");
    }
}
