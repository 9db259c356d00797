//! Default curriculum catalog.
//!
//! The catalog is a static library of keyed components, module templates and
//! package templates. Templates refer to components and modules by key and are
//! turned into fresh program values by [`Catalog::instantiate_package`].

use crate::allocation::{MinuteRange, SessionRange};
use crate::taxonomy::{LessonConcept as C, LessonFormat as F};
use crate::types::{Module, ModuleComponent, ModuleEntry, Package, Placement};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A component in the library, stored under its key
#[derive(Clone, Debug)]
pub struct CatalogComponent {
    pub id: String,
    pub component: ModuleComponent,
}

/// A component reference inside a module template
#[derive(Clone, Debug)]
pub struct TemplateEntry {
    pub component_id: String,
    pub placement: Placement,
}

/// A module blueprint: ordered component references
#[derive(Clone, Debug)]
pub struct ModuleTemplate {
    pub id: String,
    pub title: String,
    pub entries: Vec<TemplateEntry>,
}

/// A package blueprint: ordered module references
#[derive(Clone, Debug)]
pub struct PackageTemplate {
    pub id: String,
    pub title: String,
    pub module_ids: Vec<String>,
}

/// The complete library of components, modules and packages
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub components: HashMap<String, CatalogComponent>,
    pub modules: HashMap<String, ModuleTemplate>,
    pub packages: HashMap<String, PackageTemplate>,
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds a fresh copy of the default catalog
///
/// **Note**: prefer `get_default_catalog()`, which returns a cached reference.
/// This function is retained for tests and for callers that extend the library.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn minutes(low: i64, medium: i64, high: i64) -> MinuteRange {
    MinuteRange::new(low, Some(medium), Some(high))
}

fn entry(component_id: &str, placement: Placement) -> TemplateEntry {
    TemplateEntry {
        component_id: component_id.into(),
        placement,
    }
}

use Placement::{Elementary as E, Exchangeable as X};

fn build_default_catalog_internal() -> Catalog {
    let mut catalog = Catalog::default();

    // ========================================================================
    // Components
    // ========================================================================

    // Intake and preparation
    catalog.add_component(
        "intake_conversation",
        ModuleComponent::new([C::Communication, C::Routine, C::Management], [F::Preparation])
            .with_allocation(minutes(60, 75, 90))
            .with_tagline("Intakegesprek")
            .with_details("Kennismaking, hulpvraag, dagritme en doelen van het gezin in kaart."),
    );
    catalog.add_component(
        "home_setup",
        ModuleComponent::new(
            [C::Management, C::Safety, C::Rest],
            [F::Preparation, F::Comprehension],
        )
        .with_allocation(minutes(20, 30, 45))
        .with_details("Rustplek, hekjes en looproutes in huis afstemmen op de hond."),
    );
    catalog.add_component(
        "gear_advice",
        ModuleComponent::new([C::Gear, C::Safety], [F::Equipment])
            .with_allocation(MinuteRange::span(15, 30))
            .with_tagline("Tuig, lijn en beloningen kiezen"),
    );

    // Puppy foundation
    catalog.add_component(
        "marker_intro",
        ModuleComponent::new(
            [C::MarkerTraining, C::Reward, C::Attention],
            [F::Comprehension, F::Practice],
        )
        .with_allocation(minutes(20, 30, 40))
        .with_details("Een markerwoord laden en timing van de beloning oefenen."),
    );
    catalog.add_component(
        "name_game",
        ModuleComponent::new([C::NameRecognition, C::EyeContact, C::Focus], [F::Exercise])
            .with_allocation(MinuteRange::span(10, 20)),
    );
    catalog.add_component(
        "handling_basics",
        ModuleComponent::new(
            [C::Handling, C::Grooming, C::VetVisit],
            [F::Exercise, F::Demonstration],
        )
        .with_allocation(minutes(15, 20, 30))
        .with_caption("Met coöperatieve signalen"),
    );
    catalog.add_component(
        "house_training",
        ModuleComponent::new([C::HouseTraining, C::Routine, C::Puppyhood], [F::Comprehension])
            .with_allocation(minutes(20, 25, 30))
            .with_details(
                "Schema voor uitlaten, slapen en eten; ongelukjes zonder straf opvangen.",
            ),
    );
    catalog.add_component(
        "crate_intro",
        ModuleComponent::new([C::CrateTraining, C::Relaxation], [F::Practice])
            .with_allocation(SessionRange::span(0.25, 0.5)),
    );
    catalog.add_component(
        "alone_time",
        ModuleComponent::new(
            [C::AloneTime, C::Stress, C::Duration],
            [F::Comprehension, F::Exercise],
        )
        .with_allocation(minutes(30, 45, 60))
        .with_details("Alleen zijn in kleine stappen opbouwen, met camera-observatie."),
    );
    catalog.add_component(
        "biting_play",
        ModuleComponent::new(
            [C::Mouthing, C::Play, C::ImpulseControl],
            [F::Practice, F::Demonstration],
        )
        .with_allocation(MinuteRange::span(15, 30)),
    );

    // Socialisation
    catalog.add_component(
        "habituation_walk",
        ModuleComponent::new([C::Habituation, C::Socialization, C::Fear], [F::Practice])
            .with_allocation(minutes(45, 60, 90))
            .with_caption("Op locatie"),
    );
    catalog.add_component(
        "dog_meeting",
        ModuleComponent::new([C::DogEncounters, C::BodyLanguage, C::Socialization], [F::Practice])
            .with_allocation(MinuteRange::span(30, 60))
            .with_tagline("Ontmoeting met een stabiele hulphond"),
    );
    catalog.add_component(
        "body_language_theory",
        ModuleComponent::new(
            [C::BodyLanguage, C::CalmingSignals, C::Communication],
            [F::Comprehension],
        )
        .with_allocation(MinuteRange::span(30, 45)),
    );

    // Obedience
    catalog.add_component(
        "sit_down_stand",
        ModuleComponent::new([C::Sit, C::Down, C::Stand, C::Luring], [F::Exercise])
            .with_allocation(minutes(30, 40, 60)),
    );
    catalog.add_component(
        "stay_duration",
        ModuleComponent::new([C::Stay, C::Duration, C::Distance, C::Distraction], [F::Exercise])
            .with_allocation(minutes(30, 45, 60))
            .with_details("De drie D's los van elkaar opbouwen voordat ze gecombineerd worden."),
    );
    catalog.add_component(
        "leave_it",
        ModuleComponent::new([C::LeaveIt, C::ImpulseControl, C::Drop], [F::Exercise])
            .with_allocation(MinuteRange::span(20, 30)),
    );
    catalog.add_component(
        "place_settle",
        ModuleComponent::new([C::Place, C::Settle, C::Relaxation], [F::Exercise, F::Practice])
            .with_allocation(minutes(30, 40, 60)),
    );
    catalog.add_component(
        "leash_theory",
        ModuleComponent::new([C::LooseLeashWalking, C::Pulling, C::Gear], [F::Comprehension])
            .with_allocation(MinuteRange::exactly(30)),
    );
    catalog.add_component(
        "leash_practice",
        ModuleComponent::new([C::LooseLeashWalking, C::Generalization], [F::Practice])
            .with_allocation(SessionRange::new(1.0, Some(1.5), Some(3.0)))
            .with_caption("Binnen, tuin en straat"),
    );
    catalog.add_component(
        "heel_demo",
        ModuleComponent::new([C::Heel, C::Focus], [F::Demonstration, F::Exercise])
            .with_allocation(MinuteRange::span(20, 30)),
    );
    catalog.add_component(
        "recall_games",
        ModuleComponent::new([C::Recall, C::Play, C::Motivation], [F::Exercise])
            .with_allocation(minutes(30, 45, 60))
            .with_tagline("Terugroepen als spel"),
    );
    catalog.add_component(
        "recall_proofing",
        ModuleComponent::new([C::Recall, C::Proofing, C::Distraction], [F::Practice])
            .with_allocation(SessionRange::span(1.0, 2.0)),
    );
    catalog.add_component(
        "long_line",
        ModuleComponent::new([C::Recall, C::Safety, C::Gear], [F::Equipment, F::Demonstration])
            .with_allocation(MinuteRange::span(15, 20))
            .with_tagline("Werken met de sleeplijn"),
    );

    // Behaviour support
    catalog.add_component(
        "trigger_distance",
        ModuleComponent::new(
            [C::Reactivity, C::Distance, C::Stress],
            [F::Comprehension, F::Practice],
        )
        .with_allocation(SessionRange::new(1.0, Some(2.0), Some(4.0)))
        .with_details("Werken onder de drempel; afstand tot de trigger per sessie bijstellen."),
    );
    catalog.add_component(
        "pattern_games",
        ModuleComponent::new([C::Reactivity, C::Targeting, C::Focus], [F::Exercise])
            .with_allocation(minutes(30, 45, 60)),
    );
    catalog.add_component(
        "calming_routine",
        ModuleComponent::new(
            [C::Relaxation, C::Rest, C::Routine, C::FrustrationTolerance],
            [F::Comprehension, F::Exercise],
        )
        .with_allocation(MinuteRange::span(20, 40)),
    );
    catalog.add_component(
        "muzzle_training",
        ModuleComponent::new(
            [C::MuzzleTraining, C::Shaping, C::Safety],
            [F::Exercise, F::Equipment],
        )
        .with_allocation(minutes(20, 30, 45)),
    );

    // Enrichment
    catalog.add_component(
        "search_games",
        ModuleComponent::new([C::NoseWork, C::MentalEnrichment], [F::Exercise, F::Demonstration])
            .with_allocation(minutes(30, 45, 60)),
    );
    catalog.add_component(
        "tracking_intro",
        ModuleComponent::new([C::Tracking, C::NoseWork, C::PhysicalActivity], [F::Practice])
            .with_allocation(SessionRange::span(1.0, 1.5))
            .with_caption("Buitenlocatie, vroege ochtend"),
    );
    catalog.add_component(
        "tug_rules",
        ModuleComponent::new([C::TugPlay, C::Drop, C::Bonding], [F::Exercise])
            .with_allocation(MinuteRange::span(15, 25)),
    );
    catalog.add_component(
        "trick_shaping",
        ModuleComponent::new([C::Tricks, C::Shaping, C::Capturing], [F::Exercise])
            .with_allocation(minutes(30, 40, 60)),
    );
    catalog.add_component(
        "retrieve",
        ModuleComponent::new([C::Retrieve, C::Play, C::Patience], [F::Exercise])
            .with_allocation(MinuteRange::span(20, 40)),
    );

    // ========================================================================
    // Module templates
    // ========================================================================

    catalog.add_module(
        "intake",
        "Intake",
        vec![
            entry("intake_conversation", E),
            entry("home_setup", E),
            entry("gear_advice", X),
        ],
    );
    catalog.add_module(
        "puppy_foundation",
        "Fundament",
        vec![
            entry("marker_intro", E),
            entry("name_game", E),
            entry("handling_basics", X),
        ],
    );
    catalog.add_module(
        "puppy_household",
        "Huishouden",
        vec![
            entry("house_training", E),
            entry("crate_intro", E),
            entry("alone_time", X),
            entry("biting_play", E),
        ],
    );
    catalog.add_module(
        "socialisation",
        "Socialisatie",
        vec![
            entry("habituation_walk", E),
            entry("dog_meeting", X),
            entry("body_language_theory", E),
        ],
    );
    catalog.add_module(
        "foundation_skills",
        "Basisoefeningen",
        vec![
            entry("sit_down_stand", E),
            entry("stay_duration", E),
            entry("leave_it", X),
            entry("place_settle", X),
        ],
    );
    catalog.add_module(
        "leash_walking",
        "Lijnlopen",
        vec![
            entry("leash_theory", E),
            entry("leash_practice", E),
            entry("heel_demo", X),
        ],
    );
    catalog.add_module(
        "recall",
        "Terugroepen",
        vec![
            entry("recall_games", E),
            entry("recall_proofing", E),
            entry("long_line", X),
        ],
    );
    catalog.add_module(
        "reactivity",
        "Reactiviteit",
        vec![
            entry("body_language_theory", E),
            entry("trigger_distance", E),
            entry("pattern_games", X),
        ],
    );
    catalog.add_module(
        "relaxation",
        "Ontspanning",
        vec![
            entry("place_settle", E),
            entry("calming_routine", E),
            entry("muzzle_training", X),
        ],
    );
    catalog.add_module(
        "nose_work",
        "Neuswerk",
        vec![entry("search_games", E), entry("tracking_intro", X)],
    );
    catalog.add_module(
        "play_tricks",
        "Spel & trucs",
        vec![
            entry("tug_rules", E),
            entry("trick_shaping", E),
            entry("retrieve", X),
        ],
    );

    // ========================================================================
    // Package templates
    // ========================================================================

    catalog.add_package(
        "puppy_start",
        "Puppystart",
        &["intake", "puppy_foundation", "puppy_household", "socialisation"],
    );
    catalog.add_package(
        "basic_obedience",
        "Basisgehoorzaamheid",
        &["foundation_skills", "leash_walking", "recall"],
    );
    catalog.add_package(
        "behaviour_support",
        "Gedragsbegeleiding",
        &["intake", "reactivity", "relaxation"],
    );
    catalog.add_package("enrichment", "Verrijking", &["nose_work", "play_tricks"]);

    catalog
}

impl Catalog {
    pub fn add_component(&mut self, id: &str, component: ModuleComponent) {
        self.components.insert(
            id.into(),
            CatalogComponent {
                id: id.into(),
                component,
            },
        );
    }

    pub fn add_module(&mut self, id: &str, title: &str, entries: Vec<TemplateEntry>) {
        self.modules.insert(
            id.into(),
            ModuleTemplate {
                id: id.into(),
                title: title.into(),
                entries,
            },
        );
    }

    pub fn add_package(&mut self, id: &str, title: &str, module_ids: &[&str]) {
        self.packages.insert(
            id.into(),
            PackageTemplate {
                id: id.into(),
                title: title.into(),
                module_ids: module_ids.iter().map(|m| m.to_string()).collect(),
            },
        );
    }

    /// Look up a library component by key
    pub fn component(&self, id: &str) -> Option<&ModuleComponent> {
        self.components.get(id).map(|c| &c.component)
    }

    /// Package templates ordered by key, for stable listings
    pub fn sorted_packages(&self) -> Vec<&PackageTemplate> {
        let mut packages: Vec<_> = self.packages.values().collect();
        packages.sort_by(|a, b| a.id.cmp(&b.id));
        packages
    }

    /// Components ordered by key, for stable listings
    pub fn sorted_components(&self) -> Vec<&CatalogComponent> {
        let mut components: Vec<_> = self.components.values().collect();
        components.sort_by(|a, b| a.id.cmp(&b.id));
        components
    }

    /// Build a fresh module (new ids, normalized entry order) from a template
    pub fn instantiate_module(&self, id: &str) -> Result<Module> {
        let template = self
            .modules
            .get(id)
            .ok_or_else(|| Error::UnknownTemplate(format!("module '{}'", id)))?;

        let mut module = Module::new(Some(template.title.clone()));
        for template_entry in &template.entries {
            let component = self.component(&template_entry.component_id).ok_or_else(|| {
                Error::UnknownTemplate(format!("component '{}'", template_entry.component_id))
            })?;
            module
                .entries
                .push(ModuleEntry::new(component.clone(), template_entry.placement));
        }
        module.normalize();
        Ok(module)
    }

    /// Build a fresh package from a template
    pub fn instantiate_package(&self, id: &str) -> Result<Package> {
        let template = self
            .packages
            .get(id)
            .ok_or_else(|| Error::UnknownTemplate(format!("package '{}'", id)))?;

        let mut package = Package::new(template.title.clone());
        for module_id in &template.module_ids {
            package.add_module(self.instantiate_module(module_id)?);
        }
        tracing::debug!(
            "Instantiated package '{}' with {} modules",
            template.title,
            package.modules.len()
        );
        Ok(package)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, component) in &self.components {
            if id.is_empty() || component.id.is_empty() {
                errors.push("Component has empty ID".to_string());
            }
            if id != &component.id {
                errors.push(format!(
                    "Component key '{}' doesn't match component.id '{}'",
                    id, component.id
                ));
            }
            if component.component.concepts.is_empty() && component.component.format.is_empty() {
                errors.push(format!("Component '{}' has no concepts or formats", id));
            }
        }

        for (id, module) in &self.modules {
            if id != &module.id {
                errors.push(format!(
                    "Module key '{}' doesn't match module.id '{}'",
                    id, module.id
                ));
            }
            if module.title.is_empty() {
                errors.push(format!("Module '{}' has empty title", id));
            }
            if module.entries.is_empty() {
                errors.push(format!("Module '{}' has no entries", id));
            }
            for template_entry in &module.entries {
                if !self.components.contains_key(&template_entry.component_id) {
                    errors.push(format!(
                        "Module '{}' references non-existent component '{}'",
                        id, template_entry.component_id
                    ));
                }
            }
        }

        for (id, package) in &self.packages {
            if id != &package.id {
                errors.push(format!(
                    "Package key '{}' doesn't match package.id '{}'",
                    id, package.id
                ));
            }
            if package.title.is_empty() {
                errors.push(format!("Package '{}' has empty title", id));
            }
            if package.module_ids.is_empty() {
                errors.push(format!("Package '{}' has no modules", id));
            }
            for module_id in &package.module_ids {
                if !self.modules.contains_key(module_id) {
                    errors.push(format!(
                        "Package '{}' references non-existent module '{}'",
                        id, module_id
                    ));
                }
            }
        }

        errors
    }
}
