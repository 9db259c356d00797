use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pawplan_core::overview::IDENTITY_PLACEHOLDER;
use pawplan_core::report::write_tally_report;
use pawplan_core::tally::{self, package_tallies};
use pawplan_core::*;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pawplan")]
#[command(about = "Dog training program composer and quote calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Program document to work on (defaults to [program] default_path)
    #[arg(long, short, global = true)]
    program: Option<PathBuf>,

    /// Use this config file instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Estimation overrides shared by several commands
#[derive(clap::Args, Clone, Default)]
struct TallyArgs {
    /// Which anchors form the estimate (low_high, low_medium, medium_high)
    #[arg(long)]
    band: Option<Band>,

    /// Placements to count (repeatable: elementary, exchangeable)
    #[arg(long = "placement")]
    placements: Vec<Placement>,

    /// Minutes per session
    #[arg(long)]
    duration: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the package and component templates in the catalog
    Catalog,

    /// Create a program document from catalog packages
    New {
        /// Catalog package key (repeatable)
        #[arg(long = "package", required = true)]
        packages: Vec<String>,

        /// Where to write the program document
        #[arg(long)]
        out: PathBuf,
    },

    /// Show the program tree with allocations
    Show {
        #[command(flatten)]
        tally: TallyArgs,
    },

    /// Estimate the number of sessions
    Tally {
        #[command(flatten)]
        tally: TallyArgs,
    },

    /// Itemized price quote for the estimated sessions
    Quote {
        #[command(flatten)]
        tally: TallyArgs,

        /// Pricing strategy (midpoint, weighted_average)
        #[arg(long)]
        strategy: Option<PricingStrategy>,

        /// Price per session
        #[arg(long)]
        rate: Option<f64>,

        /// Margin percentage for the selected strategy
        #[arg(long)]
        margin: Option<f64>,

        /// Weight of the high bound for weighted_average, in percent
        #[arg(long)]
        high_weight: Option<f64>,

        /// Sessions held at the client's home
        #[arg(long)]
        home_sessions: Option<f64>,

        /// One-way travel distance in km
        #[arg(long)]
        distance_km: Option<f64>,

        /// Round the total to a multiple of this amount
        #[arg(long)]
        step: Option<f64>,
    },

    /// Modify the program document
    Edit {
        #[command(subcommand)]
        action: EditAction,
    },

    /// Write the render bundle (and optionally a CSV tally report)
    Export {
        #[command(flatten)]
        tally: TallyArgs,

        /// Client name
        #[arg(long)]
        client: Option<String>,

        /// Dog name
        #[arg(long)]
        dog: Option<String>,

        /// Document date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Leave the price out of the document
        #[arg(long)]
        no_price: bool,

        /// Bundle destination (defaults to the configured output dir)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write a per-package CSV tally here
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum EditAction {
    /// Append a catalog package
    AddPackage { key: String },
    /// Remove a package by position (1-based, as shown)
    RemovePackage { index: usize },
    /// Move a package from one position to another (1-based)
    MovePackage { from: usize, to: usize },
    /// Include or exclude a package by position (1-based)
    TogglePackage { index: usize },
    /// Include or exclude an entry
    ToggleEntry { id: Uuid },
    /// Change an entry's placement
    Place { id: Uuid, placement: Placement },
    /// Replace an entry's component with a catalog component
    Exchange { id: Uuid, component: String },
    /// Move an entry within its module (1-based positions)
    MoveEntry { module: Uuid, from: usize, to: usize },
    /// Remove an entry
    RemoveEntry { id: Uuid },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        pawplan_core::logging::init_with_level("debug");
    } else {
        pawplan_core::logging::init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::debug!("Effective tally settings: {:?}", config.tally);

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    match cli.command {
        Commands::Catalog => cmd_catalog(catalog),
        Commands::New { packages, out } => cmd_new(catalog, &packages, &out),
        Commands::Show { tally } => {
            let path = program_path(cli.program, &config)?;
            cmd_show(&load_program(&path)?, &settings(&config, &tally))
        }
        Commands::Tally { tally } => {
            let path = program_path(cli.program, &config)?;
            cmd_tally(&load_program(&path)?, &settings(&config, &tally))
        }
        Commands::Quote {
            tally,
            strategy,
            rate,
            margin,
            high_weight,
            home_sessions,
            distance_km,
            step,
        } => {
            let path = program_path(cli.program, &config)?;
            let mut pricing = config.pricing.clone();
            if let Some(strategy) = strategy {
                pricing.strategy = strategy;
            }
            if let Some(rate) = rate {
                pricing.session_rate = rate;
            }
            if let Some(margin) = margin {
                match pricing.strategy {
                    PricingStrategy::Midpoint => pricing.midpoint_margin_percent = margin,
                    PricingStrategy::WeightedAverage => pricing.weighted_margin_percent = margin,
                }
            }
            if let Some(weight) = high_weight {
                pricing.weighted_high_weight_percent = weight;
            }
            if let Some(home) = home_sessions {
                pricing.home_sessions = home;
            }
            if let Some(km) = distance_km {
                pricing.travel_distance_km = km;
            }
            if let Some(step) = step {
                pricing.rounding_step = step;
            }
            cmd_quote(&load_program(&path)?, &settings(&config, &tally), &pricing)
        }
        Commands::Edit { action } => {
            let path = program_path(cli.program, &config)?;
            cmd_edit(catalog, &path, action)
        }
        Commands::Export {
            tally,
            client,
            dog,
            date,
            no_price,
            out,
            report,
        } => {
            let path = program_path(cli.program, &config)?;
            let program = load_program(&path)?;
            let settings = settings(&config, &tally);
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

            let mut options = OverviewOptions::from_config(&config, date);
            options.client_name = client;
            options.dog_name = dog;
            options.session_duration = settings.duration;
            options.band = settings.band;
            options.placements = settings.placements.clone();
            if no_price {
                options.include_price_in_program = false;
            }

            let out = out.unwrap_or_else(|| {
                config
                    .export
                    .output_dir
                    .join(format!("programma-{}.json", date.format("%Y-%m-%d")))
            });
            cmd_export(&program, &options, &settings, &out, report.as_deref())
        }
    }
}

/// Effective estimation settings after command-line overrides
struct Settings {
    band: Band,
    placements: Vec<Placement>,
    duration: u32,
}

fn settings(config: &Config, args: &TallyArgs) -> Settings {
    Settings {
        band: args.band.unwrap_or(config.tally.band),
        placements: if args.placements.is_empty() {
            config.tally.placements.clone()
        } else {
            args.placements.clone()
        },
        duration: args
            .duration
            .unwrap_or(config.tally.session_duration_minutes)
            .max(1),
    }
}

fn program_path(flag: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    flag.or_else(|| config.program.default_path.clone())
        .ok_or_else(|| {
            Error::MissingArgument(
                "--program <FILE> (or [program] default_path in the config)".into(),
            )
        })
}

fn cmd_catalog(catalog: &Catalog) -> Result<()> {
    println!("Packages:");
    for package in catalog.sorted_packages() {
        println!("  {:<20} {}", package.id, package.title);
        for module_id in &package.module_ids {
            if let Some(module) = catalog.modules.get(module_id) {
                println!("      - {}", module.title);
            }
        }
    }

    println!();
    println!("Components:");
    for component in catalog.sorted_components() {
        let summary = component
            .component
            .allocation
            .map(|a| a.minutes().summary(60).minutes_text)
            .unwrap_or_default();
        println!(
            "  {:<22} {} ({})",
            component.id,
            component.component.display_tagline(),
            summary
        );
    }
    Ok(())
}

fn cmd_new(catalog: &Catalog, keys: &[String], out: &Path) -> Result<()> {
    let mut program = Program::new();
    for key in keys {
        program.add_package(catalog.instantiate_package(key)?);
    }
    save_program(&program, out)?;
    println!(
        "✓ Created program with {} packages: {}",
        program.packages.len(),
        out.display()
    );
    Ok(())
}

fn cmd_show(program: &Program, settings: &Settings) -> Result<()> {
    for (index, package) in program.packages.iter().enumerate() {
        let marker = if package.include { "x" } else { " " };
        println!("[{}] {}. {}", marker, index + 1, package.title);
        for module in &package.modules {
            println!(
                "      {} ({})",
                module.title.as_deref().unwrap_or("Module"),
                module.id
            );
            for entry in &module.entries {
                let marker = if entry.include { "x" } else { " " };
                let summary = entry
                    .component
                    .allocation
                    .map(|a| {
                        let summary = a.minutes().summary(settings.duration);
                        match summary.sessions_text {
                            Some(sessions) => format!("{}, {}", summary.minutes_text, sessions),
                            None => summary.minutes_text,
                        }
                    })
                    .unwrap_or_else(|| "—".into());
                println!(
                    "        [{}] {:<13} {}  {} ({})",
                    marker,
                    entry.placement.title(),
                    entry.id,
                    entry.component.display_tagline(),
                    summary
                );
            }
        }
    }
    Ok(())
}

fn cmd_tally(program: &Program, settings: &Settings) -> Result<()> {
    let sessions = tally::sessions(
        program,
        settings.duration,
        settings.band,
        &settings.placements,
    );
    let minutes = tally::minutes(program, &settings.placements);

    println!("Band: {}", settings.band);
    println!(
        "Sessions: {}–{} ({} min/session)",
        format_sessions(sessions.low),
        format_sessions(sessions.high),
        settings.duration
    );
    println!("Minutes: {}–{}", minutes.low(), minutes.high());
    Ok(())
}

fn cmd_quote(
    program: &Program,
    settings: &Settings,
    pricing: &pawplan_core::config::PricingConfig,
) -> Result<()> {
    let sessions = tally::sessions(
        program,
        settings.duration,
        settings.band,
        &settings.placements,
    );
    let breakdown = price(&pricing.input_for(sessions.low, sessions.high));

    println!("Strategy:           {}", breakdown.strategy);
    println!(
        "Sessions:           {}–{} → {} (whole: {})",
        format_sessions(breakdown.band_low),
        format_sessions(breakdown.band_high),
        format_sessions(breakdown.sessions_precise),
        breakdown.sessions_ceiled
    );
    println!("Session rate:       € {:.2}", breakdown.session_rate);
    println!("Session cost:       € {:.2}", breakdown.session_cost_precise);
    println!("  (whole sessions:  € {:.2})", breakdown.session_cost_ceiled);
    println!("Travel:             € {:.2}", breakdown.travel_cost);
    println!("Subtotal:           € {:.2}", breakdown.subtotal);
    println!(
        "Margin:             {}% (€ {:.2})",
        format_sessions(breakdown.margin_percent),
        breakdown.markup_amount
    );
    println!("Total:              € {:.2}", breakdown.total_cost);
    println!(
        "Quoted:             € {:.2}",
        breakdown.rounded_total_cost(pricing.rounding_step)
    );
    Ok(())
}

fn position(index: usize, len: usize, what: &str) -> Result<usize> {
    if index == 0 || index > len {
        return Err(Error::NotFound(format!("{} {} (have {})", what, index, len)));
    }
    Ok(index - 1)
}

fn not_found(what: &str, id: Uuid) -> Error {
    Error::NotFound(format!("{} {}", what, id))
}

fn cmd_edit(catalog: &Catalog, path: &Path, action: EditAction) -> Result<()> {
    let mut program = load_program(path)?;
    tracing::debug!("Editing {:?}", path);

    let message = match action {
        EditAction::AddPackage { key } => {
            let package = catalog.instantiate_package(&key)?;
            let title = package.title.clone();
            program.add_package(package);
            format!("Added package '{}'", title)
        }
        EditAction::RemovePackage { index } => {
            let index = position(index, program.packages.len(), "package")?;
            let id = program.packages[index].id;
            let removed = program
                .remove_package(id)
                .ok_or_else(|| not_found("package", id))?;
            format!("Removed package '{}'", removed.title)
        }
        EditAction::MovePackage { from, to } => {
            let len = program.packages.len();
            let from = position(from, len, "package")?;
            program.move_package(from, to.saturating_sub(1));
            "Moved package".to_string()
        }
        EditAction::TogglePackage { index } => {
            let index = position(index, program.packages.len(), "package")?;
            let package = &program.packages[index];
            let (id, include) = (package.id, !package.include);
            program.set_package_include(id, include);
            format!(
                "{} package '{}'",
                if include { "Included" } else { "Excluded" },
                program.packages[index].title
            )
        }
        EditAction::ToggleEntry { id } => {
            let include = !program
                .find_entry(id)
                .ok_or_else(|| not_found("entry", id))?
                .include;
            program.set_entry_include(id, include);
            format!("{} entry {}", if include { "Included" } else { "Excluded" }, id)
        }
        EditAction::Place { id, placement } => {
            if !program.set_entry_placement(id, placement) {
                return Err(not_found("entry", id));
            }
            format!("Entry {} is now {}", id, placement.title())
        }
        EditAction::Exchange { id, component } => {
            let replacement = catalog
                .component(&component)
                .cloned()
                .ok_or_else(|| Error::UnknownTemplate(format!("component '{}'", component)))?;
            let tagline = replacement.display_tagline();
            program
                .exchange_component(id, replacement)
                .ok_or_else(|| not_found("entry", id))?;
            format!("Entry {} is now '{}'", id, tagline)
        }
        EditAction::MoveEntry { module, from, to } => {
            let target = program
                .find_module_mut(module)
                .ok_or_else(|| not_found("module", module))?;
            let from = position(from, target.entries.len(), "entry")?;
            target.move_entry(from, to.saturating_sub(1));
            "Moved entry".to_string()
        }
        EditAction::RemoveEntry { id } => {
            program
                .remove_entry(id)
                .ok_or_else(|| not_found("entry", id))?;
            format!("Removed entry {}", id)
        }
    };

    save_program(&program, path)?;
    println!("✓ {}", message);
    Ok(())
}

fn cmd_export(
    program: &Program,
    options: &OverviewOptions,
    settings: &Settings,
    out: &Path,
    report: Option<&Path>,
) -> Result<()> {
    let bundle = build_bundle(program, options);
    let bytes = write_bundle(&bundle, out)?;

    let overview = &bundle.overview;
    println!("Date:     {}", overview.date_label);
    println!("Client:   {}", overview.client_name);
    println!("Dog:      {}", overview.dog_name);
    match overview.estimated_sessions {
        Some((low, high)) if low == high => println!("Sessions: {}", low),
        Some((low, high)) => println!("Sessions: {}–{}", low, high),
        None => println!("Sessions: {}", IDENTITY_PLACEHOLDER),
    }
    if let Some(titles) = &overview.included_package_titles {
        println!("Packages: {}", titles.join(", "));
    }
    if let Some(price) = &overview.price {
        println!("Price:    € {:.2}", price.total_cost);
    }
    println!("✓ Wrote {} bytes to {}", bytes, out.display());

    if let Some(report) = report {
        let rows = package_tallies(
            program,
            settings.duration,
            settings.band,
            &settings.placements,
        );
        write_tally_report(report, &rows)?;
        println!("✓ Wrote tally report to {}", report.display());
    }
    Ok(())
}
