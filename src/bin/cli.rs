use areamap::report::{
    EXITS_TABLE_FILE, OVERLAPS_FILE, POSITIONS_FILE, load_positions, outgoing_connections,
    render_exit_table, render_overlap_report, write_positions, write_text,
};
use areamap::{
    AreaCatalog, AreaGraph, AreaMapConfig, ContinentClassifier, Database, RoomIndex,
    extract_constraints, find_overlaps, relax_positions, seed_positions,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Раскладка зон мира и классификация по континентам
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Каталог с areas.json, rooms.json и exits.json
    #[arg(short, long, default_value = "Database")]
    database: PathBuf,

    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Пересчитать координаты зон и отчёт о пересечениях континентов
    Layout {
        /// Число итераций релаксации (перекрывает значение из конфигурации)
        #[arg(long)]
        iterations: Option<usize>,
    },
    /// Построить CSV-таблицу выходов между зонами с метками континентов
    Exits,
    /// Вывести назначенный континент для каждой обычной зоны
    Classify,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => AreaMapConfig::from_toml_file(path)?,
        None => AreaMapConfig::default(),
    };

    info!(database = %cli.database.display(), "Loading records");
    let db = Database::load(&cli.database)?;
    let catalog = AreaCatalog::new(&db.areas, &config.continents);
    let rooms = RoomIndex::new(&db.rooms);
    info!(
        areas = catalog.len(),
        continents = catalog.continents().count(),
        rooms = db.rooms.len(),
        exits = db.exits.len(),
        "Records loaded"
    );

    match &cli.command {
        Command::Layout { iterations } => {
            if let Some(iterations) = *iterations {
                config.layout.iterations = iterations;
            }
            run_layout(&cli.database, &db, &catalog, &rooms, &config)?;
        }
        Command::Exits => run_exits(&cli.database, &db, &catalog, &rooms, &config)?,
        Command::Classify => run_classify(&db, &catalog, &rooms, &config),
    }
    Ok(())
}

fn run_layout(
    dir: &Path,
    db: &Database,
    catalog: &AreaCatalog,
    rooms: &RoomIndex,
    config: &AreaMapConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let positions_path = dir.join(POSITIONS_FILE);
    let saved = load_positions(&positions_path)?;

    let constraints = extract_constraints(&db.exits, rooms, catalog);
    let mut layout = seed_positions(catalog.regular().map(|area| area.uid.as_str()), &saved);
    info!(
        areas = layout.len(),
        constraints = constraints.len(),
        iterations = config.layout.iterations,
        "Relaxing positions"
    );
    relax_positions(&mut layout, &constraints, &config.layout);
    write_positions(&positions_path, &layout)?;

    let graph = AreaGraph::build(&db.exits, rooms, catalog);
    let overlaps = find_overlaps(&graph, catalog);
    let overlaps_path = dir.join(OVERLAPS_FILE);
    write_text(&overlaps_path, &render_overlap_report(&overlaps))?;
    info!(
        path = %overlaps_path.display(),
        entries = overlaps.len(),
        "Wrote continent overlaps"
    );
    Ok(())
}

fn run_exits(
    dir: &Path,
    db: &Database,
    catalog: &AreaCatalog,
    rooms: &RoomIndex,
    config: &AreaMapConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let graph = AreaGraph::build(&db.exits, rooms, catalog);
    let assignments = ContinentClassifier::new(&graph, catalog, &config.continents).classify_all();
    let connections = outgoing_connections(&db.exits, rooms);

    let table_path = dir.join(EXITS_TABLE_FILE);
    write_text(
        &table_path,
        &render_exit_table(catalog, &connections, &assignments),
    )?;
    info!(path = %table_path.display(), areas = assignments.len(), "Wrote exit table");
    Ok(())
}

fn run_classify(db: &Database, catalog: &AreaCatalog, rooms: &RoomIndex, config: &AreaMapConfig) {
    let graph = AreaGraph::build(&db.exits, rooms, catalog);
    let assignments = ContinentClassifier::new(&graph, catalog, &config.continents).classify_all();
    for (uid, assignment) in &assignments {
        println!("{uid}\t{}\t{assignment}", catalog.display_name(uid));
    }
}
