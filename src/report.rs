// src/report.rs
//! Сохранение результатов: координаты зон, отчёт о пересечениях континентов
//! и таблица выходов между зонами.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::continent::{Assignment, Overlap};
use crate::error::{MapError, MapResult};
use crate::layout::{Layout, Position};
use crate::records::{AreaCatalog, ExitRecord, RoomIndex, load_json};

pub const POSITIONS_FILE: &str = "mega-coordinates.json";
pub const OVERLAPS_FILE: &str = "continent-overlaps.txt";
pub const EXITS_TABLE_FILE: &str = "area-exits.csv";

/// Загружает ранее сохранённые позиции. Если файла нет, все зоны стартуют из нуля.
pub fn load_positions(path: &Path) -> MapResult<HashMap<String, Position>> {
    if !path.exists() {
        warn!(path = %path.display(), "No saved positions, seeding from origin");
        return Ok(HashMap::new());
    }
    load_json(path)
}

/// Записывает полное отображение uid → позиция с отсортированными ключами
pub fn write_positions(path: &Path, layout: &Layout) -> MapResult<()> {
    let json = serde_json::to_string_pretty(&layout.to_sorted_map()).map_err(|source| {
        MapError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    write_text(path, &json)?;
    info!(path = %path.display(), areas = layout.len(), "Wrote area positions");
    Ok(())
}

/// Текстовый отчёт о зонах, граничащих с несколькими континентами
#[must_use]
pub fn render_overlap_report(overlaps: &[Overlap]) -> String {
    let mut out = String::from("Areas linked to multiple continents:\n");
    if overlaps.is_empty() {
        out.push_str("(none)\n");
    }
    for overlap in overlaps {
        let _ = writeln!(
            out,
            "- {} ({}): {}",
            overlap.name,
            overlap.uid,
            overlap.continents.join(", ")
        );
    }
    out
}

/// Зоны, в которые ведёт хотя бы один выход из данной
#[must_use]
pub fn outgoing_connections(
    exits: &[ExitRecord],
    rooms: &RoomIndex,
) -> HashMap<String, BTreeSet<String>> {
    let mut connections: HashMap<String, BTreeSet<String>> = HashMap::new();
    for exit in exits {
        if let Some((from, to)) = rooms.area_pair(exit) {
            connections
                .entry(from.to_string())
                .or_default()
                .insert(to.to_string());
        }
    }
    connections
}

/// CSV-таблица `Area Name,Continent,Exits` по обычным зонам.
///
/// Континент — назначенная метка или `-`. Выходы в континенты подписываются меткой
/// в скобках.
#[must_use]
pub fn render_exit_table(
    catalog: &AreaCatalog,
    connections: &HashMap<String, BTreeSet<String>>,
    assignments: &BTreeMap<String, Assignment>,
) -> String {
    let mut rows: Vec<_> = catalog.regular().collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.uid.cmp(&b.uid)));

    let mut out = String::new();
    push_csv_row(&mut out, &["Area Name", "Continent", "Exits"]);
    for area in rows {
        let continent = assignments
            .get(&area.uid)
            .map_or_else(|| "-".to_string(), ToString::to_string);

        let mut targets: Vec<&str> = connections
            .get(&area.uid)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default();
        targets.sort_by_key(|&uid| catalog.display_name(uid));
        let labels: Vec<String> = targets
            .into_iter()
            .map(|uid| {
                let name = catalog.display_name(uid);
                match catalog.get(uid).and_then(|a| a.continent.as_deref()) {
                    Some(label) => format!("{name} ({label})"),
                    None => name.to_string(),
                }
            })
            .collect();
        let exits = if labels.is_empty() {
            "(no exits to other areas)".to_string()
        } else {
            labels.join("; ")
        };

        push_csv_row(&mut out, &[&area.name, &continent, &exits]);
    }
    out
}

fn push_csv_row(out: &mut String, fields: &[&str]) {
    let row: Vec<String> = fields.iter().map(|field| csv_field(field)).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// Экранирование поля по RFC 4180
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn write_text(path: &Path, contents: &str) -> MapResult<()> {
    fs::write(path, contents).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContinentSettings;
    use crate::layout::seed_positions;
    use crate::records::{AreaRecord, RoomRecord};

    #[test]
    fn empty_overlap_report_says_none() {
        assert_eq!(
            render_overlap_report(&[]),
            "Areas linked to multiple continents:\n(none)\n"
        );
    }

    #[test]
    fn overlap_report_lists_entries() {
        let report = render_overlap_report(&[Overlap {
            uid: "port".to_string(),
            name: "Port Town".to_string(),
            continents: vec!["alagh".to_string(), "mesolar".to_string()],
        }]);
        assert!(report.ends_with("- Port Town (port): alagh, mesolar\n"));
    }

    #[test]
    fn csv_fields_are_quoted_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn exit_table_labels_continents() {
        let areas: Vec<AreaRecord> = serde_json::from_str(
            r#"[{"uid": "b", "name": "Bakery"}, {"uid": "a", "name": "Armory"},
                {"uid": "m", "name": "Mesolar"}]"#,
        )
        .unwrap();
        let rooms: Vec<RoomRecord> = ["a", "b", "m"]
            .iter()
            .map(|uid| RoomRecord {
                uid: (*uid).to_string(),
                area: Some((*uid).to_string()),
            })
            .collect();
        let exits: Vec<ExitRecord> = serde_json::from_str(
            r#"[{"fromuid": "a", "touid": "m"}, {"fromuid": "a", "touid": "b"}]"#,
        )
        .unwrap();
        let catalog = AreaCatalog::new(&areas, &ContinentSettings::default());
        let connections = outgoing_connections(&exits, &RoomIndex::new(&rooms));
        let assignments = BTreeMap::from([(
            "a".to_string(),
            Assignment::Nearest {
                label: "mesolar".to_string(),
                depth: 1,
            },
        )]);

        let table = render_exit_table(&catalog, &connections, &assignments);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Area Name,Continent,Exits",
                "Armory,mesolar,Bakery; Mesolar (mesolar)",
                "Bakery,-,(no exits to other areas)",
            ]
        );
    }

    #[test]
    fn positions_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(POSITIONS_FILE);
        assert!(load_positions(&path).unwrap().is_empty());

        let saved = HashMap::from([("zeta".to_string(), Position::new(1.5, -2.0, 3.0))]);
        let layout = seed_positions(["zeta", "alpha"], &saved);
        write_positions(&path, &layout).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.find("\"alpha\"").unwrap() < text.find("\"zeta\"").unwrap());
        let loaded = load_positions(&path).unwrap();
        assert_eq!(loaded["zeta"], Position::new(1.5, -2.0, 3.0));
        assert_eq!(loaded["alpha"], Position::default());
    }
}
