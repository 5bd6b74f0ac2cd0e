// src/records.rs
//! Входные записи: зоны, комнаты и выходы.
//!
//! Записи приходят уже разобранными (JSON-выгрузка базы карт). Здесь они загружаются,
//! зоны делятся на континенты и обычные, а комнаты сопоставляются зонам.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::ContinentSettings;
use crate::error::{MapError, MapResult};

pub const AREAS_FILE: &str = "areas.json";
pub const ROOMS_FILE: &str = "rooms.json";
pub const EXITS_FILE: &str = "exits.json";

#[derive(Debug, Clone, Deserialize)]
pub struct AreaRecord {
    #[serde(deserialize_with = "uid_string")]
    pub uid: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomRecord {
    #[serde(deserialize_with = "uid_string")]
    pub uid: String,
    #[serde(default, deserialize_with = "opt_uid_string")]
    pub area: Option<String>,
}

/// Направленный выход из комнаты `fromuid` в комнату `touid`
#[derive(Debug, Clone, Deserialize)]
pub struct ExitRecord {
    #[serde(deserialize_with = "uid_string")]
    pub fromuid: String,
    #[serde(deserialize_with = "uid_string")]
    pub touid: String,
    #[serde(default)]
    pub dir: Option<String>,
}

/// Идентификатор в выгрузке: строка или число
#[derive(Deserialize)]
#[serde(untagged)]
enum Uid {
    Text(String),
    Number(i64),
}

impl Uid {
    fn into_string(self) -> String {
        match self {
            Uid::Text(text) => text,
            Uid::Number(number) => number.to_string(),
        }
    }
}

fn uid_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Uid::deserialize(deserializer).map(Uid::into_string)
}

fn opt_uid_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Uid>::deserialize(deserializer)?.map(Uid::into_string))
}

/// Полный набор входных записей одного запуска
#[derive(Debug, Clone, Default)]
pub struct Database {
    pub areas: Vec<AreaRecord>,
    pub rooms: Vec<RoomRecord>,
    pub exits: Vec<ExitRecord>,
}

impl Database {
    /// Загружает `areas.json`, `rooms.json` и `exits.json` из каталога.
    ///
    /// # Ошибки
    /// Если любого из файлов нет, возвращается [`MapError::MissingInput`]. Пустой массив допустим.
    pub fn load(dir: &Path) -> MapResult<Self> {
        let areas: Vec<AreaRecord> = load_json(&dir.join(AREAS_FILE))?;
        let rooms: Vec<RoomRecord> = load_json(&dir.join(ROOMS_FILE))?;
        let exits: Vec<ExitRecord> = load_json(&dir.join(EXITS_FILE))?;
        debug!(
            areas = areas.len(),
            rooms = rooms.len(),
            exits = exits.len(),
            "Loaded database records"
        );
        Ok(Self {
            areas,
            rooms,
            exits,
        })
    }
}

/// Читает обязательный JSON-файл
pub fn load_json<T: DeserializeOwned>(path: &Path) -> MapResult<T> {
    if !path.exists() {
        return Err(MapError::MissingInput(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Зона с вычисленной принадлежностью к континентам
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub uid: String,
    pub name: String,
    /// Метка континента, если сама зона — континент
    pub continent: Option<String>,
}

impl Area {
    #[must_use]
    pub fn is_continent(&self) -> bool {
        self.continent.is_some()
    }
}

/// Каталог зон в порядке входных записей
#[derive(Debug, Clone, Default)]
pub struct AreaCatalog {
    areas: Vec<Area>,
    by_uid: HashMap<String, usize>,
}

impl AreaCatalog {
    #[must_use]
    pub fn new(records: &[AreaRecord], continents: &ContinentSettings) -> Self {
        let mut catalog = Self::default();
        for record in records {
            if catalog.by_uid.contains_key(&record.uid) {
                continue;
            }
            catalog
                .by_uid
                .insert(record.uid.clone(), catalog.areas.len());
            catalog.areas.push(Area {
                uid: record.uid.clone(),
                name: record.name.clone(),
                continent: continents.continent_label(&record.name).map(String::from),
            });
        }
        catalog
    }

    #[must_use]
    pub fn get(&self, uid: &str) -> Option<&Area> {
        self.by_uid.get(uid).map(|&idx| &self.areas[idx])
    }

    /// Название зоны или её uid, если зона неизвестна
    #[must_use]
    pub fn display_name<'a>(&'a self, uid: &'a str) -> &'a str {
        self.get(uid).map_or(uid, |area| area.name.as_str())
    }

    #[must_use]
    pub fn is_continent(&self, uid: &str) -> bool {
        self.get(uid).is_some_and(Area::is_continent)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    /// Обычные (не континентальные) зоны
    pub fn regular(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter().filter(|area| !area.is_continent())
    }

    pub fn continents(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter().filter(|area| area.is_continent())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

/// Отображение комната → зона
#[derive(Debug, Clone, Default)]
pub struct RoomIndex {
    area_of: HashMap<String, String>,
}

impl RoomIndex {
    #[must_use]
    pub fn new(rooms: &[RoomRecord]) -> Self {
        let area_of = rooms
            .iter()
            .filter_map(|room| {
                let area = room.area.as_deref().filter(|area| !area.is_empty())?;
                Some((room.uid.clone(), area.to_string()))
            })
            .collect();
        Self { area_of }
    }

    #[must_use]
    pub fn area_of(&self, room_uid: &str) -> Option<&str> {
        self.area_of.get(room_uid).map(String::as_str)
    }

    /// Пара зон, которые соединяет выход.
    ///
    /// `None`, если хотя бы одна комната не привязана к зоне или обе комнаты в одной зоне.
    #[must_use]
    pub fn area_pair(&self, exit: &ExitRecord) -> Option<(&str, &str)> {
        let from = self.area_of(&exit.fromuid)?;
        let to = self.area_of(&exit.touid)?;
        (from != to).then_some((from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(uid: &str, name: &str) -> AreaRecord {
        AreaRecord {
            uid: uid.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn catalog_splits_continents() {
        let catalog = AreaCatalog::new(
            &[
                area("aylor", "The Grand City of Aylor"),
                area("mesolar", "The Continent of Mesolar"),
                area("ocean", "The Southern Ocean"),
            ],
            &ContinentSettings::default(),
        );
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.regular().count(), 1);
        assert!(catalog.is_continent("ocean"));
        assert_eq!(
            catalog.get("ocean").and_then(|a| a.continent.as_deref()),
            Some("southern ocean")
        );
        assert_eq!(catalog.display_name("ghost"), "ghost");
    }

    #[test]
    fn exit_between_same_area_has_no_pair() {
        let rooms: Vec<RoomRecord> = serde_json::from_str(
            r#"[{"uid": "1", "area": "a"}, {"uid": 2, "area": "a"}, {"uid": "3", "area": "b"}, {"uid": "4"},
                {"uid": 5, "area": 18}, {"uid": "6", "area": null}]"#,
        )
        .unwrap();
        assert_eq!(rooms[4].area.as_deref(), Some("18"));
        assert_eq!(rooms[5].area, None);
        let index = RoomIndex::new(&rooms);
        let exit = |from: &str, to: &str| ExitRecord {
            fromuid: from.to_string(),
            touid: to.to_string(),
            dir: None,
        };
        assert_eq!(index.area_pair(&exit("1", "2")), None);
        assert_eq!(index.area_pair(&exit("2", "3")), Some(("a", "b")));
        assert_eq!(index.area_pair(&exit("3", "4")), None);
        assert_eq!(index.area_pair(&exit("3", "99")), None);
        assert_eq!(index.area_pair(&exit("5", "3")), Some(("18", "b")));
        assert_eq!(index.area_pair(&exit("6", "3")), None);
    }

    #[test]
    fn exit_direction_is_optional() {
        let exits: Vec<ExitRecord> = serde_json::from_str(
            r#"[{"fromuid": "1", "touid": "2"}, {"fromuid": 3, "touid": 4, "dir": null}, {"fromuid": "5", "touid": "6", "dir": "n"}]"#,
        )
        .unwrap();
        assert_eq!(exits[0].dir, None);
        assert_eq!(exits[1].fromuid, "3");
        assert_eq!(exits[2].dir.as_deref(), Some("n"));
    }

    #[test]
    fn missing_file_is_not_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(AREAS_FILE), "[]").unwrap();
        fs::write(dir.path().join(ROOMS_FILE), "[]").unwrap();
        let err = Database::load(dir.path()).unwrap_err();
        assert!(matches!(err, MapError::MissingInput(path) if path.ends_with(EXITS_FILE)));

        fs::write(dir.path().join(EXITS_FILE), "[]").unwrap();
        let db = Database::load(dir.path()).unwrap();
        assert!(db.areas.is_empty() && db.exits.is_empty());
    }
}
