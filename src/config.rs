// src/config.rs
//! Конфигурация раскладки зон и классификации по континентам
//!
//! Этот модуль определяет параметры, управляющие пайплайном:
//! - Число итераций релаксации, шаг сетки и коэффициент смешивания
//! - Ключевые слова, по которым зона распознаётся как континент
//! - Порядок приоритета континентов и ручные переопределения
//!
//! Все структуры поддерживают сериализацию в TOML/JSON, так что списки континентов
//! можно расширять без изменения алгоритмов.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{MapError, MapResult};

/// Параметры релаксации позиций
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutSettings {
    /// Фиксированное число итераций релаксации
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Шаг сетки: расстояние между соседними зонами вдоль одной оси
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: f64,

    /// Коэффициент смешивания текущей позиции и предложенной:
    /// - близко к `0.0` → позиции почти не двигаются,
    /// - близко к `1.0` → позиция сразу прыгает к среднему из предложенных.
    #[serde(default = "default_blend")]
    pub blend: f64,
}

fn default_iterations() -> usize {
    900
}
fn default_grid_spacing() -> f64 {
    140.0
}
fn default_blend() -> f64 {
    0.7
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            iterations: 900,
            grid_spacing: 140.0,
            blend: 0.7,
        }
    }
}

/// Данные о континентах
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContinentSettings {
    /// Ключевые слова в названии зоны, делающие её континентом.
    /// Метка континента — первое совпавшее ключевое слово.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Порядок приоритета при равной глубине поиска (первый — главный)
    #[serde(default = "default_priority")]
    pub priority: Vec<String>,

    /// Ручные переопределения: название зоны → метка континента
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

fn default_keywords() -> Vec<String> {
    [
        "southern ocean",
        "uncharted ocean",
        "gelidus",
        "alagh",
        "abend",
        "mesolar",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_priority() -> Vec<String> {
    [
        "mesolar",
        "gelidus",
        "abend",
        "alagh",
        "southern ocean",
        "uncharted ocean",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for ContinentSettings {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            priority: default_priority(),
            overrides: BTreeMap::new(),
        }
    }
}

impl ContinentSettings {
    /// Возвращает метку континента, если название зоны содержит ключевое слово.
    ///
    /// # Примеры
    /// ```
    /// use areamap::config::ContinentSettings;
    /// let settings = ContinentSettings::default();
    /// assert_eq!(settings.continent_label("The Continent of Mesolar"), Some("mesolar"));
    /// assert_eq!(settings.continent_label("Aylor"), None);
    /// ```
    #[must_use]
    pub fn continent_label(&self, name: &str) -> Option<&str> {
        let lowered = name.to_lowercase();
        self.keywords
            .iter()
            .filter(|keyword| !keyword.is_empty())
            .find(|keyword| lowered.contains(&keyword.to_lowercase()))
            .map(String::as_str)
    }

    /// Ищет ручное переопределение по названию зоны без учёта регистра.
    #[must_use]
    pub fn override_for(&self, name: &str) -> Option<&str> {
        let lowered = name.to_lowercase();
        self.overrides
            .iter()
            .find(|(key, _)| key.to_lowercase() == lowered)
            .map(|(_, label)| label.as_str())
    }

    /// Ранг метки: меньше — приоритетнее. Метки вне списка идут после всех перечисленных.
    #[must_use]
    pub fn rank(&self, label: &str) -> usize {
        self.priority
            .iter()
            .position(|p| p == label)
            .unwrap_or(self.priority.len())
    }
}

/// Полная конфигурация пайплайна
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AreaMapConfig {
    #[serde(default)]
    pub layout: LayoutSettings,

    #[serde(default)]
    pub continents: ContinentSettings,
}

impl AreaMapConfig {
    /// Загружает параметры из TOML-файла
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден, содержит недопустимый формат
    /// или значения вне допустимых диапазонов.
    ///
    /// # Пример
    /// ```toml
    /// # areamap.toml
    /// [layout]
    /// iterations = 600
    ///
    /// [continents.overrides]
    /// midgaard = "mesolar"
    /// ```
    pub fn from_toml_file(path: &Path) -> MapResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| MapError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MapResult<()> {
        let layout = &self.layout;
        if !(layout.blend > 0.0 && layout.blend < 1.0) {
            return Err(MapError::Validation(format!(
                "layout.blend must be in (0, 1), got {}",
                layout.blend
            )));
        }
        if !layout.grid_spacing.is_finite() || layout.grid_spacing <= 0.0 {
            return Err(MapError::Validation(format!(
                "layout.grid_spacing must be positive, got {}",
                layout.grid_spacing
            )));
        }
        Ok(())
    }
}
