// src/error.rs
//! Ошибки загрузки и сохранения данных.
//!
//! Алгоритмы раскладки и классификации ошибок не возвращают: нераспознанные направления,
//! ссылки на несуществующие комнаты и изолированные зоны просто не дают вклада.
//! Фатальны только проблемы ввода-вывода и конфигурации.

use std::path::PathBuf;

/// Псевдоним для `Result<T, MapError>`.
pub type MapResult<T> = Result<T, MapError>;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// Обязательный входной файл отсутствует.
    #[error("required input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Значение параметра вне допустимого диапазона.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
