// src/config.rs
//! Конфигурация сверки рельефа
//!
//! Пути к входным и выходному файлам, сид для розыгрыша ничьих, частота
//! промежуточных сохранений и набор заполнителей рельефа. Все поля имеют
//! значения по умолчанию, поэтому TOML-файл может быть пустым.
//!
//! ```toml
//! # reconcile.toml
//! definition = "map/definition.csv"
//! provinces = "map/provinces.bmp"
//! terrain = "map/terrain.bmp"
//! output = "map/definition.fixed.csv"
//! seed = 42
//! checkpoint_every = 250
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconcileConfig {
    /// Таблица провинций (`definition.csv`)
    #[serde(default = "default_definition")]
    pub definition: PathBuf,

    /// Карта провинций (`provinces.bmp`)
    #[serde(default = "default_provinces")]
    pub provinces: PathBuf,

    /// Карта рельефа (`terrain.bmp`)
    #[serde(default = "default_terrain")]
    pub terrain: PathBuf,

    /// Куда писать исправленную таблицу (перезаписывается)
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Сид для розыгрыша ничьих. Без него каждый запуск разыгрывает заново.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Промежуточное сохранение каждые N строк (0 — только в конце)
    #[serde(default = "default_checkpoint_every")]
    pub checkpoint_every: usize,

    /// Значения поля рельефа, означающие «ещё не размечено»
    #[serde(default = "default_placeholder_terrains")]
    pub placeholder_terrains: Vec<String>,

    /// Строить индекс за один проход вместо сканирования карты на каждую провинцию
    #[serde(default = "default_use_index")]
    pub use_index: bool,

    /// Не записывать результат
    #[serde(default)]
    pub dry_run: bool,

    /// Уровень логирования (переопределяется `RUST_LOG`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Каталог для файлов лога; без него лог идёт только в stderr
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_definition() -> PathBuf {
    PathBuf::from("definition.csv")
}
fn default_provinces() -> PathBuf {
    PathBuf::from("provinces.bmp")
}
fn default_terrain() -> PathBuf {
    PathBuf::from("terrain.bmp")
}
fn default_output() -> PathBuf {
    PathBuf::from("output.csv")
}
fn default_checkpoint_every() -> usize {
    100
}
fn default_placeholder_terrains() -> Vec<String> {
    ["land", "sea", "lake"].map(String::from).to_vec()
}
fn default_use_index() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl ReconcileConfig {
    /// Загружает конфигурацию из TOML-файла
    ///
    /// # Ошибки
    /// Файл не найден или содержит недопустимый формат.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            definition: default_definition(),
            provinces: default_provinces(),
            terrain: default_terrain(),
            output: default_output(),
            seed: None,
            checkpoint_every: default_checkpoint_every(),
            placeholder_terrains: default_placeholder_terrains(),
            use_index: default_use_index(),
            dry_run: false,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(
            ReconcileConfig::from_toml_str("").unwrap(),
            ReconcileConfig::default()
        );
    }

    #[test]
    fn fields_override_defaults() {
        let config = ReconcileConfig::from_toml_str(
            r#"
            output = "fixed.csv"
            seed = 42
            checkpoint_every = 0
            placeholder_terrains = ["unknown"]
            "#,
        )
        .unwrap();
        assert_eq!(config.output, PathBuf::from("fixed.csv"));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.checkpoint_every, 0);
        assert_eq!(config.placeholder_terrains, vec!["unknown".to_string()]);
        assert_eq!(config.definition, PathBuf::from("definition.csv"));
        assert!(config.use_index);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(ReconcileConfig::from_toml_str("seed = \"abc\"").is_err());
    }
}
