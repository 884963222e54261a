pub mod definition;

pub use definition::{parse_definitions, read_definitions, save_definitions, write_definitions};

use crate::raster::Color;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvinceType {
    Land,
    Sea,
    Lake,
}

/// Строка `definition.csv`: `id;r;g;b;type;coastal;terrain;continent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceDefinition {
    pub id: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(rename = "type")]
    pub province_type: ProvinceType,
    #[serde(deserialize_with = "bool_ignore_case")]
    pub coastal: bool,
    /// метка рельефа, заполнитель (`land`, `sea`, `lake`) или любое другое значение игры
    pub terrain: String,
    /// последнее поле (континент), переносится без изменений
    pub continent: String,
    /// Исходный текст строки вместе с переводом строки (`None` — строка создана в коде).
    /// При записи строка воспроизводится побайтно, меняется только поле рельефа.
    #[serde(skip)]
    pub source: Option<String>,
}

impl ProvinceDefinition {
    #[must_use]
    pub fn color(&self) -> Color {
        Color::new(self.r, self.g, self.b)
    }

    #[must_use]
    pub fn is_water(&self) -> bool {
        matches!(self.province_type, ProvinceType::Sea | ProvinceType::Lake)
    }
}

fn bool_ignore_case<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected true/false, got `{raw}`"
        )))
    }
}
