// src/error.rs
//! Ошибки сверки рельефа
//!
//! Фатальными считаются только глобальные нарушения: нечитаемые входные файлы,
//! битая таблица, несовпадающие размеры растров. Промахи по отдельным провинциям
//! ошибками не являются — они возвращаются как [`crate::Resolution`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("malformed definition table: {0}")]
    Table(#[from] csv::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(
        "raster size mismatch: provinces are {provinces_width}x{provinces_height}, \
         terrain is {terrain_width}x{terrain_height}"
    )]
    RasterSizeMismatch {
        provinces_width: u32,
        provinces_height: u32,
        terrain_width: u32,
        terrain_height: u32,
    },

    #[error("raster buffer holds {actual} pixels, expected {expected}")]
    RasterLength { expected: usize, actual: usize },

    #[error("logger initialization failed: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
