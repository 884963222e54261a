// src/reconcile.rs
//! Проход по таблице провинций
//!
//! Провинции обрабатываются по одной, в порядке таблицы:
//! 1. Отбор: моря и озёра, провинции без рельефа (заполнитель) и прибрежные пропускаются
//! 2. Определение рельефа по растрам ([`resolve_terrain`])
//! 3. Запись новой метки, если она отличается от текущей
//!
//! Исходная таблица не меняется: результат собирается в новом векторе.
//! Флаг отмены проверяется только между провинциями, поэтому каждая провинция
//! либо обработана целиком, либо не тронута. Промах по одной провинции не
//! останавливает проход.

use crate::config::ReconcileConfig;
use crate::error::Result;
use crate::province::{ProvinceDefinition, read_definitions, save_definitions};
use crate::raster::{RasterPair, RegionIndex, TerrainSampler};
use crate::resolver::{Resolution, resolve_terrain};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Кооперативная отмена прохода (например, по Ctrl-C)
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Причина, по которой провинция не обрабатывается
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Тип `sea` или `lake`
    Water,
    /// Поле рельефа содержит заполнитель (`land`, `sea`, `lake`)
    Unclassified,
    /// Прибрежная провинция
    Coastal,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Water => "sea/lake",
            SkipReason::Unclassified => "terrain is a placeholder",
            SkipReason::Coastal => "coastal",
        })
    }
}

/// Правило отбора провинций
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    placeholders: Vec<String>,
}

impl Eligibility {
    pub fn new<I, T>(placeholders: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            placeholders: placeholders.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn is_placeholder(&self, terrain: &str) -> bool {
        self.placeholders.iter().any(|p| p == terrain)
    }

    /// `None` — провинцию нужно обработать
    #[must_use]
    pub fn skip_reason(&self, definition: &ProvinceDefinition) -> Option<SkipReason> {
        if definition.is_water() {
            Some(SkipReason::Water)
        } else if self.is_placeholder(&definition.terrain) {
            Some(SkipReason::Unclassified)
        } else if definition.coastal {
            Some(SkipReason::Coastal)
        } else {
            None
        }
    }
}

impl Default for Eligibility {
    fn default() -> Self {
        Self::new(["land", "sea", "lake"])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Cancelled,
}

/// Счётчики прохода
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub processed: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped_water: usize,
    pub skipped_unclassified: usize,
    pub skipped_coastal: usize,
    pub not_found: usize,
    pub unmapped: usize,
}

impl ReconcileStats {
    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Water => self.skipped_water += 1,
            SkipReason::Unclassified => self.skipped_unclassified += 1,
            SkipReason::Coastal => self.skipped_coastal += 1,
        }
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped_water + self.skipped_unclassified + self.skipped_coastal
    }

    #[must_use]
    pub fn undetermined(&self) -> usize {
        self.not_found + self.unmapped
    }
}

#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub status: RunStatus,
    pub stats: ReconcileStats,
    /// Исправленная таблица: обработанные строки с новыми метками и нетронутый остаток
    pub definitions: Vec<ProvinceDefinition>,
}

pub struct Reconciler<'a, S: ?Sized> {
    sampler: &'a S,
    eligibility: Eligibility,
    checkpoint_every: usize,
}

impl<'a, S: TerrainSampler + ?Sized> Reconciler<'a, S> {
    pub fn new(sampler: &'a S) -> Self {
        Self {
            sampler,
            eligibility: Eligibility::default(),
            checkpoint_every: 0,
        }
    }

    #[must_use]
    pub fn with_eligibility(mut self, eligibility: Eligibility) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// Вызывать `checkpoint` каждые `every` обработанных строк (0 — никогда)
    #[must_use]
    pub fn with_checkpoint_every(mut self, every: usize) -> Self {
        self.checkpoint_every = every;
        self
    }

    /// Проходит таблицу и возвращает исправленную копию.
    ///
    /// `checkpoint` получает полную таблицу (обработанная часть + остаток) через
    /// каждые `checkpoint_every` строк; ошибка сохранения прерывает проход.
    /// Финальное сохранение — забота вызывающего.
    pub fn run<R, F>(
        &self,
        definitions: &[ProvinceDefinition],
        rng: &mut R,
        cancel: &CancellationToken,
        mut checkpoint: F,
    ) -> Result<ReconcileReport>
    where
        R: Rng + ?Sized,
        F: FnMut(&[ProvinceDefinition]) -> Result<()>,
    {
        let total = definitions.len();
        let mut corrected = definitions.to_vec();
        let mut stats = ReconcileStats::default();
        let mut status = RunStatus::Completed;

        info!("Обработка {total} провинций...");
        for (i, definition) in definitions.iter().enumerate() {
            if cancel.is_cancelled() {
                status = RunStatus::Cancelled;
                break;
            }

            debug!("Провинция {}/{}: id {}", i + 1, total, definition.id);
            if let Some(terrain) = self.process(definition, &mut stats, rng) {
                corrected[i].terrain = terrain;
            }
            stats.processed += 1;

            if self.checkpoint_every > 0 && stats.processed % self.checkpoint_every == 0 {
                checkpoint(&corrected)?;
            }
        }

        Ok(ReconcileReport {
            status,
            stats,
            definitions: corrected,
        })
    }

    /// Новая метка рельефа, если её нужно записать
    fn process<R: Rng + ?Sized>(
        &self,
        definition: &ProvinceDefinition,
        stats: &mut ReconcileStats,
        rng: &mut R,
    ) -> Option<String> {
        let id = definition.id;
        if let Some(reason) = self.eligibility.skip_reason(definition) {
            info!("  Пропуск провинции {id}: {reason}");
            stats.record_skip(reason);
            return None;
        }

        match resolve_terrain(self.sampler, definition.color(), rng) {
            Resolution::Resolved(terrain) if terrain.as_str() == definition.terrain => {
                stats.unchanged += 1;
                None
            }
            Resolution::Resolved(terrain) => {
                info!(
                    "  Провинция {id}: рельеф {} -> {terrain}",
                    definition.terrain
                );
                stats.updated += 1;
                Some(terrain.as_str().to_string())
            }
            Resolution::RegionNotFound => {
                warn!(
                    "  Провинция {id}: цвет {} не найден на карте провинций",
                    definition.color()
                );
                stats.not_found += 1;
                None
            }
            Resolution::UnmappedColor(color) => {
                warn!("  Провинция {id}: цвет рельефа {color} отсутствует в палитре");
                stats.unmapped += 1;
                None
            }
        }
    }
}

/// Полный прогон по файлам из конфигурации: чтение, сверка, сохранение.
///
/// Результат сохраняется и при завершении, и при отмене (кроме `dry_run`).
pub fn reconcile_files(
    config: &ReconcileConfig,
    cancel: &CancellationToken,
) -> Result<ReconcileReport> {
    let definitions = read_definitions(&config.definition)?;
    let rasters = RasterPair::open(&config.provinces, &config.terrain)?;

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let eligibility = Eligibility::new(config.placeholder_terrains.iter().cloned());

    let save = |defs: &[ProvinceDefinition]| -> Result<()> {
        if config.dry_run {
            return Ok(());
        }
        save_definitions(&config.output, defs)
    };

    let report = if config.use_index {
        let index = RegionIndex::build(&rasters);
        debug!("Индекс построен: {} цветов провинций", index.len());
        Reconciler::new(&index)
            .with_eligibility(eligibility)
            .with_checkpoint_every(config.checkpoint_every)
            .run(&definitions, &mut rng, cancel, save)?
    } else {
        Reconciler::new(&rasters)
            .with_eligibility(eligibility)
            .with_checkpoint_every(config.checkpoint_every)
            .run(&definitions, &mut rng, cancel, save)?
    };

    save(&report.definitions)?;
    let target = config.output.display();
    match (report.status, config.dry_run) {
        (_, true) => info!("Пробный прогон: результат не сохранён."),
        (RunStatus::Completed, false) => {
            info!("✅ Обработка завершена. Результат сохранён в '{target}'.");
        }
        (RunStatus::Cancelled, false) => {
            warn!("⏹  Обработка прервана. Частичный результат сохранён в '{target}'.");
        }
    }
    Ok(report)
}
