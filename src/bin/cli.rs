use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use terrain_reconcile::logging::setup_logging;
use terrain_reconcile::{CancellationToken, ReconcileConfig, reconcile_files};

/// Сверка рельефа провинций `definition.csv` с картой `terrain.bmp`
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Таблица провинций (по умолчанию: ./definition.csv)
    #[arg(long)]
    definition: Option<PathBuf>,

    /// Карта провинций (по умолчанию: ./provinces.bmp)
    #[arg(long)]
    provinces: Option<PathBuf>,

    /// Карта рельефа (по умолчанию: ./terrain.bmp)
    #[arg(long)]
    terrain: Option<PathBuf>,

    /// Путь для исправленной таблицы (по умолчанию: ./output.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Сид для розыгрыша ничьих
    #[arg(long)]
    seed: Option<u64>,

    /// Промежуточное сохранение каждые N провинций (0 — только в конце)
    #[arg(long)]
    checkpoint_every: Option<usize>,

    /// Сканировать карту на каждую провинцию вместо построения индекса
    #[arg(long)]
    no_index: bool,

    /// Ничего не записывать, только показать изменения
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ReconcileConfig> {
        let mut config = match &self.config {
            Some(path) => ReconcileConfig::from_toml_file(path)
                .with_context(|| format!("не удалось загрузить {}", path.display()))?,
            None => ReconcileConfig::default(),
        };

        if let Some(path) = self.definition {
            config.definition = path;
        }
        if let Some(path) = self.provinces {
            config.provinces = path;
        }
        if let Some(path) = self.terrain {
            config.terrain = path;
        }
        if let Some(path) = self.output {
            config.output = path;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(every) = self.checkpoint_every {
            config.checkpoint_every = every;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config.use_index &= !self.no_index;
        config.dry_run |= self.dry_run;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;
    let _logger = setup_logging(&config.log_level, config.log_dir.as_deref())?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("Получен сигнал прерывания. Сохраняем прогресс...");
        on_interrupt.cancel();
    })
    .context("не удалось установить обработчик Ctrl-C")?;

    let report = reconcile_files(&config, &cancel).context("сверка рельефа не удалась")?;

    let stats = report.stats;
    info!(
        "Итого: обработано {}, изменено {}, без изменений {}, пропущено {} \
         (вода {}, без рельефа {}, побережье {}), не определено {} \
         (нет на карте {}, цвет вне палитры {})",
        stats.processed,
        stats.updated,
        stats.unchanged,
        stats.skipped(),
        stats.skipped_water,
        stats.skipped_unclassified,
        stats.skipped_coastal,
        stats.undetermined(),
        stats.not_found,
        stats.unmapped,
    );
    Ok(())
}
