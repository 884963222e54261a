use crate::error::Result;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use std::path::Path;

/// Инициализирует логгер. `RUST_LOG` имеет приоритет над `base_level`.
///
/// Без `log_dir` пишет в stderr; с ним — в ротируемые файлы с дублированием в stderr.
/// Возвращённый handle нужно держать до конца работы программы.
pub fn setup_logging(base_level: &str, log_dir: Option<&Path>) -> Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(base_level)?;
    let logger = match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir))
            .duplicate_to_stderr(Duplicate::All)
            .rotate(
                Criterion::Size(1024 * 1024), //1MB
                Naming::Timestamps,
                Cleanup::KeepLogFiles(5),
            ),
        None => logger,
    };
    Ok(logger.start()?)
}
