//! Глобальный logger симуляции.
//!
//! Каждая запись: severity + source tag + timestamp. Sink подменяемый (`LogPrinter`),
//! по умолчанию `ConsoleLogger`. Ошибки core-систем не бросаются, а логируются здесь.

use once_cell::sync::Lazy;
use std::sync::Mutex;

// Потокобезопасный глобальный sink
static LOGGER: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));

static LOGGER_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

pub fn set_logger(logger: Box<dyn LogPrinter>) {
    if let Ok(mut slot) = LOGGER.lock() {
        *slot = Some(logger);
    }
}

pub fn set_log_level(level: LogLevel) {
    if let Ok(mut current) = LOGGER_LEVEL.lock() {
        *current = level;
    }
}

pub fn set_logger_if_needed(logger: Box<dyn LogPrinter>) {
    if let Ok(mut slot) = LOGGER.lock() {
        if slot.is_none() {
            *slot = Some(logger);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Sink для log records (console, engine console, test capture)
pub trait LogPrinter: Send + Sync {
    fn log(&self, level: LogLevel, source: &str, message: &str);
}

pub fn log_info(message: &str) {
    log_with_source(LogLevel::Info, "Simulation", message);
}

pub fn log_error(message: &str) {
    log_with_source(LogLevel::Error, "Simulation", message);
}

/// Structured record: severity + source tag (имя системы/модуля)
pub fn log_with_source(level: LogLevel, source: &str, message: &str) {
    let min_level = LOGGER_LEVEL.lock().map(|l| *l).unwrap_or(LogLevel::Debug);
    if level < min_level {
        return;
    }

    if let Ok(slot) = LOGGER.lock() {
        if let Some(logger) = slot.as_ref() {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            logger.log(level, source, &format!("[{}] {}", timestamp, message));
        }
    }
}

pub struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn log(&self, level: LogLevel, source: &str, message: &str) {
        println!("[{}] [{}] {}", level.as_str(), source, message);
    }
}

pub fn init_logger() {
    set_logger_if_needed(Box::new(ConsoleLogger));
}
