//! Event and log callback system.
//!
//! Notes report to the embedding application through two process-wide
//! callbacks:
//!
//! - the event callback receives [`LAYOUT_COMPLETE`] after every successful
//!   layout pass, with a [`LayoutCompleted`] JSON payload
//!   (`{"visualLines", "width", "height", "fontSize"}`);
//! - the log callback receives the pass diagnostics: width growth to the
//!   widest word and each font shrink step at [`LogLevel::Debug`], overflow
//!   accepted once the font cannot shrink further, and failed passes at
//!   [`LogLevel::Error`].
//!
//! Every log message is also emitted through `tracing` under the `notebox`
//! target, so a subscriber sees them without a callback installed.

use serde::Serialize;
use std::sync::{Mutex, OnceLock};

/// Event emitted after every completed layout pass.
pub const LAYOUT_COMPLETE: &str = "layout_complete";

/// Log level for debug callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Payload of [`LAYOUT_COMPLETE`]: the box geometry after the pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCompleted {
    pub visual_lines: usize,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
}

type EventCallback = Box<dyn Fn(&str, &str) + Send + Sync + 'static>;
type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync + 'static>;

fn event_callback() -> &'static Mutex<Option<EventCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<EventCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

fn log_callback() -> &'static Mutex<Option<LogCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<LogCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

/// Install the event callback, replacing any previous one.
pub fn set_event_callback<F>(callback: F)
where
    F: Fn(&str, &str) + Send + Sync + 'static,
{
    if let Ok(mut guard) = event_callback().lock() {
        *guard = Some(Box::new(callback));
    }
}

pub fn clear_event_callback() {
    if let Ok(mut guard) = event_callback().lock() {
        *guard = None;
    }
}

/// Emit a named event with a JSON payload.
pub fn emit_event(name: &str, data: &str) {
    if let Ok(guard) = event_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(name, data);
        }
    }
}

/// Emit [`LAYOUT_COMPLETE`] for a finished pass.
pub fn emit_layout_complete(payload: &LayoutCompleted) {
    match serde_json::to_string(payload) {
        Ok(data) => emit_event(LAYOUT_COMPLETE, &data),
        Err(err) => emit_log(
            LogLevel::Error,
            &format!("cannot encode {LAYOUT_COMPLETE} payload: {err}"),
        ),
    }
}

/// Install the log callback, replacing any previous one.
pub fn set_log_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    if let Ok(mut guard) = log_callback().lock() {
        *guard = Some(Box::new(callback));
    }
}

pub fn clear_log_callback() {
    if let Ok(mut guard) = log_callback().lock() {
        *guard = None;
    }
}

/// Emit a log message to `tracing` and to the registered callback.
pub fn emit_log(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(target: "notebox", "{message}"),
        LogLevel::Info => tracing::info!(target: "notebox", "{message}"),
        LogLevel::Warn => tracing::warn!(target: "notebox", "{message}"),
        LogLevel::Error => tracing::error!(target: "notebox", "{message}"),
    }
    if let Ok(guard) = log_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(level, message);
        }
    }
}
