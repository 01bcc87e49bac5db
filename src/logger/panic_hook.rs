//! Panic reporting through a logger's sinks.

use std::any::Any;
use std::cell::Cell;
use std::panic;
use std::thread;

use serde_json::Value;

use crate::record::Fields;

use super::Logger;

thread_local! {
    /// Set while this thread is reporting a panic, so a panic raised by a
    /// sink during the report falls through to the previous hook.
    static REPORTING: Cell<bool> = Cell::new(false);
}

/// Install a process-wide hook that logs every panic at error level through
/// `reporter`, then runs the hook that was installed before.
pub(crate) fn install(reporter: Logger) {
    let path = reporter.path().display().to_string();
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if !REPORTING.with(|flag| flag.replace(true)) {
            let message = payload_message(info.payload());
            let mut data = Fields::new();
            data.insert("payload".to_string(), Value::String(message.clone()));
            if let Some(location) = info.location() {
                data.insert("location".to_string(), Value::String(location.to_string()));
            }
            let current = thread::current();
            data.insert(
                "thread".to_string(),
                Value::String(current.name().unwrap_or("<unnamed>").to_string()),
            );

            reporter.error_with(format!("Panic: {}", message), &data);
            reporter.flush();
            REPORTING.with(|flag| flag.set(false));
        }
        previous(info);
    }));
    log::debug!("PANIC_HOOK_INSTALLED path={}", path);
}

/// Text of a panic payload: the `&str` or `String` passed to `panic!`.
pub fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
