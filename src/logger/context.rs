//! Per-logger context: session fields and tags.
//!
//! In-place mutations hand back a guard that remembers exactly what it added,
//! so undoing one addition never disturbs keys or tags added by anyone else.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::record::{merge_fields, Fields};

/// Session and tags owned by one logger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    pub session: Option<Fields>,
    pub tags: Option<Vec<String>>,
}

impl Context {
    pub fn new(session: Option<Fields>, tags: Option<Vec<String>>) -> Self {
        Self { session, tags }
    }

    /// Copy with `data` shallow-merged into the session.
    pub fn merged(&self, data: &Fields) -> Self {
        Self {
            session: Some(merge_fields(self.session.as_ref(), data)),
            tags: self.tags.clone(),
        }
    }

    /// Copy with `tags` appended.
    pub fn tagged(&self, tags: &[String]) -> Self {
        let mut all = self.tags.clone().unwrap_or_default();
        all.extend(tags.iter().cloned());
        Self {
            session: self.session.clone(),
            tags: Some(all),
        }
    }

    pub fn merge_in_place(&mut self, data: &Fields) {
        self.session = Some(merge_fields(self.session.as_ref(), data));
    }

    pub fn append_tags(&mut self, tags: &[String]) {
        self.tags.get_or_insert_with(Vec::new).extend(tags.iter().cloned());
    }
}

pub(crate) type SharedContext = Arc<Mutex<Context>>;

/// Undo handle returned by `Logger::add_session`.
///
/// Dropping the guard keeps the session as it is.
#[derive(Debug)]
pub struct SessionGuard {
    context: SharedContext,
    keys: Vec<String>,
}

impl SessionGuard {
    pub(crate) fn new(context: SharedContext, keys: Vec<String>) -> Self {
        Self { context, keys }
    }

    /// Keys this guard removes.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Remove exactly the keys that were added from the current session.
    /// Does nothing if the session has been cleared.
    pub fn undo(self) {
        let mut context = self.context.lock();
        if let Some(session) = context.session.as_mut() {
            session.retain(|key, _| !self.keys.contains(key));
        }
    }
}

/// Undo handle returned by `Logger::add_tag`.
#[derive(Debug)]
pub struct TagGuard {
    context: SharedContext,
    tags: Vec<String>,
}

impl TagGuard {
    pub(crate) fn new(context: SharedContext, tags: Vec<String>) -> Self {
        Self { context, tags }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Remove every occurrence of the added tag values. Does nothing if the
    /// tags have been cleared.
    pub fn undo(self) {
        let mut context = self.context.lock();
        if let Some(tags) = context.tags.as_mut() {
            tags.retain(|tag| !self.tags.contains(tag));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    fn shared(context: Context) -> SharedContext {
        Arc::new(Mutex::new(context))
    }

    #[test]
    fn test_merged_does_not_touch_original() {
        let original = Context::new(Some(fields(json!({"a": 1}))), None);
        let derived = original.merged(&fields(json!({"b": 2})));

        assert_eq!(original.session, Some(fields(json!({"a": 1}))));
        assert_eq!(derived.session, Some(fields(json!({"a": 1, "b": 2}))));
    }

    #[test]
    fn test_tagged_keeps_duplicates() {
        let original = Context::new(None, Some(vec!["x".to_string()]));
        let derived = original.tagged(&["x".to_string(), "y".to_string()]);
        assert_eq!(
            derived.tags,
            Some(vec!["x".to_string(), "x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn test_session_guard_removes_only_its_keys() {
        let context = shared(Context::default());
        context.lock().merge_in_place(&fields(json!({"a": 1})));
        let guard = SessionGuard::new(context.clone(), vec!["a".to_string()]);
        context.lock().merge_in_place(&fields(json!({"b": 2})));

        guard.undo();
        assert_eq!(context.lock().session, Some(fields(json!({"b": 2}))));
    }

    #[test]
    fn test_guards_after_clear_are_noops() {
        let context = shared(Context::new(
            Some(fields(json!({"a": 1}))),
            Some(vec!["t".to_string()]),
        ));
        let session_guard = SessionGuard::new(context.clone(), vec!["a".to_string()]);
        let tag_guard = TagGuard::new(context.clone(), vec!["t".to_string()]);

        *context.lock() = Context::default();
        session_guard.undo();
        tag_guard.undo();

        assert_eq!(*context.lock(), Context::default());
    }
}
