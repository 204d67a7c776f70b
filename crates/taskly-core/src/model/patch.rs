use serde::Serialize;

use super::task::{Task, is_blank};
use crate::error::CoreError;

/// A partial update to one task. `None` fields are not sent.
///
/// `description: Some(None)` clears the description on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn description(description: Option<String>) -> Self {
        Self {
            description: Some(description),
            ..Self::default()
        }
    }

    /// Single-field status update.
    pub fn completed(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.is_completed.is_none()
    }

    /// Minimal title/description diff taking `seed` to `draft`.
    ///
    /// Status is never part of the diff; it is committed on its own.
    /// Empty and absent descriptions compare equal.
    pub fn diff(seed: &Task, draft: &Task) -> Self {
        let mut patch = Self::default();
        if draft.title != seed.title {
            patch.title = Some(draft.title.clone());
        }
        if draft.description_text() != seed.description_text() {
            patch.description = Some(draft.description_text().map(str::to_owned));
        }
        patch
    }

    /// Reject a patch that would persist a blank title.
    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        match self.title.as_deref() {
            Some(title) if is_blank(title) => Err(CoreError::blank_title()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::TaskId;

    fn task(title: &str, description: Option<&str>) -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::from("t1"),
            title: title.into(),
            description: description.map(str::to_owned),
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn diff_of_identical_tasks_is_empty() {
        let seed = task("A", Some("B"));
        assert!(TaskPatch::diff(&seed, &seed.clone()).is_empty());
    }

    #[test]
    fn diff_contains_only_changed_title() {
        let seed = task("A", Some("B"));
        let draft = task("A2", Some("B"));
        let patch = TaskPatch::diff(&seed, &draft);
        assert_eq!(patch, TaskPatch::title("A2"));
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "title": "A2" }));
    }

    #[test]
    fn diff_ignores_status() {
        let seed = task("A", None);
        let mut draft = seed.clone();
        draft.is_completed = true;
        assert!(TaskPatch::diff(&seed, &draft).is_empty());
    }

    #[test]
    fn empty_and_absent_description_are_equal() {
        let seed = task("A", Some(""));
        let draft = task("A", None);
        assert!(TaskPatch::diff(&seed, &draft).is_empty());
    }

    #[test]
    fn clearing_description_sends_null() {
        let seed = task("A", Some("B"));
        let draft = task("A", Some(""));
        let patch = TaskPatch::diff(&seed, &draft);
        assert_eq!(patch, TaskPatch::description(None));
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "description": null })
        );
    }

    #[test]
    fn blank_title_fails_validation() {
        assert!(TaskPatch::title("   ").validate().is_err());
        assert!(TaskPatch::title("ok").validate().is_ok());
        assert!(TaskPatch::completed(true).validate().is_ok());
    }
}
