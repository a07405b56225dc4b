use serde::Serialize;

use crate::error::CoreError;

/// Synthetic leading entry of the sink and output-device lists.
pub const AUTO_LABEL: &str = "auto";

/// Synthetic leading entry of the input-device list.
pub const DEFAULT_INPUT_LABEL: &str = "Default";

/// Ordered list of selectable labels with an optional current selection.
///
/// Insertion order is authoritative: synthetic entries come first, followed by
/// catalog entries in the order the catalog reported them. Nothing is re-sorted.
///
/// # Example
/// ```
/// use ac_core::options::OptionList;
/// let list = OptionList::with_leading("auto", ["wasapi", "sdl2"]);
/// assert_eq!(list.position("sdl2"), Some(2));
/// assert_eq!(list.selected(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OptionList {
    labels: Vec<String>,
    pub(crate) selected: Option<usize>,
}

impl OptionList {
    /// Build a list with one synthetic entry followed by `rest`, nothing selected.
    pub fn with_leading<I, S>(leading: &str, rest: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels = vec![leading.to_string()];
        labels.extend(rest.into_iter().map(Into::into));
        Self {
            labels,
            selected: None,
        }
    }

    /// Index of the first entry equal to `label`.
    ///
    /// First-match, not best-match: duplicates resolve to the earliest occurrence.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Label at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All labels in display order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Current selection, `None` when unmatched.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Label of the current selection, `None` when unmatched.
    #[must_use]
    pub fn selected_label(&self) -> Option<&str> {
        self.selected.and_then(|i| self.get(i))
    }

    /// Select `index`.
    ///
    /// # Errors
    /// Returns [`CoreError::IndexOutOfRange`] if `index` is past the end; the
    /// previous selection is kept in that case.
    pub fn select(&mut self, index: usize, list: &'static str) -> Result<(), CoreError> {
        if index >= self.labels.len() {
            return Err(CoreError::IndexOutOfRange {
                list,
                index,
                len: self.labels.len(),
            });
        }
        self.selected = Some(index);
        Ok(())
    }

    /// Select the first entry equal to `label`, or clear the selection.
    ///
    /// Returns the resulting selection.
    pub fn select_label(&mut self, label: &str) -> Option<usize> {
        self.selected = self.position(label);
        self.selected
    }
}
