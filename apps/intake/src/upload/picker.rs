use crate::upload::validator::{extension_of, ALLOWED_EXTENSIONS};

/// Accept filter advertised to the platform file chooser.
pub const ACCEPT_FILTER: &str = ".pdf,.doc,.docx,.txt,.rtf";

/// Model of a file input element. It remembers the last chosen name and, like
/// a browser input, fires no change when the same file is chosen again. Only
/// [`FilePicker::reset`] makes a repeat choice count.
#[derive(Debug, Default, Clone)]
pub struct FilePicker {
    value: Option<String>,
}

impl FilePicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&self) -> &'static str {
        ACCEPT_FILTER
    }

    /// Whether the chooser would list this file under the accept filter.
    pub fn offers(&self, name: &str) -> bool {
        extension_of(name)
            .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Records a choice. Returns `true` if it produces a change event.
    pub fn choose(&mut self, name: &str) -> bool {
        if self.value.as_deref() == Some(name) {
            return false;
        }
        self.value = Some(name.to_string());
        true
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}
