use std::collections::BTreeSet;

/// Marker class that hides an element.
pub const HIDDEN_CLASS: &str = "hidden";

/// A page element addressed by id, carrying a class list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: String,
    classes: BTreeSet<String>,
    href: Option<String>,
    label: String,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            classes: BTreeSet::new(),
            href: None,
            label: String::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.classes.contains(class) {
            self.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn is_hidden(&self) -> bool {
        self.has_class(HIDDEN_CLASS)
    }
}
