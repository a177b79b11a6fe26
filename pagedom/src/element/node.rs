use std::time::Duration;

/// Declarative element description, mounted into a [`Document`](crate::Document).
///
/// Elements are built with consuming builder methods and turned into live
/// nodes by [`Document::from_element`](crate::Document::from_element) or
/// [`Document::append`](crate::Document::append).
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    /// Attributes in declaration order.
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
    /// Duration of the visual transition this element runs when its
    /// disclosure state changes. `None` means no transition, so no
    /// completion signal will ever fire for it.
    pub transition: Option<Duration>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn button() -> Self {
        Self::new("button")
    }

    pub fn section() -> Self {
        Self::new("section")
    }

    pub fn heading(level: u8) -> Self {
        Self::new(format!("h{}", level.clamp(1, 6)))
    }

    // Identity
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    // Attributes
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Set a boolean attribute (present with an empty value).
    pub fn flag(self, name: impl Into<String>) -> Self {
        self.attr(name, "")
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    // Content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    // Visual
    pub fn transition(mut self, duration: Duration) -> Self {
        self.transition = Some(duration);
        self
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(new_children);
        self
    }
}
