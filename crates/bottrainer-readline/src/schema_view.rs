use std::collections::BTreeSet;

use bottrainer_core::schema;

/// Which intents of the schema browser are expanded. Owned by the view.
#[derive(Debug, Default)]
pub struct SchemaView {
    expanded: BTreeSet<&'static str>,
}

impl SchemaView {
    /// Flips one intent. Returns its new state, or `None` for unknown intents.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let definition = schema::find(name)?;
        if self.expanded.remove(definition.name) {
            Some(false)
        } else {
            self.expanded.insert(definition.name);
            Some(true)
        }
    }

    pub fn expand_all(&mut self) {
        self.expanded = schema::names().collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_known_intents_only() {
        let mut view = SchemaView::default();
        assert_eq!(view.toggle("booking"), Some(true));
        assert!(view.is_expanded("booking"));
        assert_eq!(view.toggle("booking"), Some(false));
        assert_eq!(view.toggle("smalltalk"), None);
    }

    #[test]
    fn expand_and_collapse_all() {
        let mut view = SchemaView::default();
        view.expand_all();
        assert!(schema::names().all(|name| view.is_expanded(name)));
        view.collapse_all();
        assert!(!view.is_expanded("greeting"));
    }
}
