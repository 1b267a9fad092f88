use super::element::{Element, Name};
use super::types::{Include, Prop, PropFind, ResourceType};

impl PropFind {
    /// Request the value of these properties only
    pub fn names(names: impl IntoIterator<Item = Name>) -> Self {
        PropFind::Prop(Prop::from_names(names))
    }

    /// Request all properties, plus the listed ones that
    /// a server would not return by default
    pub fn all(include: impl IntoIterator<Item = Name>) -> Self {
        let include = Include::new(include);
        match include.0.is_empty() {
            true => PropFind::AllProp(None),
            false => PropFind::AllProp(Some(include)),
        }
    }
}

impl Include {
    pub fn new(names: impl IntoIterator<Item = Name>) -> Self {
        Include(names.into_iter().map(Element::new).collect())
    }

    pub fn names(&self) -> Vec<Name> {
        self.0.iter().map(|e| e.name.clone()).collect()
    }
}

impl ResourceType {
    pub fn new(names: impl IntoIterator<Item = Name>) -> Self {
        ResourceType(names.into_iter().map(Element::new).collect())
    }

    pub fn is(&self, name: &Name) -> bool {
        self.0.iter().any(|e| e.is(name))
    }
}
