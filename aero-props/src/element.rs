use std::borrow::Cow;
use std::fmt;

use super::error::{Error, ParsingError};
use super::status::StatusCodec;

// Constants
pub const DAV_URN: &str = "DAV:";
pub const CAL_URN: &str = "urn:ietf:params:xml:ns:caldav";
pub const CARD_URN: &str = "urn:ietf:params:xml:ns:carddav";

/// A qualified XML name, independent of any prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name {
    pub ns: Cow<'static, str>,
    pub local: Cow<'static, str>,
}
impl Name {
    pub const fn new(ns: &'static str, local: &'static str) -> Self {
        Self {
            ns: Cow::Borrowed(ns),
            local: Cow::Borrowed(local),
        }
    }

    pub const fn dav(local: &'static str) -> Self {
        Self::new(DAV_URN, local)
    }

    pub fn owned(ns: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            ns: Cow::Owned(ns.into()),
            local: Cow::Owned(local.into()),
        }
    }
}
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ns, self.local)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Name,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Text(String),
    Element(Element),
}

/// The in-memory form of one XML element
///
/// Every typed value goes through this representation, both ways.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: Name,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Token>,
}

impl Element {
    /// An element with no attribute nor children, like `<D:collection/>`
    pub fn new(name: Name) -> Self {
        Self {
            name,
            attributes: vec![],
            children: vec![],
        }
    }

    pub fn with_text(name: Name, text: impl Into<String>) -> Self {
        let mut elem = Self::new(name);
        elem.push_text(text);
        elem
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Token::Element(child));
    }

    /// Empty strings are not stored
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Token::Text(text));
        }
    }

    pub fn push_attribute(&mut self, name: Name, value: impl Into<String>) {
        self.attributes.push(Attribute {
            name,
            value: value.into(),
        });
    }

    pub fn is(&self, name: &Name) -> bool {
        &self.name == name
    }

    /// Child elements in document order, text is skipped
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|t| match t {
            Token::Element(e) => Some(e),
            Token::Text(_) => None,
        })
    }

    /// First child with this name
    pub fn child(&self, name: &Name) -> Option<&Element> {
        self.elements().find(|e| e.is(name))
    }

    pub fn attribute(&self, name: &Name) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| &a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Concatenation of the direct text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|t| match t {
                Token::Text(txt) => Some(txt.as_str()),
                Token::Element(_) => None,
            })
            .collect()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Decode the first child named after `N`, it must exist
    pub fn find<N: Node<N>>(&self) -> Result<N, Error> {
        self.maybe_find::<N>()?
            .ok_or(Error::Decode(ParsingError::MissingChild))
    }

    /// Decode the first child named after `N`, if any.
    /// Later children with the same name are ignored.
    pub fn maybe_find<N: Node<N>>(&self) -> Result<Option<N>, Error> {
        let name = named::<N>()?;
        self.child(&name).map(N::qread).transpose()
    }

    /// Decode all the children named after `N`, in document order
    pub fn collect<N: Node<N>>(&self) -> Result<Vec<N>, Error> {
        let name = named::<N>()?;
        self.elements()
            .filter(|e| e.is(&name))
            .map(N::qread)
            .collect()
    }

    /// Check this element carries the name of `N`
    pub fn open<N: Named>(&self) -> Result<(), Error> {
        match self.is(&named::<N>()?) {
            true => Ok(()),
            false => Err(Error::Decode(ParsingError::TagNotFound)),
        }
    }
}

/// Encoding context, handed down to every serializer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    pub status: StatusCodec,
}
impl Context {
    pub fn new(status: StatusCodec) -> Self {
        Self { status }
    }
}

// Serialization/Deserialization traits

/// The XML name under which a type travels on the wire.
/// `None` for types that have no protocol identity.
pub trait Named {
    const NAME: Option<Name>;
}
pub trait QRead<T> {
    fn qread(xml: &Element) -> Result<T, Error>;
}
pub trait QWrite {
    fn qwrite(&self, ctx: &Context) -> Result<Element, Error>;
}

// The representation of an XML node in Rust
pub trait Node<T>: Named + QRead<T> + QWrite + fmt::Debug + PartialEq + Clone {}
impl<T: Named + QRead<T> + QWrite + fmt::Debug + PartialEq + Clone> Node<T> for T {}

/// Resolve the XML name of `N` or fail
pub fn named<N: Named>() -> Result<Name, Error> {
    N::NAME.ok_or(Error::Name(std::any::type_name::<N>()))
}

// A raw element is its own representation, it has no fixed name
impl Named for Element {
    const NAME: Option<Name> = None;
}
impl QRead<Element> for Element {
    fn qread(xml: &Element) -> Result<Self, Error> {
        Ok(xml.clone())
    }
}
impl QWrite for Element {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        Ok(self.clone())
    }
}
