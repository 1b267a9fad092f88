use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::reader::NsReader;
use tokio::io::{AsyncBufRead, AsyncWrite};

use super::element::{
    named, Attribute, Context, Element, Name, Node, QWrite, Token, CAL_URN, CARD_URN, DAV_URN,
};
use super::error::{Error, ParsingError};

// Async traits
pub trait IWrite: AsyncWrite + Unpin + Send {}
impl<T: AsyncWrite + Unpin + Send> IWrite for T {}
pub trait IRead: AsyncBufRead + Unpin {}
impl<T: AsyncBufRead + Unpin> IRead for T {}

// ---------------

/// Transform an XML stream of characters into element trees
pub struct Reader<T: IRead> {
    pub rdr: NsReader<T>,
    buf: Vec<u8>,
}
impl<T: IRead> Reader<T> {
    pub fn new(rdr: NsReader<T>) -> Self {
        Self { rdr, buf: vec![] }
    }

    /// read one more event
    async fn next(&mut self) -> Result<Event<'static>, ParsingError> {
        let evt = self
            .rdr
            .read_event_into_async(&mut self.buf)
            .await?
            .into_owned();
        self.buf.clear();
        Ok(evt)
    }

    fn resolve(&self, qname: QName<'_>, is_attribute: bool) -> Result<Name, ParsingError> {
        let (ns, local) = match is_attribute {
            true => self.rdr.resolve_attribute(qname),
            false => self.rdr.resolve_element(qname),
        };
        let local = std::str::from_utf8(local.into_inner())?.to_string();
        let ns = match ns {
            ResolveResult::Bound(ns) => std::str::from_utf8(ns.into_inner())?.to_string(),
            ResolveResult::Unbound => String::new(),
            ResolveResult::Unknown(prefix) => {
                return Err(ParsingError::UnknownNamespacePrefix(
                    String::from_utf8_lossy(&prefix).into_owned(),
                ))
            }
        };
        Ok(Name::owned(ns, local))
    }

    /// Build the element of a start tag, namespace declarations are dropped
    fn open(&self, start: &BytesStart<'_>) -> Result<Element, ParsingError> {
        let mut elem = Element::new(self.resolve(start.name(), false)?);
        for attr in start.attributes() {
            let attr = attr?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            elem.attributes.push(Attribute {
                name: self.resolve(attr.key, true)?,
                value: attr.decode_and_unescape_value(&self.rdr)?.into_owned(),
            });
        }
        Ok(elem)
    }

    /// Read the next top-level element with its whole subtree.
    ///
    /// Whitespace-only text is dropped from elements that have child
    /// elements, leaf text is kept as is. Comments and processing
    /// instructions are skipped.
    pub async fn document(&mut self) -> Result<Element, ParsingError> {
        let mut parents: Vec<Element> = vec![];
        loop {
            let done = match self.next().await? {
                Event::Start(bs) => {
                    parents.push(self.open(&bs)?);
                    None
                }
                Event::Empty(bs) => Some(self.open(&bs)?),
                Event::End(_) => {
                    let mut elem = parents.pop().ok_or(ParsingError::WrongToken)?;
                    strip_layout(&mut elem);
                    Some(elem)
                }
                Event::Text(escaped) => {
                    let txt = escaped.unescape()?;
                    match parents.last_mut() {
                        Some(parent) => parent.push_text(txt.into_owned()),
                        None if txt.trim().is_empty() => (),
                        None => tracing::trace!(text = %txt, "ignoring text outside of any element"),
                    }
                    None
                }
                Event::CData(unescaped) => {
                    let txt = std::str::from_utf8(&unescaped)?;
                    if let Some(parent) = parents.last_mut() {
                        parent.push_text(txt);
                    }
                    None
                }
                Event::Eof => return Err(ParsingError::Eof),
                other => {
                    tracing::trace!(event = ?other, "skipping");
                    None
                }
            };

            if let Some(elem) = done {
                match parents.last_mut() {
                    Some(parent) => parent.push(elem),
                    None => return Ok(elem),
                }
            }
        }
    }

    /// Skip top-level elements until one named after `N`, then decode it
    pub async fn find<N: Node<N>>(&mut self) -> Result<N, Error> {
        let name = named::<N>()?;
        loop {
            let elem = self.document().await?;
            if elem.is(&name) {
                return N::qread(&elem);
            }
            tracing::trace!(name = %elem.name, "skipping top-level element");
        }
    }
}

/// Whitespace-only text between child elements is indentation
fn strip_layout(elem: &mut Element) {
    if elem.elements().next().is_some() {
        elem.children
            .retain(|t| !matches!(t, Token::Text(txt) if txt.trim().is_empty()));
    }
}

// ---------------

/// Transform element trees into an XML stream of characters
pub struct Writer<T: IWrite> {
    pub q: quick_xml::writer::Writer<T>,
}
impl<T: IWrite> Writer<T> {
    pub fn new(q: quick_xml::writer::Writer<T>) -> Self {
        Self { q }
    }

    pub async fn declaration(&mut self) -> Result<(), quick_xml::Error> {
        self.q
            .write_event_async(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .await
    }

    /// Encode `value` with `ctx` then serialize it
    pub async fn write(&mut self, ctx: &Context, value: &(impl QWrite + ?Sized)) -> Result<(), Error> {
        let root = value.qwrite(ctx)?;
        Ok(self.write_element(&root).await?)
    }

    /// Every namespace of the tree is declared on its root
    pub async fn write_element(&mut self, root: &Element) -> Result<(), quick_xml::Error> {
        let prefixes = Prefixes::collect(root);
        let mut events = vec![];
        flatten(root, &prefixes, true, &mut events);
        for evt in events {
            self.q.write_event_async(evt).await?;
        }
        Ok(())
    }
}

/// Namespace to prefix bindings of a document
struct Prefixes(Vec<(String, String)>);
impl Prefixes {
    fn collect(root: &Element) -> Self {
        let mut acc = Self(vec![]);
        let mut todo = vec![root];
        while let Some(elem) = todo.pop() {
            acc.bind(&elem.name.ns);
            elem.attributes.iter().for_each(|a| acc.bind(&a.name.ns));
            // reversed so that prefixes follow document order
            todo.extend(elem.elements().collect::<Vec<_>>().into_iter().rev());
        }
        acc
    }

    fn bind(&mut self, ns: &str) {
        if ns.is_empty() || self.0.iter().any(|(n, _)| n == ns) {
            return;
        }
        let prefix = match ns {
            DAV_URN => "D".to_string(),
            CAL_URN => "C".to_string(),
            CARD_URN => "CR".to_string(),
            _ => format!("ns{}", self.0.len()),
        };
        self.0.push((ns.to_string(), prefix));
    }

    fn qualify(&self, name: &Name) -> String {
        match self.0.iter().find(|(n, _)| n == name.ns.as_ref()) {
            Some((_, prefix)) => format!("{}:{}", prefix, name.local),
            None => name.local.to_string(),
        }
    }

    fn declarations(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(ns, prefix)| (format!("xmlns:{}", prefix), ns.clone()))
            .collect()
    }
}

fn flatten(elem: &Element, prefixes: &Prefixes, is_root: bool, out: &mut Vec<Event<'static>>) {
    let mut start = BytesStart::new(prefixes.qualify(&elem.name));
    if is_root {
        let declarations = prefixes.declarations();
        start.extend_attributes(declarations.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    for attr in elem.attributes.iter() {
        let key = prefixes.qualify(&attr.name);
        start.push_attribute((key.as_str(), attr.value.as_str()));
    }

    if !elem.has_children() {
        out.push(Event::Empty(start));
        return;
    }

    let end = start.to_end().into_owned();
    out.push(Event::Start(start));
    for child in elem.children.iter() {
        match child {
            Token::Text(txt) => out.push(Event::Text(BytesText::new(txt).into_owned())),
            Token::Element(e) => flatten(e, prefixes, false, out),
        }
    }
    out.push(Event::End(end));
}
