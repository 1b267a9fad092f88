use http::StatusCode;

use super::element::{named, Context, Element, Name, Node, QWrite};
use super::error::Error;
use super::status::{Scope, Status};
use super::types::*;

impl Prop {
    /// Encode each value in call order, order is kept on the wire
    pub fn encode(ctx: &Context, values: &[&dyn QWrite]) -> Result<Self, Error> {
        values
            .iter()
            .map(|v| v.qwrite(ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(Prop)
    }

    /// Empty elements only, as used in requests and name discovery
    pub fn from_names(names: impl IntoIterator<Item = Name>) -> Self {
        Prop(names.into_iter().map(Element::new).collect())
    }

    /// Names of the properties, in document order
    pub fn names(&self) -> Vec<Name> {
        self.0.iter().map(|e| e.name.clone()).collect()
    }
}

impl Multistatus {
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            responses,
            responsedescription: None,
        }
    }

    pub fn push(&mut self, response: Response) {
        self.responses.push(response)
    }

    /// First response that lists `href`
    pub fn get(&self, href: &str) -> Result<&Response, Error> {
        self.responses
            .iter()
            .find(|r| r.hrefs.iter().any(|h| h.0 == href))
            .ok_or_else(|| Error::ResponseNotFound(href.to_string()))
    }

    pub fn get_mut(&mut self, href: &str) -> Result<&mut Response, Error> {
        self.responses
            .iter_mut()
            .find(|r| r.hrefs.iter().any(|h| h.0 == href))
            .ok_or_else(|| Error::ResponseNotFound(href.to_string()))
    }
}

impl Response {
    /// A whole-resource success for `href`
    pub fn ok(href: impl Into<String>) -> Self {
        Self {
            hrefs: vec![Href(href.into())],
            status: Some(Status::new(StatusCode::OK)),
            ..Self::default()
        }
    }

    /// The only href of this response
    pub fn href(&self) -> Result<&str, Error> {
        Status::check(self.status.as_ref(), Scope::Resource)?;
        match self.hrefs.as_slice() {
            [href] => Ok(href.0.as_str()),
            other => Err(Error::Cardinality(other.len())),
        }
    }

    /// Decode the property `N` of this response.
    ///
    /// A failed top-level status blocks every property. Otherwise the
    /// first propstat holding the property decides: its status must
    /// succeed, the other groups are not looked at.
    pub fn decode_prop<N: Node<N>>(&self) -> Result<N, Error> {
        let name = named::<N>()?;
        Status::check(self.status.as_ref(), Scope::Resource)?;

        for propstat in self.propstats.iter() {
            if let Some(raw) = propstat.prop.0.iter().find(|e| e.is(&name)) {
                Status::check(Some(&propstat.status), Scope::PropStat)?;
                return N::qread(raw);
            }
        }

        Err(Error::PropNotFound {
            name,
            href: self.hrefs.first().map(|h| h.0.clone()),
        })
    }

    /// Add `value` to the propstat of `code`, creating it if needed.
    /// Existing propstats are never removed nor reordered.
    pub fn encode_prop(
        &mut self,
        ctx: &Context,
        code: StatusCode,
        value: &(impl QWrite + ?Sized),
    ) -> Result<(), Error> {
        let raw = value.qwrite(ctx)?;

        match self.propstats.iter_mut().find(|p| p.status.code == code) {
            Some(propstat) => propstat.prop.0.push(raw),
            None => {
                tracing::trace!(code = code.as_u16(), prop = %raw.name, "new propstat");
                self.propstats.push(PropStat {
                    prop: Prop(vec![raw]),
                    status: Status::new(code),
                    error: None,
                    responsedescription: None,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn propstat(code: StatusCode, props: Vec<Element>) -> PropStat {
        PropStat {
            prop: Prop(props),
            status: Status::new(code),
            error: None,
            responsedescription: None,
        }
    }

    fn mixed() -> Response {
        let ctx = Context::default();
        Response {
            hrefs: vec![Href("/a".into())],
            propstats: vec![
                propstat(
                    StatusCode::OK,
                    vec![GetContentLength(42).qwrite(&ctx).unwrap()],
                ),
                propstat(
                    StatusCode::NOT_FOUND,
                    vec![Element::new(Name::dav("getcontenttype"))],
                ),
            ],
            ..Response::default()
        }
    }

    #[test]
    fn decode_prop_by_group() {
        let resp = mixed();
        assert_eq!(resp.decode_prop::<GetContentLength>().unwrap(), GetContentLength(42));

        match resp.decode_prop::<GetContentType>() {
            Err(Error::Status { status, scope }) => {
                assert_eq!(status.code, StatusCode::NOT_FOUND);
                assert_eq!(scope, Scope::PropStat);
            }
            other => panic!("unexpected {:?}", other),
        }

        match resp.decode_prop::<GetEtag>() {
            Err(Error::PropNotFound { name, href }) => {
                assert_eq!(name, Name::dav("getetag"));
                assert_eq!(href.as_deref(), Some("/a"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn failed_resource_blocks_everything() {
        let mut resp = mixed();
        resp.status = Some(Status::new(StatusCode::FORBIDDEN));
        for result in [
            resp.decode_prop::<GetContentLength>().map(|_| ()),
            resp.decode_prop::<GetContentType>().map(|_| ()),
            resp.decode_prop::<GetEtag>().map(|_| ()),
        ] {
            assert!(matches!(
                result,
                Err(Error::Status {
                    scope: Scope::Resource,
                    ..
                })
            ));
        }

        // a redirect is not a success either
        resp.status = Some(Status::new(StatusCode::MOVED_PERMANENTLY));
        assert!(matches!(
            resp.decode_prop::<GetContentLength>(),
            Err(Error::Status { .. })
        ));
    }

    #[test]
    fn decode_prop_needs_a_name() {
        assert!(matches!(
            mixed().decode_prop::<Element>(),
            Err(Error::Name(_))
        ));
    }

    #[test]
    fn decode_prop_first_duplicate_wins() {
        let ctx = Context::default();
        let mut resp = Response::ok("/a");
        resp.encode_prop(&ctx, StatusCode::OK, &DisplayName("first".into())).unwrap();
        resp.encode_prop(&ctx, StatusCode::OK, &DisplayName("second".into())).unwrap();
        assert_eq!(resp.decode_prop::<DisplayName>().unwrap(), DisplayName("first".into()));
        assert_eq!(resp.propstats[0].prop.0.len(), 2);
    }

    #[test]
    fn decode_prop_shape_mismatch() {
        let mut resp = Response::ok("/a");
        resp.propstats.push(propstat(
            StatusCode::OK,
            vec![Element::with_text(Name::dav("getcontentlength"), "lots")],
        ));
        assert!(matches!(
            resp.decode_prop::<GetContentLength>(),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn encode_prop_merges_groups() {
        let ctx = Context::default();
        let mut resp = Response::default();
        resp.encode_prop(&ctx, StatusCode::OK, &GetContentLength(1)).unwrap();
        resp.encode_prop(&ctx, StatusCode::NOT_FOUND, &Element::new(Name::dav("getetag")))
            .unwrap();
        resp.encode_prop(&ctx, StatusCode::OK, &GetContentType("text/plain".into()))
            .unwrap();

        assert_eq!(resp.propstats.len(), 2);
        assert_eq!(resp.propstats[0].status.code, StatusCode::OK);
        assert_eq!(
            resp.propstats[0].prop.names(),
            vec![Name::dav("getcontentlength"), Name::dav("getcontenttype")]
        );
        assert_eq!(resp.propstats[1].status.code, StatusCode::NOT_FOUND);
        assert_eq!(resp.propstats[1].prop.names(), vec![Name::dav("getetag")]);
    }

    #[test]
    fn href_cardinality() {
        assert_eq!(Response::ok("/a").href().unwrap(), "/a");

        let none = Response::default();
        assert!(matches!(none.href(), Err(Error::Cardinality(0))));

        let two = Response {
            hrefs: vec![Href("/a".into()), Href("/b".into())],
            ..Response::default()
        };
        assert!(matches!(two.href(), Err(Error::Cardinality(2))));

        let mut gone = Response::ok("/a");
        gone.status = Some(Status::new(StatusCode::GONE));
        assert!(matches!(gone.href(), Err(Error::Status { .. })));
    }

    #[test]
    fn multistatus_lookup() {
        let mut ms = Multistatus::new(vec![Response::ok("/a"), Response::ok("/b")]);
        assert_eq!(ms.get("/a").unwrap().hrefs[0], Href("/a".into()));
        assert_eq!(ms.get("/b").unwrap().hrefs[0], Href("/b".into()));
        assert!(matches!(ms.get("/c"), Err(Error::ResponseNotFound(h)) if h == "/c"));

        ms.get_mut("/b")
            .unwrap()
            .encode_prop(&Context::default(), StatusCode::OK, &GetEtag("\"x\"".into()))
            .unwrap();
        assert_eq!(
            ms.responses[1].decode_prop::<GetEtag>().unwrap(),
            GetEtag("\"x\"".into())
        );
    }

    #[test]
    fn multistatus_lookup_first_match() {
        let mut dup = Response::ok("/a");
        dup.responsedescription = Some(ResponseDescription("second".into()));
        let ms = Multistatus::new(vec![Response::ok("/a"), dup]);
        assert_eq!(ms.get("/a").unwrap().responsedescription, None);
    }

    #[test]
    fn prop_from_values_keeps_call_order() {
        let ctx = Context::default();
        let prop = Prop::encode(
            &ctx,
            &[
                &GetContentType("text/plain".into()),
                &ResourceType::new([COLLECTION]),
                &GetContentLength(3),
            ],
        )
        .unwrap();
        assert_eq!(
            prop.names(),
            vec![
                Name::dav("getcontenttype"),
                Name::dav("resourcetype"),
                Name::dav("getcontentlength"),
            ]
        );
        assert_eq!(Prop::from_names(prop.names()).names(), prop.names());
    }
}
