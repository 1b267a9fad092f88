use chrono::{DateTime, FixedOffset};

use super::element::{named, Context, Element, Named, QWrite};
use super::error::Error;
use super::status::Status;
use super::types::*;

fn node<N: Named>() -> Result<Element, Error> {
    Ok(Element::new(named::<N>()?))
}

fn text_node<N: Named>(text: impl Into<String>) -> Result<Element, Error> {
    Ok(Element::with_text(named::<N>()?, text))
}

// ---- ROOT ----

impl QWrite for PropFind {
    fn qwrite(&self, ctx: &Context) -> Result<Element, Error> {
        let mut elem = node::<Self>()?;
        match self {
            Self::PropName => elem.push(Element::new(PROPNAME)),
            Self::AllProp(include) => {
                elem.push(Element::new(ALLPROP));
                if let Some(include) = include {
                    elem.push(include.qwrite(ctx)?);
                }
            }
            Self::Prop(prop) => elem.push(prop.qwrite(ctx)?),
        }
        Ok(elem)
    }
}

impl QWrite for Multistatus {
    fn qwrite(&self, ctx: &Context) -> Result<Element, Error> {
        let mut elem = node::<Self>()?;
        for response in self.responses.iter() {
            elem.push(response.qwrite(ctx)?);
        }
        if let Some(description) = &self.responsedescription {
            elem.push(description.qwrite(ctx)?);
        }
        Ok(elem)
    }
}

impl QWrite for DavError {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        let mut elem = node::<Self>()?;
        self.0.iter().cloned().for_each(|v| elem.push(v));
        Ok(elem)
    }
}

// ---- INNER XML ----

impl QWrite for Response {
    fn qwrite(&self, ctx: &Context) -> Result<Element, Error> {
        let mut elem = node::<Self>()?;
        for href in self.hrefs.iter() {
            elem.push(href.qwrite(ctx)?);
        }
        if let Some(status) = &self.status {
            elem.push(status.qwrite(ctx)?);
        }
        for propstat in self.propstats.iter() {
            elem.push(propstat.qwrite(ctx)?);
        }
        if let Some(error) = &self.error {
            elem.push(error.qwrite(ctx)?);
        }
        if let Some(description) = &self.responsedescription {
            elem.push(description.qwrite(ctx)?);
        }
        if let Some(location) = &self.location {
            elem.push(location.qwrite(ctx)?);
        }
        Ok(elem)
    }
}

impl QWrite for PropStat {
    fn qwrite(&self, ctx: &Context) -> Result<Element, Error> {
        let mut elem = node::<Self>()?;
        elem.push(self.prop.qwrite(ctx)?);
        elem.push(self.status.qwrite(ctx)?);
        if let Some(error) = &self.error {
            elem.push(error.qwrite(ctx)?);
        }
        if let Some(description) = &self.responsedescription {
            elem.push(description.qwrite(ctx)?);
        }
        Ok(elem)
    }
}

impl QWrite for Status {
    fn qwrite(&self, ctx: &Context) -> Result<Element, Error> {
        text_node::<Self>(ctx.status.encode(self))
    }
}

impl QWrite for ResponseDescription {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        text_node::<Self>(self.0.as_str())
    }
}

impl QWrite for Location {
    fn qwrite(&self, ctx: &Context) -> Result<Element, Error> {
        let mut elem = node::<Self>()?;
        elem.push(self.0.qwrite(ctx)?);
        Ok(elem)
    }
}

impl QWrite for Href {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        text_node::<Self>(self.0.as_str())
    }
}

impl QWrite for Prop {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        let mut elem = node::<Self>()?;
        self.0.iter().cloned().for_each(|v| elem.push(v));
        Ok(elem)
    }
}

impl QWrite for Include {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        let mut elem = node::<Self>()?;
        self.0.iter().cloned().for_each(|v| elem.push(v));
        Ok(elem)
    }
}

// ---- PROPERTIES ----

impl QWrite for CreationDate {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        text_node::<Self>(self.0.to_rfc3339())
    }
}

impl QWrite for DisplayName {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        text_node::<Self>(self.0.as_str())
    }
}

impl QWrite for GetContentLength {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        text_node::<Self>(self.0.to_string())
    }
}

impl QWrite for GetContentType {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        text_node::<Self>(self.0.as_str())
    }
}

impl QWrite for GetEtag {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        text_node::<Self>(self.0.as_str())
    }
}

impl QWrite for GetLastModified {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        text_node::<Self>(format_http_date(&self.0))
    }
}

impl QWrite for ResourceType {
    fn qwrite(&self, _ctx: &Context) -> Result<Element, Error> {
        let mut elem = node::<Self>()?;
        self.0.iter().cloned().for_each(|v| elem.push(v));
        Ok(elem)
    }
}

/// RFC 1123 with a numeric offset, eg. `Mon, 12 Jan 1998 09:25:56 +0000`
pub fn format_http_date(date: &DateTime<FixedOffset>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::parse_http_date;
    use crate::element::{Name, QRead, Token};
    use crate::status::{ReasonPhrases, StatusCodec};
    use chrono::TimeZone;
    use http::StatusCode;

    #[test]
    fn property_values_survive_a_round_trip() {
        let ctx = Context::default();
        let date = FixedOffset::west_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(1997, 12, 1, 17, 42, 21)
            .unwrap();

        let length = GetContentLength(-4525);
        assert_eq!(GetContentLength::qread(&length.qwrite(&ctx).unwrap()).unwrap(), length);

        let ctype = GetContentType("text/calendar; charset=utf-8".into());
        assert_eq!(GetContentType::qread(&ctype.qwrite(&ctx).unwrap()).unwrap(), ctype);

        let modified = GetLastModified(date);
        assert_eq!(GetLastModified::qread(&modified.qwrite(&ctx).unwrap()).unwrap(), modified);

        let created = CreationDate(date);
        assert_eq!(CreationDate::qread(&created.qwrite(&ctx).unwrap()).unwrap(), created);

        let rtype = ResourceType::new([COLLECTION, Name::new(crate::element::CAL_URN, "calendar")]);
        assert_eq!(ResourceType::qread(&rtype.qwrite(&ctx).unwrap()).unwrap(), rtype);
    }

    #[test]
    fn last_modified_text() {
        let date = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(1998, 1, 2, 9, 25, 56)
            .unwrap();
        let elem = GetLastModified(date).qwrite(&Context::default()).unwrap();
        assert_eq!(elem.name, Name::dav("getlastmodified"));
        assert_eq!(elem.text(), "Fri, 02 Jan 1998 09:25:56 +0100");
        assert_eq!(parse_http_date(&elem.text()).unwrap(), date);
    }

    #[test]
    fn status_uses_the_context_codec() {
        let overrides = std::collections::HashMap::from([(
            StatusCode::MULTI_STATUS,
            "Partial Success".to_string(),
        )]);
        let ctx = Context::new(StatusCodec::new("HTTP/1.1", ReasonPhrases::new(overrides)));

        let elem = Status::new(StatusCode::MULTI_STATUS).qwrite(&ctx).unwrap();
        assert_eq!(elem.text(), "HTTP/1.1 207 Partial Success");

        let elem = Status::new(StatusCode::NOT_FOUND).qwrite(&ctx).unwrap();
        assert_eq!(elem.text(), "HTTP/1.1 404 Not Found");
    }

    #[test]
    fn response_children_order() {
        let response = Response {
            hrefs: vec![Href("/a".into())],
            propstats: vec![PropStat {
                prop: Prop(vec![Element::new(Name::dav("getetag"))]),
                status: Status::with_reason(StatusCode::NOT_FOUND, "Not Found"),
                error: None,
                responsedescription: None,
            }],
            status: None,
            error: Some(DavError(vec![Element::new(Name::dav("propfind-finite-depth"))])),
            responsedescription: Some(ResponseDescription("partial".into())),
            location: Some(Location(Href("/b".into()))),
        };
        let elem = response.qwrite(&Context::default()).unwrap();
        let names = elem
            .elements()
            .map(|e| e.name.local.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            ["href", "propstat", "error", "responsedescription", "location"]
        );
        assert_eq!(Response::qread(&elem).unwrap(), response);
    }

    #[test]
    fn propfind_shapes() {
        let ctx = Context::default();

        let elem = PropFind::PropName.qwrite(&ctx).unwrap();
        assert_eq!(elem.children, vec![Token::Element(Element::new(PROPNAME))]);

        let all = PropFind::all([Name::dav("getetag")]);
        let elem = all.qwrite(&ctx).unwrap();
        assert_eq!(
            elem.elements().map(|e| e.name.clone()).collect::<Vec<_>>(),
            vec![ALLPROP, Name::dav("include")]
        );
        assert_eq!(PropFind::qread(&elem).unwrap(), all);

        let named = PropFind::names([Name::dav("getcontentlength"), Name::dav("getetag")]);
        assert_eq!(PropFind::qread(&named.qwrite(&ctx).unwrap()).unwrap(), named);
    }
}
