use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

use super::element::{named, Element, QRead};
use super::error::{Error, ParsingError};
use super::status::Status;
use super::types::*;

// ---- ROOT ----

/// Propfind request
///
/// Only one mode is legal. When a peer sends several anyway,
/// `prop` wins over `allprop` which wins over `propname`.
impl QRead<PropFind> for PropFind {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;

        if let Some(prop) = xml.maybe_find::<Prop>()? {
            return Ok(PropFind::Prop(prop));
        }
        if xml.child(&ALLPROP).is_some() {
            let include = xml.maybe_find::<Include>()?;
            return Ok(PropFind::AllProp(include));
        }
        if xml.child(&PROPNAME).is_some() {
            return Ok(PropFind::PropName);
        }

        Err(ParsingError::MissingChild.into())
    }
}

/// Generic response
impl QRead<Multistatus> for Multistatus {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(Multistatus {
            responses: xml.collect::<Response>()?,
            responsedescription: xml.maybe_find::<ResponseDescription>()?,
        })
    }
}

/// Error response
impl QRead<DavError> for DavError {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(DavError(xml.elements().cloned().collect()))
    }
}

// ---- INNER XML

impl QRead<Response> for Response {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;

        // An empty status element is the same as no status at all
        let status = match xml.child(&named::<Status>()?) {
            Some(elem) if elem.text().trim().is_empty() => None,
            Some(elem) => Some(Status::qread(elem)?),
            None => None,
        };

        Ok(Response {
            hrefs: xml.collect::<Href>()?,
            propstats: xml.collect::<PropStat>()?,
            status,
            error: xml.maybe_find::<DavError>()?,
            responsedescription: xml.maybe_find::<ResponseDescription>()?,
            location: xml.maybe_find::<Location>()?,
        })
    }
}

impl QRead<PropStat> for PropStat {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(PropStat {
            prop: xml.find::<Prop>()?,
            status: xml.find::<Status>()?,
            error: xml.maybe_find::<DavError>()?,
            responsedescription: xml.maybe_find::<ResponseDescription>()?,
        })
    }
}

impl QRead<Status> for Status {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Status::parse(&xml.text())
    }
}

impl QRead<ResponseDescription> for ResponseDescription {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(ResponseDescription(xml.text()))
    }
}

impl QRead<Location> for Location {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(Location(xml.find::<Href>()?))
    }
}

impl QRead<Href> for Href {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(Href(xml.text().trim().to_string()))
    }
}

/// Text is not allowed in a prop, it is dropped
impl QRead<Prop> for Prop {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(Prop(xml.elements().cloned().collect()))
    }
}

impl QRead<Include> for Include {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(Include(xml.elements().cloned().collect()))
    }
}

// ---- PROPERTIES ----

impl QRead<CreationDate> for CreationDate {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        let datestr = xml.text();
        let date = DateTime::parse_from_rfc3339(datestr.trim())
            .map_err(|e| Error::format("creation date", &datestr, e))?;
        Ok(CreationDate(date))
    }
}

impl QRead<DisplayName> for DisplayName {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(DisplayName(xml.text()))
    }
}

impl QRead<GetContentLength> for GetContentLength {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        let cl = xml
            .text()
            .trim()
            .parse::<i64>()
            .map_err(ParsingError::from)?;
        Ok(GetContentLength(cl))
    }
}

impl QRead<GetContentType> for GetContentType {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(GetContentType(xml.text().trim().to_string()))
    }
}

impl QRead<GetEtag> for GetEtag {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(GetEtag(xml.text().trim().to_string()))
    }
}

impl QRead<GetLastModified> for GetLastModified {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        parse_http_date(&xml.text()).map(GetLastModified)
    }
}

impl QRead<ResourceType> for ResourceType {
    fn qread(xml: &Element) -> Result<Self, Error> {
        xml.open::<Self>()?;
        Ok(ResourceType(xml.elements().cloned().collect()))
    }
}

// ---- DATES ----

const RFC850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

/// Parse an HTTP date: RFC 1123 with `GMT` or a numeric offset,
/// then the obsolete RFC 850 and asctime forms which are always UTC.
pub fn parse_http_date(datestr: &str) -> Result<DateTime<FixedOffset>, Error> {
    let trimmed = datestr.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(date);
    }

    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| Error::format("HTTP date", trimmed, "no UTC offset"))?;
    [RFC850, ASCTIME]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| utc.from_utc_datetime(&naive))
        .ok_or_else(|| Error::format("HTTP date", trimmed, "unsupported date format"))
}
