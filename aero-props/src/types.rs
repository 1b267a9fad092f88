use chrono::{DateTime, FixedOffset};

use super::element::{Element, Name, Named};
use super::status::Status;

pub const COLLECTION: Name = Name::dav("collection");
pub const ALLPROP: Name = Name::dav("allprop");
pub const PROPNAME: Name = Name::dav("propname");

/// 14.5 error XML Element
///
/// Name:   error
///
/// Purpose:   Error responses, particularly 403 Forbidden and 409
///   Conflict, sometimes need more information to indicate what went
///  wrong.
///
/// Description:   Contains at least one XML element, and MUST NOT
///  contain text or mixed content.  Any element that is a child of the
///   'error' element is considered to be a precondition or
///   postcondition code.  Unrecognized elements MUST be ignored.
///
/// <!ELEMENT error ANY >
///
/// Conditions are kept as raw elements, interpreting them is the job
/// of the verbs that raise them.
#[derive(Debug, PartialEq, Clone)]
pub struct DavError(pub Vec<Element>);

/// 14.7.  href XML Element
///
/// Name:   href
///
/// Purpose:   MUST contain a URI or a relative reference.
///
/// <!ELEMENT href (#PCDATA)>
#[derive(Debug, PartialEq, Clone)]
pub struct Href(pub String);

/// 14.8.  include XML Element
///
/// Name:   include
///
/// Purpose:   Any child element represents the name of a property to be
/// included in the PROPFIND response.
///
/// <!ELEMENT include ANY >
#[derive(Debug, PartialEq, Clone)]
pub struct Include(pub Vec<Element>);

/// 14.9.  location XML Element
///
/// Name:   location
///
/// Purpose:   HTTP defines the "Location" header (see [RFC2616], Section
/// 14.30) for use with some status codes (such as 201 and the 300
/// series codes).  When these codes are used inside a 'multistatus'
/// element, the 'location' element can be used to provide the
/// accompanying Location header value.
///
/// <!ELEMENT location (href)>
#[derive(Debug, PartialEq, Clone)]
pub struct Location(pub Href);

/// 14.16.  multistatus XML Element
///
/// Name:   multistatus
///
/// Purpose:   Contains multiple response messages.
///
/// Description:   The 'responsedescription' element at the top level is
/// used to provide a general message describing the overarching
/// nature of the response.
///
/// <!ELEMENT multistatus (response*, responsedescription?)  >
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Multistatus {
    pub responses: Vec<Response>,
    pub responsedescription: Option<ResponseDescription>,
}

/// 14.18.  prop XML Element
///
/// Name:   prop
///
/// Purpose:   Contains properties related to a resource.
///
/// Description:   A generic container for properties defined on
/// resources.  All elements inside a 'prop' XML element MUST define
/// properties related to the resource, although possible property
/// names are in no way limited to those property names defined in
/// this document or other standards.  This element MUST NOT contain
/// text or mixed content.
///
/// <!ELEMENT prop ANY >
///
/// Order is significant and duplicated names are allowed,
/// lookups stop at the first match.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Prop(pub Vec<Element>);

/// 14.20.  propfind XML Element
///
/// Name:   propfind
///
/// Purpose:   Specifies the properties to be returned from a PROPFIND
/// method.  Four special elements are specified for use with
/// 'propfind': 'prop', 'allprop', 'include', and 'propname'.  If
/// 'prop' is used inside 'propfind', it MUST NOT contain property
/// values.
///
/// <!ELEMENT propfind ( propname | (allprop, include?) | prop ) >
#[derive(Debug, PartialEq, Clone)]
pub enum PropFind {
    PropName,
    AllProp(Option<Include>),
    Prop(Prop),
}

/// 14.22 propstat XML Element
///
/// Name:   propstat
///
/// Purpose:   Groups together a prop and status element that is
/// associated with a particular 'href' element.
///
/// <!ELEMENT propstat (prop, status, error?, responsedescription?) >
#[derive(Debug, PartialEq, Clone)]
pub struct PropStat {
    pub prop: Prop,
    pub status: Status,
    pub error: Option<DavError>,
    pub responsedescription: Option<ResponseDescription>,
}

/// 14.24.  response XML Element
///
/// Name:   response
///
/// Purpose:   Holds a single response describing the effect of a
/// method on resource and/or its properties.
///
/// Description:   The 'href' element contains an HTTP URL pointing to a
/// WebDAV resource when used in the 'response' container.  A
/// particular 'href' value MUST NOT appear more than once as the
/// child of a 'response' XML element under a 'multistatus' XML
/// element.
///
/// <!ELEMENT response (href, ((href*, status)|(propstat+)),
///                     error?, responsedescription? , location?) >
///
/// Both shapes share this struct and decoders accept either.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Response {
    pub hrefs: Vec<Href>,
    pub propstats: Vec<PropStat>,
    pub status: Option<Status>,
    pub error: Option<DavError>,
    pub responsedescription: Option<ResponseDescription>,
    pub location: Option<Location>,
}

/// 14.25.  responsedescription XML Element
///
/// Name:   responsedescription
///
/// Purpose:   Contains information about a status response within a
/// Multi-Status.
///
/// <!ELEMENT responsedescription (#PCDATA) >
#[derive(Debug, PartialEq, Clone)]
pub struct ResponseDescription(pub String);

// ---- PROPERTIES ----

/// 15.1.  creationdate Property
///
/// Value:   date-time (defined in [RFC3339], see the ABNF in Section
///   5.6.)
#[derive(Debug, PartialEq, Clone)]
pub struct CreationDate(pub DateTime<FixedOffset>);

/// 15.2.  displayname Property
///
/// Purpose:   Provides a name for the resource that is suitable for
/// presentation to a user.
#[derive(Debug, PartialEq, Clone)]
pub struct DisplayName(pub String);

/// 15.4.  getcontentlength Property
///
/// Purpose:   Contains the Content-Length header returned by a GET
/// without accept headers.
#[derive(Debug, PartialEq, Clone)]
pub struct GetContentLength(pub i64);

/// 15.5.  getcontenttype Property
///
/// Purpose:   Contains the Content-Type header value (from Section 14.17
/// of [RFC2616]) as it would be returned by a GET without accept
/// headers.
#[derive(Debug, PartialEq, Clone)]
pub struct GetContentType(pub String);

/// 15.6.  getetag Property
#[derive(Debug, PartialEq, Clone)]
pub struct GetEtag(pub String);

/// 15.7.  getlastmodified Property
///
/// Purpose:   Contains the Last-Modified header value (from Section
/// 14.29 of [RFC2616]) as it would be returned by a GET method
/// without accept headers.
///
/// Value:   rfc1123-date (defined in Section 3.3.1 of [RFC2616])
#[derive(Debug, PartialEq, Clone)]
pub struct GetLastModified(pub DateTime<FixedOffset>);

/// 15.9.  resourcetype Property
///
/// Purpose:   Specifies the nature of the resource.
///
/// Description:   MUST be defined on all DAV-compliant resources.  Each
/// child element identifies a specific type the resource belongs to,
/// such as 'collection', which is the only resource type defined by
/// this specification (see Section 14.3).
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ResourceType(pub Vec<Element>);

// ---- NAMES ----

macro_rules! dav_names {
    ($($t:ty => $local:literal),* $(,)?) => {
        $(impl Named for $t {
            const NAME: Option<Name> = Some(Name::dav($local));
        })*
    };
}

dav_names! {
    DavError => "error",
    Href => "href",
    Include => "include",
    Location => "location",
    Multistatus => "multistatus",
    Prop => "prop",
    PropFind => "propfind",
    PropStat => "propstat",
    Response => "response",
    ResponseDescription => "responsedescription",
    Status => "status",
    CreationDate => "creationdate",
    DisplayName => "displayname",
    GetContentLength => "getcontentlength",
    GetContentType => "getcontenttype",
    GetEtag => "getetag",
    GetLastModified => "getlastmodified",
    ResourceType => "resourcetype",
}
