#![no_main]

use libfuzzer_sys::arbitrary;
use libfuzzer_sys::arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use aero_props::element::Context;
use aero_props::types::Multistatus;
use aero_props::xml;
use quick_xml::reader::NsReader;
use tokio::io::AsyncWriteExt;
use tokio::runtime::Runtime;

const TOKENS: [&str; 36] = [
    "0",
    "-1",
    "4525",
    "DAV:",
    "D",
    "xmlns:D",
    "http://ns.example.com/boxschema/",
    "HTTP/1.1 200 OK",
    "HTTP/1.1 404 Not Found",
    "HTTP/1.1 207",
    "1997-12-01T17:42:21-08:00",
    "Mon, 12 Jan 1998 09:25:56 GMT",
    "\"abcdef\"",
    "/container/front.html",
    "text/html",
    "allprop",
    "collection",
    "creationdate",
    "displayname",
    "error",
    "getcontentlength",
    "getcontenttype",
    "getetag",
    "getlastmodified",
    "href",
    "include",
    "location",
    "multistatus",
    "prop",
    "propfind",
    "propname",
    "propstat",
    "resourcetype",
    "response",
    "responsedescription",
    "status",
];

#[derive(Arbitrary)]
struct Token(usize);
impl Token {
    fn serialize(&self) -> &'static str {
        TOKENS[self.0 % TOKENS.len()]
    }
}

#[derive(Arbitrary)]
struct Tag {
    name: Token,
    attr: Option<(Token, Token)>,
}
impl Tag {
    fn start(&self) -> String {
        match &self.attr {
            Some((k, v)) => format!("D:{} {}=\"{}\"", self.name.serialize(), k.serialize(), v.serialize()),
            None => format!("D:{}", self.name.serialize()),
        }
    }
}

#[derive(Arbitrary)]
enum XmlNode {
    Node(Tag, Vec<Self>),
    Number(i64),
    Text(Token),
}
impl std::fmt::Debug for XmlNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.serialize())
    }
}
impl XmlNode {
    fn serialize(&self) -> String {
        match self {
            Self::Node(tag, children) if children.is_empty() => format!("<{}/>", tag.start()),
            Self::Node(tag, children) => format!(
                "<{}>{}</D:{}>",
                tag.start(),
                children.iter().map(|v| v.serialize()).collect::<String>(),
                tag.name.serialize()
            ),
            Self::Number(v) => v.to_string(),
            Self::Text(v) => v.serialize().to_string(),
        }
    }
}

async fn serialize(ms: &Multistatus) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut tokio_buffer = tokio::io::BufWriter::new(&mut buffer);
    let mut writer = xml::Writer::new(quick_xml::writer::Writer::new(&mut tokio_buffer));

    writer
        .write(&Context::default(), ms)
        .await
        .expect("xml serialization");
    tokio_buffer.flush().await.expect("tokio buffer flush");

    buffer
}

fuzz_target!(|nodes: Vec<XmlNode>| {
    let gen = format!(
        "<D:multistatus xmlns:D=\"DAV:\">{}</D:multistatus>",
        nodes.iter().map(|n| n.serialize()).collect::<String>()
    );

    let rt = Runtime::new().expect("tokio runtime initialization");
    rt.block_on(async {
        // 1. Only inputs that decode are interesting
        let mut rdr = xml::Reader::new(NsReader::from_reader(gen.as_bytes()));
        let reference = match rdr.find::<Multistatus>().await {
            Err(_) => return,
            Ok(m) => m,
        };

        // 2. Our own output must decode to the same value
        let ours = serialize(&reference).await;
        let mut rdr = xml::Reader::new(NsReader::from_reader(ours.as_slice()));
        let comparison = rdr
            .find::<Multistatus>()
            .await
            .expect("decode our own serialization");

        assert_eq!(reference, comparison);
    })
});
