//! CMCI response parsing.
//!
//! CMCI answers every request with an XML envelope:
//!
//! ```xml
//! <response xmlns="..." version="3.0" connect_version="0560">
//!   <resultsummary api_response1="1024" api_response1_alt="OK" recordcount="1" .../>
//!   <records>
//!     <cicsprogram program="PGM1" status="ENABLED" .../>
//!   </records>
//! </response>
//! ```
//!
//! The parser converts the document into a `serde_json::Value` tree (element
//! attributes and child elements fold into one object; duplicate sibling tags
//! become arrays) and lifts the `resultsummary` into a typed struct. Beyond
//! the success/failure decision the record content is passed through
//! uninterpreted.

use crate::error::CmciError;
use crate::resource::{ResourceKind, CMCI_OK};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

/// Parsed `<resultsummary>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub api_response1: u32,
    pub api_response2: u32,
    pub api_response1_alt: String,
    pub api_response2_alt: String,
    pub record_count: u32,
}

/// A parsed CMCI response: the result summary plus the raw document tree.
#[derive(Debug, Clone)]
pub struct CmciResponse {
    pub summary: ResultSummary,
    pub body: Value,
}

impl CmciResponse {
    /// Parse a CMCI response body.
    pub fn from_xml(xml: &str) -> Result<Self, CmciError> {
        let body = xml_to_json(xml)?;
        let summary = extract_result_summary(&body)?;
        Ok(CmciResponse { summary, body })
    }

    /// True when the server reported OK (`api_response1 == 1024`).
    pub fn is_ok(&self) -> bool {
        self.summary.api_response1 == CMCI_OK
    }

    /// Promote a non-OK summary into an error, otherwise pass through.
    pub fn into_result(self) -> Result<CmciResponse, CmciError> {
        if self.is_ok() {
            Ok(self)
        } else {
            let reason = if self.summary.api_response2_alt.is_empty() {
                self.summary.api_response1_alt.clone()
            } else {
                format!(
                    "{}: {}",
                    self.summary.api_response1_alt, self.summary.api_response2_alt
                )
            };
            Err(CmciError::Rejected {
                code: self.summary.api_response1,
                reason,
            })
        }
    }

    /// Records of the given kind, as a flat list (a single record is folded
    /// into a one-element list).
    pub fn records(&self, kind: ResourceKind) -> Vec<Value> {
        let record = self
            .body
            .get("response")
            .and_then(|r| r.get("records"))
            .and_then(|r| r.get(kind.record_tag()));
        match record {
            Some(Value::Array(items)) => items.clone(),
            Some(item) => vec![item.clone()],
            None => Vec::new(),
        }
    }
}

fn parse_error(e: impl std::fmt::Display) -> CmciError {
    CmciError::Response(format!("XML parse error: {}", e))
}

fn attributes_to_map(element: &BytesStart<'_>) -> Result<Map<String, Value>, CmciError> {
    let mut map = Map::new();
    for attr in element.attributes() {
        let attr = attr.map_err(parse_error)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value().map_err(parse_error)?.to_string();
        map.insert(key, Value::String(value));
    }
    Ok(map)
}

fn insert_child(map: &mut Map<String, Value>, tag: String, child: Value) {
    // Duplicate sibling tags fold into an array.
    if let Some(existing) = map.get_mut(&tag) {
        match existing {
            Value::Array(items) => items.push(child),
            _ => {
                let first = existing.take();
                *existing = Value::Array(vec![first, child]);
            }
        }
    } else {
        map.insert(tag, child);
    }
}

fn parse_element(
    reader: &mut Reader<&[u8]>,
    mut map: Map<String, Value>,
) -> Result<Value, CmciError> {
    let mut buf = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let attrs = attributes_to_map(&e)?;
                let child = parse_element(reader, attrs)?;
                insert_child(&mut map, tag, child);
            }
            Ok(Event::Empty(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let attrs = attributes_to_map(&e)?;
                insert_child(&mut map, tag, Value::Object(attrs));
            }
            Ok(Event::Text(e)) => {
                let content = e.unescape().map_err(parse_error)?.trim().to_string();
                if !content.is_empty() {
                    text = content;
                }
            }
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Err(e) => return Err(parse_error(e)),
            _ => {}
        }
        buf.clear();
    }

    if map.is_empty() && !text.is_empty() {
        Ok(Value::String(text))
    } else {
        Ok(Value::Object(map))
    }
}

/// Parse an XML document into a JSON tree.
pub fn xml_to_json(xml: &str) -> Result<Value, CmciError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root = Map::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let attrs = attributes_to_map(&e)?;
                let child = parse_element(&mut reader, attrs)?;
                insert_child(&mut root, tag, child);
            }
            Ok(Event::Empty(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let attrs = attributes_to_map(&e)?;
                insert_child(&mut root, tag, Value::Object(attrs));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(parse_error(e)),
        }
        buf.clear();
    }

    Ok(Value::Object(root))
}

fn summary_field<'a>(summary: &'a Value, key: &str) -> &'a str {
    summary.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn extract_result_summary(body: &Value) -> Result<ResultSummary, CmciError> {
    let summary = body
        .get("response")
        .and_then(|r| r.get("resultsummary"))
        .ok_or_else(|| {
            CmciError::Response("response contains no resultsummary element".to_string())
        })?;

    let api_response1 = summary_field(summary, "api_response1")
        .parse::<u32>()
        .map_err(|_| CmciError::Response("resultsummary api_response1 is not numeric".to_string()))?;
    let api_response2 = summary_field(summary, "api_response2").parse().unwrap_or(0);
    let record_count = summary_field(summary, "recordcount").parse().unwrap_or(0);

    Ok(ResultSummary {
        api_response1,
        api_response2,
        api_response1_alt: summary_field(summary, "api_response1_alt").to_string(),
        api_response2_alt: summary_field(summary, "api_response2_alt").to_string(),
        record_count,
    })
}
