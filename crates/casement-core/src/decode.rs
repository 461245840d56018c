//! Content decoders.
//!
//! A [`ContentDecoder`] turns the raw `biz_content` text of an envelope into a
//! [`DecodedContent`] tree. The platform sends XML; JSON is supported for
//! gateways that re-encode notifications before routing them.
//!
//! # XML mapping
//!
//! ```text
//! <XML>                                 {
//!   <MsgType>event</MsgType>              "MsgType": "event",
//!   <ActionParam>                         "ActionParam": {
//!     <scene><sceneId>7</sceneId></scene>   "scene": { "sceneId": "7" }
//!   </ActionParam>                        }
//! </XML>                                }
//! ```
//!
//! The root element is the envelope and its name is discarded. Leaf elements
//! become strings (CDATA verbatim), elements with children become mappings,
//! attributes are ignored, and a repeated sibling keeps the last value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::DecodedContent;
use crate::error::{DecodeError, DecodeResult};

/// Decodes raw notification content.
///
/// Implementations must be cheap to share and free of side effects: the
/// router may call `decode` from many threads at once.
pub trait ContentDecoder: Send + Sync {
    /// Short format name used in errors and logs.
    fn format_name(&self) -> &'static str;

    /// Decodes `raw` into a key/value tree.
    fn decode(&self, raw: &str) -> DecodeResult<DecodedContent>;
}

/// Supported content formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// XML `biz_content` as sent by the platform.
    #[cfg_attr(feature = "xml", default)]
    Xml,
    /// JSON object.
    #[cfg_attr(not(feature = "xml"), default)]
    Json,
}

impl ContentFormat {
    /// Returns the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// JSON
// =============================================================================

/// Decodes a JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl ContentDecoder for JsonDecoder {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, raw: &str) -> DecodeResult<DecodedContent> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| DecodeError::malformed(self.format_name(), e.to_string()))?;
        match value {
            Value::Object(map) => Ok(DecodedContent::new(map)),
            _ => Err(DecodeError::NotAMapping {
                format: self.format_name(),
            }),
        }
    }
}

// =============================================================================
// XML
// =============================================================================

#[cfg(feature = "xml")]
pub use xml::XmlDecoder;

#[cfg(feature = "xml")]
mod xml {
    use quick_xml::Reader;
    use quick_xml::events::Event;
    use serde_json::{Map, Value};

    use super::ContentDecoder;
    use crate::content::DecodedContent;
    use crate::error::{DecodeError, DecodeResult};

    const FORMAT: &str = "xml";

    /// Decodes the platform's XML envelope.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct XmlDecoder;

    /// An element whose end tag has not been read yet.
    struct Frame {
        name: String,
        children: Map<String, Value>,
        text: String,
    }

    impl Frame {
        fn new(name: String) -> Self {
            Self {
                name,
                children: Map::new(),
                text: String::new(),
            }
        }

        fn into_entry(self) -> (String, Value) {
            let value = if self.children.is_empty() {
                Value::String(self.text)
            } else {
                Value::Object(self.children)
            };
            (self.name, value)
        }

        /// The root must be a mapping; an empty root is an empty mapping.
        fn into_root(self) -> Value {
            if self.children.is_empty() && !self.text.is_empty() {
                Value::String(self.text)
            } else {
                Value::Object(self.children)
            }
        }
    }

    fn element_name(name: &[u8]) -> String {
        String::from_utf8_lossy(name).into_owned()
    }

    fn malformed(e: impl std::fmt::Display) -> DecodeError {
        DecodeError::malformed(FORMAT, e.to_string())
    }

    impl ContentDecoder for XmlDecoder {
        fn format_name(&self) -> &'static str {
            FORMAT
        }

        fn decode(&self, raw: &str) -> DecodeResult<DecodedContent> {
            let mut reader = Reader::from_str(raw);
            reader.config_mut().trim_text(true);

            let mut stack: Vec<Frame> = Vec::new();
            let mut root: Option<Value> = None;

            loop {
                match reader.read_event().map_err(malformed)? {
                    Event::Start(e) => {
                        if root.is_some() && stack.is_empty() {
                            return Err(malformed("multiple root elements"));
                        }
                        stack.push(Frame::new(element_name(e.name().as_ref())));
                    }
                    Event::Empty(e) => {
                        let name = element_name(e.name().as_ref());
                        match stack.last_mut() {
                            Some(parent) => {
                                parent.children.insert(name, Value::String(String::new()));
                            }
                            None if root.is_none() => root = Some(Value::Object(Map::new())),
                            None => return Err(malformed("multiple root elements")),
                        }
                    }
                    Event::Text(t) => {
                        let text = t.unescape().map_err(malformed)?;
                        match stack.last_mut() {
                            Some(frame) => frame.text.push_str(&text),
                            None if text.trim().is_empty() => {}
                            None => return Err(malformed("text outside the root element")),
                        }
                    }
                    Event::CData(c) => {
                        let bytes = c.into_inner();
                        if let Some(frame) = stack.last_mut() {
                            frame.text.push_str(&String::from_utf8_lossy(&bytes));
                        }
                    }
                    Event::End(_) => {
                        let frame = stack.pop().ok_or_else(|| malformed("unbalanced end tag"))?;
                        match stack.last_mut() {
                            Some(parent) => {
                                let (name, value) = frame.into_entry();
                                parent.children.insert(name, value);
                            }
                            None => root = Some(frame.into_root()),
                        }
                    }
                    Event::Eof => break,
                    _ => {}
                }
            }

            if let Some(open) = stack.last() {
                return Err(malformed(format!("unclosed element <{}>", open.name)));
            }

            match root {
                Some(Value::Object(map)) => Ok(DecodedContent::new(map)),
                Some(_) => Err(DecodeError::NotAMapping { format: FORMAT }),
                None => Err(malformed("no root element")),
            }
        }
    }
}

/// Creates the decoder for `format`.
///
/// Without the `xml` feature, XML falls back to JSON.
pub fn decoder_for(format: ContentFormat) -> Box<dyn ContentDecoder> {
    match format {
        #[cfg(feature = "xml")]
        ContentFormat::Xml => Box::new(XmlDecoder),
        #[cfg(not(feature = "xml"))]
        ContentFormat::Xml => {
            tracing::warn!("XML decoding is disabled, falling back to JSON");
            Box::new(JsonDecoder)
        }
        ContentFormat::Json => Box::new(JsonDecoder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_decode_object() {
        let c = JsonDecoder
            .decode(r#"{"MsgType":"event","ActionParam":{"scene":{"sceneId":"1"}}}"#)
            .unwrap();
        assert_eq!(c.get_str("MsgType"), Some("event"));
        assert_eq!(
            c.lookup_path(&["ActionParam", "scene", "sceneId"]),
            Some(&json!("1"))
        );
    }

    #[test]
    fn test_json_rejects_non_objects() {
        assert_eq!(
            JsonDecoder.decode("[1, 2]"),
            Err(DecodeError::NotAMapping { format: "json" })
        );
        assert!(matches!(
            JsonDecoder.decode("{not json"),
            Err(DecodeError::Malformed { format: "json", .. })
        ));
    }

    #[cfg(feature = "xml")]
    mod xml {
        use super::*;

        #[test]
        fn test_xml_leaves_and_nesting() {
            let raw = r#"<?xml version="1.0" encoding="UTF-8"?>
                <XML>
                    <AppId><![CDATA[2014072300007148]]></AppId>
                    <MsgType><![CDATA[event]]></MsgType>
                    <EventType>enter</EventType>
                    <ActionParam>
                        <scene><sceneId>1234</sceneId></scene>
                    </ActionParam>
                    <Empty/>
                </XML>"#;
            let c = XmlDecoder.decode(raw).unwrap();
            assert_eq!(c.get_str("AppId"), Some("2014072300007148"));
            assert_eq!(c.get_str("MsgType"), Some("event"));
            assert_eq!(c.get_str("EventType"), Some("enter"));
            assert_eq!(
                c.lookup_path(&["ActionParam", "scene", "sceneId"]),
                Some(&json!("1234"))
            );
            assert_eq!(c.get("Empty"), Some(&json!("")));
        }

        #[test]
        fn test_xml_unescapes_text_and_keeps_cdata() {
            let raw = r#"<XML><Text>a &amp; b</Text><ActionParam><![CDATA[{"scene":{"sceneId":"9"}}]]></ActionParam></XML>"#;
            let c = XmlDecoder.decode(raw).unwrap();
            assert_eq!(c.get_str("Text"), Some("a & b"));
            assert_eq!(
                c.get_str("ActionParam"),
                Some(r#"{"scene":{"sceneId":"9"}}"#)
            );
        }

        #[test]
        fn test_xml_matches_json() {
            let xml = XmlDecoder
                .decode("<XML><MsgType>event</MsgType><ActionParam><scene><sceneId>x</sceneId></scene></ActionParam></XML>")
                .unwrap();
            let json = JsonDecoder
                .decode(r#"{"MsgType":"event","ActionParam":{"scene":{"sceneId":"x"}}}"#)
                .unwrap();
            assert_eq!(xml, json);
        }

        #[test]
        fn test_xml_errors() {
            assert!(matches!(
                XmlDecoder.decode("<XML><MsgType>text</XML>"),
                Err(DecodeError::Malformed { format: "xml", .. })
            ));
            assert!(matches!(
                XmlDecoder.decode("<XML><MsgType>text</MsgType>"),
                Err(DecodeError::Malformed { format: "xml", .. })
            ));
            assert!(matches!(
                XmlDecoder.decode("just text"),
                Err(DecodeError::Malformed { format: "xml", .. })
            ));
            assert_eq!(
                XmlDecoder.decode("<XML>leaf</XML>"),
                Err(DecodeError::NotAMapping { format: "xml" })
            );
        }

        #[test]
        fn test_xml_empty_root_is_empty_mapping() {
            for raw in ["<XML></XML>", "<XML/>", "<XML>\n   </XML>"] {
                let c = XmlDecoder.decode(raw).unwrap();
                assert!(c.is_empty(), "{raw}");
            }
        }

        #[test]
        fn test_xml_rejects_text_outside_root() {
            assert!(matches!(
                XmlDecoder.decode("<XML><MsgType>text</MsgType></XML>junk"),
                Err(DecodeError::Malformed { format: "xml", .. })
            ));
            assert!(XmlDecoder
                .decode("<XML><MsgType>text</MsgType></XML>\n  ")
                .is_ok());
        }
    }

    #[test]
    fn test_decoder_for_json() {
        assert_eq!(decoder_for(ContentFormat::Json).format_name(), "json");
    }
}
