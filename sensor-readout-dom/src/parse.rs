//! XML text to element tree

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::{DomError, Element, Node, Result};

/// Build the element tree for a whole document.
///
/// Comments, processing instructions, declarations and whitespace-only text
/// are dropped. Text after the root element is ignored; a second element is not.
pub(crate) fn parse_document(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let element = open_element(&start)?;
                if stack.is_empty() && root.is_some() {
                    return Err(DomError::multiple_roots(element.name()));
                }
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(end) => {
                let element = match stack.pop() {
                    Some(element) => element,
                    None => {
                        let name = std::str::from_utf8(end.local_name().as_ref())?.to_string();
                        return Err(DomError::unexpected_end(name));
                    }
                };
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push(Node::Text(text.unescape()?.into_owned()));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = std::str::from_utf8(&data.into_inner())?.to_string();
                    parent.push(Node::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(DomError::unclosed(open.name()));
    }

    root.ok_or(DomError::MissingRoot)
}

/// Attach a finished element to its parent, or make it the root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push(Node::Element(element)),
        None if root.is_some() => return Err(DomError::multiple_roots(element.name())),
        None => *root = Some(element),
    }
    Ok(())
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let local = start.local_name();
    let mut element = Element::new(std::str::from_utf8(local.as_ref())?);

    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let qualified = attr.key.as_ref();
        if qualified == b"xmlns" || qualified.starts_with(b"xmlns:") {
            continue;
        }

        let key = std::str::from_utf8(attr.key.local_name().as_ref())?.to_string();
        let value = attr.unescape_value()?.into_owned();
        element.set_attribute(key, value);
    }

    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_request() {
        let xml = r#"<?xml version="1.0"?>
            <req xmlns="urn:xmpp:iot:sensordata" seqnr="1" momentary="true">
                <!-- which node -->
                <node nodeId="Device01" cacheType="Meter"/>
                <x><field var="Temperature"/></x>
            </req>"#;

        let req = parse_document(xml).unwrap();
        assert_eq!(req.name(), "req");
        assert_eq!(req.attribute("xmlns"), None);
        assert_eq!(req.attribute("momentary"), Some("true"));

        let children: Vec<_> = req.elements().collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].attribute("cacheType"), Some("Meter"));

        let field = children[1].elements().next().unwrap();
        assert_eq!(field.name(), "field");
        assert_eq!(field.attribute("var"), Some("Temperature"));
    }

    #[test]
    fn test_prefixed_names_use_local_part() {
        let xml = r#"<sd:req xmlns:sd="urn:sd"><sd:node sd:nodeId="N1"/></sd:req>"#;

        let req = parse_document(xml).unwrap();
        assert_eq!(req.name(), "req");
        let node = req.elements().next().unwrap();
        assert_eq!(node.name(), "node");
        assert_eq!(node.attribute("nodeId"), Some("N1"));
    }

    #[test]
    fn test_entities_are_unescaped() {
        let req =
            parse_document(r#"<req userToken="a&amp;b">x &lt; y<![CDATA[<raw>]]></req>"#).unwrap();

        assert_eq!(req.attribute("userToken"), Some("a&b"));
        assert_eq!(req.text(), "x < y<raw>");
    }

    #[test]
    fn test_empty_document_has_no_root() {
        assert!(matches!(parse_document(""), Err(DomError::MissingRoot)));
        assert!(matches!(
            parse_document("<?xml version=\"1.0\"?><!-- nothing -->"),
            Err(DomError::MissingRoot)
        ));
    }

    #[test]
    fn test_second_root_is_rejected() {
        let err = parse_document("<req/><req/>").unwrap_err();
        assert!(matches!(err, DomError::MultipleRoots { .. }));
    }

    #[test]
    fn test_unclosed_element_is_rejected() {
        assert!(parse_document("<req><node nodeId=\"N1\"/>").is_err());
    }

    #[test]
    fn test_mismatched_end_is_rejected() {
        assert!(parse_document("<req></node>").is_err());
    }
}
