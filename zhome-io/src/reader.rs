use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::attributes::Attributes;
use crate::catalog::{DefaultPatternCatalog, PatternCatalog};
use crate::content::ContentResolver;
use crate::error::ReadError;
use crate::handler::{HomeXmlHandler, ReadReport};

pub(crate) const DEFAULT_ROOT_ELEMENT: &str = "home";

/// 把 quick-xml 的拉取事件转换为处理器的开始/文本/结束回调。
pub(crate) struct HomeXmlReader<'a> {
    root_element: &'a str,
    content: Option<&'a dyn ContentResolver>,
    patterns: Option<&'a dyn PatternCatalog>,
}

impl<'a> HomeXmlReader<'a> {
    pub(crate) fn new(root_element: &'a str) -> Self {
        Self {
            root_element,
            content: None,
            patterns: None,
        }
    }

    pub(crate) fn with_content(mut self, content: Option<&'a dyn ContentResolver>) -> Self {
        self.content = content;
        self
    }

    pub(crate) fn with_patterns(mut self, patterns: &'a dyn PatternCatalog) -> Self {
        self.patterns = Some(patterns);
        self
    }

    pub(crate) fn read_str(&self, xml: &str) -> Result<ReadReport, ReadError> {
        let fallback = DefaultPatternCatalog::new();
        let patterns = self.patterns.unwrap_or(&fallback);
        let mut handler = HomeXmlHandler::new(self.root_element, self.content, patterns);

        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        loop {
            let position = reader.buffer_position() as u64;
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|err| xml_error(position, err))?;
            match event {
                Event::Start(start) => {
                    let (name, attributes) = element(&start, position)?;
                    handler.start_element(&name, attributes)?;
                }
                Event::Empty(start) => {
                    let (name, attributes) = element(&start, position)?;
                    handler.start_element(&name, attributes)?;
                    handler.end_element(&name)?;
                }
                Event::End(end) => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    handler.end_element(&name)?;
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|err| xml_error(position, err))?;
                    handler.characters(&text);
                }
                Event::CData(data) => {
                    handler.characters(&String::from_utf8_lossy(&data));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let report = handler.end_document()?;
        debug!(
            diagnostics = report.diagnostics.len(),
            "文档读取完成"
        );
        Ok(report)
    }
}

fn element(start: &BytesStart<'_>, position: u64) -> Result<(String, Attributes), ReadError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Attributes::new(name.clone());
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| xml_error(position, err))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| xml_error(position, err))?;
        attributes.insert(key, value.into_owned());
    }
    Ok((name, attributes))
}

fn xml_error(position: u64, err: impl std::fmt::Display) -> ReadError {
    ReadError::Xml {
        position,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_elements_produce_start_and_end() {
        let xml = r#"<?xml version="1.0"?>
<home name="Demo">
  <property name="author" value="a &amp; b"/>
  <label x="1" y="2"><text><![CDATA[Hall]]></text></label>
</home>"#;
        let report = HomeXmlReader::new(DEFAULT_ROOT_ELEMENT).read_str(xml).unwrap();
        assert_eq!(report.home.name.as_deref(), Some("Demo"));
        assert_eq!(report.home.properties.get("author"), Some("a & b"));
        assert_eq!(report.home.labels()[0].text, "Hall");
    }

    #[test]
    fn unbalanced_nesting_is_reported() {
        let xml = "<home><wall></home>";
        let err = HomeXmlReader::new(DEFAULT_ROOT_ELEMENT).read_str(xml).unwrap_err();
        assert!(matches!(err, ReadError::Xml { .. } | ReadError::Structure { .. }));
    }

    #[test]
    fn custom_root_element() {
        let xml = r#"<plan wallHeight="300">
  <level id="l" name="L" elevation="0" floorThickness="12" height="300"/>
</plan>"#;
        let report = HomeXmlReader::new("plan").read_str(xml).unwrap();
        assert_eq!(report.home.wall_height, 300.0);
        assert_eq!(report.home.levels().len(), 1);
        assert!(HomeXmlReader::new(DEFAULT_ROOT_ELEMENT).read_str(xml).is_err());
    }
}
