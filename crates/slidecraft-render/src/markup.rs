//! Slide part markup builders.
//!
//! Slides instantiated from a layout carry only placeholder shapes; position
//! and styling are inherited from the layout part the slide's relationship
//! file points at.

use quick_xml::escape::escape;

const SLIDE_XMLNS: &str = "xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
     xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
     xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"";

/// Relationship type for a slide part.
pub const SLIDE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
/// Content type registered for each slide part.
pub const SLIDE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Build the XML for a title slide: title placeholder plus subtitle caption.
pub fn title_slide(topic: &str, caption: &str) -> String {
    let title = placeholder_shape(2, "Title 1", "type=\"ctrTitle\"", &[topic.to_string()]);
    let subtitle = placeholder_shape(
        3,
        "Subtitle 2",
        "type=\"subTitle\" idx=\"1\"",
        &[caption.to_string()],
    );
    slide_document(&format!("{title}{subtitle}"))
}

/// Build the XML for a content slide.
///
/// A missing title or bullet list omits the corresponding placeholder shape,
/// leaving the layout default in place.
pub fn content_slide(title: Option<&str>, bullets: Option<&[String]>) -> String {
    let mut shapes = String::new();
    if let Some(title) = title {
        shapes.push_str(&placeholder_shape(
            2,
            "Title 1",
            "type=\"title\"",
            &[title.to_string()],
        ));
    }
    if let Some(bullets) = bullets {
        shapes.push_str(&placeholder_shape(3, "Content 2", "idx=\"1\"", bullets));
    }
    slide_document(&shapes)
}

/// Build the relationship part for a slide, pointing at its layout.
pub fn slide_rels(layout_file_name: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" \
         Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout\" \
         Target=\"../slideLayouts/{layout_file_name}\"/>\
         </Relationships>"
    )
}

/// Wrap placeholder shapes into a complete slide part.
fn slide_document(shapes: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <p:sld {SLIDE_XMLNS}>\
         <p:cSld><p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr/>\
         {shapes}\
         </p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
         </p:sld>"
    )
}

/// Build one placeholder shape with one text paragraph per entry.
fn placeholder_shape(id: u32, name: &str, ph_attrs: &str, paragraphs: &[String]) -> String {
    let mut body = String::new();
    if paragraphs.is_empty() {
        body.push_str("<a:p/>");
    }
    for text in paragraphs {
        let text = escape(text);
        body.push_str(&format!("<a:p><a:r><a:t>{text}</a:t></a:r></a:p>"));
    }
    format!(
        "<p:sp>\
         <p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/>\
         <p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr>\
         <p:nvPr><p:ph {ph_attrs}/></p:nvPr></p:nvSpPr>\
         <p:spPr/>\
         <p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody>\
         </p:sp>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn title_slide_carries_topic_and_caption() {
        let xml = title_slide("Solar Panels", "Generated by Slidecraft");
        assert_eq!(xml.contains("<a:t>Solar Panels</a:t>"), true);
        assert_eq!(xml.contains("<a:t>Generated by Slidecraft</a:t>"), true);
        assert_eq!(xml.contains("type=\"ctrTitle\""), true);
        assert_eq!(xml.contains("type=\"subTitle\""), true);
    }

    #[test]
    fn content_slide_omits_absent_placeholders() {
        let bare = content_slide(None, None);
        assert_eq!(bare.contains("<p:sp>"), false);

        let title_only = content_slide(Some("Intro"), None);
        assert_eq!(title_only.contains("type=\"title\""), true);
        assert_eq!(title_only.contains("idx=\"1\""), false);
    }

    #[test]
    fn content_slide_emits_one_paragraph_per_bullet() {
        let bullets = vec!["Falling prices".to_string(), "ROI in 5 years".to_string()];
        let xml = content_slide(Some("Cost"), Some(&bullets));
        assert_eq!(xml.matches("<a:p>").count(), 3);
        assert_eq!(xml.contains("<a:t>Falling prices</a:t>"), true);
        assert_eq!(xml.contains("<a:t>ROI in 5 years</a:t>"), true);
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let xml = content_slide(Some("Q&A <live>"), None);
        assert_eq!(xml.contains("<a:t>Q&amp;A &lt;live&gt;</a:t>"), true);
    }
}
