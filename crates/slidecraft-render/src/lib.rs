//! Template-driven PPTX rendering.
//!
//! A deck is produced by appending slides to a fixed template archive: one
//! title slide from the configured title layout, then one content slide per
//! slide record from the configured content layout. All other template parts
//! are copied through unchanged; only the content-types, presentation and
//! relationship parts are rewritten to register the appended slides.

mod error;
mod markup;

pub use error::RenderError;

use log::{debug, info};
use quick_xml::Reader;
use quick_xml::events::Event;
use rand::Rng;
use slidecraft_protocol::SlideRecord;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// Subtitle caption placed on every generated title slide.
const PRODUCT_CAPTION: &str = "Generated by Slidecraft";

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Renders presentation files from a fixed template.
#[derive(Debug, Clone)]
pub struct DeckRenderer {
    /// Path to the template archive.
    template_path: PathBuf,
    /// Index of the title layout in the template's layout collection.
    title_layout_index: usize,
    /// Index of the content layout in the template's layout collection.
    content_layout_index: usize,
}

impl DeckRenderer {
    /// Create a renderer for the given template and layout indices.
    pub fn new(
        template_path: impl Into<PathBuf>,
        title_layout_index: usize,
        content_layout_index: usize,
    ) -> Self {
        Self {
            template_path: template_path.into(),
            title_layout_index,
            content_layout_index,
        }
    }

    /// Render a deck for `topic` into `output_dir` and return the file path.
    ///
    /// Produces exactly `records.len() + 1` slides: the title slide followed
    /// by one content slide per record, in input order. Partial files are not
    /// cleaned up on failure; the output directory is session-scoped.
    pub fn render(
        &self,
        topic: &str,
        records: &[SlideRecord],
        output_dir: &Path,
    ) -> Result<PathBuf, RenderError> {
        debug!(
            "rendering deck (template={}, slides={})",
            self.template_path.display(),
            records.len()
        );
        let template = File::open(&self.template_path).map_err(|err| {
            RenderError::Template(format!(
                "failed to open template {}: {err}",
                self.template_path.display()
            ))
        })?;
        let mut archive = ZipArchive::new(template)
            .map_err(|err| RenderError::Template(format!("failed to open archive: {err}")))?;

        let names: Vec<String> = (0..archive.len())
            .filter_map(|i| archive.by_index(i).ok().map(|part| part.name().to_string()))
            .collect();

        let layouts = layout_files(&names);
        let title_layout = resolve_layout(&layouts, self.title_layout_index)?;
        let content_layout = resolve_layout(&layouts, self.content_layout_index)?;

        let content_types = read_part(&mut archive, CONTENT_TYPES_PART)?;
        let presentation = read_part(&mut archive, PRESENTATION_PART)?;
        let presentation_rels = read_part(&mut archive, PRESENTATION_RELS_PART)?;

        let first_slide_number = max_numeric_suffix(&names, "ppt/slides/slide") + 1;
        let first_rel_number = max_relationship_id(&presentation_rels)? + 1;
        let first_slide_id = max_slide_id(&presentation)?.max(255) + 1;

        // Slide 0 is the title slide; records follow in input order.
        let mut slides: Vec<(String, String, String)> = Vec::new();
        slides.push((
            slide_part_name(first_slide_number),
            markup::title_slide(topic, PRODUCT_CAPTION),
            markup::slide_rels(title_layout),
        ));
        for (offset, record) in records.iter().enumerate() {
            slides.push((
                slide_part_name(first_slide_number + 1 + offset),
                markup::content_slide(record.title.as_deref(), record.content.as_deref()),
                markup::slide_rels(content_layout),
            ));
        }

        let content_types = register_content_types(&content_types, &slides)?;
        let presentation_rels =
            register_relationships(&presentation_rels, &slides, first_rel_number)?;
        let presentation =
            register_slide_ids(&presentation, slides.len(), first_slide_id, first_rel_number)?;

        std::fs::create_dir_all(output_dir)?;
        let output_path = output_dir.join(format!("{}.pptx", generated_name()));
        let output = File::create(&output_path)
            .map_err(|err| RenderError::Write(format!("{}: {err}", output_path.display())))?;
        let mut writer = ZipWriter::new(output);

        let patched = [CONTENT_TYPES_PART, PRESENTATION_PART, PRESENTATION_RELS_PART];
        for i in 0..archive.len() {
            let part = archive
                .by_index(i)
                .map_err(|err| RenderError::Template(format!("failed to read part: {err}")))?;
            if patched.contains(&part.name()) {
                continue;
            }
            writer
                .raw_copy_file(part)
                .map_err(|err| RenderError::Write(err.to_string()))?;
        }

        write_text_part(&mut writer, CONTENT_TYPES_PART, &content_types)?;
        write_text_part(&mut writer, PRESENTATION_PART, &presentation)?;
        write_text_part(&mut writer, PRESENTATION_RELS_PART, &presentation_rels)?;
        for (part_name, slide_xml, rels_xml) in &slides {
            write_text_part(&mut writer, part_name, slide_xml)?;
            write_text_part(&mut writer, &slide_rels_name(part_name), rels_xml)?;
        }
        writer
            .finish()
            .map_err(|err| RenderError::Write(err.to_string()))?;

        info!(
            "rendered deck ({}, slides={})",
            output_path.display(),
            slides.len()
        );
        Ok(output_path)
    }
}

/// Generate a collision-resistant output name: nanosecond timestamp plus a
/// random suffix, safe for rapid repeated renders within one session.
fn generated_name() -> String {
    let now = chrono::Utc::now();
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_millis().saturating_mul(1_000_000));
    let suffix: u32 = rand::rng().random_range(0..10_000);
    format!("{nanos}_{suffix}")
}

/// Collect layout part file names ordered by their numeric suffix.
fn layout_files(names: &[String]) -> Vec<&String> {
    let mut layouts: Vec<(usize, &String)> = names
        .iter()
        .filter_map(|name| {
            let rest = name.strip_prefix("ppt/slideLayouts/slideLayout")?;
            let number: usize = rest.strip_suffix(".xml")?.parse().ok()?;
            Some((number, name))
        })
        .collect();
    layouts.sort_by_key(|(number, _)| *number);
    layouts.into_iter().map(|(_, name)| name).collect()
}

/// Resolve a layout index to its file name within the layouts directory.
fn resolve_layout<'a>(layouts: &[&'a String], index: usize) -> Result<&'a str, RenderError> {
    let part = layouts.get(index).ok_or(RenderError::LayoutIndex {
        index,
        available: layouts.len(),
    })?;
    Ok(part.rsplit('/').next().unwrap_or(part.as_str()))
}

/// Largest numeric suffix among parts named `{prefix}{N}.xml`, or 0.
fn max_numeric_suffix(names: &[String], prefix: &str) -> usize {
    names
        .iter()
        .filter_map(|name| {
            let rest = name.strip_prefix(prefix)?;
            rest.strip_suffix(".xml")?.parse().ok()
        })
        .max()
        .unwrap_or(0)
}

/// Largest numeric relationship id (`rId{N}`) in a relationships part.
fn max_relationship_id(rels: &str) -> Result<usize, RenderError> {
    let mut max_id = 0usize;
    let mut reader = Reader::from_str(rels);
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"Id"
                        && let Ok(value) = std::str::from_utf8(&attr.value)
                        && let Some(number) = value.strip_prefix("rId")
                        && let Ok(number) = number.parse::<usize>()
                    {
                        max_id = max_id.max(number);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(RenderError::Template(format!(
                    "error parsing relationships: {err}"
                )));
            }
            _ => {}
        }
    }
    Ok(max_id)
}

/// Largest slide id in the presentation part's slide id list, or 0.
fn max_slide_id(presentation: &str) -> Result<usize, RenderError> {
    let mut max_id = 0usize;
    let mut reader = Reader::from_str(presentation);
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"id"
                        && let Ok(value) = std::str::from_utf8(&attr.value)
                        && let Ok(number) = value.parse::<usize>()
                    {
                        max_id = max_id.max(number);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(RenderError::Template(format!(
                    "error parsing presentation: {err}"
                )));
            }
            _ => {}
        }
    }
    Ok(max_id)
}

/// Register content-type overrides for the new slide parts.
fn register_content_types(
    content_types: &str,
    slides: &[(String, String, String)],
) -> Result<String, RenderError> {
    let mut overrides = String::new();
    for (part_name, _, _) in slides {
        overrides.push_str(&format!(
            "<Override PartName=\"/{part_name}\" ContentType=\"{}\"/>",
            markup::SLIDE_CONTENT_TYPE
        ));
    }
    insert_before(content_types, "</Types>", &overrides).ok_or_else(|| {
        RenderError::Template("content types part has no closing Types element".to_string())
    })
}

/// Register relationships from the presentation part to the new slides.
fn register_relationships(
    rels: &str,
    slides: &[(String, String, String)],
    first_rel_number: usize,
) -> Result<String, RenderError> {
    let mut entries = String::new();
    for (offset, (part_name, _, _)) in slides.iter().enumerate() {
        let target = part_name.strip_prefix("ppt/").unwrap_or(part_name.as_str());
        entries.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{}\" Target=\"{target}\"/>",
            first_rel_number + offset,
            markup::SLIDE_REL_TYPE
        ));
    }
    insert_before(rels, "</Relationships>", &entries).ok_or_else(|| {
        RenderError::Template("relationships part has no closing element".to_string())
    })
}

/// Register the new slides in the presentation part's slide id list.
fn register_slide_ids(
    presentation: &str,
    slide_count: usize,
    first_slide_id: usize,
    first_rel_number: usize,
) -> Result<String, RenderError> {
    let mut entries = String::new();
    for offset in 0..slide_count {
        entries.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            first_slide_id + offset,
            first_rel_number + offset
        ));
    }

    if let Some(patched) = insert_before(presentation, "</p:sldIdLst>", &entries) {
        return Ok(patched);
    }
    if presentation.contains("<p:sldIdLst/>") {
        return Ok(presentation.replace(
            "<p:sldIdLst/>",
            &format!("<p:sldIdLst>{entries}</p:sldIdLst>"),
        ));
    }
    // Templates with no slides may omit the list entirely; it belongs
    // directly after the master id list.
    let master_close = "</p:sldMasterIdLst>";
    if let Some(pos) = presentation.find(master_close) {
        let insert_at = pos + master_close.len();
        let mut patched = String::with_capacity(presentation.len() + entries.len());
        patched.push_str(&presentation[..insert_at]);
        patched.push_str(&format!("<p:sldIdLst>{entries}</p:sldIdLst>"));
        patched.push_str(&presentation[insert_at..]);
        return Ok(patched);
    }
    Err(RenderError::Template(
        "presentation part has no slide master id list".to_string(),
    ))
}

/// Insert `insertion` immediately before the first occurrence of `marker`.
fn insert_before(document: &str, marker: &str, insertion: &str) -> Option<String> {
    let pos = document.find(marker)?;
    let mut patched = String::with_capacity(document.len() + insertion.len());
    patched.push_str(&document[..pos]);
    patched.push_str(insertion);
    patched.push_str(&document[pos..]);
    Some(patched)
}

/// Part name for slide number `n`.
fn slide_part_name(n: usize) -> String {
    format!("ppt/slides/slide{n}.xml")
}

/// Relationship part name for a slide part.
fn slide_rels_name(part_name: &str) -> String {
    let file = part_name.rsplit('/').next().unwrap_or(part_name);
    format!("ppt/slides/_rels/{file}.rels")
}

/// Read a named part out of the template archive as a UTF-8 string.
fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, RenderError> {
    let mut part = archive
        .by_name(name)
        .map_err(|err| RenderError::Template(format!("part not found '{name}': {err}")))?;
    let mut content = String::new();
    part.read_to_string(&mut content)
        .map_err(|err| RenderError::Template(format!("failed to read '{name}': {err}")))?;
    Ok(content)
}

/// Write a text part into the output archive.
fn write_text_part<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    name: &str,
    content: &str,
) -> Result<(), RenderError> {
    writer
        .start_file(name, FileOptions::default())
        .map_err(|err| RenderError::Write(format!("{name}: {err}")))?;
    writer
        .write_all(content.as_bytes())
        .map_err(|err| RenderError::Write(format!("{name}: {err}")))?;
    Ok(())
}

/// Strip a namespace prefix from an XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn layout_files_sort_by_numeric_suffix() {
        let names = vec![
            "ppt/slideLayouts/slideLayout10.xml".to_string(),
            "ppt/slideLayouts/slideLayout2.xml".to_string(),
            "ppt/slideLayouts/slideLayout1.xml".to_string(),
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
        ];
        let layouts = layout_files(&names);
        let ordered: Vec<&str> = layouts.iter().map(|name| name.as_str()).collect();
        assert_eq!(
            ordered,
            vec![
                "ppt/slideLayouts/slideLayout1.xml",
                "ppt/slideLayouts/slideLayout2.xml",
                "ppt/slideLayouts/slideLayout10.xml",
            ]
        );
    }

    #[test]
    fn resolve_layout_reports_available_count() {
        let one = "ppt/slideLayouts/slideLayout1.xml".to_string();
        let layouts = vec![&one];
        let err = resolve_layout(&layouts, 5).expect_err("out of range");
        match err {
            RenderError::LayoutIndex { index, available } => {
                assert_eq!(index, 5);
                assert_eq!(available, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn relationship_ids_are_scanned_for_the_maximum() {
        let rels = "<?xml version=\"1.0\"?>\
            <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
            <Relationship Id=\"rId3\" Type=\"t\" Target=\"a\"/>\
            <Relationship Id=\"rId12\" Type=\"t\" Target=\"b\"/>\
            </Relationships>";
        assert_eq!(max_relationship_id(rels).expect("scan"), 12);
    }

    #[test]
    fn slide_id_list_is_created_when_absent() {
        let presentation = "<p:presentation xmlns:p=\"x\" xmlns:r=\"y\">\
            <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
            </p:presentation>";
        let patched = register_slide_ids(presentation, 2, 256, 2).expect("patch");
        assert_eq!(patched.contains("<p:sldIdLst>"), true);
        assert_eq!(patched.contains("<p:sldId id=\"256\" r:id=\"rId2\"/>"), true);
        assert_eq!(patched.contains("<p:sldId id=\"257\" r:id=\"rId3\"/>"), true);
    }

    #[test]
    fn generated_names_differ_within_the_same_instant() {
        // Nanosecond timestamp plus random suffix: two consecutive calls must
        // not collide.
        let first = generated_name();
        let second = generated_name();
        assert_eq!(first == second, false);
    }
}
