//! OOXML fixture builders and inspection helpers.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// Write a minimal but structurally valid presentation template with two
/// layouts (index 0: title, index 1: content) and no slides.
pub fn write_minimal_template(path: &Path) {
    let file = File::create(path).expect("create template");
    let mut writer = ZipWriter::new(file);

    let parts: &[(&str, String)] = &[
        (
            "[Content_Types].xml",
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
             <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
             <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
             <Override PartName=\"/ppt/presentation.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>\
             <Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>\
             <Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>\
             <Override PartName=\"/ppt/slideLayouts/slideLayout2.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>\
             </Types>"
                .to_string(),
        ),
        (
            "_rels/.rels",
            relationships(&[(
                "rId1",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
                "ppt/presentation.xml",
            )]),
        ),
        (
            "ppt/presentation.xml",
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <p:presentation xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
             xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
             <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
             <p:sldSz cx=\"9144000\" cy=\"6858000\"/>\
             </p:presentation>"
                .to_string(),
        ),
        (
            "ppt/_rels/presentation.xml.rels",
            relationships(&[(
                "rId1",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster",
                "slideMasters/slideMaster1.xml",
            )]),
        ),
        (
            "ppt/slideMasters/slideMaster1.xml",
            master_part().to_string(),
        ),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            relationships(&[
                (
                    "rId1",
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout",
                    "../slideLayouts/slideLayout1.xml",
                ),
                (
                    "rId2",
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout",
                    "../slideLayouts/slideLayout2.xml",
                ),
            ]),
        ),
        (
            "ppt/slideLayouts/slideLayout1.xml",
            layout_part("title").to_string(),
        ),
        (
            "ppt/slideLayouts/slideLayout2.xml",
            layout_part("obj").to_string(),
        ),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            relationships(&[(
                "rId1",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster",
                "../slideMasters/slideMaster1.xml",
            )]),
        ),
        (
            "ppt/slideLayouts/_rels/slideLayout2.xml.rels",
            relationships(&[(
                "rId1",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster",
                "../slideMasters/slideMaster1.xml",
            )]),
        ),
    ];

    for (name, content) in parts {
        writer
            .start_file(*name, FileOptions::default())
            .expect("start part");
        writer.write_all(content.as_bytes()).expect("write part");
    }
    writer.finish().expect("finish template");
}

/// Write a minimal DOCX with the given paragraphs.
pub fn write_minimal_docx(path: &Path, paragraphs: &[&str]) {
    let file = File::create(path).expect("create docx");
    let mut writer = ZipWriter::new(file);

    let mut body = String::new();
    for paragraph in paragraphs {
        body.push_str(&format!("<w:p><w:r><w:t>{paragraph}</w:t></w:r></w:p>"));
    }
    let parts: &[(&str, String)] = &[
        (
            "[Content_Types].xml",
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
             <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
             <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
             <Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
             </Types>"
                .to_string(),
        ),
        (
            "_rels/.rels",
            relationships(&[(
                "rId1",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
                "word/document.xml",
            )]),
        ),
        (
            "word/document.xml",
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
                 <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
                 <w:body>{body}</w:body></w:document>"
            ),
        ),
    ];
    for (name, content) in parts {
        writer
            .start_file(*name, FileOptions::default())
            .expect("start part");
        writer.write_all(content.as_bytes()).expect("write part");
    }
    writer.finish().expect("finish docx");
}

/// Write a minimal single-page PDF whose page shows the given text.
pub fn write_minimal_pdf(path: &Path, text: &str) {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("save pdf");
}

/// Read a generated deck and return, per slide in slide-number order, the
/// text of each shape (paragraphs within a shape joined with newlines).
pub fn deck_shape_texts(path: &Path) -> Vec<Vec<String>> {
    let file = File::open(path).expect("open deck");
    let mut archive = ZipArchive::new(file).expect("open archive");

    let mut slide_names: Vec<(usize, String)> = (0..archive.len())
        .filter_map(|i| {
            let name = archive.by_index(i).expect("read part").name().to_string();
            let number: usize = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((number, name))
        })
        .collect();
    slide_names.sort_by_key(|(number, _)| *number);

    slide_names
        .into_iter()
        .map(|(_, name)| {
            let mut part = archive.by_name(&name).expect("slide part");
            let mut xml = String::new();
            part.read_to_string(&mut xml).expect("read slide");
            shape_texts(&xml)
        })
        .collect()
}

/// Extract per-shape text from a slide part.
fn shape_texts(xml: &str) -> Vec<String> {
    let mut shapes: Vec<String> = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_shape = false;
    let mut in_text = false;

    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    in_shape = true;
                    paragraphs.clear();
                }
                b"p" if in_shape => current.clear(),
                b"t" if in_shape => in_text = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                current.push_str(&e.unescape().expect("unescape"));
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    shapes.push(paragraphs.join("\n"));
                    in_shape = false;
                }
                b"p" if in_shape => paragraphs.push(std::mem::take(&mut current)),
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => panic!("slide xml parse error: {err}"),
            _ => {}
        }
    }
    shapes
}

fn relationships(entries: &[(&str, &str, &str)]) -> String {
    let mut body = String::new();
    for (id, rel_type, target) in entries {
        body.push_str(&format!(
            "<Relationship Id=\"{id}\" Type=\"{rel_type}\" Target=\"{target}\"/>"
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         {body}</Relationships>"
    )
}

fn master_part() -> &'static str {
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
     <p:sldMaster xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
     xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
     xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
     <p:cSld><p:spTree>\
     <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
     <p:grpSpPr/>\
     </p:spTree></p:cSld>\
     <p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" \
     accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" \
     accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
     <p:sldLayoutIdLst>\
     <p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/>\
     <p:sldLayoutId id=\"2147483650\" r:id=\"rId2\"/>\
     </p:sldLayoutIdLst>\
     </p:sldMaster>"
}

fn layout_part(kind: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <p:sldLayout xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" type=\"{kind}\">\
         <p:cSld><p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr/>\
         </p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
         </p:sldLayout>"
    )
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}
