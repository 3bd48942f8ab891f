//! PDF fixtures shared by the unit tests

use lopdf::{
    content::{Content, Operation},
    dictionary, Dictionary, Document, Object, ObjectId, Stream,
};

fn page_content(text: &str) -> Vec<u8> {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
            Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    text.as_bytes().to_vec(),
                    lopdf::StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    content.encode().unwrap()
}

fn add_page(doc: &mut Document, parent: ObjectId, text: &str, media_box: bool) -> ObjectId {
    let content_id = doc.add_object(Stream::new(Dictionary::new(), page_content(text)));

    let mut page = dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "Contents" => content_id,
    };
    if media_box {
        page.set("MediaBox", media_box_of(612, 792));
    }
    doc.add_object(page)
}

fn media_box_of(width: i64, height: i64) -> Vec<Object> {
    vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(width),
        Object::Integer(height),
    ]
}

fn font_resources(doc: &mut Document) -> ObjectId {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    })
}

fn finish(mut doc: Document, pages_id: ObjectId) -> Vec<u8> {
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// A flat PDF with `num_pages` pages, page N showing `<prefix>-N`
pub fn create_test_pdf(num_pages: u32, prefix: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let resources_id = font_resources(&mut doc);

    let kids: Vec<Object> = (1..=num_pages)
        .map(|n| add_page(&mut doc, pages_id, &format!("{}-{}", prefix, n), true).into())
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(num_pages as i64),
            "Kids" => kids,
            "Resources" => resources_id,
        }),
    );

    finish(doc, pages_id)
}

/// A PDF whose pages sit under an intermediate `Pages` node that carries
/// the inherited `MediaBox` and `Rotate` entries.
pub fn create_nested_test_pdf(num_pages: u32, prefix: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let root_id = doc.new_object_id();
    let branch_id = doc.new_object_id();
    let resources_id = font_resources(&mut doc);

    let kids: Vec<Object> = (1..=num_pages)
        .map(|n| add_page(&mut doc, branch_id, &format!("{}-{}", prefix, n), false).into())
        .collect();

    doc.objects.insert(
        branch_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Parent" => root_id,
            "Count" => Object::Integer(num_pages as i64),
            "Kids" => kids,
            "MediaBox" => media_box_of(300, 400),
            "Rotate" => Object::Integer(90),
        }),
    );
    doc.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(num_pages as i64),
            "Kids" => vec![Object::Reference(branch_id)],
            "Resources" => resources_id,
        }),
    );

    finish(doc, root_id)
}

/// Read an integer attribute of page `number` (1-based), following parents
pub fn page_attribute(bytes: &[u8], number: u32, key: &[u8]) -> Option<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = *doc.get_pages().get(&number)?;
    let mut current = doc.get_dictionary(page_id).ok()?;
    loop {
        if let Ok(value) = current.get(key) {
            return value.as_i64().ok();
        }
        let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
}

/// Text shown on page `number` (1-based) by the fixtures above
pub fn page_marker(bytes: &[u8], number: u32) -> String {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = *doc.get_pages().get(&number).unwrap();
    let content = doc.get_page_content(page_id).unwrap();
    let content = Content::decode(&content).unwrap();
    content
        .operations
        .iter()
        .find(|op| op.operator == "Tj")
        .and_then(|op| op.operands.first())
        .and_then(|o| o.as_str().ok())
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .unwrap()
}
