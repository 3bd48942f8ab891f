//! Images -> PDF
//!
//! Each image becomes one page sized to its pixel dimensions (72 dpi),
//! drawn from an RGB image XObject compressed with FlateDecode.

use crate::error::PdfOpsError;
use crate::tree::save;
use flate2::{write::ZlibEncoder, Compression};
use lopdf::{
    content::{Content, Operation},
    dictionary, Dictionary, Document, Object, ObjectId, Stream,
};
use std::io::Write;

/// Build a PDF with one page per image, in the given order
pub fn images_to_pdf(images: &[Vec<u8>]) -> Result<Vec<u8>, PdfOpsError> {
    if images.is_empty() {
        return Err(PdfOpsError::InvalidInput("No images to convert".into()));
    }

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(images.len());
    for (i, bytes) in images.iter().enumerate() {
        let page_id = add_image_page(&mut doc, pages_id, bytes)
            .map_err(|e| PdfOpsError::ImageError(format!("Image {}: {}", i + 1, e)))?;
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(kids.len() as i64),
            "Kids" => kids,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    save(doc)
}

fn add_image_page(doc: &mut Document, pages_id: ObjectId, bytes: &[u8]) -> Result<ObjectId, String> {
    let rgb = image::load_from_memory(bytes)
        .map_err(|e| e.to_string())?
        .to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(rgb.as_raw()).map_err(|e| e.to_string())?;
    let pixels = encoder.finish().map_err(|e| e.to_string())?;

    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(width as i64),
            "Height" => Object::Integer(height as i64),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => "FlateDecode",
        },
        pixels,
    )
    .with_compression(false);
    let image_id = doc.add_object(image);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(width as i64),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(height as i64),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        Dictionary::new(),
        content.encode().map_err(|e| e.to_string())?,
    ));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(width as i64),
            Object::Integer(height as i64),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    }))
}
