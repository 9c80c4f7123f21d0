//! In-memory fixtures for PDF and image tests

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// Build a PDF with `pages` blank pages sharing an inherited MediaBox
pub fn sample_pdf(pages: usize, width: f64, height: f64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(pages);
    for n in 0..pages {
        let text = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", n + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width as _),
                Object::Real(height as _),
            ],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    finish(doc, pages_id)
}

/// One page whose MediaBox lives in its own object
pub fn indirect_media_box_pdf(width: f64, height: f64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let media_box_id = doc.add_object(Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(width as _),
        Object::Real(height as _),
    ]));
    single_page(doc, dictionary! { "MediaBox" => media_box_id })
}

/// One page listing itself as its `/Parent`, with nothing to inherit
pub fn self_parented_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();
    doc.objects.insert(
        page_id,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => page_id,
        }),
    );
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    finish(doc, pages_id)
}

/// Regular one-page document whose trailer declares standard encryption
pub fn encrypted_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "O" => Object::string_literal(vec![0u8; 32]),
        "U" => Object::string_literal(vec![0u8; 32]),
        "P" => -4,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    single_page(
        doc,
        dictionary! {
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        },
    )
}

fn single_page(mut doc: Document, mut page: Dictionary) -> Vec<u8> {
    let pages_id = doc.new_object_id();
    page.set("Type", "Page");
    page.set("Parent", pages_id);
    let page_id = doc.add_object(page);
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    finish(doc, pages_id)
}

fn finish(mut doc: Document, pages_id: ObjectId) -> Vec<u8> {
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("sample PDF serializes");
    buffer
}

/// Dark stroke on a transparent background, like a generated signature
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        if x == y % width.max(1) {
            Rgba([20, 20, 60, 255])
        } else {
            Rgba([255, 255, 255, 0])
        }
    });
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

pub fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 200, 200]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, format).expect("sample image encodes");
    cursor.into_inner()
}

/// Rectangle `(x, y, width, height)` of the last signature drawn on a page
pub fn drawn_rect(pdf: &[u8], page_index: usize) -> Option<(f64, f64, f64, f64)> {
    let doc = Document::load_mem(pdf).ok()?;
    let page_id = *doc.get_pages().values().nth(page_index)?;
    let content = Content::decode(&doc.get_page_content(page_id).ok()?).ok()?;

    let mut last_cm = None;
    let mut found = None;
    for op in &content.operations {
        match op.operator.as_str() {
            "cm" => last_cm = Some(op.operands.clone()),
            "Do" => {
                let is_signature = op
                    .operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .is_some_and(|name| name.starts_with(b"SigImg"));
                if is_signature {
                    found = last_cm.clone();
                }
            }
            _ => {}
        }
    }

    let operands = found?;
    let value = |i: usize| operands.get(i).and_then(|o| o.as_float().ok()).map(|v| v as f64);
    Some((value(4)?, value(5)?, value(0)?, value(3)?))
}
