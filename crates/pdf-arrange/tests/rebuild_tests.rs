use image::{Rgba, RgbaImage};
use lopdf::{Dictionary, Document, Object, Stream};
use pdf_arrange::{MergeMode, MoveDirection, PageSet, plan, reconstruct};

/// Minimal PDF with `num_pages` pages. Each page gets a distinct MediaBox
/// width (600 + index) so tests can identify pages after reordering.
fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for index in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(600 + index as i64),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

fn solid(width: u32, height: u32, value: u8) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
}

fn media_box_widths(doc: &Document) -> Vec<i64> {
    doc.get_pages()
        .values()
        .map(|&id| {
            let dict = doc.get_dictionary(id).unwrap();
            let media_box = dict.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

#[test]
fn test_reconstruct_preserves_reordered_pass_through() {
    let source = create_test_pdf(3);
    let mut pages = PageSet::new((0..3).map(|i| solid(100, 200, 10 + i)).collect());
    assert!(pages.move_slot(0, MoveDirection::Forward));

    let export_plan = plan(&mut pages).unwrap();
    let bytes = reconstruct(&source, &export_plan).unwrap();

    let output = Document::load_mem(&bytes).unwrap();
    assert_eq!(output.get_pages().len(), 3);
    assert_eq!(media_box_widths(&output), vec![601, 600, 602]);
}

#[test]
fn test_reconstruct_keeps_original_content_stream() {
    let source = create_test_pdf(1);
    let mut pages = PageSet::new(vec![solid(100, 200, 10)]);

    let export_plan = plan(&mut pages).unwrap();
    let bytes = reconstruct(&source, &export_plan).unwrap();

    let output = Document::load_mem(&bytes).unwrap();
    let (_, page_id) = output.get_pages().into_iter().next().unwrap();
    let dict = output.get_dictionary(page_id).unwrap();
    let contents_id = dict.get(b"Contents").unwrap().as_reference().unwrap();
    let stream = output.get_object(contents_id).unwrap().as_stream().unwrap();
    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    assert_eq!(content, b"q Q");
}

#[test]
fn test_reconstruct_embeds_composite_page() {
    let source = create_test_pdf(2);
    let mut pages = PageSet::new(vec![solid(100, 200, 10), solid(150, 100, 20)]);
    assert!(pages.apply_merge(0, MergeMode::Vertical));

    let export_plan = plan(&mut pages).unwrap();
    let bytes = reconstruct(&source, &export_plan).unwrap();

    let output = Document::load_mem(&bytes).unwrap();
    assert_eq!(output.get_pages().len(), 1);

    let (_, page_id) = output.get_pages().into_iter().next().unwrap();
    let dict = output.get_dictionary(page_id).unwrap();

    // the page is sized to the composite's pixel dimensions
    let media_box = dict.get(b"MediaBox").unwrap().as_array().unwrap();
    assert_eq!(media_box[2].as_i64().unwrap(), 150);
    assert_eq!(media_box[3].as_i64().unwrap(), 300);

    // and carries the raster as an image XObject
    let resources = dict.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let image_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
    let image_stream = output.get_object(image_id).unwrap().as_stream().unwrap();
    assert_eq!(
        image_stream.dict.get(b"Width").unwrap().as_i64().unwrap(),
        150
    );
    assert_eq!(
        image_stream.dict.get(b"Height").unwrap().as_i64().unwrap(),
        300
    );
}

#[test]
fn test_reconstruct_interleaves_copies_and_composites() {
    let source = create_test_pdf(4);
    let mut pages = PageSet::new((0..4).map(|i| solid(100, 100, 10 + i)).collect());
    assert!(pages.apply_merge(1, MergeMode::Horizontal));

    let export_plan = plan(&mut pages).unwrap();
    let bytes = reconstruct(&source, &export_plan).unwrap();

    let output = Document::load_mem(&bytes).unwrap();
    // page 1, merged (2-3), page 4
    assert_eq!(output.get_pages().len(), 3);
    assert_eq!(media_box_widths(&output), vec![600, 200, 603]);
}

#[test]
fn test_reconstruct_rejects_out_of_range_page() {
    // a plan built against a larger page set than the document really has
    let source = create_test_pdf(1);
    let mut pages = PageSet::new((0..3).map(|i| solid(100, 100, 10 + i)).collect());
    let export_plan = plan(&mut pages).unwrap();

    assert!(reconstruct(&source, &export_plan).is_err());
}
