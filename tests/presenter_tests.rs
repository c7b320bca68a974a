
use image_manager::{
    entities::image::{ImageRecord, display_name_from_key},
    presenters::{content_type_label, dimensions, format_bytes, present_image_row},
};
use test_images::*;

#[test]
fn content_type_labels() {
    assert_eq!(content_type_label(Some("image/jpeg")), "JPEG");
    assert_eq!(content_type_label(Some("image/jpg")), "JPG");
    assert_eq!(content_type_label(Some("image/svg+xml")), "SVG");
    assert_eq!(content_type_label(Some("image/avif")), "AVIF");
    assert_eq!(content_type_label(Some("octet")), "octet");
    assert_eq!(content_type_label(Some("")), "-");
    assert_eq!(content_type_label(None), "-");
}

#[test]
fn dimensions_need_both_sides() {
    assert_eq!(dimensions(Some(1920), Some(1080), "×"), "1920×1080");
    assert_eq!(dimensions(Some(640), Some(480), "x"), "640x480");
    assert_eq!(dimensions(Some(640), None, "×"), "-");
    assert_eq!(dimensions(Some(0), Some(480), "×"), "-");
}

#[test]
fn byte_sizes_use_binary_units() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1024), "1 KiB");
    assert_eq!(format_bytes(1536), "1.5 KiB");
    assert_eq!(format_bytes(5 * 1024 * 1024), "5 MiB");
    assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3 GiB");
}

#[test]
fn display_name_is_segment_after_prefix() {
    assert_eq!(display_name_from_key(Some("abc123/photo.png")), "photo.png");
    assert_eq!(display_name_from_key(Some("no-separator.png")), "");
    assert_eq!(display_name_from_key(Some("a/b/c.png")), "b");
    assert_eq!(display_name_from_key(None), "");
}

#[test]
fn image_row_lists_name_type_and_sizes() {
    let record = ImageRecord::from(image_item("img-1", "abc123/photo.png"));

    let row = present_image_row(&record);

    assert_eq!(row, "img-1\tphoto.png\tPNG\t1920×1080\t470.8 KiB\t17.8 KiB\tready");
}
