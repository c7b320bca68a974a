use crate::entities::image::ImageRecord;

const CONTENT_TYPE_LABELS: [(&str, &str); 10] = [
    ("image/jpeg", "JPEG"),
    ("image/jpg", "JPG"),
    ("image/png", "PNG"),
    ("image/webp", "WEBP"),
    ("image/gif", "GIF"),
    ("image/bmp", "BMP"),
    ("image/tiff", "TIFF"),
    ("image/svg+xml", "SVG"),
    ("image/heic", "HEIC"),
    ("image/heif", "HEIF"),
];

const BYTE_UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

/// Short label for a MIME type, `-` when unknown.
pub fn content_type_label(content_type: Option<&str>) -> String {
    let Some(value) = content_type.filter(|v| !v.is_empty()) else {
        return "-".to_string();
    };

    if let Some((_, label)) = CONTENT_TYPE_LABELS.iter().find(|(mime, _)| *mime == value) {
        return label.to_string();
    }

    match value.split('/').nth(1) {
        Some(subtype) => subtype.to_uppercase(),
        None => value.to_string(),
    }
}

pub fn dimensions(width: Option<u32>, height: Option<u32>, separator: &str) -> String {
    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => format!("{}{}{}", w, separator, h),
        _ => "-".to_string(),
    }
}

/// Binary-unit size, e.g. `5 MiB` or `1.5 KiB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = "B";
    for next in BYTE_UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }

    if value.fract() == 0.0 {
        format!("{} {}", value as u64, unit)
    } else {
        format!("{:.1} {}", value, unit)
    }
}

pub fn present_image_row(record: &ImageRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        record.image_id,
        display_or_dash(&record.display_name),
        content_type_label(record.original.content_type.as_deref()),
        dimensions(record.original.width, record.original.height, "×"),
        format_bytes(record.original.size_bytes),
        format_bytes(record.thumbnail.size_bytes),
        record.status,
    )
}

fn display_or_dash(name: &str) -> &str {
    if name.is_empty() { "-" } else { name }
}
