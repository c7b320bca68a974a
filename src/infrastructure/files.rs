use std::path::Path;

use anyhow::Context;

use crate::entities::upload::CandidateFile;

/// Reads a file into a [`CandidateFile`], sniffing its MIME type from the content.
///
/// SVG is text and has no magic number, so it is recognised by extension.
/// Anything unrecognised gets an empty type and is left to the acceptance policy.
pub async fn load_candidate(path: &Path) -> anyhow::Result<CandidateFile> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let content_type = sniff_content_type(path, &content);

    tracing::debug!(%name, %content_type, bytes = content.len(), "Loaded file from disk");
    Ok(CandidateFile::new(name, content_type, content))
}

pub fn sniff_content_type(path: &Path, content: &[u8]) -> String {
    if let Some(kind) = infer::get(content) {
        return kind.mime_type().to_string();
    }

    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        "image/svg+xml".to_string()
    } else {
        String::new()
    }
}
