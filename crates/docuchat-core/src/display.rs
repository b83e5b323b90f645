//! Presentation-independent text for the views.

use crate::conversation::Source;
use crate::upload::PendingFile;

pub const EMPTY_SESSION_PLACEHOLDER: &str = "Start a new chat from the sidebar";
pub const UPLOAD_LABEL: &str = "Upload Document";
pub const UPLOADING_LABEL: &str = "Uploading...";

/// Summary line of a collapsed citation list.
pub fn sources_summary(count: usize) -> String {
    format!("Sources ({count})")
}

/// One citation line, e.g. `Page 3: "X is defined as Y"`.
pub fn source_line(source: &Source, width: usize) -> String {
    format!(
        "Page {}: \"{}\"",
        source.page,
        truncate_snippet(&source.content, width)
    )
}

/// Collapses whitespace to single spaces and cuts the text to `width`
/// characters, ending in `...` when something was cut.
pub fn truncate_snippet(text: &str, width: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }
    let keep = width.saturating_sub(3);
    let mut cut: String = collapsed.chars().take(keep).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str("...");
    cut
}

pub fn pending_file_label(file: &PendingFile) -> String {
    format!("Current: {}", file.name)
}

pub fn upload_label(is_uploading: bool) -> &'static str {
    if is_uploading {
        UPLOADING_LABEL
    } else {
        UPLOAD_LABEL
    }
}
