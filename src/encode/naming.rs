use crate::encode::format::OutputFormat;
use crate::encode::writer::FileSystem;
use crate::scene::camera::Viewpoint;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Characters that cannot appear in a photo file name.
const FORBIDDEN: [char; 4] = ['/', '\\', ':', ';'];

fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| {
            if FORBIDDEN.contains(&c) || std::path::is_separator(c) {
                '-'
            } else {
                c
            }
        })
        .collect()
}

/// `"<document> - <viewpoint>.<ext>"`, or `"<viewpoint>.<ext>"` for an unnamed document.
pub fn photo_file_name(document_name: &str, viewpoint_name: &str, format: &OutputFormat) -> String {
    let doc = sanitize(document_name);
    let mut vp = sanitize(viewpoint_name);
    if vp.is_empty() {
        vp = "view".to_owned();
    }
    if doc.is_empty() {
        format!("{vp}.{}", format.extension())
    } else {
        format!("{doc} - {vp}.{}", format.extension())
    }
}

/// One destination per viewpoint under `dir`.
///
/// Viewpoints sharing a name get a ` (2)`, ` (3)`, ... suffix so every path is distinct.
pub fn plan_destinations(
    dir: &Path,
    document_name: &str,
    viewpoints: &[Viewpoint],
    format: &OutputFormat,
) -> Vec<PathBuf> {
    let mut used = HashSet::new();
    viewpoints
        .iter()
        .map(|vp| {
            let mut name = photo_file_name(document_name, &vp.name, format);
            let mut n = 2;
            while !used.insert(name.clone()) {
                let suffixed = format!("{} ({n})", vp.name);
                name = photo_file_name(document_name, &suffixed, format);
                n += 1;
            }
            dir.join(name)
        })
        .collect()
}

/// Paths that already exist and would be overwritten.
pub fn existing_destinations(fs: &dyn FileSystem, paths: &[PathBuf]) -> Vec<PathBuf> {
    paths.iter().filter(|p| fs.exists(p)).cloned().collect()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/naming.rs"]
mod tests;
