/// Characters that are unsafe in filenames on at least one supported platform.
const PATH_HOSTILE: &[char] = &['/', ':', '*', '?', '"', '<', '>', '|', '\\'];

/// Replaces path-hostile characters with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if PATH_HOSTILE.contains(&c) { '_' } else { c })
        .collect()
}
