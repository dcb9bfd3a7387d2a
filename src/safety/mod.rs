use std::path::{Component, Path};

/// True when `name` is a plain relative path that stays inside the directory
/// it is written to: no `..`, no root or drive prefix, no backslashes, no NUL.
pub fn filename_is_safe(name: &str) -> bool {
    if name.trim().is_empty() || name.contains('\\') || name.contains('\0') {
        return false;
    }
    if name.ends_with('/') {
        return false;
    }
    Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
