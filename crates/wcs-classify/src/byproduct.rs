//! Recognition of the sidecar files the tool writes next to a conflicted file.
//!
//! For a conflicted `<base>` the tool leaves `<base>.mine`,
//! `<base>.working`, `<base>.r<rev>` and, for merges,
//! `<base>.merge-left.r<rev>` / `<base>.merge-right.r<rev>`.

/// If `path` looks like a conflict byproduct, return the path of the file
/// it belongs to.
///
/// The caller still has to check that the returned base is actually in
/// conflict; a plain `notes.mine` with no conflicted `notes` is a regular
/// unversioned file.
pub fn conflict_byproduct_base(path: &str) -> Option<&str> {
    let (base, suffix) = path.rsplit_once('.')?;
    if !is_file_name(base) {
        return None;
    }
    match suffix {
        "mine" | "working" => Some(base),
        s if is_revision(s) => {
            if let Some((inner, label)) = base.rsplit_once('.') {
                if is_merge_label(label) && is_file_name(inner) {
                    return Some(inner);
                }
            }
            Some(base)
        }
        _ => None,
    }
}

/// `r` followed by at least one digit.
fn is_revision(s: &str) -> bool {
    s.strip_prefix('r')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn is_merge_label(s: &str) -> bool {
    s.strip_prefix("merge-").is_some_and(|rest| !rest.is_empty())
}

fn is_file_name(base: &str) -> bool {
    !base.is_empty() && !base.ends_with('/') && !base.ends_with('\\')
}
