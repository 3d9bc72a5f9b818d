//! Object path generation.
//!
//! Every attachment lives under its member's prefix with a random name so
//! two uploads of the same filename never collide: `<member_id>/<uuid>.<ext>`.

use uuid::Uuid;

use backoffice_core::error::AppError;
use backoffice_core::result::AppResult;
use backoffice_core::types::MemberId;

/// Lower-cased extension of `filename`, if it has one.
pub fn extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Fresh object path for an upload of `filename` owned by `member_id`.
pub fn object_path(member_id: MemberId, filename: &str) -> String {
    match extension(filename) {
        Some(ext) => format!("{member_id}/{}.{ext}", Uuid::new_v4()),
        None => format!("{member_id}/{}", Uuid::new_v4()),
    }
}

/// Reject empty paths and parent-directory segments.
pub fn validate(path: &str) -> AppResult<&str> {
    let clean = path.trim_start_matches('/');
    if clean.is_empty() || clean.split('/').any(|segment| segment == "..") {
        return Err(AppError::upload(format!("Invalid object path: '{path}'")));
    }
    Ok(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path_layout() {
        let member = MemberId::new();
        let path = object_path(member, "Foto Perfil.PNG");
        let (prefix, name) = path.split_once('/').unwrap();
        assert_eq!(prefix, member.to_string());
        assert!(name.ends_with(".png"));
        assert_ne!(path, object_path(member, "Foto Perfil.PNG"));
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("a.tar.GZ").as_deref(), Some("gz"));
        assert_eq!(extension(".bashrc"), None);
        assert_eq!(extension("README"), None);
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate("/a/b.pdf").unwrap(), "a/b.pdf");
        assert!(validate("a/../../etc/passwd").is_err());
        assert!(validate("").is_err());
    }
}
