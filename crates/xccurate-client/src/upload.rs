//! Files sent to the backend.

use std::fmt;

use crate::error::ClientError;

/// What kind of file an endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    /// A 2D scan for `/classify`.
    Image,
    /// A NIfTI volume for `/segment`.
    Nifti,
}

impl UploadKind {
    /// Accepted file name suffixes, lowercase.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => &[".png", ".jpg", ".jpeg", ".bmp", ".webp"],
            Self::Nifti => &[".nii", ".nii.gz"],
        }
    }

    /// Value for an `<input accept=...>` attribute.
    #[must_use]
    pub const fn accept(self) -> &'static str {
        match self {
            Self::Image => "image/*",
            Self::Nifti => ".nii,.nii.gz",
        }
    }

    /// Returns `true` if `file_name` ends in one of the accepted suffixes,
    /// ignoring ASCII case.
    #[must_use]
    pub fn matches(self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.extensions().iter().any(|ext| lower.ends_with(ext))
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Nifti => f.write_str("NIfTI volume"),
        }
    }
}

/// A named file held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name; its extension decides the accepted kind.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Upload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Check that this file can be sent as `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUpload`] if the name is blank, the
    /// file is empty, or the extension does not match `kind`.
    pub fn validate(&self, kind: UploadKind) -> Result<(), ClientError> {
        let reject = |reason: String| ClientError::InvalidUpload {
            file_name: self.file_name.clone(),
            reason,
        };
        if self.file_name.trim().is_empty() {
            return Err(reject("no file selected".to_owned()));
        }
        if self.bytes.is_empty() {
            return Err(reject("file is empty".to_owned()));
        }
        if !kind.matches(&self.file_name) {
            return Err(reject(format!(
                "expected {kind} ({})",
                kind.extensions().join(", ")
            )));
        }
        Ok(())
    }
}

// File contents are large and binary; show their size only.
impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nifti_extensions() {
        assert!(UploadKind::Nifti.matches("BraTS_001_flair.nii"));
        assert!(UploadKind::Nifti.matches("BraTS_001_t1ce.NII.GZ"));
        assert!(!UploadKind::Nifti.matches("scan.gz"));
        assert!(!UploadKind::Nifti.matches("scan.png"));
    }

    #[test]
    fn image_extensions() {
        for name in ["a.png", "b.JPG", "c.jpeg", "d.bmp", "e.webp"] {
            assert!(UploadKind::Image.matches(name), "{name}");
        }
        assert!(!UploadKind::Image.matches("volume.nii"));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let upload = Upload::new("scan.png", vec![1]);
        let err = upload.validate(UploadKind::Nifti);
        assert!(matches!(
            err,
            Err(ClientError::InvalidUpload { ref file_name, .. }) if file_name == "scan.png"
        ));
    }

    #[test]
    fn empty_file_is_rejected() {
        let upload = Upload::new("flair.nii", Vec::new());
        assert!(upload.validate(UploadKind::Nifti).is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let upload = Upload::new("  ", vec![1]);
        assert!(upload.validate(UploadKind::Image).is_err());
    }

    #[test]
    fn valid_upload_passes() {
        let upload = Upload::new("flair.nii.gz", vec![0x1f, 0x8b]);
        assert!(upload.validate(UploadKind::Nifti).is_ok());
    }

    #[test]
    fn debug_omits_contents() {
        let upload = Upload::new("x.png", vec![0; 4096]);
        assert_eq!(
            format!("{upload:?}"),
            r#"Upload { file_name: "x.png", len: 4096 }"#
        );
    }
}
