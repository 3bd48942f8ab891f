//! Password protection using the standard security handler (RC4, 128-bit)

use crate::error::PdfOpsError;
use crate::tree::load;
use lopdf::{EncryptionState, EncryptionVersion, Object, Permissions, StringFormat};
use sha2::{Digest, Sha256};

const KEY_LENGTH: usize = 128;

/// Encrypt a PDF so it needs `user_password` to open.
///
/// When no owner password is given the user password is used for both.
pub fn encrypt_document(
    bytes: &[u8],
    user_password: &str,
    owner_password: Option<&str>,
) -> Result<Vec<u8>, PdfOpsError> {
    if user_password.is_empty() {
        return Err(PdfOpsError::InvalidInput("Password must not be empty".into()));
    }

    let mut doc = load(bytes)?;
    if doc.is_encrypted() {
        return Err(PdfOpsError::InvalidInput(
            "Document is already encrypted".into(),
        ));
    }

    // The encryption key is derived from the file identifier
    if doc.trailer.get(b"ID").is_err() {
        let digest = Sha256::digest(bytes);
        let id = Object::String(digest[..16].to_vec(), StringFormat::Hexadecimal);
        doc.trailer.set("ID", Object::Array(vec![id.clone(), id]));
    }

    let owner_password = owner_password
        .filter(|p| !p.is_empty())
        .unwrap_or(user_password);

    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password,
        user_password,
        key_length: KEY_LENGTH,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version)
        .map_err(|e| PdfOpsError::OperationError(format!("Failed to prepare encryption: {}", e)))?;
    doc.encrypt(&state)
        .map_err(|e| PdfOpsError::OperationError(format!("Failed to encrypt PDF: {}", e)))?;

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfOpsError::OperationError(format!("Failed to save PDF: {}", e)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_pdf;

    #[test]
    fn test_encrypt_adds_encrypt_dictionary() {
        let pdf = create_test_pdf(2, "Secret");
        let encrypted = encrypt_document(&pdf, "hunter2", None).unwrap();

        let text = String::from_utf8_lossy(&encrypted);
        assert!(text.contains("/Encrypt"));
        assert_ne!(encrypted, pdf);
    }

    #[test]
    fn test_encrypt_rejects_empty_password() {
        let pdf = create_test_pdf(1, "Secret");
        assert!(matches!(
            encrypt_document(&pdf, "", None),
            Err(PdfOpsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_encrypt_rejects_garbage() {
        assert!(matches!(
            encrypt_document(b"nope", "pw", None),
            Err(PdfOpsError::ParseError(_))
        ));
    }
}
