//! Common validation utilities.

use validator::ValidationError;

use crate::cpf;

/// Prefix of an inline PNG image as produced by the signature pad.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Validates that a CPF carries exactly eleven digits.
///
/// Formatting characters are ignored, so both `123.456.789-00` and
/// `12345678900` are accepted.
pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    if cpf::has_valid_length(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("cpf_invalid");
        err.message = Some("Por favor, digite um CPF válido com 11 dígitos.".into());
        Err(err)
    }
}

/// Validates that a text value has at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a string is an inline PNG data URL.
pub fn validate_png_data_url(value: &str) -> Result<(), ValidationError> {
    match value.strip_prefix(PNG_DATA_URL_PREFIX) {
        Some(payload) if !payload.is_empty() => Ok(()),
        _ => {
            let mut err = ValidationError::new("png_data_url");
            err.message = Some("Signature image must be a PNG data URL".into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cpf() {
        assert!(validate_cpf("123.456.789-00").is_ok());
        assert!(validate_cpf("12345678900").is_ok());
        assert!(validate_cpf("123.456.789").is_err());
        assert!(validate_cpf("").is_err());
    }

    #[test]
    fn test_validate_cpf_error_message() {
        let err = validate_cpf("123").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Por favor, digite um CPF válido com 11 dígitos."
        );
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Empresa A").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_validate_png_data_url() {
        assert!(validate_png_data_url("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert!(validate_png_data_url("data:image/png;base64,").is_err());
        assert!(validate_png_data_url("data:image/jpeg;base64,abc").is_err());
        assert!(validate_png_data_url("iVBORw0KGgo=").is_err());
    }
}
