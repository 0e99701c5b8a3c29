//! Lookup URL derivation
//!
//! The migration target identifies a receipt by the URL printed in its QR
//! code. This module rebuilds that URL from the five stored fields:
//!
//! ```text
//! <base>?p=<accessKey>|<documentVersion>|<environmentCode>|<issuerTokenId>|<signatureDigest>
//! ```

use crate::domain::{MigratorError, ReceiptRecord, Result};

/// Separator between the fields of the `p` parameter
const FIELD_SEPARATOR: &str = "|";

/// Builds the lookup URL for a receipt
///
/// Each field is trimmed and then used verbatim. The function is pure: the
/// same record and base always produce the same string.
///
/// # Errors
///
/// Returns [`MigratorError::MissingField`] naming the first of the five
/// fields that is absent or blank after trimming.
///
/// # Examples
///
/// ```
/// use nfce_migrator::core::request::build_request;
/// use nfce_migrator::domain::ReceiptRecord;
///
/// let record = ReceiptRecord::builder(1)
///     .access_key("ABC")
///     .document_version("4")
///     .environment_code("1")
///     .issuer_token_id("X1")
///     .signature_digest("SIG")
///     .build();
///
/// let url = build_request("https://sefaz.example/consulta", &record).unwrap();
/// assert_eq!(url, "https://sefaz.example/consulta?p=ABC|4|1|X1|SIG");
/// ```
pub fn build_request(base: &str, record: &ReceiptRecord) -> Result<String> {
    let mut parts = Vec::with_capacity(5);

    for (field, value) in record.required_fields() {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => parts.push(v),
            _ => {
                return Err(MigratorError::MissingField {
                    record_id: record.id,
                    field,
                })
            }
        }
    }

    Ok(format!("{}?p={}", base, parts.join(FIELD_SEPARATOR)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const BASE: &str = "https://www.sefaz.mt.gov.br/nfce/consultanfce";

    fn complete_record() -> ReceiptRecord {
        ReceiptRecord::builder(7)
            .access_key("51240112345678000190650010000000011000000010")
            .document_version("2")
            .environment_code("1")
            .issuer_token_id("000001")
            .signature_digest("a1b2c3")
            .build()
    }

    #[test]
    fn test_build_request_canonical_order() {
        let url = build_request(BASE, &complete_record()).unwrap();
        assert_eq!(
            url,
            "https://www.sefaz.mt.gov.br/nfce/consultanfce?p=51240112345678000190650010000000011000000010|2|1|000001|a1b2c3"
        );
    }

    #[test]
    fn test_build_request_trims_fields() {
        let record = ReceiptRecord::builder(1)
            .access_key("  ABC ")
            .document_version("4\n")
            .environment_code(" 1")
            .issuer_token_id("X1 ")
            .signature_digest("\tSIG")
            .build();

        let url = build_request("https://x/y", &record).unwrap();
        assert_eq!(url, "https://x/y?p=ABC|4|1|X1|SIG");
    }

    #[test]
    fn test_build_request_is_deterministic() {
        let record = complete_record();
        let first = build_request(BASE, &record).unwrap();
        let second = build_request(BASE, &record).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_request_ignores_descriptive_fields() {
        let plain = complete_record();
        let mut decorated = complete_record();
        decorated.issuer_name = Some("Mercado Central".to_string());
        decorated.issuer_tax_id = Some("12345678000190".to_string());

        assert_eq!(
            build_request(BASE, &plain).unwrap(),
            build_request(BASE, &decorated).unwrap()
        );
    }

    #[test_case("accessKey" ; "access key")]
    #[test_case("documentVersion" ; "document version")]
    #[test_case("environmentCode" ; "environment code")]
    #[test_case("issuerTokenId" ; "issuer token id")]
    #[test_case("signatureDigest" ; "signature digest")]
    fn test_build_request_missing_field(field: &str) {
        let mut record = complete_record();
        match field {
            "accessKey" => record.access_key = None,
            "documentVersion" => record.document_version = None,
            "environmentCode" => record.environment_code = None,
            "issuerTokenId" => record.issuer_token_id = None,
            _ => record.signature_digest = None,
        }

        match build_request(BASE, &record) {
            Err(MigratorError::MissingField {
                record_id,
                field: missing,
            }) => {
                assert_eq!(record_id, 7);
                assert_eq!(missing, field);
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "whitespace only")]
    fn test_build_request_blank_field_is_missing(value: &str) {
        let mut record = complete_record();
        record.issuer_token_id = Some(value.to_string());

        let err = build_request(BASE, &record).unwrap_err();
        assert!(matches!(
            err,
            MigratorError::MissingField {
                field: "issuerTokenId",
                ..
            }
        ));
    }

    #[test]
    fn test_build_request_reports_first_missing_field() {
        let record = ReceiptRecord::builder(3).document_version("4").build();
        let err = build_request(BASE, &record).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Receipt 3 is missing required field 'accessKey'"
        );
    }
}
