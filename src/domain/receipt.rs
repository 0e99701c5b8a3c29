//! Receipt domain model
//!
//! This module defines [`ReceiptRecord`], the fixed-shape view of one legacy
//! `notas_fiscais` row.

use serde::{Deserialize, Serialize};

/// Names of the five fields every migratable receipt must carry, in the
/// order they appear in the derived lookup URL.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "accessKey",
    "documentVersion",
    "environmentCode",
    "issuerTokenId",
    "signatureDigest",
];

/// One legacy NFC-e receipt row
///
/// Populated once at read time by a record source. The five identifying
/// fields are optional so that an absent column value stays visibly absent;
/// the request builder decides whether the record is migratable.
///
/// # Examples
///
/// ```
/// use nfce_migrator::domain::receipt::ReceiptRecordBuilder;
///
/// let record = ReceiptRecordBuilder::new(1)
///     .access_key("ABC")
///     .document_version("4")
///     .environment_code("1")
///     .issuer_token_id("X1")
///     .signature_digest("SIG")
///     .build();
///
/// assert_eq!(record.id, 1);
/// assert_eq!(record.access_key.as_deref(), Some("ABC"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// Legacy primary key
    pub id: i64,

    /// 44-digit NFC-e access key (`chave`)
    pub access_key: Option<String>,

    /// QR-code layout version (`versao`)
    pub document_version: Option<String>,

    /// Issuing environment, production or homologation (`ambiente`)
    pub environment_code: Option<String>,

    /// Taxpayer security token id (`cIdToken`)
    pub issuer_token_id: Option<String>,

    /// QR-code signature hash (`vSig`)
    pub signature_digest: Option<String>,

    /// Issuer trade name (`nomeEmitente`)
    pub issuer_name: Option<String>,

    /// Issuer CNPJ (`cnpjEmitente`)
    pub issuer_tax_id: Option<String>,

    /// Issuer state registration (`ieEmitente`)
    pub issuer_state_registration: Option<String>,

    /// Row creation timestamp as stored by the legacy system (`createdAt`)
    pub created_at: Option<String>,
}

impl ReceiptRecord {
    /// Creates a new builder for the given row id
    pub fn builder(id: i64) -> ReceiptRecordBuilder {
        ReceiptRecordBuilder::new(id)
    }

    /// Required fields paired with their names, in URL order
    pub fn required_fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            (REQUIRED_FIELDS[0], self.access_key.as_deref()),
            (REQUIRED_FIELDS[1], self.document_version.as_deref()),
            (REQUIRED_FIELDS[2], self.environment_code.as_deref()),
            (REQUIRED_FIELDS[3], self.issuer_token_id.as_deref()),
            (REQUIRED_FIELDS[4], self.signature_digest.as_deref()),
        ]
    }
}

/// Builder for constructing [`ReceiptRecord`] instances
#[derive(Debug)]
pub struct ReceiptRecordBuilder {
    record: ReceiptRecord,
}

impl ReceiptRecordBuilder {
    /// Creates a builder with every optional field unset
    pub fn new(id: i64) -> Self {
        Self {
            record: ReceiptRecord {
                id,
                access_key: None,
                document_version: None,
                environment_code: None,
                issuer_token_id: None,
                signature_digest: None,
                issuer_name: None,
                issuer_tax_id: None,
                issuer_state_registration: None,
                created_at: None,
            },
        }
    }

    /// Sets the access key
    pub fn access_key(mut self, value: impl Into<String>) -> Self {
        self.record.access_key = Some(value.into());
        self
    }

    /// Sets the document version
    pub fn document_version(mut self, value: impl Into<String>) -> Self {
        self.record.document_version = Some(value.into());
        self
    }

    /// Sets the environment code
    pub fn environment_code(mut self, value: impl Into<String>) -> Self {
        self.record.environment_code = Some(value.into());
        self
    }

    /// Sets the issuer token id
    pub fn issuer_token_id(mut self, value: impl Into<String>) -> Self {
        self.record.issuer_token_id = Some(value.into());
        self
    }

    /// Sets the signature digest
    pub fn signature_digest(mut self, value: impl Into<String>) -> Self {
        self.record.signature_digest = Some(value.into());
        self
    }

    /// Sets the issuer name
    pub fn issuer_name(mut self, value: impl Into<String>) -> Self {
        self.record.issuer_name = Some(value.into());
        self
    }

    /// Sets the issuer tax id
    pub fn issuer_tax_id(mut self, value: impl Into<String>) -> Self {
        self.record.issuer_tax_id = Some(value.into());
        self
    }

    /// Sets the issuer state registration
    pub fn issuer_state_registration(mut self, value: impl Into<String>) -> Self {
        self.record.issuer_state_registration = Some(value.into());
        self
    }

    /// Sets the creation timestamp
    pub fn created_at(mut self, value: impl Into<String>) -> Self {
        self.record.created_at = Some(value.into());
        self
    }

    /// Builds the record
    pub fn build(self) -> ReceiptRecord {
        self.record
    }
}
