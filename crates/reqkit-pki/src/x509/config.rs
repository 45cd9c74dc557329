//! Request assembly configuration.

use reqkit_types::SignatureAlgorithm;
use reqkit_utils::asn1::StringKind;

/// How directory attribute values without a mandated string type are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryStringPolicy {
    /// PrintableString when every character fits its repertoire, else UTF8String.
    #[default]
    PreferPrintable,
    /// Always UTF8String.
    Utf8Only,
}

impl DirectoryStringPolicy {
    /// The string kind this policy picks for `value`.
    pub fn select(&self, value: &str) -> StringKind {
        match self {
            DirectoryStringPolicy::PreferPrintable if StringKind::Printable.accepts(value) => {
                StringKind::Printable
            }
            _ => StringKind::Utf8,
        }
    }
}

/// Certificate request assembly settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    /// Signature algorithm written when the request does not name one.
    /// Default: sha1WithRSAEncryption (compatibility mode).
    pub signature_algorithm: SignatureAlgorithm,
    /// Encoding policy for free-form directory strings.
    pub directory_string: DirectoryStringPolicy,
    /// Accept MD5 and SHA-1 based signature algorithms. Default: true.
    pub allow_legacy_algorithms: bool,
    /// Write an empty `[0]` attributes field into the request info. Default: false.
    pub emit_attributes: bool,
}

impl RequestConfig {
    /// Create a builder for request configuration.
    pub fn builder() -> RequestConfigBuilder {
        RequestConfigBuilder::default()
    }

    /// SHA-256 with RSA by default and legacy algorithms refused.
    pub fn modern() -> Self {
        Self::builder()
            .signature_algorithm(SignatureAlgorithm::Sha256WithRsa)
            .allow_legacy_algorithms(false)
            .build()
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for `RequestConfig`.
#[derive(Debug, Clone)]
pub struct RequestConfigBuilder {
    signature_algorithm: SignatureAlgorithm,
    directory_string: DirectoryStringPolicy,
    allow_legacy_algorithms: bool,
    emit_attributes: bool,
}

impl Default for RequestConfigBuilder {
    fn default() -> Self {
        Self {
            signature_algorithm: SignatureAlgorithm::Sha1WithRsa,
            directory_string: DirectoryStringPolicy::PreferPrintable,
            allow_legacy_algorithms: true,
            emit_attributes: false,
        }
    }
}

impl RequestConfigBuilder {
    pub fn signature_algorithm(mut self, alg: SignatureAlgorithm) -> Self {
        self.signature_algorithm = alg;
        self
    }

    pub fn directory_string(mut self, policy: DirectoryStringPolicy) -> Self {
        self.directory_string = policy;
        self
    }

    pub fn allow_legacy_algorithms(mut self, allow: bool) -> Self {
        self.allow_legacy_algorithms = allow;
        self
    }

    pub fn emit_attributes(mut self, emit: bool) -> Self {
        self.emit_attributes = emit;
        self
    }

    pub fn build(self) -> RequestConfig {
        RequestConfig {
            signature_algorithm: self.signature_algorithm,
            directory_string: self.directory_string,
            allow_legacy_algorithms: self.allow_legacy_algorithms,
            emit_attributes: self.emit_attributes,
        }
    }
}
