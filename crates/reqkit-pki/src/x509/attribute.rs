//! Directory attribute types and single-valued RDN nodes.

use std::fmt;
use std::str::FromStr;

use reqkit_types::CsrError;
use reqkit_utils::asn1::{Decoder, Node, StringKind};
use reqkit_utils::oid::{known, Oid};

use super::config::DirectoryStringPolicy;

/// Attribute types a Subject may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    CommonName,
    Surname,
    SerialNumber,
    Country,
    Locality,
    StateOrProvince,
    StreetAddress,
    Organization,
    OrganizationalUnit,
    Title,
    GivenName,
    EmailAddress,
    DomainComponent,
}

impl AttributeType {
    pub const ALL: [AttributeType; 13] = [
        AttributeType::CommonName,
        AttributeType::Surname,
        AttributeType::SerialNumber,
        AttributeType::Country,
        AttributeType::Locality,
        AttributeType::StateOrProvince,
        AttributeType::StreetAddress,
        AttributeType::Organization,
        AttributeType::OrganizationalUnit,
        AttributeType::Title,
        AttributeType::GivenName,
        AttributeType::EmailAddress,
        AttributeType::DomainComponent,
    ];

    pub fn oid(&self) -> Oid {
        match self {
            AttributeType::CommonName => known::common_name(),
            AttributeType::Surname => known::surname(),
            AttributeType::SerialNumber => known::serial_number_attr(),
            AttributeType::Country => known::country_name(),
            AttributeType::Locality => known::locality_name(),
            AttributeType::StateOrProvince => known::state_or_province_name(),
            AttributeType::StreetAddress => known::street_address(),
            AttributeType::Organization => known::organization_name(),
            AttributeType::OrganizationalUnit => known::organizational_unit_name(),
            AttributeType::Title => known::title(),
            AttributeType::GivenName => known::given_name(),
            AttributeType::EmailAddress => known::email_address(),
            AttributeType::DomainComponent => known::domain_component(),
        }
    }

    /// Look up the attribute type registered for `oid`.
    pub fn from_oid(oid: &Oid) -> Result<Self, CsrError> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.oid() == *oid)
            .ok_or_else(|| CsrError::UnsupportedAttributeType(oid.to_dot_string()))
    }

    /// Short name used in display form and `/K=V` subject strings.
    pub fn short_name(&self) -> &'static str {
        match self {
            AttributeType::CommonName => "CN",
            AttributeType::Surname => "SN",
            AttributeType::SerialNumber => "serialNumber",
            AttributeType::Country => "C",
            AttributeType::Locality => "L",
            AttributeType::StateOrProvince => "ST",
            AttributeType::StreetAddress => "street",
            AttributeType::Organization => "O",
            AttributeType::OrganizationalUnit => "OU",
            AttributeType::Title => "title",
            AttributeType::GivenName => "GN",
            AttributeType::EmailAddress => "emailAddress",
            AttributeType::DomainComponent => "DC",
        }
    }

    /// The string type mandated for this attribute, if any.
    ///
    /// emailAddress and domainComponent are IA5String; countryName and
    /// serialNumber are PrintableString.
    pub fn fixed_kind(&self) -> Option<StringKind> {
        match self {
            AttributeType::EmailAddress | AttributeType::DomainComponent => Some(StringKind::Ia5),
            AttributeType::Country | AttributeType::SerialNumber => Some(StringKind::Printable),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for AttributeType {
    type Err = CsrError;

    /// Accepts a short name (case-insensitive) or a dotted OID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(t) = Self::ALL
            .iter()
            .copied()
            .find(|t| t.short_name().eq_ignore_ascii_case(s))
        {
            return Ok(t);
        }
        match s.parse::<Oid>() {
            Ok(oid) => Self::from_oid(&oid),
            Err(_) => Err(CsrError::UnsupportedAttributeType(s.to_string())),
        }
    }
}

/// One AttributeTypeAndValue, encoded as its own single-member RDN.
///
/// Equality compares type, string kind and value.
#[derive(Debug, Clone)]
pub struct AttributeValue {
    attr_type: AttributeType,
    kind: StringKind,
    value: String,
    // kind came from the default policy and may be re-chosen by a request config
    policy_default: bool,
}

impl AttributeValue {
    /// Build with the default directory-string policy.
    ///
    /// A request built from this value re-selects the string kind with
    /// its configured [`DirectoryStringPolicy`].
    pub fn new(attr_type: AttributeType, value: &str) -> Result<Self, CsrError> {
        let mut attr = Self::with_policy(attr_type, value, DirectoryStringPolicy::default())?;
        attr.policy_default = attr_type.fixed_kind().is_none();
        Ok(attr)
    }

    /// Build, choosing the string type from the attribute or `policy`.
    pub fn with_policy(
        attr_type: AttributeType,
        value: &str,
        policy: DirectoryStringPolicy,
    ) -> Result<Self, CsrError> {
        let kind = attr_type
            .fixed_kind()
            .unwrap_or_else(|| policy.select(value));
        Self::with_kind(attr_type, value, kind)
    }

    /// Build with an explicit string type.
    pub fn with_kind(
        attr_type: AttributeType,
        value: &str,
        kind: StringKind,
    ) -> Result<Self, CsrError> {
        kind.validate(value)?;
        Ok(Self {
            attr_type,
            kind,
            value: value.to_string(),
            policy_default: false,
        })
    }

    /// Build from an attribute OID, failing for types outside the table.
    pub fn from_oid(oid: &Oid, value: &str, kind: Option<StringKind>) -> Result<Self, CsrError> {
        let attr_type = AttributeType::from_oid(oid)?;
        match kind {
            Some(kind) => Self::with_kind(attr_type, value, kind),
            None => Self::new(attr_type, value),
        }
    }

    pub fn attr_type(&self) -> AttributeType {
        self.attr_type
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// `SET { SEQUENCE { OID, string } }`
    pub fn to_node(&self) -> Node {
        let atav = Node::sequence(vec![
            Node::oid(&self.attr_type.oid().to_der_value()),
            Node::String {
                kind: self.kind,
                value: self.value.clone(),
            },
        ]);
        Node::set(vec![atav])
    }

    pub fn encoded_len(&self) -> usize {
        self.to_node().encoded_len()
    }

    /// Re-select a default-policy string kind with `policy`. Explicit
    /// kinds and policies are kept.
    pub(crate) fn resolve_policy(&mut self, policy: DirectoryStringPolicy) {
        if self.policy_default {
            self.kind = policy.select(&self.value);
            self.policy_default = false;
        }
    }

    /// Parse one RDN at the cursor.
    ///
    /// The SET must hold exactly one AttributeTypeAndValue whose encoding
    /// fills it, and the ATAV must hold nothing after its value.
    pub fn parse(dec: &mut Decoder) -> Result<Self, CsrError> {
        let mut set = dec.read_set()?;
        let mut atav = set.read_sequence()?;
        if !set.is_empty() {
            return Err(CsrError::MalformedLength);
        }

        let oid = Oid::from_der_value(atav.read_oid()?)?;
        let attr_type = AttributeType::from_oid(&oid)?;
        let (kind, value) = atav.read_string()?;
        if !atav.is_empty() {
            return Err(CsrError::MalformedLength);
        }

        Ok(Self {
            attr_type,
            kind,
            value,
            policy_default: false,
        })
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        self.attr_type == other.attr_type && self.kind == other.kind && self.value == other.value
    }
}

impl Eq for AttributeValue {}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.attr_type, self.value)
    }
}
