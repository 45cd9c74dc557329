//! X.509 Subject distinguished name: build, encode and parse.

use std::fmt;

use reqkit_types::CsrError;
use reqkit_utils::asn1::{tags, Decoder, Node};
use tracing::{debug, trace};

use super::attribute::{AttributeType, AttributeValue};
use super::config::DirectoryStringPolicy;

/// The seven plain-text fields of the convenience constructor.
///
/// Empty fields are left out of the Subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectFields {
    pub common_name: String,
    pub email: String,
    pub organization: String,
    pub locality: String,
    pub state: String,
    pub country: String,
    pub organizational_unit: String,
}

/// An ordered list of attribute values, one RDN each.
///
/// Order is significant and duplicate attribute types are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subject {
    attributes: Vec<AttributeValue>,
}

impl Subject {
    /// Build from the seven plain-text fields in canonical order
    /// C, ST, L, O, OU, CN, emailAddress, skipping empty ones.
    ///
    /// Free-form values follow the directory-string policy of the request
    /// they end up in.
    pub fn new(
        common_name: &str,
        email: &str,
        organization: &str,
        locality: &str,
        state: &str,
        country: &str,
        organizational_unit: &str,
    ) -> Result<Self, CsrError> {
        let fields = SubjectFields {
            common_name: common_name.to_string(),
            email: email.to_string(),
            organization: organization.to_string(),
            locality: locality.to_string(),
            state: state.to_string(),
            country: country.to_string(),
            organizational_unit: organizational_unit.to_string(),
        };
        Self::canonical(&fields, None)
    }

    /// Build from `fields` in canonical order, encoding free-form values per `policy`.
    pub fn from_fields(
        fields: &SubjectFields,
        policy: DirectoryStringPolicy,
    ) -> Result<Self, CsrError> {
        Self::canonical(fields, Some(policy))
    }

    fn canonical(
        fields: &SubjectFields,
        policy: Option<DirectoryStringPolicy>,
    ) -> Result<Self, CsrError> {
        let ordered = [
            (AttributeType::Country, &fields.country),
            (AttributeType::StateOrProvince, &fields.state),
            (AttributeType::Locality, &fields.locality),
            (AttributeType::Organization, &fields.organization),
            (AttributeType::OrganizationalUnit, &fields.organizational_unit),
            (AttributeType::CommonName, &fields.common_name),
            (AttributeType::EmailAddress, &fields.email),
        ];
        let attributes = ordered
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(attr_type, value)| match policy {
                Some(policy) => AttributeValue::with_policy(attr_type, value, policy),
                None => AttributeValue::new(attr_type, value),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { attributes })
    }

    /// Append `value` under `attr_type` using the default policy.
    pub fn push(&mut self, attr_type: AttributeType, value: &str) -> Result<(), CsrError> {
        self.attributes.push(AttributeValue::new(attr_type, value)?);
        Ok(())
    }

    /// Append an already built attribute value.
    pub fn push_value(&mut self, attr: AttributeValue) {
        self.attributes.push(attr);
    }

    /// Chaining form of [`Subject::push`].
    pub fn with(mut self, attr_type: AttributeType, value: &str) -> Result<Self, CsrError> {
        self.push(attr_type, value)?;
        Ok(self)
    }

    pub fn attributes(&self) -> &[AttributeValue] {
        &self.attributes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributeValue> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// First value recorded for `attr_type`.
    pub fn get(&self, attr_type: AttributeType) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.attr_type() == attr_type)
            .map(AttributeValue::value)
    }

    /// Every value recorded for `attr_type`, in order.
    pub fn get_all(&self, attr_type: AttributeType) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.attr_type() == attr_type)
            .map(AttributeValue::value)
            .collect()
    }

    pub fn common_name(&self) -> Option<&str> {
        self.get(AttributeType::CommonName)
    }

    pub fn email(&self) -> Option<&str> {
        self.get(AttributeType::EmailAddress)
    }

    pub fn organization(&self) -> Option<&str> {
        self.get(AttributeType::Organization)
    }

    pub fn locality(&self) -> Option<&str> {
        self.get(AttributeType::Locality)
    }

    pub fn state(&self) -> Option<&str> {
        self.get(AttributeType::StateOrProvince)
    }

    pub fn country(&self) -> Option<&str> {
        self.get(AttributeType::Country)
    }

    pub fn organizational_unit(&self) -> Option<&str> {
        self.get(AttributeType::OrganizationalUnit)
    }

    /// Apply `policy` to values still on the default policy.
    pub(crate) fn resolve_policy(&mut self, policy: DirectoryStringPolicy) {
        for attr in &mut self.attributes {
            attr.resolve_policy(policy);
        }
    }

    /// `SEQUENCE OF RelativeDistinguishedName`
    pub fn to_node(&self) -> Node {
        Node::sequence(self.attributes.iter().map(AttributeValue::to_node).collect())
    }

    pub fn to_der(&self) -> Vec<u8> {
        self.to_node().to_der()
    }

    pub fn encoded_len(&self) -> usize {
        self.to_node().encoded_len()
    }

    /// Parse a Name at the cursor, leaving it just past the Name.
    ///
    /// A Name whose declared content runs past the buffer fails with
    /// `TruncatedInput`; an RDN that runs past the Name content fails with
    /// `MalformedLength`.
    pub fn parse(dec: &mut Decoder) -> Result<Self, CsrError> {
        let start = dec.position();
        dec.expect_tag(tags::SEQUENCE)?;
        let (content_len, _) = dec.read_length()?;
        let mut body = dec.limit(content_len)?;

        let mut attributes = Vec::new();
        while !body.is_empty() {
            let rdn_start = body.position();
            let attr = AttributeValue::parse(&mut body).map_err(|e| match e {
                // all Name content is in the buffer, so this is an RDN overrunning it
                CsrError::TruncatedInput { .. } => CsrError::MalformedLength,
                other => other,
            })?;
            trace!(
                offset = rdn_start,
                len = body.position() - rdn_start,
                rdn = %attr,
                "parsed RDN"
            );
            attributes.push(attr);
        }
        dec.skip(content_len)?;

        let subject = Self { attributes };
        debug!(
            offset = start,
            len = dec.position() - start,
            rdns = subject.len(),
            "parsed subject"
        );
        Ok(subject)
    }

    /// Parse a Name at `offset` in `data`; returns it with the offset just past it.
    pub fn from_der_at(data: &[u8], offset: usize) -> Result<(Self, usize), CsrError> {
        let mut dec = Decoder::at(data, offset);
        let subject = Self::parse(&mut dec)?;
        Ok((subject, dec.position()))
    }

    /// Parse a complete DER Name, rejecting trailing bytes.
    pub fn from_der(data: &[u8]) -> Result<Self, CsrError> {
        let (subject, end) = Self::from_der_at(data, 0)?;
        if end != data.len() {
            return Err(CsrError::MalformedLength);
        }
        Ok(subject)
    }
}

impl<'a> IntoIterator for &'a Subject {
    type Item = &'a AttributeValue;
    type IntoIter = std::slice::Iter<'a, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.attributes.iter().map(|a| a.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}
