//! Economic-validation wire protocol — v1 frozen binary format.
//!
//! This is the only bit-compatible contract in the system; the attribute
//! names and their order are shared with an external process and must not
//! change. Changes require a version bump plus new golden vectors in the
//! tests below.
//!
//! Frame layout (all integers big-endian):
//!
//! ```text
//! u32  frame length (bytes that follow)
//! u8   protocol version        (PROTOCOL_VERSION)
//! u8   message kind            (0x01 request, 0x02 response)
//!
//! request payload, one per attribute in WIRE_ORDER:
//!   u16  identifier length
//!   ..   identifier bytes (UTF-8)
//!
//! response payload:
//!   u8   application status    (0x00 = ok)
//!   u8×8 verdict bytes in WIRE_ORDER (0x00 clean, 0x01 flagged)
//! ```

use std::collections::BTreeMap;

/// Current protocol version. Increment for breaking changes.
pub const PROTOCOL_VERSION: u8 = 1;

/// Application-level success status in a response frame.
pub const STATUS_OK: u8 = 0x00;

const KIND_REQUEST: u8 = 0x01;
const KIND_RESPONSE: u8 = 0x02;

/// Upper bound on a single frame; anything larger is treated as malformed.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// The fixed set of remotely checked attributes. Wire names and order are
/// frozen; see [`RemoteAttribute::WIRE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RemoteAttribute {
    Passport,
    Registration,
    Residence,
    PresenceOfChildren,
    Job,
    Salary,
    BridePrice,
    Saving,
}

impl RemoteAttribute {
    pub const WIRE_ORDER: [RemoteAttribute; 8] = [
        RemoteAttribute::Passport,
        RemoteAttribute::Registration,
        RemoteAttribute::Residence,
        RemoteAttribute::PresenceOfChildren,
        RemoteAttribute::Job,
        RemoteAttribute::Salary,
        RemoteAttribute::BridePrice,
        RemoteAttribute::Saving,
    ];

    pub const fn wire_name(self) -> &'static str {
        match self {
            RemoteAttribute::Passport => "passport",
            RemoteAttribute::Registration => "registration",
            RemoteAttribute::Residence => "residence",
            RemoteAttribute::PresenceOfChildren => "presence_of_children",
            RemoteAttribute::Job => "job",
            RemoteAttribute::Salary => "salary",
            RemoteAttribute::BridePrice => "bride_price",
            RemoteAttribute::Saving => "saving",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::WIRE_ORDER
            .into_iter()
            .find(|attribute| attribute.wire_name() == name)
    }
}

/// Opaque per-attribute identifiers sent to the validation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    refs: BTreeMap<RemoteAttribute, String>,
}

impl ValidationRequest {
    /// Request referencing one applicant across all checked attributes.
    pub fn for_applicant(id: &str) -> Self {
        let refs = RemoteAttribute::WIRE_ORDER
            .into_iter()
            .map(|attribute| (attribute, format!("{id}/{}", attribute.wire_name())))
            .collect();
        Self { refs }
    }

    pub fn reference(&self, attribute: RemoteAttribute) -> &str {
        self.refs
            .get(&attribute)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// One boolean per checked attribute; `true` means the remote validator
/// flagged an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    flags: BTreeMap<RemoteAttribute, bool>,
}

impl ValidationVerdict {
    /// Verdict with every attribute clean.
    pub fn clean() -> Self {
        let flags = RemoteAttribute::WIRE_ORDER
            .into_iter()
            .map(|attribute| (attribute, false))
            .collect();
        Self { flags }
    }

    pub fn set(&mut self, attribute: RemoteAttribute, flagged: bool) {
        self.flags.insert(attribute, flagged);
    }

    pub fn flagged(&self, attribute: RemoteAttribute) -> bool {
        self.flags.get(&attribute).copied().unwrap_or(false)
    }

    pub fn flagged_attributes(&self) -> impl Iterator<Item = RemoteAttribute> + '_ {
        RemoteAttribute::WIRE_ORDER
            .into_iter()
            .filter(|attribute| self.flagged(*attribute))
    }
}

/// Decode failures; each represents a frame the peer should never send.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    #[error("frame truncated")]
    Truncated,
    #[error("frame of {len} bytes exceeds the {MAX_FRAME_LEN}-byte limit")]
    Oversized { len: usize },
    #[error("unsupported protocol version {found}")]
    Version { found: u8 },
    #[error("unexpected message kind {found:#04x}")]
    Kind { found: u8 },
    #[error("invalid verdict byte {found:#04x}")]
    Verdict { found: u8 },
    #[error("attribute identifier is not valid UTF-8")]
    BadIdentifier,
    #[error("{extra} trailing bytes after payload")]
    TrailingBytes { extra: usize },
}

/// Encode a request as a full frame, length prefix included.
pub fn encode_request(request: &ValidationRequest) -> Vec<u8> {
    let mut payload = vec![PROTOCOL_VERSION, KIND_REQUEST];
    for attribute in RemoteAttribute::WIRE_ORDER {
        let reference = request.reference(attribute).as_bytes();
        payload.extend_from_slice(&(reference.len() as u16).to_be_bytes());
        payload.extend_from_slice(reference);
    }
    frame(payload)
}

/// Encode a response as a full frame, length prefix included.
pub fn encode_response(status: u8, verdict: &ValidationVerdict) -> Vec<u8> {
    let mut payload = vec![PROTOCOL_VERSION, KIND_RESPONSE, status];
    for attribute in RemoteAttribute::WIRE_ORDER {
        payload.push(u8::from(verdict.flagged(attribute)));
    }
    frame(payload)
}

fn frame(payload: Vec<u8>) -> Vec<u8> {
    let mut framed = Vec::with_capacity(payload.len() + 4);
    framed.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    framed.extend_from_slice(&payload);
    framed
}

/// Decode a request frame body (everything after the length prefix).
pub fn decode_request(body: &[u8]) -> Result<ValidationRequest, WireError> {
    let mut cursor = check_header(body, KIND_REQUEST)?;
    let mut refs = BTreeMap::new();
    for attribute in RemoteAttribute::WIRE_ORDER {
        let len = read_u16(&mut cursor)? as usize;
        if cursor.len() < len {
            return Err(WireError::Truncated);
        }
        let (bytes, rest) = cursor.split_at(len);
        let reference =
            std::str::from_utf8(bytes).map_err(|_| WireError::BadIdentifier)?;
        refs.insert(attribute, reference.to_string());
        cursor = rest;
    }
    check_consumed(cursor)?;
    Ok(ValidationRequest { refs })
}

/// Decode a response frame body, returning the application status and the
/// per-attribute verdicts.
pub fn decode_response(body: &[u8]) -> Result<(u8, ValidationVerdict), WireError> {
    let mut cursor = check_header(body, KIND_RESPONSE)?;
    let status = read_u8(&mut cursor)?;
    let mut verdict = ValidationVerdict::clean();
    for attribute in RemoteAttribute::WIRE_ORDER {
        match read_u8(&mut cursor)? {
            0x00 => {}
            0x01 => verdict.set(attribute, true),
            found => return Err(WireError::Verdict { found }),
        }
    }
    check_consumed(cursor)?;
    Ok((status, verdict))
}

fn check_header(body: &[u8], expected_kind: u8) -> Result<&[u8], WireError> {
    if body.len() > MAX_FRAME_LEN {
        return Err(WireError::Oversized { len: body.len() });
    }
    let mut cursor = body;
    let version = read_u8(&mut cursor)?;
    if version != PROTOCOL_VERSION {
        return Err(WireError::Version { found: version });
    }
    let kind = read_u8(&mut cursor)?;
    if kind != expected_kind {
        return Err(WireError::Kind { found: kind });
    }
    Ok(cursor)
}

fn check_consumed(cursor: &[u8]) -> Result<(), WireError> {
    if cursor.is_empty() {
        Ok(())
    } else {
        Err(WireError::TrailingBytes {
            extra: cursor.len(),
        })
    }
}

fn read_u8(cursor: &mut &[u8]) -> Result<u8, WireError> {
    let (&byte, rest) = cursor.split_first().ok_or(WireError::Truncated)?;
    *cursor = rest;
    Ok(byte)
}

fn read_u16(cursor: &mut &[u8]) -> Result<u16, WireError> {
    if cursor.len() < 2 {
        return Err(WireError::Truncated);
    }
    let (bytes, rest) = cursor.split_at(2);
    *cursor = rest;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}
