//! DNS message construction and answer decoding.

use dnsfs_types::RecordType;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::Name;

use crate::error::ResolveError;

/// Map our fixed record-type enumeration onto the wire-level type code.
pub fn wire_record_type(rtype: RecordType) -> hickory_proto::rr::RecordType {
    match rtype {
        RecordType::A => hickory_proto::rr::RecordType::A,
        RecordType::AAAA => hickory_proto::rr::RecordType::AAAA,
        RecordType::CNAME => hickory_proto::rr::RecordType::CNAME,
        RecordType::MX => hickory_proto::rr::RecordType::MX,
        RecordType::TXT => hickory_proto::rr::RecordType::TXT,
        RecordType::NS => hickory_proto::rr::RecordType::NS,
        RecordType::SOA => hickory_proto::rr::RecordType::SOA,
        RecordType::SRV => hickory_proto::rr::RecordType::SRV,
        RecordType::PTR => hickory_proto::rr::RecordType::PTR,
    }
}

/// Build the wire bytes of a recursion-desired standard query for `name`.
///
/// A trailing dot marks the name fully qualified; the encoded label
/// sequence is the same either way, so both directory names and dot-names
/// query the identical owner name.
pub fn build_query(name: &str, rtype: RecordType) -> Result<Vec<u8>, ResolveError> {
    let qname = Name::from_ascii(name)?;

    let mut message = Message::new();
    message.set_id(rand::random());
    message.set_message_type(MessageType::Query);
    message.set_op_code(OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(qname, wire_record_type(rtype)));

    Ok(message.to_vec()?)
}

/// One answer record, reduced to the textual form a directory entry shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    /// Canonical textual form of the record data (e.g. `93.184.216.34`).
    pub text: String,
}

/// The decoded answer section of one response, plus its cache lifetime.
#[derive(Debug, Clone, Default)]
pub struct AnswerSet {
    /// Records of the queried type, in resolver order.
    pub records: Vec<AnswerRecord>,
    /// Minimum TTL over the included records; 0 when the set is empty.
    pub ttl: u32,
}

impl AnswerSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decode a wire-format response into the answer records of the queried type.
///
/// Responses with a non-success rcode are errors; an empty answer section
/// is not (the caller decides what an empty set means).
pub fn decode_answers(bytes: &[u8], rtype: RecordType) -> Result<AnswerSet, ResolveError> {
    let message = Message::from_vec(bytes)?;

    if message.response_code() != ResponseCode::NoError {
        return Err(ResolveError::ErrorResponse {
            rcode: format!("{:?}", message.response_code()),
        });
    }

    let wanted = wire_record_type(rtype);
    let mut records = Vec::new();
    let mut ttl: Option<u32> = None;
    for record in message.answers() {
        if record.record_type() != wanted {
            continue;
        }
        let Some(data) = record.data() else {
            continue;
        };
        ttl = Some(match ttl {
            Some(t) => t.min(record.ttl()),
            None => record.ttl(),
        });
        records.push(AnswerRecord {
            text: data.to_string(),
        });
    }

    Ok(AnswerSet {
        records,
        ttl: ttl.unwrap_or(0),
    })
}
