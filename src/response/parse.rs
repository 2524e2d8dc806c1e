//! Namespace-aware parse of the gateway SOAP response.
//!
//! The body of a gateway reply is one of three shapes, modelled as an
//! explicit sum type so the precedence rule (Fault beats order response
//! beats anything else) is structural: a SOAP `Fault`, an
//! `fdggwsapi:FDGGWSApiOrderResponse`, or something unrecognized.

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::collections::BTreeMap;

pub(crate) const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub(crate) const GATEWAY_NS: &str = "http://secure.linkpt.net/fdggwsapi/schemas_us/fdggwsapi";

/// Parsed shape of a SOAP body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapBody {
    /// SOAP `Fault`; carries the `faultstring` text verbatim.
    Fault { faultstring: String },
    /// Gateway order response payload.
    Order(OrderResponse),
    /// Well-formed XML that is neither a fault nor an order response.
    Unrecognized,
}

impl SoapBody {
    /// Business-level error message carried by this body, if any.
    ///
    /// A fault always yields its faultstring; an order response yields
    /// `"<TransactionResult>: <ErrorMessage>"` unless the result is exactly
    /// `APPROVED`; an unrecognized body yields nothing.
    pub fn error_message(&self) -> Option<String> {
        match self {
            SoapBody::Fault { faultstring } => Some(faultstring.clone()),
            SoapBody::Order(order) => order.declined_message(),
            SoapBody::Unrecognized => None,
        }
    }
}

/// Typed `FDGGWSApiOrderResponse` payload.
///
/// `transaction_result` and `error_message` drive classification; the rest
/// is reporting data the gateway returns alongside (approval code, TDate for
/// later voids, processor detail).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderResponse {
    pub transaction_result: Option<String>,
    pub error_message: Option<String>,
    pub approval_code: Option<String>,
    pub avs_response: Option<String>,
    pub order_id: Option<String>,
    pub tdate: Option<String>,
    pub transaction_id: Option<String>,
    pub transaction_time: Option<String>,
    pub processor_response_code: Option<String>,
    pub processor_response_message: Option<String>,
}

impl OrderResponse {
    /// True when the gateway reported exactly `APPROVED`.
    pub fn is_approved(&self) -> bool {
        self.transaction_result.as_deref() == Some("APPROVED")
    }

    fn declined_message(&self) -> Option<String> {
        if self.is_approved() {
            return None;
        }
        Some(format!(
            "{}: {}",
            self.transaction_result.as_deref().unwrap_or_default(),
            self.error_message.as_deref().unwrap_or_default(),
        ))
    }

    fn from_fields(mut fields: BTreeMap<String, String>) -> Self {
        OrderResponse {
            transaction_result: fields.remove("TransactionResult"),
            error_message: fields.remove("ErrorMessage"),
            approval_code: fields.remove("ApprovalCode"),
            avs_response: fields.remove("AVSResponse"),
            order_id: fields.remove("OrderId"),
            tdate: fields.remove("TDate"),
            transaction_id: fields.remove("TransactionID"),
            transaction_time: fields.remove("TransactionTime"),
            processor_response_code: fields.remove("ProcessorResponseCode"),
            processor_response_message: fields.remove("ProcessorResponseMessage"),
        }
    }
}

struct Frame {
    ns: Option<Vec<u8>>,
    local: Vec<u8>,
}

impl Frame {
    fn new(resolve: &ResolveResult, local: &[u8]) -> Self {
        let ns = match resolve {
            ResolveResult::Bound(ns) => Some(ns.0.to_vec()),
            _ => None,
        };
        Frame {
            ns,
            local: local.to_vec(),
        }
    }

    /// Unqualified elements are accepted; a bound namespace must match.
    fn in_ns(&self, expected: &str) -> bool {
        self.ns
            .as_deref()
            .map_or(true, |ns| ns == expected.as_bytes())
    }

    fn is(&self, expected: &str, ns: &str) -> bool {
        self.local == expected.as_bytes() && self.in_ns(ns)
    }
}

fn under_soap_body(path: &[Frame]) -> bool {
    path.len() >= 2
        && path[0].is("Envelope", SOAP_ENVELOPE_NS)
        && path[1].is("Body", SOAP_ENVELOPE_NS)
}

/// Parse the raw response body into its [`SoapBody`] shape.
///
/// Malformed XML is an `Err`; the classifier maps it to a generic
/// parse-failure message rather than letting it propagate.
pub fn parse_soap_body(raw: &str) -> Result<SoapBody, quick_xml::Error> {
    let mut reader = NsReader::from_str(raw);
    let mut path: Vec<Frame> = Vec::new();
    let mut saw_root = false;
    let mut saw_fault = false;
    let mut saw_order = false;
    let mut faultstring = String::new();
    let mut order_fields: BTreeMap<String, String> = BTreeMap::new();

    loop {
        let (resolve, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(start) => {
                saw_root = true;
                let frame = Frame::new(&resolve, start.local_name().as_ref());
                mark_body_child(&path, &frame, &mut saw_fault, &mut saw_order);
                path.push(frame);
            }
            Event::Empty(empty) => {
                saw_root = true;
                let frame = Frame::new(&resolve, empty.local_name().as_ref());
                mark_body_child(&path, &frame, &mut saw_fault, &mut saw_order);
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(text) => {
                let value = text.unescape()?;
                if !value.trim().is_empty() {
                    capture(&path, &value, &mut faultstring, &mut order_fields);
                }
            }
            Event::CData(cdata) => {
                let value = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                if !value.trim().is_empty() {
                    capture(&path, &value, &mut faultstring, &mut order_fields);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // A document with no root element (e.g. a plain-text maintenance page)
    // is not XML at all.
    if !saw_root {
        return Err(quick_xml::Error::UnexpectedEof(
            "no document root element".to_string(),
        ));
    }

    // A fault takes priority over any order payload in the same body.
    if saw_fault {
        Ok(SoapBody::Fault { faultstring })
    } else if saw_order {
        Ok(SoapBody::Order(OrderResponse::from_fields(order_fields)))
    } else {
        Ok(SoapBody::Unrecognized)
    }
}

/// Recognize `Fault` / `FDGGWSApiOrderResponse` as they open directly under
/// the SOAP body.
fn mark_body_child(path: &[Frame], frame: &Frame, saw_fault: &mut bool, saw_order: &mut bool) {
    if path.len() != 2 || !under_soap_body(path) {
        return;
    }
    if frame.is("Fault", SOAP_ENVELOPE_NS) {
        *saw_fault = true;
    } else if frame.is("FDGGWSApiOrderResponse", GATEWAY_NS) {
        *saw_order = true;
    }
}

/// Accumulate text one level below the fault / order-response element.
fn capture(
    path: &[Frame],
    value: &str,
    faultstring: &mut String,
    order_fields: &mut BTreeMap<String, String>,
) {
    if path.len() != 4 || !under_soap_body(path) {
        return;
    }
    if path[2].is("Fault", SOAP_ENVELOPE_NS) && path[3].local == b"faultstring" {
        faultstring.push_str(value);
    } else if path[2].is("FDGGWSApiOrderResponse", GATEWAY_NS) {
        let field = String::from_utf8_lossy(&path[3].local).into_owned();
        order_fields.entry(field).or_default().push_str(value);
    }
}
