//! SOAP 1.1 envelope rendering.
//!
//! The gateway schema requires one `fdggwsapi:FDGGWSApiOrderRequest` wrapping
//! one `v1:Transaction`, whose sections appear in a fixed order regardless of
//! the order fields were accumulated. Sections with no fields are omitted
//! entirely; sections owning a derived field are always present.

use super::{OrderRequest, Section};
use quick_xml::escape::escape;
use std::collections::BTreeMap;

const ENVELOPE_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
<SOAP-ENV:Header />
<SOAP-ENV:Body>
<fdggwsapi:FDGGWSApiOrderRequest xmlns:v1="http://secure.linkpt.net/fdggwsapi/schemas_us/v1" xmlns:fdggwsapi="http://secure.linkpt.net/fdggwsapi/schemas_us/fdggwsapi">
<v1:Transaction>
"#;

const ENVELOPE_TAIL: &str = r#"</v1:Transaction>
</fdggwsapi:FDGGWSApiOrderRequest>
</SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#;

impl OrderRequest {
    /// Render the accumulated fields into the order envelope.
    ///
    /// Derived fields are injected here and override any same-named bag
    /// entry: `CreditCardTxType.Type`, `Payment.ChargeTotal` (fixed
    /// two-decimal string), `TransactionDetails.Recurring` and
    /// `TransactionDetails.TransactionOrigin`.
    ///
    /// All values are XML-escaped. The reference integration interpolated
    /// text verbatim; escaping is a deliberate correctness divergence.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(1024);
        out.push_str(ENVELOPE_HEAD);
        for &section in Section::ORDER {
            self.render_section(&mut out, section);
        }
        out.push_str(ENVELOPE_TAIL);
        out
    }

    fn render_section(&self, out: &mut String, section: Section) {
        let mut fields: BTreeMap<String, String> = self
            .fields(section)
            .cloned()
            .unwrap_or_default();

        match section {
            Section::CreditCardTxType => {
                fields.insert("Type".into(), self.kind.as_str().into());
            }
            Section::Payment => {
                fields.insert("ChargeTotal".into(), format!("{:.2}", self.charge_total));
            }
            Section::TransactionDetails => {
                fields.insert("Recurring".into(), self.recurring.as_str().into());
                fields.insert("TransactionOrigin".into(), self.origin.as_str().into());
            }
            _ => {}
        }

        if fields.is_empty() {
            return;
        }

        let name = section.as_str();
        out.push_str("<v1:");
        out.push_str(name);
        out.push_str(">\n");
        for (key, value) in &fields {
            out.push_str("<v1:");
            out.push_str(key);
            out.push('>');
            out.push_str(&escape(value));
            out.push_str("</v1:");
            out.push_str(key);
            out.push_str(">\n");
        }
        out.push_str("</v1:");
        out.push_str(name);
        out.push_str(">\n");
    }
}
