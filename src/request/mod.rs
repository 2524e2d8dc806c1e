//! Field accumulation and envelope rendering for one order.
//!
//! An [`OrderRequest`] is a mutable bag of section/key/value entries plus the
//! defaulted scalars that cross-cut sections (transaction kind, recurring
//! flag, origin, charge total). Setters only accumulate; the wire shape is
//! produced by [`OrderRequest::render`], which emits the sections in the
//! fixed order the gateway schema mandates and injects the derived fields.

mod render;
mod types;

pub use types::{CardCodeIndicator, Origin, Recurring, TerminalType, TransactionKind, YesNo};

use crate::error::Error;
use crate::Result;
use std::collections::BTreeMap;

/// A named group of request fields, rendered as one XML block.
///
/// Variant order is the mandated emission order of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    CreditCardTxType,
    CreditCardData,
    CreditCard3DSecure,
    Payment,
    TransactionDetails,
    Billing,
    Shipping,
}

impl Section {
    /// All sections, in the order they must appear inside `v1:Transaction`.
    pub const ORDER: &'static [Section] = &[
        Section::CreditCardTxType,
        Section::CreditCardData,
        Section::CreditCard3DSecure,
        Section::Payment,
        Section::TransactionDetails,
        Section::Billing,
        Section::Shipping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::CreditCardTxType => "CreditCardTxType",
            Section::CreditCardData => "CreditCardData",
            Section::CreditCard3DSecure => "CreditCard3DSecure",
            Section::Payment => "Payment",
            Section::TransactionDetails => "TransactionDetails",
            Section::Billing => "Billing",
            Section::Shipping => "Shipping",
        }
    }
}

/// Round a decimal amount to two places, as transmitted on the wire.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format an amount as the fixed two-decimal string the gateway expects.
fn money(value: f64) -> String {
    format!("{:.2}", round2(value))
}

/// Accumulating request state for a single transaction.
///
/// One instance holds one in-flight transaction; it is not safe to share
/// between concurrent submissions. [`GatewayClient::submit`] clears the bag
/// unconditionally after each exchange so no field carries over.
///
/// [`GatewayClient::submit`]: crate::GatewayClient::submit
#[derive(Debug, Clone)]
pub struct OrderRequest {
    bag: BTreeMap<Section, BTreeMap<String, String>>,
    kind: TransactionKind,
    recurring: Recurring,
    origin: Origin,
    charge_total: f64,
}

impl Default for OrderRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderRequest {
    pub fn new() -> Self {
        Self {
            bag: BTreeMap::new(),
            kind: TransactionKind::Sale,
            recurring: Recurring::No,
            origin: Origin::Eci,
            charge_total: 0.0,
        }
    }

    /// Store `value` under `section.key`, overwriting any earlier write.
    ///
    /// Raw accumulation escape hatch; the typed setters below perform
    /// whatever validation the schema requires before delegating here.
    pub fn set_field(
        &mut self,
        section: Section,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.bag
            .entry(section)
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Current value under `section.key`, if any.
    pub fn field(&self, section: Section, key: &str) -> Option<&str> {
        self.bag
            .get(&section)
            .and_then(|fields| fields.get(key))
            .map(String::as_str)
    }

    /// True when no field has been accumulated since the last reset.
    pub fn is_empty(&self) -> bool {
        self.bag.values().all(BTreeMap::is_empty)
    }

    /// Empty the field bag and restore the defaulted charge total.
    ///
    /// Transaction kind, recurring flag and origin are client configuration
    /// and persist across transactions.
    pub fn reset(&mut self) {
        self.bag.clear();
        self.charge_total = 0.0;
    }

    pub(crate) fn fields(&self, section: Section) -> Option<&BTreeMap<String, String>> {
        self.bag.get(&section)
    }

    // --- transaction scalars ------------------------------------------------

    /// Set the transaction type (`CreditCardTxType.Type`, default `sale`).
    pub fn set_transaction_kind(&mut self, kind: TransactionKind) -> &mut Self {
        self.kind = kind;
        self
    }

    pub fn transaction_kind(&self) -> TransactionKind {
        self.kind
    }

    /// Mark the transaction as recurring or not (required field, default No).
    pub fn set_recurring(&mut self, recurring: Recurring) -> &mut Self {
        self.recurring = recurring;
        self
    }

    pub fn recurring(&self) -> Recurring {
        self.recurring
    }

    /// Set the source of the transaction (required field, default ECI).
    pub fn set_origin(&mut self, origin: Origin) -> &mut Self {
        self.origin = origin;
        self
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Set the total transaction amount, including tax, VAT and shipping.
    ///
    /// Rounded to two decimal places before storage; the rounded value is
    /// what gets transmitted. For sale transactions the total may be 0.00.
    pub fn set_charge_total(&mut self, total: f64) -> &mut Self {
        self.charge_total = round2(total);
        self
    }

    pub fn charge_total(&self) -> f64 {
        self.charge_total
    }

    // --- CreditCardData -----------------------------------------------------

    /// Set the customer's card number, digits only (no separators).
    pub fn set_card_number(&mut self, number: impl Into<String>) -> &mut Self {
        self.set_field(Section::CreditCardData, "CardNumber", number)
    }

    /// Set the card expiration month as two digits, e.g. `07` for July.
    pub fn set_card_expiration_month(&mut self, month: &str) -> Result<&mut Self> {
        validate_expiry("card expiration month", month)?;
        Ok(self.set_field(Section::CreditCardData, "ExpMonth", month))
    }

    /// Set the card expiration year as two digits, e.g. `29` for 2029.
    pub fn set_card_expiration_year(&mut self, year: &str) -> Result<&mut Self> {
        validate_expiry("card expiration year", year)?;
        Ok(self.set_field(Section::CreditCardData, "ExpYear", year))
    }

    /// Set the 3- or 4-digit card security code (CVV/CVC/CSC).
    pub fn set_card_security_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.set_field(Section::CreditCardData, "CardCodeValue", code)
    }

    /// Indicate why the card code value was or was not provided.
    pub fn set_card_code_indicator(&mut self, indicator: CardCodeIndicator) -> &mut Self {
        self.set_field(Section::CreditCardData, "CardCodeIndicator", indicator.as_str())
    }

    /// Set raw track data from a card reader, replacing number and expiry.
    pub fn set_card_track_data(&mut self, track: impl Into<String>) -> &mut Self {
        self.set_field(Section::CreditCardData, "TrackData", track)
    }

    // --- CreditCard3DSecure -------------------------------------------------

    /// Two-digit PayerSecurityLevel returned by the Merchant Plug-in.
    pub fn set_payer_security_level(&mut self, level: impl Into<String>) -> &mut Self {
        self.set_field(Section::CreditCard3DSecure, "PayerSecurityLevel", level)
    }

    /// AuthenticationValue (MasterCard AAV / Visa CAVV) from the Merchant Plug-in.
    pub fn set_authentication_value(&mut self, value: impl Into<String>) -> &mut Self {
        self.set_field(Section::CreditCard3DSecure, "AuthenticationValue", value)
    }

    /// XID returned by the Merchant Plug-in.
    pub fn set_xid(&mut self, xid: impl Into<String>) -> &mut Self {
        self.set_field(Section::CreditCard3DSecure, "XID", xid)
    }

    // --- Payment ------------------------------------------------------------

    /// Sub total, not including tax, VAT, or shipping amounts.
    pub fn set_payment_sub_total(&mut self, sub_total: f64) -> &mut Self {
        self.set_field(Section::Payment, "SubTotal", money(sub_total))
    }

    /// Tax amount of the transaction.
    pub fn set_payment_tax(&mut self, tax: f64) -> &mut Self {
        self.set_field(Section::Payment, "Tax", money(tax))
    }

    /// VAT tax amount.
    pub fn set_payment_vat_tax(&mut self, vat_tax: f64) -> &mut Self {
        self.set_field(Section::Payment, "VATTax", money(vat_tax))
    }

    /// Shipping amount of the transaction.
    pub fn set_payment_shipping(&mut self, shipping: f64) -> &mut Self {
        self.set_field(Section::Payment, "Shipping", money(shipping))
    }

    // --- TransactionDetails -------------------------------------------------

    /// User ID of the user who performed the transaction (reporting only).
    pub fn set_user_id(&mut self, user_id: impl Into<String>) -> &mut Self {
        self.set_field(Section::TransactionDetails, "UserID", user_id)
    }

    /// Invoice number assigned by the merchant.
    pub fn set_invoice_number(&mut self, invoice: impl Into<String>) -> &mut Self {
        self.set_field(Section::TransactionDetails, "InvoiceNumber", invoice)
    }

    /// Merchant order ID, unique per store.
    ///
    /// At most 100 ASCII characters and must not contain `&`, `%` or `/`.
    /// When omitted the gateway assigns one.
    pub fn set_order_id(&mut self, order_id: &str) -> Result<&mut Self> {
        if order_id.len() > 100 {
            return Err(Error::validation(
                "order id",
                "cannot exceed 100 characters in length",
            ));
        }
        if order_id.contains(['&', '%', '/']) {
            return Err(Error::validation(
                "order id",
                "cannot contain the characters &, % or /",
            ));
        }
        Ok(self.set_field(Section::TransactionDetails, "OrderId", order_id))
    }

    /// Customer IP in dotted-quad form, used by the gateway for fraud checks.
    pub fn set_customer_ip(&mut self, ip: impl Into<String>) -> &mut Self {
        self.set_field(Section::TransactionDetails, "Ip", ip)
    }

    /// Six-digit reference number of a successful external authorization;
    /// required to map a ForceTicket transaction to it.
    pub fn set_reference_number(&mut self, reference: impl Into<String>) -> &mut Self {
        self.set_field(Section::TransactionDetails, "ReferenceNumber", reference)
    }

    /// TDate of the original transaction a Void refers to.
    ///
    /// Returned in the response to a successful transaction; a Void needs
    /// both the TDate and OrderId of the original.
    pub fn set_tdate(&mut self, tdate: impl Into<String>) -> &mut Self {
        self.set_field(Section::TransactionDetails, "TDate", tdate)
    }

    /// Whether the transaction is exempt from tax.
    pub fn set_tax_exempt(&mut self, exempt: YesNo) -> &mut Self {
        self.set_field(Section::TransactionDetails, "TaxExempt", exempt.as_str())
    }

    /// Type of the terminal performing the transaction.
    pub fn set_terminal_type(&mut self, terminal: TerminalType) -> &mut Self {
        self.set_field(Section::TransactionDetails, "TerminalType", terminal.as_str())
    }

    /// Purchase order number, if applicable.
    pub fn set_po_number(&mut self, po_number: impl Into<String>) -> &mut Self {
        self.set_field(Section::TransactionDetails, "PONumber", po_number)
    }

    /// Device fingerprint data for fraud detection.
    pub fn set_device_id(&mut self, device_id: impl Into<String>) -> &mut Self {
        self.set_field(Section::TransactionDetails, "DeviceID", device_id)
    }

    // --- Billing ------------------------------------------------------------

    /// Merchant's ID for the customer.
    pub fn set_billing_customer_id(&mut self, customer_id: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "CustomerID", customer_id)
    }

    pub fn set_billing_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "Name", name)
    }

    pub fn set_billing_company(&mut self, company: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "Company", company)
    }

    pub fn set_billing_address1(&mut self, address: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "Address1", address)
    }

    pub fn set_billing_address2(&mut self, address: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "Address2", address)
    }

    pub fn set_billing_city(&mut self, city: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "City", city)
    }

    pub fn set_billing_state(&mut self, state: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "State", state)
    }

    pub fn set_billing_zip(&mut self, zip: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "Zip", zip)
    }

    pub fn set_billing_country(&mut self, country: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "Country", country)
    }

    pub fn set_billing_phone(&mut self, phone: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "Phone", phone)
    }

    pub fn set_billing_fax(&mut self, fax: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "Fax", fax)
    }

    /// Customer email; required for emailed receipts.
    pub fn set_billing_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.set_field(Section::Billing, "Email", email)
    }

    // --- Shipping -----------------------------------------------------------

    /// Shipping method.
    pub fn set_shipping_type(&mut self, shipping_type: impl Into<String>) -> &mut Self {
        self.set_field(Section::Shipping, "Type", shipping_type)
    }

    pub fn set_shipping_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.set_field(Section::Shipping, "Name", name)
    }

    pub fn set_shipping_address1(&mut self, address: impl Into<String>) -> &mut Self {
        self.set_field(Section::Shipping, "Address1", address)
    }

    pub fn set_shipping_address2(&mut self, address: impl Into<String>) -> &mut Self {
        self.set_field(Section::Shipping, "Address2", address)
    }

    pub fn set_shipping_city(&mut self, city: impl Into<String>) -> &mut Self {
        self.set_field(Section::Shipping, "City", city)
    }

    pub fn set_shipping_state(&mut self, state: impl Into<String>) -> &mut Self {
        self.set_field(Section::Shipping, "State", state)
    }

    pub fn set_shipping_zip(&mut self, zip: impl Into<String>) -> &mut Self {
        self.set_field(Section::Shipping, "Zip", zip)
    }

    pub fn set_shipping_country(&mut self, country: impl Into<String>) -> &mut Self {
        self.set_field(Section::Shipping, "Country", country)
    }

    /// Merchant-defined integer code identifying the carrier.
    pub fn set_shipping_carrier(&mut self, carrier: impl Into<String>) -> &mut Self {
        self.set_field(Section::Shipping, "Carrier", carrier)
    }

    /// Transaction amount prior to calculating shipping.
    pub fn set_shipping_total(&mut self, total: f64) -> &mut Self {
        self.set_field(Section::Shipping, "Total", money(total))
    }

    /// Weight of the item shipped, in pounds or kilograms.
    pub fn set_shipping_weight(&mut self, weight: f64) -> &mut Self {
        self.set_field(Section::Shipping, "Weight", money(weight))
    }
}

/// Expiration fields always contain at most two digits.
fn validate_expiry(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() || value.len() > 2 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::validation(
            field,
            "must contain two digits, for example 07 for July",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_write_overwrites_earlier() {
        let mut req = OrderRequest::new();
        req.set_billing_name("First").set_billing_name("Second");
        assert_eq!(req.field(Section::Billing, "Name"), Some("Second"));
    }

    #[test]
    fn charge_total_rounds_to_two_places() {
        let mut req = OrderRequest::new();
        req.set_charge_total(3.123);
        assert_eq!(req.charge_total(), 3.12);
        req.set_charge_total(3.1);
        assert_eq!(req.charge_total(), 3.1);
        req.set_charge_total(3.0);
        assert_eq!(req.charge_total(), 3.0);
    }

    #[test]
    fn payment_amounts_stored_rounded() {
        let mut req = OrderRequest::new();
        req.set_payment_tax(0.005).set_payment_sub_total(10.0);
        assert_eq!(req.field(Section::Payment, "Tax"), Some("0.01"));
        assert_eq!(req.field(Section::Payment, "SubTotal"), Some("10.00"));
    }

    #[test]
    fn order_id_validation_rejects_before_storing() {
        let mut req = OrderRequest::new();
        assert!(req.set_order_id(&"x".repeat(101)).is_err());
        assert!(req.set_order_id("a&b").is_err());
        assert!(req.set_order_id("a%b").is_err());
        assert!(req.set_order_id("a/b").is_err());
        assert_eq!(req.field(Section::TransactionDetails, "OrderId"), None);

        let ok: String = "A1#_-@.:x ".repeat(10);
        assert_eq!(ok.len(), 100);
        req.set_order_id(&ok).unwrap();
        assert_eq!(
            req.field(Section::TransactionDetails, "OrderId"),
            Some(ok.as_str())
        );
    }

    #[test]
    fn expiry_must_be_short_and_numeric() {
        let mut req = OrderRequest::new();
        assert!(req.set_card_expiration_month("123").is_err());
        assert!(req.set_card_expiration_month("ab").is_err());
        assert!(req.set_card_expiration_month("").is_err());
        assert_eq!(req.field(Section::CreditCardData, "ExpMonth"), None);
        req.set_card_expiration_month("07").unwrap();
        req.set_card_expiration_year("9").unwrap();
        assert_eq!(req.field(Section::CreditCardData, "ExpMonth"), Some("07"));
        assert_eq!(req.field(Section::CreditCardData, "ExpYear"), Some("9"));
    }

    #[test]
    fn terminal_type_lands_under_its_own_key() {
        let mut req = OrderRequest::new();
        req.set_terminal_type(TerminalType::Pos);
        assert_eq!(
            req.field(Section::TransactionDetails, "TerminalType"),
            Some("POS")
        );
        assert_eq!(req.field(Section::TransactionDetails, "TaxExempt"), None);
    }

    #[test]
    fn reset_clears_bag_and_charge_total_only() {
        let mut req = OrderRequest::new();
        req.set_transaction_kind(TransactionKind::Void)
            .set_recurring(Recurring::Yes)
            .set_charge_total(12.34)
            .set_billing_name("Jane");
        req.reset();
        assert!(req.is_empty());
        assert_eq!(req.charge_total(), 0.0);
        assert_eq!(req.transaction_kind(), TransactionKind::Void);
        assert_eq!(req.recurring(), Recurring::Yes);
    }
}
