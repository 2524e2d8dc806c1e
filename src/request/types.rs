//! Fixed enumerations of the gateway schema.
//!
//! Every constrained string of the wire format is a sum type here; parsing a
//! string that is not a member yields a validation error naming the allowed
//! values, so nothing invalid ever reaches the field bag.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

macro_rules! gateway_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// All members, in schema order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The exact string transmitted on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(Error::validation(
                        $field,
                        format!(
                            "{:?} is not allowed; valid values are: {}",
                            other,
                            [$($wire),+].join(", "),
                        ),
                    )),
                }
            }
        }
    };
}

gateway_enum! {
    /// Requested operation kind (`CreditCardTxType.Type`).
    TransactionKind as "transaction type" {
        Sale => "sale",
        ForceTicket => "ForceTicket",
        PreAuth => "preAuth",
        PostAuth => "postAuth",
        Return => "Return",
        Credit => "Credit",
        Void => "Void",
    }
}

gateway_enum! {
    /// Why the card security code was or was not provided.
    CardCodeIndicator as "card code indicator" {
        NotProvided => "NOT_PROVIDED",
        Provided => "PROVIDED",
        Illegible => "ILLEGIBLE",
        NoImprint => "NO_IMPRINT",
        NotPresent => "NOT_PRESENT",
    }
}

gateway_enum! {
    /// Recurring-transaction flag (`TransactionDetails.Recurring`).
    Recurring as "transaction recurring" {
        Yes => "Yes",
        No => "No",
    }
}

gateway_enum! {
    /// Source of the transaction (`TransactionDetails.TransactionOrigin`).
    Origin as "transaction origin" {
        /// Email or Internet.
        Eci => "ECI",
        /// Mail order / telephone order.
        Moto => "MOTO",
        /// Face to face.
        Retail => "RETAIL",
    }
}

gateway_enum! {
    /// Type of the terminal performing the transaction.
    TerminalType as "terminal type" {
        /// Point-of-sale credit card terminal.
        Standalone => "Standalone",
        /// Electronic cash register or integrated POS system.
        Pos => "POS",
        /// Self-service station.
        Unattended => "Unattended",
        /// E-commerce, general, CRT, or other applications.
        Unspecified => "Unspecified",
    }
}

gateway_enum! {
    /// Plain Yes/No flag (tax exemption).
    YesNo as "yes/no flag" {
        Yes => "Yes",
        No => "No",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_transaction_kind_parses_back() {
        for kind in TransactionKind::ALL {
            assert_eq!(kind.as_str().parse::<TransactionKind>().unwrap(), *kind);
        }
        assert_eq!(TransactionKind::ALL.len(), 7);
    }

    #[test]
    fn bogus_transaction_kind_is_rejected() {
        let err = "bogus".parse::<TransactionKind>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("transaction type"), "{msg}");
        assert!(msg.contains("sale, ForceTicket, preAuth"), "{msg}");
    }

    #[test]
    fn origin_wire_strings_are_uppercase() {
        assert_eq!(Origin::Eci.as_str(), "ECI");
        assert_eq!(Origin::Moto.as_str(), "MOTO");
        assert_eq!("RETAIL".parse::<Origin>().unwrap(), Origin::Retail);
        assert!("retail".parse::<Origin>().is_err());
    }

    #[test]
    fn terminal_type_members_round_trip() {
        for tt in TerminalType::ALL {
            assert_eq!(tt.as_str().parse::<TerminalType>().unwrap(), *tt);
        }
        assert_eq!(TerminalType::Pos.as_str(), "POS");
    }

    #[test]
    fn card_code_indicator_members() {
        assert!("PROVIDED".parse::<CardCodeIndicator>().is_ok());
        assert!("MISSING".parse::<CardCodeIndicator>().is_err());
    }
}
