//! Enumerations stored inside product, event, booking and order records.
//!
//! All of them serialize as lowercase strings, which is also how they appear
//! in query strings (`?category=red`) and admin form posts.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Language;

/// Error returned when a string does not name a known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $code:literal, $pl:literal, $en:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Lowercase wire code.
            #[must_use]
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Human-readable label in the given language.
            #[must_use]
            pub const fn label(self, lang: Language) -> &'static str {
                match (self, lang) {
                    $(
                        (Self::$variant, Language::Pl) => $pl,
                        (Self::$variant, Language::En) => $en,
                    )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($code => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// Shop category of a product.
    ProductCategory, "product category" {
        Red => "red", "Czerwone", "Red";
        White => "white", "Białe", "White";
        Rose => "rose", "Różowe", "Rosé";
        Sparkling => "sparkling", "Musujące", "Sparkling";
        Bundle => "bundle", "Zestawy", "Bundles";
    }
}

string_enum! {
    /// Kind of event, used for the tabs on the events page and for recommendations.
    EventType, "event type" {
        Tasting => "tasting", "Degustacja", "Tasting";
        Dinner => "dinner", "Kolacja", "Dinner";
        Workshop => "workshop", "Warsztaty", "Workshop";
        Tour => "tour", "Zwiedzanie", "Tour";
        Special => "special", "Wydarzenie specjalne", "Special event";
    }
}

string_enum! {
    /// Lifecycle of a booking. Bookings are created confirmed.
    BookingStatus, "booking status" {
        Confirmed => "confirmed", "Potwierdzona", "Confirmed";
        Cancelled => "cancelled", "Anulowana", "Cancelled";
    }
}

string_enum! {
    /// Payment state shared by bookings and orders.
    PaymentStatus, "payment status" {
        Pending => "pending", "Oczekuje", "Pending";
        Paid => "paid", "Opłacone", "Paid";
        Free => "free", "Bezpłatne", "Free";
    }
}

string_enum! {
    /// Fulfillment state of a wine order.
    OrderStatus, "order status" {
        Pending => "pending", "Oczekuje", "Pending";
        Processing => "processing", "W realizacji", "Processing";
        Shipped => "shipped", "Wysłane", "Shipped";
        Delivered => "delivered", "Dostarczone", "Delivered";
        Cancelled => "cancelled", "Anulowane", "Cancelled";
    }
}

string_enum! {
    /// Payment method picked in step 2 of checkout. Nothing is charged.
    PaymentMethod, "payment method" {
        Card => "card", "Karta płatnicza", "Credit card";
        Transfer => "transfer", "Przelew bankowy", "Bank transfer";
        Cod => "cod", "Płatność przy odbiorze", "Cash on delivery";
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::Card
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_parse_back() {
        for category in ProductCategory::ALL {
            assert_eq!(category.code().parse::<ProductCategory>().unwrap(), *category);
        }
        for kind in EventType::ALL {
            assert_eq!(kind.to_string().parse::<EventType>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let err = "orange".parse::<ProductCategory>().unwrap_err();
        assert_eq!(err.to_string(), "invalid product category: orange");
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&PaymentStatus::Free).unwrap(), "\"free\"");
        let status: OrderStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(status, OrderStatus::Shipped);
    }

    #[test]
    fn test_labels_are_localized() {
        assert_eq!(EventType::Tasting.label(Language::Pl), "Degustacja");
        assert_eq!(EventType::Tasting.label(Language::En), "Tasting");
    }
}
