//! Form validation failures shown to customers.

use crate::types::Language;

/// A problem with what the customer typed into the booking or checkout form.
///
/// `Display` is meant for logs; pages show [`ValidationError::message`] in
/// the visitor's language.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name, email and phone are required")]
    MissingContact,
    #[error("email address is malformed")]
    InvalidEmail,
    #[error("shipping address is incomplete")]
    IncompleteShipping,
    #[error("billing address is incomplete")]
    IncompleteBilling,
    #[error("card details are incomplete")]
    IncompleteCard,
    #[error("consent to data processing is required")]
    ConsentRequired,
    #[error("booking requires consent to data processing")]
    BookingConsentRequired,
    #[error("at least one guest is required")]
    NoGuests,
    #[error("not enough spots available")]
    NotEnoughSpots,
    #[error("event is not open for booking")]
    EventUnavailable,
}

impl ValidationError {
    #[must_use]
    pub const fn message(self, lang: Language) -> &'static str {
        match (self, lang) {
            (Self::MissingContact, Language::Pl) => "Wypełnij imię, email i telefon",
            (Self::MissingContact, Language::En) => "Fill name, email and phone",
            (Self::InvalidEmail, Language::Pl) => "Podaj poprawny adres email",
            (Self::InvalidEmail, Language::En) => "Enter a valid email address",
            (Self::IncompleteShipping, Language::Pl) => "Wypełnij adres dostawy",
            (Self::IncompleteShipping, Language::En) => "Fill shipping address",
            (Self::IncompleteBilling, Language::Pl) => "Wypełnij adres rozliczeniowy",
            (Self::IncompleteBilling, Language::En) => "Fill billing address",
            (Self::IncompleteCard, Language::Pl) => "Wypełnij dane karty",
            (Self::IncompleteCard, Language::En) => "Fill card details",
            (Self::ConsentRequired, Language::Pl) => "Wymagana zgoda na przetwarzanie danych",
            (Self::ConsentRequired, Language::En) => "Consent required",
            (Self::BookingConsentRequired, Language::Pl) => {
                "Proszę wyrazić zgodę na przetwarzanie danych"
            }
            (Self::BookingConsentRequired, Language::En) => "Please consent to data processing",
            (Self::NoGuests, Language::Pl) => "Podaj liczbę gości (co najmniej 1)",
            (Self::NoGuests, Language::En) => "Enter the number of guests (at least 1)",
            (Self::NotEnoughSpots, Language::Pl) => "Niewystarczająca liczba wolnych miejsc",
            (Self::NotEnoughSpots, Language::En) => "Not enough spots available",
            (Self::EventUnavailable, Language::Pl) => "To wydarzenie nie jest dostępne",
            (Self::EventUnavailable, Language::En) => "This event is not available",
        }
    }
}
