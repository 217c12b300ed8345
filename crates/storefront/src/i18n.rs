//! Interface strings in Polish and English.
//!
//! Pages get a `&'static Labels` for the visitor's language; templates read
//! plain fields so a missing translation is a compile error, not a blank.

use chrono::{Datelike, NaiveDate, NaiveTime};
use portell_core::Language;

/// Every fixed string the storefront and its emails display.
#[derive(Debug)]
pub struct Labels {
    // Navigation and chrome
    pub nav_home: &'static str,
    pub nav_about: &'static str,
    pub nav_shop: &'static str,
    pub nav_events: &'static str,
    pub nav_contact: &'static str,
    pub nav_cart: &'static str,
    pub nav_search: &'static str,
    pub search_placeholder: &'static str,
    pub switch_language: &'static str,
    pub rights_reserved: &'static str,
    pub privacy_policy: &'static str,
    pub terms_of_service: &'static str,
    pub opening_hours: &'static str,

    // Home
    pub hero_title: &'static str,
    pub hero_title_accent: &'static str,
    pub hero_text: &'static str,
    pub hero_shop_cta: &'static str,
    pub hero_events_cta: &'static str,
    pub featured_wines: &'static str,
    pub view_more: &'static str,
    pub upcoming_events: &'static str,
    pub view_all: &'static str,
    pub join_family: &'static str,
    pub join_family_text: &'static str,
    pub get_in_touch: &'static str,

    // Shop and product
    pub shop_title: &'static str,
    pub shop_subtitle: &'static str,
    pub all: &'static str,
    pub sort_by: &'static str,
    pub sort_name: &'static str,
    pub sort_price_asc: &'static str,
    pub sort_price_desc: &'static str,
    pub sort_date: &'static str,
    pub no_products: &'static str,
    pub back_to_shop: &'static str,
    pub add_to_cart: &'static str,
    pub out_of_stock: &'static str,
    pub in_stock: &'static str,
    pub limited_stock: &'static str,
    pub details: &'static str,
    pub vintage: &'static str,
    pub grape_variety: &'static str,
    pub wine_type: &'static str,
    pub category: &'static str,
    pub added_to_cart: &'static str,

    // Events and booking
    pub events_title: &'static str,
    pub events_subtitle: &'static str,
    pub no_events: &'static str,
    pub spots_left: &'static str,
    pub sold_out: &'static str,
    pub free: &'static str,
    pub book_now: &'static str,
    pub view_details: &'static str,
    pub back_to_events: &'static str,
    pub booking_for: &'static str,
    pub event_sold_out: &'static str,
    pub your_details: &'static str,
    pub about_event: &'static str,
    pub full_name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub guests: &'static str,
    pub special_requests_optional: &'static str,
    pub booking_consent: &'static str,
    pub total_price: &'static str,
    pub continue_to_checkout: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub duration: &'static str,
    pub location: &'static str,
    pub per_person: &'static str,
    pub similar_events: &'static str,
    pub recommended_for_you: &'static str,
    pub add_to_calendar: &'static str,
    pub download_ics: &'static str,

    // Cart
    pub cart_title: &'static str,
    pub cart_empty: &'static str,
    pub continue_shopping: &'static str,
    pub item: &'static str,
    pub price: &'static str,
    pub quantity: &'static str,
    pub line_total: &'static str,
    pub subtotal: &'static str,
    pub shipping: &'static str,
    pub shipping_at_checkout: &'static str,
    pub order_total: &'static str,
    pub update: &'static str,
    pub remove: &'static str,
    pub clear_cart: &'static str,
    pub proceed_to_checkout: &'static str,

    // Checkout
    pub checkout_title: &'static str,
    pub step_contact: &'static str,
    pub step_payment: &'static str,
    pub step_review: &'static str,
    pub step_confirmation: &'static str,
    pub contact_details: &'static str,
    pub shipping_address: &'static str,
    pub billing_address: &'static str,
    pub street: &'static str,
    pub city: &'static str,
    pub postal_code: &'static str,
    pub country: &'static str,
    pub billing_same: &'static str,
    pub payment_method: &'static str,
    pub card_number: &'static str,
    pub card_name: &'static str,
    pub card_expiry: &'static str,
    pub card_cvv: &'static str,
    pub items: &'static str,
    pub free_shipping: &'static str,
    pub checkout_consent: &'static str,
    pub next: &'static str,
    pub back: &'static str,
    pub confirm_booking: &'static str,
    pub place_order: &'static str,
    pub order_confirmed: &'static str,
    pub booking_confirmed: &'static str,
    pub order_thanks: &'static str,
    pub booking_thanks: &'static str,
    pub confirmation_code: &'static str,
    pub order_number: &'static str,
    pub booking_email_failed: &'static str,
    pub order_email_failed: &'static str,
    pub missing_event_data: &'static str,
    pub processing_failed: &'static str,
    pub event_not_found: &'static str,

    // Search
    pub search_title: &'static str,
    pub filters: &'static str,
    pub everything: &'static str,
    pub wines: &'static str,
    pub events: &'static str,
    pub price_range: &'static str,
    pub event_type: &'static str,
    pub apply_filters: &'static str,
    pub no_results: &'static str,
    pub no_results_hint: &'static str,
    pub found: &'static str,
    pub results: &'static str,
    pub clear_filters: &'static str,

    // Contact and newsletter
    pub contact_title: &'static str,
    pub contact_subtitle: &'static str,
    pub send_message_title: &'static str,
    pub send_message: &'static str,
    pub subject: &'static str,
    pub message: &'static str,
    pub thank_you: &'static str,
    pub message_sent: &'static str,
    pub message_failed: &'static str,
    pub contact_required: &'static str,
    pub contact_ack_subject: &'static str,
    pub contact_ack_greeting: &'static str,
    pub contact_ack_body: &'static str,
    pub newsletter_title: &'static str,
    pub newsletter_placeholder: &'static str,
    pub subscribe: &'static str,
    pub subscribed: &'static str,
    pub subscribe_failed: &'static str,
    pub welcome_subject: &'static str,
    pub welcome_body: &'static str,

    // Static pages
    pub about_title: &'static str,
    pub about_text: &'static str,
    pub privacy_text: &'static str,
    pub terms_text: &'static str,
    pub not_found_title: &'static str,
    pub not_found_text: &'static str,

    // Emails
    pub email_booking_title: &'static str,
    pub email_order_title: &'static str,
    pub email_hello: &'static str,
    pub email_booking_thanks: &'static str,
    pub email_order_thanks: &'static str,
    pub email_confirmation_code: &'static str,
    pub email_event_details: &'static str,
    pub email_event: &'static str,
    pub email_guests: &'static str,
    pub email_special_requests: &'static str,
    pub email_important: &'static str,
    pub email_bring_code: &'static str,
    pub email_arrive_early: &'static str,
    pub email_questions: &'static str,
    pub email_see_you: &'static str,
    pub email_team: &'static str,
    pub email_order_number: &'static str,
    pub email_order_details: &'static str,
    pub email_product: &'static str,
    pub email_total: &'static str,
    pub email_next_steps: &'static str,
    pub email_processing_time: &'static str,
    pub email_shipping_notice: &'static str,
    pub email_trust: &'static str,
    pub email_booking_subject: &'static str,
    pub email_order_subject: &'static str,
}

impl Labels {
    #[must_use]
    pub fn for_lang(lang: Language) -> &'static Self {
        match lang {
            Language::Pl => &PL,
            Language::En => &EN,
        }
    }
}

pub static PL: Labels = Labels {
    nav_home: "Start",
    nav_about: "O nas",
    nav_shop: "Wina",
    nav_events: "Wydarzenia",
    nav_contact: "Kontakt",
    nav_cart: "Koszyk",
    nav_search: "Szukaj",
    search_placeholder: "Szukaj win, wydarzeń...",
    switch_language: "English",
    rights_reserved: "Wszelkie prawa zastrzeżone.",
    privacy_policy: "Polityka prywatności",
    terms_of_service: "Regulamin",
    opening_hours: "Wt-Nd: 10:00 - 18:00",

    hero_title: "Wyjątkowe wina",
    hero_title_accent: "z pasją tworzone",
    hero_text: "Odkryj esencję polskiego winiarstwa. Każda butelka to historia, każdy łyk to podróż przez nasze winnice.",
    hero_shop_cta: "Odkryj nasze wina",
    hero_events_cta: "Zobacz wydarzenia",
    featured_wines: "Wybrane wina",
    view_more: "Zobacz więcej",
    upcoming_events: "Nadchodzące wydarzenia",
    view_all: "Zobacz wszystkie",
    join_family: "Dołącz do rodziny Portell",
    join_family_text: "Zapisz się do newslettera i bądź na bieżąco z nowymi rocznikami i wydarzeniami.",
    get_in_touch: "Skontaktuj się",

    shop_title: "Sklep",
    shop_subtitle: "Odkryj naszą kolekcję wyjątkowych win",
    all: "Wszystkie",
    sort_by: "Sortuj",
    sort_name: "Nazwa",
    sort_price_asc: "Cena: rosnąco",
    sort_price_desc: "Cena: malejąco",
    sort_date: "Data",
    no_products: "Brak produktów",
    back_to_shop: "Powrót do sklepu",
    add_to_cart: "Dodaj do koszyka",
    out_of_stock: "Wyprzedane",
    in_stock: "Dostępne",
    limited_stock: "Ograniczona dostępność",
    details: "Szczegóły",
    vintage: "Rocznik",
    grape_variety: "Szczep winogron",
    wine_type: "Typ wina",
    category: "Kategoria",
    added_to_cart: "Dodano do koszyka",

    events_title: "Wydarzenia",
    events_subtitle: "Dołącz do nas na degustacjach, warsztatach i specjalnych wydarzeniach",
    no_events: "Brak nadchodzących wydarzeń",
    spots_left: "Zostało miejsc",
    sold_out: "Wyprzedane",
    free: "Bezpłatne",
    book_now: "Zarezerwuj",
    view_details: "Zobacz szczegóły",
    back_to_events: "Powrót do wydarzeń",
    booking_for: "Rezerwacja na",
    event_sold_out: "Wydarzenie wyprzedane",
    your_details: "Twoje dane",
    about_event: "O wydarzeniu",
    full_name: "Imię i nazwisko",
    email: "Email",
    phone: "Telefon",
    guests: "Liczba gości",
    special_requests_optional: "Uwagi specjalne (opcjonalnie)",
    booking_consent: "Wyrażam zgodę na przetwarzanie moich danych osobowych zgodnie z Polityką Prywatności",
    total_price: "Łączna cena",
    continue_to_checkout: "Przejdź do realizacji",
    date: "Data",
    time: "Godzina",
    duration: "Czas trwania",
    location: "Lokalizacja",
    per_person: "za osobę",
    similar_events: "Podobne wydarzenia",
    recommended_for_you: "Polecane dla Ciebie",
    add_to_calendar: "Dodaj do kalendarza",
    download_ics: "Pobierz plik .ics",

    cart_title: "Koszyk",
    cart_empty: "Twój koszyk jest pusty",
    continue_shopping: "Kontynuuj zakupy",
    item: "Produkt",
    price: "Cena",
    quantity: "Ilość",
    line_total: "Suma",
    subtotal: "Suma częściowa",
    shipping: "Dostawa",
    shipping_at_checkout: "Obliczane przy kasie",
    order_total: "Łącznie",
    update: "Aktualizuj",
    remove: "Usuń",
    clear_cart: "Wyczyść koszyk",
    proceed_to_checkout: "Przejdź do kasy",

    checkout_title: "Kasa",
    step_contact: "Dane kontaktowe",
    step_payment: "Płatność",
    step_review: "Podsumowanie",
    step_confirmation: "Potwierdzenie",
    contact_details: "Dane kontaktowe",
    shipping_address: "Adres dostawy",
    billing_address: "Adres rozliczeniowy",
    street: "Ulica i numer",
    city: "Miasto",
    postal_code: "Kod pocztowy",
    country: "Kraj",
    billing_same: "Adres rozliczeniowy taki sam jak adres dostawy",
    payment_method: "Metoda płatności",
    card_number: "Numer karty",
    card_name: "Imię i nazwisko na karcie",
    card_expiry: "Data ważności (MM/RR)",
    card_cvv: "CVV",
    items: "Produkty",
    free_shipping: "Bezpłatna",
    checkout_consent: "Wyrażam zgodę na przetwarzanie danych osobowych",
    next: "Dalej",
    back: "Wstecz",
    confirm_booking: "Potwierdź rezerwację",
    place_order: "Złóż zamówienie",
    order_confirmed: "Zamówienie potwierdzone!",
    booking_confirmed: "Rezerwacja potwierdzona!",
    order_thanks: "Dziękujemy za zakupy. Potwierdzenie zostało wysłane na Twój email.",
    booking_thanks: "Dziękujemy za rezerwację. Potwierdzenie zostało wysłane na Twój adres email.",
    confirmation_code: "Kod potwierdzenia",
    order_number: "Numer zamówienia",
    booking_email_failed: "Rezerwacja utworzona, ale wysłanie emaila nie powiodło się.",
    order_email_failed: "Zamówienie utworzone, ale wysłanie emaila nie powiodło się.",
    missing_event_data: "Błąd: Brak danych wydarzenia.",
    processing_failed: "Wystąpił błąd podczas przetwarzania. Spróbuj ponownie.",
    event_not_found: "Wydarzenie nie zostało znalezione.",

    search_title: "Szukaj",
    filters: "Filtry",
    everything: "Wszystko",
    wines: "Wina",
    events: "Wydarzenia",
    price_range: "Zakres cen",
    event_type: "Typ wydarzenia",
    apply_filters: "Zastosuj",
    no_results: "Brak wyników",
    no_results_hint: "Spróbuj zmienić kryteria wyszukiwania",
    found: "Znaleziono",
    results: "wyników",
    clear_filters: "Wyczyść filtry",

    contact_title: "Kontakt",
    contact_subtitle: "Masz pytania? Chętnie odpowiemy",
    send_message_title: "Wyślij wiadomość",
    send_message: "Wyślij wiadomość",
    subject: "Temat",
    message: "Wiadomość",
    thank_you: "Dziękujemy!",
    message_sent: "Twoja wiadomość została wysłana. Odpowiemy najszybciej jak to możliwe.",
    message_failed: "Nie udało się wysłać wiadomości. Spróbuj ponownie.",
    contact_required: "Podaj imię, email i treść wiadomości",
    contact_ack_subject: "Dziękujemy za kontakt",
    contact_ack_greeting: "Witaj",
    contact_ack_body: "Dziękujemy za wiadomość. Odpowiemy najszybciej jak to możliwe.\n\nPozdrawiamy,\nZespół Portell",
    newsletter_title: "Bądź na bieżąco",
    newsletter_placeholder: "Twój adres email",
    subscribe: "Zapisz się",
    subscribed: "Dziękujemy za zapis!",
    subscribe_failed: "Nie udało się zapisać. Spróbuj ponownie.",
    welcome_subject: "Witaj w Portell!",
    welcome_body: "Dziękujemy za zapisanie się do naszego newslettera! Będziemy informować Cię o wszystkich nowościach.\n\nPozdrawiamy,\nZespół Portell",

    about_title: "O nas",
    about_text: "Portell to rodzinna winnica w sercu Ziemi Lubuskiej. Od pokoleń uprawiamy winorośl i tworzymy wina, które oddają charakter naszego regionu.",
    privacy_text: "Administratorem danych osobowych jest Portell Winery. Dane podane w formularzach przetwarzamy wyłącznie w celu realizacji zamówień, rezerwacji i odpowiedzi na wiadomości.",
    terms_text: "Zamówienia realizujemy na terenie Polski. Rezerwacja wydarzenia jest potwierdzana kodem wysłanym na adres email podany w formularzu.",
    not_found_title: "Nie znaleziono",
    not_found_text: "Strona, której szukasz, nie istnieje lub została usunięta.",

    email_booking_title: "Potwierdzenie rezerwacji",
    email_order_title: "Potwierdzenie zamówienia",
    email_hello: "Witaj",
    email_booking_thanks: "Dziękujemy za rezerwację na wydarzenie w Portell Winery!",
    email_order_thanks: "Dziękujemy za zamówienie w Portell Winery!",
    email_confirmation_code: "Kod potwierdzenia",
    email_event_details: "Szczegóły wydarzenia",
    email_event: "Wydarzenie",
    email_guests: "Liczba gości",
    email_special_requests: "Specjalne prośby",
    email_important: "Ważne informacje",
    email_bring_code: "Prosimy o zabranie ze sobą kodu potwierdzenia",
    email_arrive_early: "Zachęcamy do przybycia 10 minut przed rozpoczęciem",
    email_questions: "W razie pytań, skontaktuj się z nami",
    email_see_you: "Czekamy na Ciebie!",
    email_team: "Zespół Portell",
    email_order_number: "Numer zamówienia",
    email_order_details: "Szczegóły zamówienia",
    email_product: "Produkt",
    email_total: "Łącznie",
    email_next_steps: "Kolejne kroki",
    email_processing_time: "Twoje zamówienie zostanie przetworzone w ciągu 1-2 dni roboczych",
    email_shipping_notice: "Otrzymasz powiadomienie, gdy zamówienie zostanie wysłane",
    email_trust: "Dziękujemy za zaufanie!",
    email_booking_subject: "Potwierdzenie rezerwacji",
    email_order_subject: "Potwierdzenie zamówienia",
};

pub static EN: Labels = Labels {
    nav_home: "Home",
    nav_about: "About",
    nav_shop: "Wines",
    nav_events: "Events",
    nav_contact: "Contact",
    nav_cart: "Cart",
    nav_search: "Search",
    search_placeholder: "Search wines, events...",
    switch_language: "Polski",
    rights_reserved: "All rights reserved.",
    privacy_policy: "Privacy Policy",
    terms_of_service: "Terms of Service",
    opening_hours: "Tue-Sun: 10:00 AM - 6:00 PM",

    hero_title: "Exceptional wines",
    hero_title_accent: "crafted with passion",
    hero_text: "Discover the essence of Polish winemaking. Every bottle tells a story, every sip is a journey through our vineyards.",
    hero_shop_cta: "Explore our wines",
    hero_events_cta: "View events",
    featured_wines: "Featured wines",
    view_more: "View more",
    upcoming_events: "Upcoming events",
    view_all: "View all",
    join_family: "Join the Portell family",
    join_family_text: "Subscribe to our newsletter to hear about new vintages and events first.",
    get_in_touch: "Get in touch",

    shop_title: "Shop",
    shop_subtitle: "Discover our collection of exceptional wines",
    all: "All",
    sort_by: "Sort by",
    sort_name: "Name",
    sort_price_asc: "Price: Low to High",
    sort_price_desc: "Price: High to Low",
    sort_date: "Date",
    no_products: "No products",
    back_to_shop: "Back to shop",
    add_to_cart: "Add to cart",
    out_of_stock: "Out of stock",
    in_stock: "In stock",
    limited_stock: "Limited stock",
    details: "Details",
    vintage: "Vintage",
    grape_variety: "Grape Variety",
    wine_type: "Wine Type",
    category: "Category",
    added_to_cart: "Added to cart",

    events_title: "Events",
    events_subtitle: "Join us for tastings, workshops, and special occasions",
    no_events: "No upcoming events",
    spots_left: "spots left",
    sold_out: "Sold out",
    free: "Free",
    book_now: "Book now",
    view_details: "View details",
    back_to_events: "Back to events",
    booking_for: "Booking for",
    event_sold_out: "Event sold out",
    your_details: "Your details",
    about_event: "About this event",
    full_name: "Full name",
    email: "Email",
    phone: "Phone",
    guests: "Number of guests",
    special_requests_optional: "Special requests (optional)",
    booking_consent: "I consent to the processing of my personal data in accordance with the Privacy Policy",
    total_price: "Total price",
    continue_to_checkout: "Continue to checkout",
    date: "Date",
    time: "Time",
    duration: "Duration",
    location: "Location",
    per_person: "per person",
    similar_events: "Similar Events",
    recommended_for_you: "Recommended for You",
    add_to_calendar: "Add to Calendar",
    download_ics: "Download .ics file",

    cart_title: "Cart",
    cart_empty: "Your cart is empty",
    continue_shopping: "Continue shopping",
    item: "Item",
    price: "Price",
    quantity: "Quantity",
    line_total: "Total",
    subtotal: "Subtotal",
    shipping: "Shipping",
    shipping_at_checkout: "Calculated at checkout",
    order_total: "Order total",
    update: "Update",
    remove: "Remove",
    clear_cart: "Clear cart",
    proceed_to_checkout: "Proceed to checkout",

    checkout_title: "Checkout",
    step_contact: "Contact Details",
    step_payment: "Payment",
    step_review: "Review",
    step_confirmation: "Confirmation",
    contact_details: "Contact Details",
    shipping_address: "Shipping Address",
    billing_address: "Billing Address",
    street: "Street and number",
    city: "City",
    postal_code: "Postal code",
    country: "Country",
    billing_same: "Billing address same as shipping",
    payment_method: "Payment Method",
    card_number: "Card number",
    card_name: "Name on card",
    card_expiry: "Expiry date (MM/YY)",
    card_cvv: "CVV",
    items: "Items",
    free_shipping: "Free",
    checkout_consent: "I consent to data processing",
    next: "Next",
    back: "Back",
    confirm_booking: "Confirm Booking",
    place_order: "Place order",
    order_confirmed: "Order Confirmed!",
    booking_confirmed: "Booking Confirmed!",
    order_thanks: "Thank you for your purchase. Confirmation has been sent to your email.",
    booking_thanks: "Thank you for your booking. A confirmation has been sent to your email.",
    confirmation_code: "Confirmation code",
    order_number: "Order number",
    booking_email_failed: "Booking created, but email sending failed.",
    order_email_failed: "Order created, but email sending failed.",
    missing_event_data: "Error: No event data.",
    processing_failed: "An error occurred while processing. Please try again.",
    event_not_found: "Event not found.",

    search_title: "Search",
    filters: "Filters",
    everything: "All",
    wines: "Wines",
    events: "Events",
    price_range: "Price range",
    event_type: "Event type",
    apply_filters: "Apply",
    no_results: "No results",
    no_results_hint: "Try adjusting your search criteria",
    found: "Found",
    results: "results",
    clear_filters: "Clear filters",

    contact_title: "Contact",
    contact_subtitle: "Have questions? We'd love to hear from you",
    send_message_title: "Send a message",
    send_message: "Send message",
    subject: "Subject",
    message: "Message",
    thank_you: "Thank you!",
    message_sent: "Your message has been sent. We'll respond as soon as possible.",
    message_failed: "Your message could not be sent. Please try again.",
    contact_required: "Please enter your name, email and message",
    contact_ack_subject: "Thank you for contacting us",
    contact_ack_greeting: "Hello",
    contact_ack_body: "Thank you for your message. We'll respond as soon as possible.\n\nBest regards,\nPortell Team",
    newsletter_title: "Stay updated",
    newsletter_placeholder: "Your email address",
    subscribe: "Subscribe",
    subscribed: "Thank you for subscribing!",
    subscribe_failed: "Subscription failed. Please try again.",
    welcome_subject: "Welcome to Portell!",
    welcome_body: "Thank you for subscribing to our newsletter! We'll keep you informed about all the news.\n\nBest regards,\nPortell Team",

    about_title: "About us",
    about_text: "Portell is a family vineyard in the heart of the Lubusz region. For generations we have tended our vines and made wines that carry the character of our land.",
    privacy_text: "Portell Winery is the controller of your personal data. Details entered in our forms are used only to fulfil orders and bookings and to answer your messages.",
    terms_text: "We ship orders within Poland. An event booking is confirmed with a code sent to the email address given in the form.",
    not_found_title: "Not found",
    not_found_text: "The page you are looking for does not exist or has been removed.",

    email_booking_title: "Booking Confirmation",
    email_order_title: "Order Confirmation",
    email_hello: "Hello",
    email_booking_thanks: "Thank you for your booking at Portell Winery!",
    email_order_thanks: "Thank you for your order at Portell Winery!",
    email_confirmation_code: "Confirmation Code",
    email_event_details: "Event Details",
    email_event: "Event",
    email_guests: "Number of Guests",
    email_special_requests: "Special Requests",
    email_important: "Important Information",
    email_bring_code: "Please bring your confirmation code with you",
    email_arrive_early: "We encourage you to arrive 10 minutes early",
    email_questions: "If you have questions, please contact us",
    email_see_you: "We look forward to seeing you!",
    email_team: "Portell Team",
    email_order_number: "Order Number",
    email_order_details: "Order Details",
    email_product: "Product",
    email_total: "Total",
    email_next_steps: "Next Steps",
    email_processing_time: "Your order will be processed within 1-2 business days",
    email_shipping_notice: "You'll receive a notification when your order ships",
    email_trust: "Thank you for your trust!",
    email_booking_subject: "Booking Confirmation",
    email_order_subject: "Order confirmation",
};

const MONTHS_PL: [&str; 12] = [
    "stycznia",
    "lutego",
    "marca",
    "kwietnia",
    "maja",
    "czerwca",
    "lipca",
    "sierpnia",
    "września",
    "października",
    "listopada",
    "grudnia",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Long date, `1 czerwca 2025` or `June 1, 2025`.
#[must_use]
pub fn format_date(date: NaiveDate, lang: Language) -> String {
    let months = match lang {
        Language::Pl => &MONTHS_PL,
        Language::En => &MONTHS_EN,
    };
    let month = months.get(date.month0() as usize).copied().unwrap_or_default();
    match lang {
        Language::Pl => format!("{} {month} {}", date.day(), date.year()),
        Language::En => format!("{month} {}, {}", date.day(), date.year()),
    }
}

/// 24-hour clock, `18:30`.
#[must_use]
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_localized() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(format_date(date, Language::Pl), "1 czerwca 2025");
        assert_eq!(format_date(date, Language::En), "June 1, 2025");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(NaiveTime::from_hms_opt(18, 5, 0).unwrap()), "18:05");
    }

    #[test]
    fn test_labels_for_lang() {
        assert_eq!(Labels::for_lang(Language::Pl).nav_cart, "Koszyk");
        assert_eq!(Labels::for_lang(Language::En).nav_cart, "Cart");
    }
}
