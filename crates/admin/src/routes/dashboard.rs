//! Dashboard route handler.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use portell_core::models::{Booking, Event, Order};
use portell_core::{EventId, Language};
use portell_gateway::{Record, SortSpec};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::{error::Result, filters, middleware::RequireAdmin, services::AdminSession, state::AppState};

/// How many bookings and orders the dashboard lists.
const RECENT_LIMIT: usize = 5;

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub username: String,
}

impl From<&AdminSession> for AdminUserView {
    fn from(admin: &AdminSession) -> Self {
        Self {
            username: admin.username.clone(),
        }
    }
}

/// Dashboard metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardMetrics {
    pub products: usize,
    pub active_events: usize,
    pub bookings: usize,
    pub orders: usize,
    pub revenue: Decimal,
}

/// Recent booking view for dashboard.
#[derive(Debug, Clone)]
pub struct RecentBookingView {
    pub customer_name: String,
    pub event_title: String,
    pub guests: u32,
    pub total: Decimal,
    pub status: &'static str,
    pub confirmation_code: String,
}

/// Recent order view for dashboard.
#[derive(Debug, Clone)]
pub struct RecentOrderView {
    pub number: String,
    pub customer_name: String,
    pub items: usize,
    pub total: Decimal,
    pub status: &'static str,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub metrics: DashboardMetrics,
    pub recent_bookings: Vec<RecentBookingView>,
    pub recent_orders: Vec<RecentOrderView>,
}

/// Totals over everything the gateway holds. Revenue is the sum of order
/// totals.
fn metrics(
    products: usize,
    events: &[Record<Event>],
    bookings: usize,
    orders: &[Record<Order>],
) -> DashboardMetrics {
    DashboardMetrics {
        products,
        active_events: events.iter().filter(|event| event.active).count(),
        bookings,
        orders: orders.len(),
        revenue: orders.iter().map(|order| order.total).sum(),
    }
}

fn recent_bookings(
    bookings: &[Record<Booking>],
    events: &[Record<Event>],
) -> Vec<RecentBookingView> {
    let titles: HashMap<EventId, &str> = events
        .iter()
        .map(|event| (event.id, event.title.as_str()))
        .collect();

    bookings
        .iter()
        .take(RECENT_LIMIT)
        .map(|booking| RecentBookingView {
            customer_name: booking.customer_name.clone(),
            event_title: titles
                .get(&booking.event_id)
                .map_or_else(|| "Deleted event".to_owned(), |title| (*title).to_owned()),
            guests: booking.guests,
            total: booking.total_price,
            status: booking.status.label(Language::En),
            confirmation_code: booking.confirmation_code.clone(),
        })
        .collect()
}

impl From<&Record<Order>> for RecentOrderView {
    fn from(order: &Record<Order>) -> Self {
        Self {
            number: order.order_number.clone(),
            customer_name: order.customer_name.clone(),
            items: order.items.len(),
            total: order.total,
            status: order.status.label(Language::En),
        }
    }
}

/// Dashboard page handler.
///
/// # Errors
///
/// Returns error if the gateway cannot be read.
#[instrument(skip(admin, state))]
pub async fn dashboard(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<DashboardTemplate> {
    let gateway = state.gateway();
    let newest = SortSpec::default();

    let (products, events, bookings, orders) = tokio::try_join!(
        gateway.products.list(&newest, None),
        gateway.events.list(&newest, None),
        gateway.bookings.list(&newest, None),
        gateway.orders.list(&newest, None),
    )?;

    Ok(DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/".to_string(),
        metrics: metrics(products.len(), &events, bookings.len(), &orders),
        recent_bookings: recent_bookings(&bookings, &events),
        recent_orders: orders
            .iter()
            .take(RECENT_LIMIT)
            .map(RecentOrderView::from)
            .collect(),
    })
}
