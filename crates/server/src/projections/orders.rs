//! Order views.
//!
//! Reads nest each ticket's session summary; a freshly created order
//! refers to sessions by id, the way the request named them.

use super::sessions::SessionSummaryView;
use super::Action;
use chrono::{DateTime, Utc};
use serde::Serialize;
use store::{MovieSessionId, OrderId, OrderWithTickets, TicketId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketDetail {
    pub id: TicketId,
    pub row: i32,
    pub seat: i32,
    pub movie_session: SessionSummaryView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetail {
    pub id: OrderId,
    pub tickets: Vec<TicketDetail>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketRecord {
    pub id: TicketId,
    pub row: i32,
    pub seat: i32,
    pub movie_session: MovieSessionId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub tickets: Vec<TicketRecord>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OrderView {
    Detail(OrderDetail),
    Record(OrderRecord),
}

pub type OrderProjection = fn(OrderWithTickets) -> OrderView;

/// The projection orders are rendered with for `action`
pub fn order_projection(action: Action) -> OrderProjection {
    match action {
        Action::List | Action::Retrieve => as_detail,
        Action::Create | Action::Update | Action::PartialUpdate => as_record,
    }
}

fn as_detail(order: OrderWithTickets) -> OrderView {
    OrderView::Detail(OrderDetail {
        id: order.order.id,
        created_at: order.order.created_at,
        tickets: order
            .tickets
            .into_iter()
            .map(|t| TicketDetail {
                id: t.id,
                row: t.row,
                seat: t.seat,
                movie_session: t.movie_session.into(),
            })
            .collect(),
    })
}

fn as_record(order: OrderWithTickets) -> OrderView {
    OrderView::Record(OrderRecord {
        id: order.order.id,
        created_at: order.order.created_at,
        tickets: order
            .tickets
            .into_iter()
            .map(|t| TicketRecord {
                id: t.id,
                row: t.row,
                seat: t.seat,
                movie_session: t.movie_session.id,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use store::{Order, OrderTicket, SessionSummary};

    fn order() -> OrderWithTickets {
        OrderWithTickets {
            order: Order {
                id: 10,
                created_at: Utc::now(),
                user_id: 1,
            },
            tickets: vec![OrderTicket {
                id: 100,
                row: 1,
                seat: 2,
                movie_session: SessionSummary {
                    id: 5,
                    show_time: NaiveDate::from_ymd_opt(2024, 5, 1)
                        .unwrap()
                        .and_hms_opt(20, 0, 0)
                        .unwrap(),
                    movie_title: "Alien".to_string(),
                    cinema_hall_name: "Red".to_string(),
                    cinema_hall_capacity: 6,
                },
            }],
        }
    }

    #[test]
    fn test_read_projection_nests_sessions() {
        let value = serde_json::to_value(order_projection(Action::List)(order())).unwrap();

        assert_eq!(value["tickets"][0]["movie_session"]["movie_title"], "Alien");
        assert!(value["tickets"][0]["movie_session"].get("tickets_available").is_none());
        assert!(value.get("user").is_none());
    }

    #[test]
    fn test_create_projection_uses_session_ids() {
        let value = serde_json::to_value(order_projection(Action::Create)(order())).unwrap();
        assert_eq!(value["tickets"][0]["movie_session"], 5);
    }
}
