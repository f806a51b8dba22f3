//! Change feed handlers

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use shared::order::OrderEvent;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::core::ServerState;

/// One item of a restaurant's feed
#[derive(Debug)]
pub(super) enum FeedItem {
    Event(Box<OrderEvent>),
    /// The subscriber missed this many events
    Lagged(u64),
}

/// Events of one restaurant, in publish order
///
/// Ends when the manager (the sender) is dropped.
pub(super) fn restaurant_feed(
    rx: broadcast::Receiver<OrderEvent>,
    restaurant_id: String,
) -> impl Stream<Item = FeedItem> {
    futures::stream::unfold((rx, restaurant_id), |(mut rx, restaurant_id)| async move {
        loop {
            match rx.recv().await {
                Ok(event) if event.restaurant_id == restaurant_id => {
                    return Some((FeedItem::Event(Box::new(event)), (rx, restaurant_id)));
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(restaurant_id = %restaurant_id, missed, "Change feed subscriber lagged");
                    return Some((FeedItem::Lagged(missed), (rx, restaurant_id)));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

fn to_sse(item: FeedItem) -> Result<Event, axum::Error> {
    match item {
        FeedItem::Event(event) => Event::default()
            .event(event.kind.to_string())
            .id(event.sequence.to_string())
            .json_data(&*event),
        FeedItem::Lagged(missed) => Event::default()
            .event("LAGGED")
            .json_data(serde_json::json!({ "missed": missed })),
    }
}

/// SSE stream of a restaurant's order/session changes
pub async fn stream(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    tracing::debug!(restaurant_id = %restaurant_id, "Change feed subscriber connected");
    let feed = restaurant_feed(state.orders.subscribe(), restaurant_id).map(to_sse);
    Sse::new(feed).keep_alive(KeepAlive::default())
}
