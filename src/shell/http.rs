use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::rsvps::use_cases::submit_rsvp::inbound::http as submit_http;
use crate::modules::rsvps::use_cases::view_message_feed::inbound::http as feed_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/rsvp", post(submit_http::handle_submit))
        .route("/rsvp/attendance", post(submit_http::handle_select_attendance))
        .route("/rsvp/form", get(submit_http::handle_form))
        .route("/messages", get(feed_http::handle_list))
        .route("/messages.html", get(feed_http::handle_list_html))
        .route("/messages/toggle", post(feed_http::handle_toggle))
        .with_state(state)
}
