use async_graphql::{EmptySubscription, MergedObject, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{Extension, Router, response::Html, routing::get};

use crate::modules::rsvps::use_cases::submit_rsvp::inbound::graphql::{
    RsvpFormMutation, RsvpFormQuery,
};
use crate::modules::rsvps::use_cases::view_message_feed::inbound::graphql::{
    MessageFeedMutation, MessageFeedQuery,
};
pub use crate::shell::state::AppState;

#[derive(MergedObject)]
pub struct QueryRoot(RsvpFormQuery, MessageFeedQuery);

#[derive(MergedObject)]
pub struct MutationRoot(RsvpFormMutation, MessageFeedMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn schema(state: AppState) -> AppSchema {
    Schema::build(
        QueryRoot(RsvpFormQuery, MessageFeedQuery),
        MutationRoot(RsvpFormMutation, MessageFeedMutation),
        EmptySubscription,
    )
    .data(state)
    .finish()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema(state)))
}

async fn graphql(Extension(schema): Extension<AppSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    use async_graphql::http::GraphiQLSource;
    Html(GraphiQLSource::build().endpoint("/gql").finish())
}
