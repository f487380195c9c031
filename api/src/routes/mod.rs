pub mod ask {
    pub mod ask_route;
    pub mod ask_with_context_route;
    pub mod query_request;
}
pub mod context {
    pub mod context_route;
}
pub mod info_routes;
