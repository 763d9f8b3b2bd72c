use axum::{Router, middleware};
use log::info;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use courier_service::state::AppState;
use courier_service::{booking, contact, conversation, event, integration, message, user};

#[tokio::main]
async fn main() {
    let config = integration::Config::default();
    let state = AppState::init();

    let api = Router::new()
        .merge(conversation::api(state.clone()))
        .merge(message::api(state.clone()))
        .merge(contact::api(state.clone()))
        .layer(middleware::from_fn(user::middleware::identify))
        // server-to-server edge, authenticated upstream
        .merge(booking::api(state.clone()));

    let cors = CorsLayer::new()
        .allow_origin(config.env.allow_origin())
        .allow_methods(config.env.allow_methods())
        .allow_headers(config.env.allow_headers());

    let app = Router::new()
        .nest("/api", api)
        .merge(event::ws_router(state))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let addr = config.env.addr();
    info!("starting server on {addr}");

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .expect("Failed to start server");
}
