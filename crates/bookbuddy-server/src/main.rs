#![allow(non_snake_case)]

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use axum::Router;
    use bookbuddy_api::{config, state::AppState};
    use bookbuddy_ui::{shell, App};
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use tower_http::trace::TraceLayer;
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let configPath = config::config_path_from_args(&args);
    let appConfig = config::load(&configPath);
    tracing::info!(
        "loaded config from {configPath}: bind={}:{} gateway={}",
        appConfig.server.bind,
        appConfig.server.port,
        appConfig.gateway.url
    );

    let publicConfig = appConfig.public();
    if publicConfig.google_client_id.is_none() {
        tracing::warn!("no google.client_id configured, Google sign-in is disabled");
    }

    let appState = AppState::new(&appConfig.gateway)
        .unwrap_or_else(|e| panic!("failed to build gateway client: {e}"));

    let conf = get_configuration(None).expect("failed to load Leptos configuration");
    let leptosOptions = conf.leptos_options;

    let routes = generate_route_list(App);

    // Pages and server functions share LeptosOptions state; the relay
    // carries its own AppState.
    let app = Router::new()
        .leptos_routes_with_context(
            &leptosOptions,
            routes,
            {
                let publicConfig = publicConfig.clone();
                move || provide_context(publicConfig.clone())
            },
            {
                let leptosOptions = leptosOptions.clone();
                move || shell(leptosOptions.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptosOptions)
        .merge(bookbuddy_api::api_router(appState))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", appConfig.server.bind, appConfig.server.port);
    tracing::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server exited with error");
}

#[cfg(not(feature = "ssr"))]
fn main() {}
