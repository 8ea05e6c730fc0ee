use std::sync::Arc;

use change_observer_shared::{init_tracing, AppState};
use lambda_http::{run, service_fn, Error, Request};

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let state = Arc::new(AppState::from_env().await);

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(event, state).await }
    }))
    .await
}
