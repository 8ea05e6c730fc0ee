//! `GET /markers`

use change_observer_shared::{handlers, init_tracing, AppState};
use lambda_http::{run, service_fn, Error, Request};

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let state = AppState::from_env().await;
    run(service_fn(|event: Request| handlers::list_markers(event, &state))).await
}
