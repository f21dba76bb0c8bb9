use aws_sdk_dynamodb::Client as DynamoClient;
use board_shared::store::DynamoTable;
use board_shared::{AppState, Config};
use lambda_http::{run, service_fn, Error, Request};
use std::sync::Arc;

mod http_handler;

use http_handler::PostHandler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let config = Config::from_env()?;
    let handler: PostHandler = config.require_handler()?.parse()?;
    tracing::info!(?handler, table = %config.table_name, "Starting post function");

    let aws = aws_config::load_from_env().await;
    let table = DynamoTable::new(DynamoClient::new(&aws), config.table_name.clone());
    let state = AppState::new(Arc::new(table), None);

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(handler, event, state).await }
    }))
    .await
}
