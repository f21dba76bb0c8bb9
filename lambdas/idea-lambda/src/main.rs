use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use board_shared::store::{DynamoTable, ObjectStore, S3Bucket};
use board_shared::{AppState, Config};
use lambda_http::{run, service_fn, Error, Request};
use std::sync::Arc;

mod http_handler;

use http_handler::IdeaHandler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let config = Config::from_env()?;
    let handler: IdeaHandler = config.require_handler()?.parse()?;
    let bucket = config.require_bucket()?.to_string();
    tracing::info!(?handler, table = %config.table_name, bucket = %bucket, "Starting idea function");

    // Initialize AWS clients once at startup
    let aws = aws_config::load_from_env().await;
    let table = DynamoTable::new(DynamoClient::new(&aws), config.table_name.clone());
    let objects = S3Bucket::new(S3Client::new(&aws), bucket);

    let state = AppState::new(
        Arc::new(table),
        Some(Arc::new(objects) as Arc<dyn ObjectStore>),
    );

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(handler, event, state).await }
    }))
    .await
}
