use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use image_backend::{
    blob_store::S3BlobStore,
    identity::IdentityVerifier,
    image_service::ImageService,
    server,
    state::AppState,
    types::{Environment, ServiceConfig},
};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();

    let env_filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // JSON logs for staging/production, human-readable for development
    if environment.json_logs() {
        fmt().json().with_env_filter(env_filter()).init();
    } else {
        fmt().with_env_filter(env_filter()).init();
    }

    let config = ServiceConfig::from_env();
    tracing::info!(
        ?environment,
        max_file_size = config.max_file_size,
        allowed_regions = ?config.allowed_regions,
        "Loaded configuration"
    );

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let bucket_name = environment.s3_bucket();
    let object_url_base = environment.object_url_base(&bucket_name);
    let blob_store = Arc::new(S3BlobStore::new(s3_client, bucket_name, object_url_base));

    let image_service = ImageService::new(blob_store, config.presigned_url_expiry);
    let identity_verifier = IdentityVerifier::new(&environment.jwt_secret());

    server::start(AppState::new(image_service, identity_verifier, config)).await
}
