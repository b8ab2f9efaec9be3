pub use remedi::api::extract_handler::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    remedi::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
