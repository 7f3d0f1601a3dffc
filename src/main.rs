#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    studio_scheduler::run().await
}
