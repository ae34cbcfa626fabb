#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    usi_portal::run().await
}
