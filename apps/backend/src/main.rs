#[tokio::main]
async fn main() -> anyhow::Result<()> {
    petit_adam_backend::run().await
}
