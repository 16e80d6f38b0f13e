use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    taskmy::tui::run().await
}
