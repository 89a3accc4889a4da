//! Tasks Gateway - Entry Point
//!
//! WebSocket gateway that fans task change events out to connected clients.

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tasks_gateway::run().await
}
