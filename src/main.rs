#[tokio::main]
async fn main() {
    if let Err(e) = chambee_backend::run().await {
        eprintln!("chambee-backend failed to start: {}", e);
        std::process::exit(1);
    }
}
