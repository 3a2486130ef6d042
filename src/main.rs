#[tokio::main]
async fn main() {
    if let Err(e) = devevent_backend::run().await {
        eprintln!("devevent-backend failed: {}", e);
        std::process::exit(1);
    }
}
