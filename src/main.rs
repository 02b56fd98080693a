#[tokio::main]
async fn main() {
    if let Err(e) = techline_leads::web::run().await {
        techline_leads::tlog!("fatal: {}", e);
        std::process::exit(1);
    }
}
