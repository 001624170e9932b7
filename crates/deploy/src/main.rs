#[tokio::main]
async fn main() {
    deploy::start(std::env::args()).await;
}
