#[tokio::main]
async fn main() {
    if let Err(e) = openid_decode_cli::run().await {
        eprintln!("error: {e}");
        for hint in e.suggestions() {
            eprintln!("  hint: {hint}");
        }
        std::process::exit(1);
    }
}
