#[tokio::main]
async fn main() {
    // Errors are already logged where they happen; only the exit status is left to set.
    if guess_server::frameworks::server::run_with_config()
        .await
        .is_err()
    {
        std::process::exit(1);
    }
}
