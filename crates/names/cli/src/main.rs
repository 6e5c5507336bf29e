//! names binary entry point

#[tokio::main]
async fn main() {
    if let Err(err) = names_cli::run().await {
        names_cli::print_error(&format!("{}: {}", err.kind(), err));
        std::process::exit(1);
    }
}
