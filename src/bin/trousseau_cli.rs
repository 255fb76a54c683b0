use trousseau::{cli::run_cli, init};

fn main() {
    // Non-fatal; the env vars can be set externally.
    dotenvy::dotenv().ok();
    init();

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
