fn main() {
    if let Err(e) = notefeed::app::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
