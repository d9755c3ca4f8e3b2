fn main() {
    if let Err(err) = jdx::run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
