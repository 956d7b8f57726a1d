fn main() {
    if let Err(err) = archdot::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
