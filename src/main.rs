fn main() {
    if let Err(err) = npv::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
