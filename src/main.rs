fn main() {
    if let Err(err) = ap_convert::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
