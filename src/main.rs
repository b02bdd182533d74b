fn main() {
    if let Err(err) = desem_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
