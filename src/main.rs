fn main() {
    if let Err(err) = toulmin_diagram::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
