fn main() {
    if let Err(err) = sankey_flow::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
