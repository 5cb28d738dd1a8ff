fn main() {
    if let Err(err) = region_sql::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
