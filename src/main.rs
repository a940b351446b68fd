fn main() {
    if let Err(err) = questionchain_lib::run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
