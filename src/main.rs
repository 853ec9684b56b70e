fn main() -> eframe::Result {
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Info)
        .parse_default_env()
        .init();

    locgrid::run_gui()
}
