use env_logger::Env;

fn main() {
    let cli = amass_mapper::cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
    let code = amass_mapper::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
