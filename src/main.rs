// =============================================================================
// main.rs - Point d'entrée : journalisation puis session
// main.rs - Entry point: logging then session
// =============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = cursor_checker::run() {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}
