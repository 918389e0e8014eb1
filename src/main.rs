mod app;
mod assets;
mod audio;
mod input;
mod pet;
mod platform;
mod render;


fn main() {
    env_logger::init();
    log::info!("DeskPet starting up");

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
