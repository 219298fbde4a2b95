use log::error;

fn main() {
    env_logger::init();

    if let Err(e) = rmstory_rust::run() {
        error!("extraction failed: {e:?}");
        eprintln!("Error: {e:#}");
        eprintln!("Check that the path points at the game directory and that the JSON files are plain text.");
        std::process::exit(1);
    }
}
