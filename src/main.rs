use drone_arcade::common::state::GameMode;

fn main() {
    let mode = std::env::args()
        .nth(1)
        .and_then(|arg| GameMode::from_arg(&arg))
        .unwrap_or_default();
    drone_arcade::game::run(mode);
}
