fn main() {
    snapkeep::cli::run();
}
