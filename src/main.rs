fn main() {
    wyrm::uci::run();
}
