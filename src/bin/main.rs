fn main() {
  fee_engine::main();
}
