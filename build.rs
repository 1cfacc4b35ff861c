fn main() {
    // No-op on host targets; emits ESP-IDF link/env metadata on espidf.
    embuild::espidf::sysenv::output();
}
