fn main() {
    // ESP-IDF link arguments are only needed for the firmware binary.
    // Host builds (library + tests) skip the IDF environment entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
