fn main() {
    // Build-time config override (see `SystemConfig::load`).
    println!("cargo:rerun-if-env-changed=IOMOD_CONFIG");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
