fn main() {
    println!("cargo:rerun-if-changed=verdant.json");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
