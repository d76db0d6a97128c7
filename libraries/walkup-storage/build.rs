//! Build script for walkup-storage.
//!
//! Rebuilds the crate when the embedded record-table migrations change.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
