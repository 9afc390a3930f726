//! Package metadata generated from `Cargo.toml` by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/pkg_info.rs"));
