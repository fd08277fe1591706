//! Bindings generated by `build.rs` from the WGSL shaders in `src/shader`.

pub mod skinning {
    include!(concat!(env!("OUT_DIR"), "/skinning.rs"));
}

pub mod solid {
    include!(concat!(env!("OUT_DIR"), "/solid.rs"));
}
