use wgsl_to_wgpu::{MatrixVectorTypes, WriteOptions, create_shader_module};

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();

    for name in ["skinning", "solid"] {
        println!("cargo:rerun-if-changed=src/shader/{name}.wgsl");

        let options = WriteOptions {
            derive_bytemuck_vertex: true,
            derive_encase_host_shareable: true,
            matrix_vector_types: MatrixVectorTypes::Glam,
            ..Default::default()
        };

        let path = format!("{manifest_dir}/src/shader/{name}.wgsl");
        let wgsl = std::fs::read_to_string(&path).unwrap();

        // The generated module includes the WGSL source from its absolute path.
        let text = create_shader_module(&wgsl, &path, options).unwrap();
        std::fs::write(format!("{out_dir}/{name}.rs"), text).unwrap();
    }
}
