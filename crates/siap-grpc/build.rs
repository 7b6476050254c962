use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only rebuild if protos change
    println!("cargo:rerun-if-changed=../../proto/");

    let proto_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent().unwrap()  // crates
        .parent().unwrap()  // workspace root
        .join("proto");

    let proto_files = vec![
        proto_root.join("common.proto"),
        proto_root.join("office_types.proto"),
        proto_root.join("office_service.proto"),
    ];

    for proto_file in &proto_files {
        if !proto_file.exists() {
            panic!("Proto file not found: {:?}", proto_file);
        }
    }

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile(
            &proto_files.iter().map(|p| p.to_str().unwrap()).collect::<Vec<_>>(),
            &[proto_root.to_str().unwrap()],
        )?;

    Ok(())
}
