fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate the ImageService server from the proto definition
    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .compile_protos(&["proto/image.proto"], &["proto"])?;
    println!("cargo:rerun-if-changed=proto/image.proto");
    Ok(())
}
