fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/semantic.proto");
    println!("cargo:rerun-if-changed=proto");

    // The server half backs the wire-level tests of the gRPC adapter.
    tonic_prost_build::configure()
        .build_client(true)
        .build_server(true)
        .compile_protos(&["proto/semantic.proto"], &["proto"])?;

    Ok(())
}
