//! Build script for rfsg-proto
//!
//! Generates gRPC/protobuf bindings during `cargo build`. Uses `$PROTOC` when
//! set, otherwise the vendored compiler.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    println!("cargo:rerun-if-changed=proto");

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .type_attribute(".", "#[allow(missing_docs)]")
        .compile(&["proto/nirfsg.proto", "proto/health.proto"], &["proto"])?;

    Ok(())
}
