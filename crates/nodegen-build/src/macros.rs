//! Build-script helper that generates accessors for a model directory into
//! `OUT_DIR/nodegen.rs`, ready for `include!`.
//!
//! The calling `main` must return a `Result` whose error type accepts both
//! `std::env::VarError` and `nodegen_build::Error`, e.g.
//! `Box<dyn std::error::Error>`.
#[macro_export]
macro_rules! build {
    ($dir:expr, config = $config:expr) => {{
        use std::{env::var, fs::File, io::Write, path::PathBuf};

        let dir = PathBuf::from($dir);
        let config: $crate::GeneratorConfig = $config;

        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rerun-if-changed={}", dir.display());

        let out_dir = PathBuf::from(var("OUT_DIR")?);

        //
        // ARTIFACTS
        //

        let source = $crate::generate_inline(&dir, &config)?;
        let mut file = File::create(out_dir.join("nodegen.rs"))?;
        file.write_all(source.as_bytes())?;
    }};
    ($dir:expr, $target:expr) => {
        $crate::build!($dir, config = $crate::GeneratorConfig::new($target))
    };
}
