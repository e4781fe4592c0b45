use nodegen_build::GeneratorConfig;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = GeneratorConfig {
        target: "sample.Sample".to_string(),
        host: "crate::greycat".to_string(),
        ..GeneratorConfig::default()
    };

    nodegen_build::build!(concat!(env!("CARGO_MANIFEST_DIR"), "/model"), config = config);

    Ok(())
}
