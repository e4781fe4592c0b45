use crate::{
    Generator,
    artifact::{Artifact, ArtifactKind},
    error::GenerateError,
    naming,
};
use quote::{format_ident, quote};

const PACKAGE: &str = "time";

/// Units with their constant names, smallest first.
const UNITS: [(&str, &str); 4] = [
    ("second", "ONE_SECOND"),
    ("minute", "ONE_MINUTE"),
    ("hour", "ONE_HOUR"),
    ("day", "ONE_DAY"),
];

// generate
// millisecond durations plus offsets from a given time
pub fn generate(generator: &Generator<'_>) -> Result<Artifact, GenerateError> {
    let name = format!("{}TimeHelper", generator.target_name());
    let ty = naming::ident(&name, "the time helper")?;

    let functions = UNITS.iter().map(|(unit, constant)| {
        let constant = format_ident!("{}", constant);
        let span = format_ident!("{}s", unit);
        let next = format_ident!("next_{}s", unit);
        let prev = format_ident!("prev_{}s", unit);

        quote! {
            #[must_use]
            pub const fn #span(nb: i32) -> i64 {
                nb as i64 * Self::#constant
            }

            #[must_use]
            pub const fn #next(current: i64, nb: i32) -> i64 {
                current + Self::#span(nb)
            }

            #[must_use]
            pub const fn #prev(current: i64, nb: i32) -> i64 {
                current - Self::#span(nb)
            }
        }
    });

    let header = Generator::header(generator.target_name());
    let tokens = quote! {
        #header

        /// Time arithmetic in milliseconds.
        #[derive(Clone, Copy, Debug)]
        pub struct #ty;

        impl #ty {
            pub const ONE_SECOND: i64 = 1000;
            pub const ONE_MINUTE: i64 = 60 * Self::ONE_SECOND;
            pub const ONE_HOUR: i64 = 60 * Self::ONE_MINUTE;
            pub const ONE_DAY: i64 = 24 * Self::ONE_HOUR;

            #(#functions)*
        }
    };

    Artifact::render(
        name,
        generator.target_package(Some(PACKAGE)),
        ArtifactKind::TimeHelper,
        tokens,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;
    use nodegen_schema::prelude::*;

    #[test]
    fn helper_lives_in_the_time_package() {
        let model = Model::new();
        let config = GeneratorConfig::new("sample.Sample");
        let artifact = generate(&Generator::new(&model, &config).unwrap()).unwrap();

        assert_eq!(artifact.fqn(), "sample.time.SampleTimeHelper");
        assert!(artifact.body.contains("pub const ONE_DAY: i64 = 24 * Self::ONE_HOUR;"));
        assert!(artifact.body.contains("pub const fn prev_days(current: i64, nb: i32) -> i64"));
    }

    #[test]
    fn unpackaged_target_uses_a_bare_time_package() {
        let model = Model::new();
        let config = GeneratorConfig::new("Sample");
        let artifact = generate(&Generator::new(&model, &config).unwrap()).unwrap();

        assert_eq!(artifact.package.as_deref(), Some("time"));
    }
}
