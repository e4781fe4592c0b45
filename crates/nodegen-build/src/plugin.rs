use crate::{
    Generator,
    artifact::{Artifact, ArtifactKind},
    error::GenerateError,
    naming,
};
use quote::quote;

// generate
// registers one factory per class with the host node registry on start
pub fn generate(generator: &Generator<'_>) -> Result<Artifact, GenerateError> {
    let host = generator.host();
    let name = generator.plugin_name();
    let ty = naming::ident(&name, "the plugin")?;

    let classes = generator
        .model
        .classes()
        .map(|class| generator.classifier_path(&class.ident))
        .collect::<Result<Vec<_>, _>>()?;

    let header = Generator::header(generator.target_name());
    let tokens = quote! {
        #header

        /// Registers a factory for every generated node type.
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #ty;

        impl #host::plugin::Plugin for #ty {
            fn start(&self, graph: &#host::Graph) {
                #(
                    graph
                        .node_registry()
                        .get_or_create_declaration(<#classes>::NODE_NAME)
                        .set_factory(|world: i64, time: i64, id: i64, graph: #host::Graph| {
                            #host::Node::new(<#classes>::new(world, time, id, graph))
                        });
                )*
            }

            fn stop(&self) {}
        }
    };

    Artifact::render(
        name,
        generator.target_package(None),
        ArtifactKind::Plugin,
        tokens,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;
    use nodegen_schema::prelude::*;

    #[test]
    fn one_factory_per_class() {
        let mut model = Model::new();
        model.add_classifier(Class::new(QualifiedName::parse("sample.Person").unwrap()));
        model.add_classifier(Class::new(QualifiedName::parse("sample.Car").unwrap()));
        let config = GeneratorConfig::new("sample.Sample");
        let generator = Generator::new(&model, &config).unwrap();

        let artifact = generate(&generator).unwrap();

        assert_eq!(artifact.name, "SamplePlugin");
        assert_eq!(artifact.package.as_deref(), Some("sample"));
        assert_eq!(artifact.body.matches("set_factory").count(), 2);
        assert!(artifact.body.contains("crate::sample::car::Car"));
    }
}
