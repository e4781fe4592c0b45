use crate::{
    artifact::{Artifact, ArtifactKind, MODULE_INDEX},
    error::GenerateError,
    naming,
};
use quote::quote;
use std::collections::{BTreeMap, BTreeSet};

///
/// Package
///

#[derive(Default)]
struct Package {
    children: BTreeSet<String>,
    modules: BTreeSet<String>,
}

// generate
// one `mod.rs` per package, root included, so the artifact tree compiles
// as a module tree
pub fn generate(artifacts: &[Artifact]) -> Result<Vec<Artifact>, GenerateError> {
    let mut packages: BTreeMap<Vec<String>, Package> = BTreeMap::new();
    packages.entry(Vec::new()).or_default();

    for artifact in artifacts {
        let segments: Vec<String> = artifact
            .package_segments()
            .into_iter()
            .map(str::to_string)
            .collect();

        for depth in 0..segments.len() {
            packages
                .entry(segments[..depth].to_vec())
                .or_default()
                .children
                .insert(segments[depth].clone());
        }
        let module = artifact.module();
        if !packages.entry(segments).or_default().modules.insert(module.clone()) {
            return Err(collision(artifact, module));
        }
    }

    // a class module may not shadow a sub-package such as `task` or `time`
    for (segments, package) in &packages {
        if let Some(module) = package.modules.intersection(&package.children).next() {
            return Err(GenerateError::InvalidIdentifier {
                context: format!(
                    "a module that is also a sub-package of '{}'",
                    segments.join(".")
                ),
                value: module.clone(),
            });
        }
    }

    packages
        .into_iter()
        .map(|(segments, package)| {
            let children = package
                .children
                .iter()
                .chain(&package.modules)
                .map(|module| naming::ident(module, format!("module '{module}'")))
                .collect::<Result<Vec<_>, _>>()?;

            let tokens = quote! {
                #(pub mod #children;)*
            };
            let name = segments
                .last()
                .cloned()
                .unwrap_or_else(|| MODULE_INDEX.to_string());
            let package = (!segments.is_empty()).then(|| segments.join("."));

            Artifact::render(name, package, ArtifactKind::ModuleIndex, tokens)
        })
        .collect()
}

fn collision(artifact: &Artifact, module: String) -> GenerateError {
    GenerateError::InvalidIdentifier {
        context: format!("a second module in the package of '{}'", artifact.fqn()),
        value: module,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str, package: Option<&str>) -> Artifact {
        Artifact::render(
            name,
            package.map(str::to_string),
            ArtifactKind::Entity,
            quote!(
                pub struct Marker;
            ),
        )
        .unwrap()
    }

    #[test]
    fn every_package_gets_an_index() {
        let artifacts = vec![
            artifact("Person", Some("sample")),
            artifact("SampleTaskApi", Some("sample.task")),
            artifact("Loose", None),
        ];

        let indexes = generate(&artifacts).unwrap();
        let paths: Vec<_> = indexes.iter().map(Artifact::relative_path).collect();

        assert_eq!(
            paths,
            [
                std::path::PathBuf::from("mod.rs"),
                "sample/mod.rs".into(),
                "sample/task/mod.rs".into(),
            ]
        );
        let lines = |body: &str| -> Vec<String> {
            body.lines()
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        };
        assert_eq!(lines(&indexes[0].body), ["pub mod sample;", "pub mod loose;"]);
        assert_eq!(lines(&indexes[1].body), ["pub mod task;", "pub mod person;"]);
    }

    #[test]
    fn duplicate_module_is_rejected() {
        let artifacts = vec![
            artifact("SampleModel", Some("sample")),
            artifact("SampleModel", Some("sample")),
        ];

        let err = generate(&artifacts).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::InvalidIdentifier { ref value, .. } if value == "sample_model"
        ));
    }

    #[test]
    fn module_shadowing_a_package_is_rejected() {
        let artifacts = vec![
            artifact("Time", Some("sample")),
            artifact("SampleTimeHelper", Some("sample.time")),
        ];

        let err = generate(&artifacts).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::InvalidIdentifier { ref value, .. } if value == "time"
        ));
    }
}
