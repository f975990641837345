//! Code for working with the bundled demo models
use anyhow::{Context, Result, ensure};
use include_dir::{Dir, DirEntry, include_dir};
use std::fs;
use std::path::Path;

/// The directory containing the demo models.
const DEMOS_DIR: Dir = include_dir!("demos");

/// Name of the source file within each demo
pub const MODEL_FILE_NAME: &str = "model.veda.yaml";

/// Get the names of all demos
pub fn get_example_names() -> impl Iterator<Item = &'static str> {
    DEMOS_DIR.dirs().map(|dir| {
        dir.path()
            .as_os_str()
            .to_str()
            .expect("Invalid unicode in path")
    })
}

/// A bundled demo model
pub struct Example(Dir<'static>);

impl Example {
    /// Get the demo with the specified name
    pub fn from_name(name: &str) -> Result<Self> {
        let dir = DEMOS_DIR
            .get_dir(name)
            .with_context(|| format!("Example '{name}' not found"))?;

        Ok(Self(dir.clone()))
    }

    fn get_file(&self, file_name: &str) -> Result<&'static str> {
        self.0
            .get_file(self.0.path().join(file_name))
            .with_context(|| format!("Missing file {file_name}"))?
            .contents_utf8()
            .context("File not UTF-8 encoded")
    }

    /// Get the contents of the readme file for this demo
    pub fn get_readme(&self) -> Result<&'static str> {
        self.get_file("README.txt")
    }

    /// Get the contents of the source file for this demo
    pub fn get_source(&self) -> Result<&'static str> {
        self.get_file(MODEL_FILE_NAME)
    }

    /// Extract this demo to a specified destination
    pub fn extract(&self, new_path: &Path) -> Result<()> {
        ensure!(
            !new_path.exists(),
            "Destination {} already exists",
            new_path.display()
        );
        fs::create_dir_all(new_path)
            .with_context(|| format!("Could not create directory {}", new_path.display()))?;
        for entry in self.0.entries() {
            match entry {
                DirEntry::Dir(_) => panic!("Subdirectories in demos not supported"),
                DirEntry::File(f) => {
                    let file_name = f.path().file_name().expect("Demo file has no name");
                    fs::write(new_path.join(file_name), f.contents())?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_source;
    use crate::input::parse_yaml_document;
    use tempfile::tempdir;

    #[test]
    fn all_examples_have_readme() {
        for example in get_example_names() {
            let readme = Example::from_name(example)
                .unwrap()
                .get_readme()
                .with_context(|| format!("Could not load readme for {example}"))
                .unwrap();

            assert!(!readme.trim().is_empty());
        }
    }

    #[test]
    fn all_examples_compile() {
        for example in get_example_names() {
            let source = Example::from_name(example).unwrap().get_source().unwrap();
            let source = parse_yaml_document(source).unwrap();
            let compilation = compile_source(&source, true)
                .with_context(|| format!("Could not compile {example}"))
                .unwrap();
            assert!(compilation.warnings.is_empty());
        }
    }

    #[test]
    fn extract_example() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out");
        Example::from_name("mini_plant").unwrap().extract(&dest).unwrap();
        assert!(dest.join(MODEL_FILE_NAME).is_file());
        assert!(Example::from_name("mini_plant").unwrap().extract(&dest).is_err());
    }

    #[test]
    fn unknown_example() {
        assert!(Example::from_name("no_such_demo").is_err());
    }
}
