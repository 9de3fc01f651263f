//! A provider backed by a fixed set of in-memory binaries.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use crate::{
    provider::TypeMetadataProvider,
    test::MockType,
    Error, Result,
};

/// Serves [`MockType`]s; "binaries" are registered by path up front
#[derive(Debug, Default)]
pub struct MockProvider {
    preloaded: Vec<MockType>,
    binaries: HashMap<PathBuf, Vec<MockType>>,
    loaded: Vec<PathBuf>,
}

impl MockProvider {
    pub fn new() -> Self {
        MockProvider::default()
    }

    /// Make a type visible without loading anything, like a host-provided default set
    pub fn add_type(&mut self, ty: MockType) {
        self.preloaded.push(ty);
    }

    /// Register the types a binary exposes once loaded
    pub fn add_binary(&mut self, path: &str, types: Vec<MockType>) {
        self.binaries.insert(PathBuf::from(path), types);
    }

    /// Paths loaded so far, in load order
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }
}

impl TypeMetadataProvider for MockProvider {
    type Handle = MockType;

    fn load_binary(&mut self, path: &Path) -> Result<()> {
        if !self.binaries.contains_key(path) {
            return Err(Error::Load {
                path: path.to_path_buf(),
                source: Box::new(io::Error::new(io::ErrorKind::NotFound, "no such binary")),
            });
        }

        self.loaded.push(path.to_path_buf());
        Ok(())
    }

    fn visible_types(&self) -> Vec<MockType> {
        let mut types = self.preloaded.clone();
        for path in &self.loaded {
            if let Some(binary) = self.binaries.get(path) {
                types.extend(binary.iter().cloned());
            }
        }
        types
    }
}
