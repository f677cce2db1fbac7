//! File descriptor handles and their construction.

use crate::enums::Enums;
use crate::field::Extensions;
use crate::message::Messages;
use crate::path::tag;
use crate::service::Services;
use prost_types::{FileDescriptorProto, SourceCodeInfo};
use std::fmt;
use std::sync::Arc;

/// Where a [`FileDescriptor`] came from.
///
/// The source-info layer only knows how to re-associate files that were
/// built out of a registered descriptor proto; files assembled by other
/// means are left alone by its capability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOrigin {
    /// Built from a proto registered with the process-wide file registry.
    Registry,
    /// Built directly by a caller, outside any registry.
    Standalone,
}

/// Errors from [`FileDescriptor::build`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The proto declares a dependency that was not supplied.
    #[error("{file}: unresolved import {import:?}")]
    MissingDependency {
        /// Path of the file being built.
        file: String,
        /// The declared dependency that could not be resolved.
        import: String,
    },
    /// The same dependency path was supplied more than once.
    #[error("{file}: duplicate dependency {import:?}")]
    DuplicateDependency {
        /// Path of the file being built.
        file: String,
        /// The repeated dependency path.
        import: String,
    },
}

pub(crate) struct FileInner {
    proto: FileDescriptorProto,
    /// Resolved handles, index-aligned with `proto.dependency`.
    dependencies: Vec<FileDescriptor>,
    origin: FileOrigin,
}

impl fmt::Debug for FileInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileInner")
            .field("name", &self.proto.name())
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// A protobuf file descriptor.
///
/// Cheap to clone; two clones of the same build are equal, two builds of
/// the same proto are not. A file is its own [`parent_file`](Self::parent_file).
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    inner: Arc<FileInner>,
}

impl PartialEq for FileDescriptor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for FileDescriptor {}

impl FileDescriptor {
    /// Builds a file handle from its proto and the already-built handles of
    /// every file it imports.
    ///
    /// `deps` may be in any order and may contain extra files; each declared
    /// dependency must appear exactly once.
    ///
    /// # Errors
    ///
    /// [`BuildError::MissingDependency`] when a declared import is absent
    /// from `deps`, [`BuildError::DuplicateDependency`] when a path occurs
    /// more than once in `deps`.
    pub fn build(
        proto: FileDescriptorProto,
        deps: &[FileDescriptor],
        origin: FileOrigin,
    ) -> Result<Self, BuildError> {
        for (i, dep) in deps.iter().enumerate() {
            if deps[..i].iter().any(|d| d.name() == dep.name()) {
                return Err(BuildError::DuplicateDependency {
                    file: proto.name().to_owned(),
                    import: dep.name().to_owned(),
                });
            }
        }
        let mut dependencies = Vec::with_capacity(proto.dependency.len());
        for import in &proto.dependency {
            let dep = deps
                .iter()
                .find(|d| d.name() == import)
                .ok_or_else(|| BuildError::MissingDependency {
                    file: proto.name().to_owned(),
                    import: import.clone(),
                })?;
            dependencies.push(dep.clone());
        }
        Ok(Self {
            inner: Arc::new(FileInner {
                proto,
                dependencies,
                origin,
            }),
        })
    }

    /// The file path, e.g. `"shop/order.proto"`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.proto.name()
    }

    /// The proto package, possibly empty.
    #[must_use]
    pub fn package(&self) -> &str {
        self.inner.proto.package()
    }

    /// The declared syntax (`"proto2"` when unset, per descriptor.proto).
    #[must_use]
    pub fn syntax(&self) -> &str {
        let s = self.inner.proto.syntax();
        if s.is_empty() {
            "proto2"
        } else {
            s
        }
    }

    /// Provenance marker consulted by the source-info layer.
    #[must_use]
    pub fn origin(&self) -> FileOrigin {
        self.inner.origin
    }

    /// A file is its own parent file.
    #[must_use]
    pub fn parent_file(&self) -> &FileDescriptor {
        self
    }

    /// Top-level messages.
    #[must_use]
    pub fn messages(&self) -> Messages {
        Messages::new(self.clone(), &[], tag::FILE_MESSAGE)
    }

    /// Top-level enums.
    #[must_use]
    pub fn enums(&self) -> Enums {
        Enums::new(self.clone(), &[], tag::FILE_ENUM)
    }

    /// Services declared in this file.
    #[must_use]
    pub fn services(&self) -> Services {
        Services::new(self.clone())
    }

    /// Top-level extension declarations.
    #[must_use]
    pub fn extensions(&self) -> Extensions {
        Extensions::new(self.clone(), &[], tag::FILE_EXTENSION)
    }

    /// Imports of this file, with resolved files and public/weak flags.
    #[must_use]
    pub fn imports(&self) -> Imports {
        Imports { file: self.clone() }
    }

    /// Native source code info carried by the proto, if any.
    #[must_use]
    pub fn source_code_info(&self) -> Option<&SourceCodeInfo> {
        self.inner.proto.source_code_info.as_ref()
    }

    /// Number of native source locations; zero when the compiler stripped
    /// them from the embedded proto.
    #[must_use]
    pub fn location_count(&self) -> usize {
        self.source_code_info().map_or(0, |i| i.location.len())
    }

    /// The underlying descriptor proto.
    #[must_use]
    pub fn proto(&self) -> &FileDescriptorProto {
        &self.inner.proto
    }
}

/// One resolved import of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The imported file.
    pub file: FileDescriptor,
    /// Whether the import is `import public`.
    pub is_public: bool,
    /// Whether the import is `import weak`.
    pub is_weak: bool,
}

/// Lazy view over a file's imports.
#[derive(Debug, Clone)]
pub struct Imports {
    file: FileDescriptor,
}

impl Imports {
    /// Number of imports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.file.inner.dependencies.len()
    }

    /// Whether the file imports anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`th import, in declaration order.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<Import> {
        let file = self.file.inner.dependencies.get(i)?.clone();
        let idx = i32::try_from(i).ok()?;
        let proto = &self.file.inner.proto;
        Some(Import {
            file,
            is_public: proto.public_dependency.contains(&idx),
            is_weak: proto.weak_dependency.contains(&idx),
        })
    }

    /// Iterates imports in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Import> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}
