//! Process-wide registries: file protos and their source-info side tables
//! go in, memoized wrapped descriptors come out.
//!
//! Population is lazy. The first lookup touching a file builds its
//! descriptor (recursively building registered dependencies), wraps it,
//! and registers every message, enum, extension and service found inside
//! into the type registry. Repeated lookups for the same logical entity
//! return value-identical wrappers.

use crate::location::RawLocation;
use crate::wrap::{
    self, SourceEnum, SourceEnumValue, SourceExtension, SourceField, SourceFile, SourceMessage,
    SourceMethod, SourceOneof, SourceService,
};
use crate::SourceLocation;
use prost::Message as _;
use prost_types::{FileDescriptorProto, SourceCodeInfo};
use srcinfo_descriptor::{BuildError, FileDescriptor, FileOrigin};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use thiserror::Error;
use tracing::debug;

/// Errors reported by the registries.
///
/// Everything here is a *not found* or a registration-input problem; lookup
/// operations have no other failure class.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No file proto registered under this path.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The path that was looked up or depended upon.
        path: String,
    },
    /// No registered type carries this fully-qualified name.
    #[error("type not found: {name}")]
    TypeNotFound {
        /// The name that was looked up.
        name: String,
    },
    /// No registered extension extends this message at this number.
    #[error("extension not found: {message} number {number}")]
    ExtensionNotFound {
        /// Fully-qualified name of the extended message.
        message: String,
        /// The extension field number.
        number: i32,
    },
    /// A file proto was registered twice under one path.
    #[error("file already registered: {path}")]
    DuplicateFile {
        /// The repeated path.
        path: String,
    },
    /// Registered files import each other in a cycle.
    #[error("import cycle involving {path}")]
    DependencyCycle {
        /// A file on the cycle.
        path: String,
    },
    /// A registered file proto could not be assembled into a descriptor.
    #[error(transparent)]
    Invalid(#[from] BuildError),
    /// An encoded source-info side table failed to decode.
    #[error("invalid source info for {path}")]
    Decode {
        /// Path the side table was registered for.
        path: String,
        /// The underlying decode failure.
        #[source]
        source: prost::DecodeError,
    },
}

/// A wrapped named descriptor, as resolved by
/// [`find_descriptor_by_full_name`]. Files have paths, not dotted names,
/// and are found through [`find_file_by_path`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// A message.
    Message(SourceMessage),
    /// A regular field.
    Field(SourceField),
    /// A oneof.
    Oneof(SourceOneof),
    /// An enum.
    Enum(SourceEnum),
    /// An enum value.
    EnumValue(SourceEnumValue),
    /// An extension field.
    Extension(SourceExtension),
    /// A service.
    Service(SourceService),
    /// An RPC method.
    Method(SourceMethod),
}

impl SourceDescriptor {
    /// Short name of the wrapped element.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Message(d) => d.name(),
            Self::Field(d) => d.name(),
            Self::Oneof(d) => d.name(),
            Self::Enum(d) => d.name(),
            Self::EnumValue(d) => d.name(),
            Self::Extension(d) => d.name(),
            Self::Service(d) => d.name(),
            Self::Method(d) => d.name(),
        }
    }

    /// Fully-qualified name of the wrapped element.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self {
            Self::Message(d) => d.full_name(),
            Self::Field(d) => d.full_name(),
            Self::Oneof(d) => d.full_name(),
            Self::Enum(d) => d.full_name(),
            Self::EnumValue(d) => d.full_name(),
            Self::Extension(d) => d.full_name(),
            Self::Service(d) => d.full_name(),
            Self::Method(d) => d.full_name(),
        }
    }

    /// Location record of the wrapped element, honoring each kind's
    /// exclusion rules.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Message(d) => d.location(),
            Self::Field(d) => d.location(),
            Self::Oneof(d) => d.location(),
            Self::Enum(d) => d.location(),
            Self::EnumValue(d) => d.location(),
            Self::Extension(d) => d.location(),
            Self::Service(d) => d.location(),
            Self::Method(d) => d.location(),
        }
    }

    /// Leading comment text, empty when absent.
    #[must_use]
    pub fn leading_comments(&self) -> &str {
        self.location().map_or("", SourceLocation::leading_comments)
    }

    /// Trailing comment text, empty when absent.
    #[must_use]
    pub fn trailing_comments(&self) -> &str {
        self.location()
            .map_or("", SourceLocation::trailing_comments)
    }

    /// The message wrapper, if this is a message.
    #[must_use]
    pub fn as_message(&self) -> Option<&SourceMessage> {
        match self {
            Self::Message(d) => Some(d),
            _ => None,
        }
    }

    /// The field wrapper, if this is a regular field.
    #[must_use]
    pub fn as_field(&self) -> Option<&SourceField> {
        match self {
            Self::Field(d) => Some(d),
            _ => None,
        }
    }

    /// The enum wrapper, if this is an enum.
    #[must_use]
    pub fn as_enum(&self) -> Option<&SourceEnum> {
        match self {
            Self::Enum(d) => Some(d),
            _ => None,
        }
    }

    /// The extension wrapper, if this is an extension.
    #[must_use]
    pub fn as_extension(&self) -> Option<&SourceExtension> {
        match self {
            Self::Extension(d) => Some(d),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Registry {
    /// Registered file protos, keyed by path.
    protos: RwLock<HashMap<String, FileDescriptorProto>>,
    /// Registered source-info side tables, keyed by path.
    records: RwLock<HashMap<String, Arc<Vec<RawLocation>>>>,
    /// Built and wrapped files, keyed by path.
    files: RwLock<HashMap<String, SourceFile>>,
    /// Wrapped named types (messages, enums, extensions, services).
    types: RwLock<HashMap<String, SourceDescriptor>>,
    /// Wrapped extensions keyed by (extended message, field number).
    extensions: RwLock<HashMap<(String, i32), SourceExtension>>,
}

fn global() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::default)
}

/// Registers a file descriptor proto under its declared path.
///
/// # Errors
///
/// [`RegistryError::DuplicateFile`] when the path is already registered.
pub fn register_file(proto: FileDescriptorProto) -> Result<(), RegistryError> {
    let path = proto.name().to_owned();
    let mut protos = global().protos.write().unwrap_or_else(PoisonError::into_inner);
    if protos.contains_key(&path) {
        return Err(RegistryError::DuplicateFile { path });
    }
    debug!(file = path.as_str(), "registered file proto");
    protos.insert(path, proto);
    Ok(())
}

/// Registers the source-info side table for a file path, replacing any
/// previous registration.
///
/// Register side tables before the first lookup touching their file;
/// already-built wrapped files do not pick up later registrations.
pub fn register_source_info(path: &str, records: Vec<RawLocation>) {
    debug!(
        file = path,
        records = records.len(),
        "registered source info"
    );
    global()
        .records
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(path.to_owned(), Arc::new(records));
}

/// Registers a serialized `SourceCodeInfo` side table, as emitted by the
/// companion generator, for a file path.
///
/// # Errors
///
/// [`RegistryError::Decode`] when the bytes are not a valid
/// `SourceCodeInfo` message.
pub fn register_encoded_source_info(path: &str, bytes: &[u8]) -> Result<(), RegistryError> {
    let info = SourceCodeInfo::decode(bytes).map_err(|source| RegistryError::Decode {
        path: path.to_owned(),
        source,
    })?;
    register_source_info(path, RawLocation::from_source_code_info(&info));
    Ok(())
}

/// The registered raw records for a path, if any.
pub(crate) fn registered_records(path: &str) -> Option<Arc<Vec<RawLocation>>> {
    global()
        .records
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(path)
        .cloned()
}

/// The memoized wrapped file for this exact file instance, if the registry
/// built it.
pub(crate) fn cached_wrapped_file(file: &FileDescriptor) -> Option<SourceFile> {
    let files = global().files.read().unwrap_or_else(PoisonError::into_inner);
    let cached = files.get(file.name())?;
    (cached.underlying() == file).then(|| cached.clone())
}

/// Finds a registered file by path, building and wrapping it on first use.
///
/// # Errors
///
/// [`RegistryError::FileNotFound`] when neither the path nor one of its
/// dependencies is registered; [`RegistryError::DependencyCycle`] when the
/// registered imports form a cycle.
pub fn find_file_by_path(path: &str) -> Result<SourceFile, RegistryError> {
    if let Some(cached) = lookup_built(path) {
        return Ok(cached);
    }
    build_file(path, &mut Vec::new())
}

fn lookup_built(path: &str) -> Option<SourceFile> {
    global()
        .files
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(path)
        .cloned()
}

fn build_file(path: &str, building: &mut Vec<String>) -> Result<SourceFile, RegistryError> {
    if let Some(cached) = lookup_built(path) {
        return Ok(cached);
    }
    if building.iter().any(|p| p == path) {
        return Err(RegistryError::DependencyCycle {
            path: path.to_owned(),
        });
    }
    let proto = global()
        .protos
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(path)
        .cloned()
        .ok_or_else(|| RegistryError::FileNotFound {
            path: path.to_owned(),
        })?;

    building.push(path.to_owned());
    let mut deps = Vec::with_capacity(proto.dependency.len());
    for dep in &proto.dependency {
        deps.push(build_file(dep, building)?.underlying().clone());
    }
    building.pop();

    let fd = FileDescriptor::build(proto, &deps, FileOrigin::Registry)?;
    let info = wrap::source_info_for(&fd);
    let wrapped = SourceFile::with_info(fd, info);

    // First insert wins so every caller observes one wrapped instance.
    let winner = {
        let mut files = global().files.write().unwrap_or_else(PoisonError::into_inner);
        files
            .entry(path.to_owned())
            .or_insert_with(|| wrapped)
            .clone()
    };
    debug!(file = path, "built and wrapped registered file");
    register_types(&winner);
    Ok(winner)
}

fn register_types(file: &SourceFile) {
    let mut types = global().types.write().unwrap_or_else(PoisonError::into_inner);
    let mut extensions = global()
        .extensions
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    for message in file.messages().iter() {
        register_message(&mut types, &mut extensions, &message);
    }
    for en in file.enums().iter() {
        types
            .entry(en.full_name())
            .or_insert_with(|| SourceDescriptor::Enum(en.clone()));
    }
    for ext in file.extensions().iter() {
        register_extension(&mut types, &mut extensions, &ext);
    }
    for service in file.services().iter() {
        types
            .entry(service.full_name())
            .or_insert_with(|| SourceDescriptor::Service(service.clone()));
    }
}

fn register_message(
    types: &mut HashMap<String, SourceDescriptor>,
    extensions: &mut HashMap<(String, i32), SourceExtension>,
    message: &SourceMessage,
) {
    types
        .entry(message.full_name())
        .or_insert_with(|| SourceDescriptor::Message(message.clone()));
    for nested in message.nested_messages().iter() {
        register_message(types, extensions, &nested);
    }
    for en in message.nested_enums().iter() {
        types
            .entry(en.full_name())
            .or_insert_with(|| SourceDescriptor::Enum(en.clone()));
    }
    for ext in message.nested_extensions().iter() {
        register_extension(types, extensions, &ext);
    }
}

fn register_extension(
    types: &mut HashMap<String, SourceDescriptor>,
    extensions: &mut HashMap<(String, i32), SourceExtension>,
    ext: &SourceExtension,
) {
    types
        .entry(ext.full_name())
        .or_insert_with(|| SourceDescriptor::Extension(ext.clone()));
    extensions
        .entry((ext.extendee().to_owned(), ext.number()))
        .or_insert_with(|| ext.clone());
}

/// Builds every registered file that is not built yet, in path order.
/// Files that fail to build are skipped; lookups that still miss report
/// not-found.
fn build_remaining() {
    let mut paths: Vec<String> = {
        let protos = global().protos.read().unwrap_or_else(PoisonError::into_inner);
        protos.keys().cloned().collect()
    };
    paths.sort();
    for path in paths {
        if lookup_built(&path).is_none() {
            if let Err(err) = build_file(&path, &mut Vec::new()) {
                debug!(file = path.as_str(), %err, "skipping unbuildable file");
            }
        }
    }
}

fn lookup_type(name: &str) -> Option<SourceDescriptor> {
    if let Some(hit) = global()
        .types
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
    {
        return Some(hit.clone());
    }
    build_remaining();
    global()
        .types
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// Finds a registered message by fully-qualified name.
///
/// # Errors
///
/// [`RegistryError::TypeNotFound`] when no registered file declares a
/// message with this name.
pub fn find_message_by_full_name(name: &str) -> Result<SourceMessage, RegistryError> {
    match lookup_type(name) {
        Some(SourceDescriptor::Message(m)) => Ok(m),
        _ => Err(RegistryError::TypeNotFound {
            name: name.to_owned(),
        }),
    }
}

/// Finds a registered enum by fully-qualified name.
///
/// # Errors
///
/// [`RegistryError::TypeNotFound`] when no registered file declares an
/// enum with this name.
pub fn find_enum_by_full_name(name: &str) -> Result<SourceEnum, RegistryError> {
    match lookup_type(name) {
        Some(SourceDescriptor::Enum(e)) => Ok(e),
        _ => Err(RegistryError::TypeNotFound {
            name: name.to_owned(),
        }),
    }
}

/// Finds a registered extension by fully-qualified name.
///
/// # Errors
///
/// [`RegistryError::TypeNotFound`] when no registered file declares an
/// extension with this name.
pub fn find_extension_by_full_name(name: &str) -> Result<SourceExtension, RegistryError> {
    match lookup_type(name) {
        Some(SourceDescriptor::Extension(e)) => Ok(e),
        _ => Err(RegistryError::TypeNotFound {
            name: name.to_owned(),
        }),
    }
}

/// Finds a registered extension by extended message and field number.
///
/// # Errors
///
/// [`RegistryError::ExtensionNotFound`] when nothing registered extends
/// `containing` at `number`.
pub fn find_extension_by_number(
    containing: &str,
    number: i32,
) -> Result<SourceExtension, RegistryError> {
    let key = (containing.to_owned(), number);
    let hit = {
        let extensions = global()
            .extensions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        extensions.get(&key).cloned()
    };
    if let Some(ext) = hit {
        return Ok(ext);
    }
    build_remaining();
    let extensions = global()
        .extensions
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    extensions
        .get(&key)
        .cloned()
        .ok_or_else(|| RegistryError::ExtensionNotFound {
            message: containing.to_owned(),
            number,
        })
}

/// Finds any registered descriptor by fully-qualified name: named types
/// directly, and fields, oneofs, enum values and methods through their
/// containing type.
///
/// # Errors
///
/// [`RegistryError::TypeNotFound`] when the name resolves to nothing.
pub fn find_descriptor_by_full_name(name: &str) -> Result<SourceDescriptor, RegistryError> {
    if let Some(hit) = lookup_type(name) {
        return Ok(hit);
    }
    let not_found = || RegistryError::TypeNotFound {
        name: name.to_owned(),
    };
    let (prefix, last) = name.rsplit_once('.').ok_or_else(not_found)?;
    match lookup_type(prefix) {
        Some(SourceDescriptor::Message(m)) => {
            if let Some(field) = m.field_by_name(last) {
                return Ok(SourceDescriptor::Field(field));
            }
            if let Some(oneof) = m.oneof_by_name(last) {
                return Ok(SourceDescriptor::Oneof(oneof));
            }
            // Enum values scope to the enum's container, so a value of a
            // nested enum is named `<message>.<VALUE>`.
            for en in m.nested_enums().iter() {
                if let Some(value) = en.value_by_name(last) {
                    return Ok(SourceDescriptor::EnumValue(value));
                }
            }
            Err(not_found())
        }
        Some(SourceDescriptor::Service(s)) => s
            .method_by_name(last)
            .map(SourceDescriptor::Method)
            .ok_or_else(not_found),
        _ => {
            // Top-level enum values are scoped to the package.
            let files = global().files.read().unwrap_or_else(PoisonError::into_inner);
            for file in files.values() {
                if file.package() != prefix {
                    continue;
                }
                for en in file.enums().iter() {
                    if let Some(value) = en.value_by_name(last) {
                        return Ok(SourceDescriptor::EnumValue(value));
                    }
                }
            }
            Err(not_found())
        }
    }
}
