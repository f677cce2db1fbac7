//! The wrapping layer: one wrapper type per descriptor kind, forwarding
//! every read to the underlying handle while substituting navigation with
//! wrapped equivalents and comment lookup with the file's location index.
//!
//! Wrapping never fails and never surprises: a file that natively carries
//! location info keeps serving it, a file the layer cannot re-associate
//! with registered records (wrong provenance, nothing registered) wraps
//! into a pass-through whose comment lookups are empty. Equality of a
//! wrapper is equality of its underlying handle, so wrapping is invisible
//! to identity checks.

use crate::index::{SourceLocation, SourceLocationIndex};
use crate::location::RawLocation;
use crate::registry;
use srcinfo_descriptor::{
    Cardinality, EnumDescriptor, EnumValueDescriptor, ExtensionDescriptor, FieldDescriptor,
    FileDescriptor, FileOrigin, Kind, MessageDescriptor, MethodDescriptor, OneofDescriptor,
    ServiceDescriptor,
};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, Weak};
use tracing::debug;

/// Shared per-file source info: the raw records and the lazily built index.
///
/// The index build is guarded by a `OnceLock`; concurrent first readers all
/// observe the one fully built index.
#[derive(Debug)]
pub(crate) struct FileSourceInfo {
    file: FileDescriptor,
    records: Arc<Vec<RawLocation>>,
    index: OnceLock<SourceLocationIndex>,
}

impl FileSourceInfo {
    pub(crate) fn new(file: FileDescriptor, records: Arc<Vec<RawLocation>>) -> Arc<Self> {
        Arc::new(Self {
            file,
            records,
            index: OnceLock::new(),
        })
    }

    pub(crate) fn index(&self) -> &SourceLocationIndex {
        self.index
            .get_or_init(|| SourceLocationIndex::build(self.file.clone(), &self.records))
    }
}

/// Decides what source info, if any, a wrapper for `file` carries.
///
/// Native info always wins; otherwise only registry-built files with
/// registered records are re-associated. Everything else is pass-through.
pub(crate) fn source_info_for(file: &FileDescriptor) -> Option<Arc<FileSourceInfo>> {
    if file.location_count() > 0 {
        return Some(native_source_info(file));
    }
    if file.origin() != FileOrigin::Registry {
        debug!(file = file.name(), "not wrapping standalone file");
        return None;
    }
    if let Some(wrapped) = registry::cached_wrapped_file(file) {
        return wrapped.info;
    }
    registry::registered_records(file.name()).map(|records| FileSourceInfo::new(file.clone(), records))
}

/// Shared info for a file carrying native `source_code_info`, memoized per
/// file instance so every wrapper into one file consults one index.
///
/// Keyed by the address of the file's proto, which stays unique to the
/// instance while any `FileSourceInfo` for it is alive (the info holds the
/// file). Dead entries are swept on insert.
fn native_source_info(file: &FileDescriptor) -> Arc<FileSourceInfo> {
    static CACHE: OnceLock<RwLock<HashMap<usize, Weak<FileSourceInfo>>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    let key = file.proto() as *const _ as usize;
    if let Some(info) = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .and_then(Weak::upgrade)
    {
        if &info.file == file {
            return info;
        }
    }
    let mut cache = cache.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(info) = cache.get(&key).and_then(Weak::upgrade) {
        if &info.file == file {
            return info;
        }
    }
    cache.retain(|_, weak| weak.strong_count() > 0);
    let records = file
        .source_code_info()
        .map(RawLocation::from_source_code_info)
        .unwrap_or_default();
    let info = FileSourceInfo::new(file.clone(), Arc::new(records));
    cache.insert(key, Arc::downgrade(&info));
    info
}

macro_rules! comment_accessors {
    () => {
        /// Leading comment text of this element, empty when absent.
        #[must_use]
        pub fn leading_comments(&self) -> &str {
            self.location().map_or("", SourceLocation::leading_comments)
        }

        /// Trailing comment text of this element, empty when absent.
        #[must_use]
        pub fn trailing_comments(&self) -> &str {
            self.location()
                .map_or("", SourceLocation::trailing_comments)
        }

        /// Detached comment blocks above this element.
        #[must_use]
        pub fn leading_detached_comments(&self) -> &[String] {
            self.location()
                .map_or(&[], SourceLocation::leading_detached_comments)
        }
    };
}

// ── File ──

/// A file descriptor with source locations attached.
#[derive(Debug, Clone)]
pub struct SourceFile {
    file: FileDescriptor,
    pub(crate) info: Option<Arc<FileSourceInfo>>,
}

impl PartialEq for SourceFile {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file
    }
}

impl Eq for SourceFile {}

impl SourceFile {
    pub(crate) fn with_info(file: FileDescriptor, info: Option<Arc<FileSourceInfo>>) -> Self {
        Self { file, info }
    }

    /// The underlying unwrapped file descriptor.
    #[must_use]
    pub fn underlying(&self) -> &FileDescriptor {
        &self.file
    }

    /// The file path, e.g. `"shop/order.proto"`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.file.name()
    }

    /// The proto package.
    #[must_use]
    pub fn package(&self) -> &str {
        self.file.package()
    }

    /// The declared syntax.
    #[must_use]
    pub fn syntax(&self) -> &str {
        self.file.syntax()
    }

    /// The file's location index, absent for pass-through wrappers.
    ///
    /// This substitutes the file-level location accessor of the underlying
    /// descriptor: it serves native info when the file embeds some and the
    /// registered side table otherwise.
    #[must_use]
    pub fn location_index(&self) -> Option<&SourceLocationIndex> {
        self.info.as_deref().map(FileSourceInfo::index)
    }

    /// The whole-file location record (empty structural path), if any.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location_index()?.by_path(&[])
    }

    comment_accessors!();

    /// Top-level messages, wrapped.
    #[must_use]
    pub fn messages(&self) -> SourceMessages {
        SourceMessages {
            inner: self.file.messages(),
            info: self.info.clone(),
        }
    }

    /// Top-level enums, wrapped.
    #[must_use]
    pub fn enums(&self) -> SourceEnums {
        SourceEnums {
            inner: self.file.enums(),
            info: self.info.clone(),
        }
    }

    /// Services, wrapped.
    #[must_use]
    pub fn services(&self) -> SourceServices {
        SourceServices {
            inner: self.file.services(),
            info: self.info.clone(),
        }
    }

    /// Top-level extensions, wrapped.
    #[must_use]
    pub fn extensions(&self) -> SourceExtensions {
        SourceExtensions {
            inner: self.file.extensions(),
            info: self.info.clone(),
        }
    }

    /// Imports with their files wrapped in turn.
    #[must_use]
    pub fn imports(&self) -> SourceImports {
        SourceImports {
            inner: self.file.imports(),
        }
    }
}

/// One import with its file wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImport {
    /// The imported file, wrapped by the usual rules.
    pub file: SourceFile,
    /// Whether the import is `import public`.
    pub is_public: bool,
    /// Whether the import is `import weak`.
    pub is_weak: bool,
}

/// Lazy wrapped view over a file's imports.
#[derive(Debug, Clone)]
pub struct SourceImports {
    inner: srcinfo_descriptor::Imports,
}

impl SourceImports {
    /// Number of imports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the file imports anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `i`th import with its file wrapped.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<SourceImport> {
        let import = self.inner.get(i)?;
        Some(SourceImport {
            file: wrap_file(import.file),
            is_public: import.is_public,
            is_weak: import.is_weak,
        })
    }

    /// Iterates imports in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SourceImport> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

// ── Message ──

/// A message descriptor with source locations attached.
#[derive(Debug, Clone)]
pub struct SourceMessage {
    desc: MessageDescriptor,
    info: Option<Arc<FileSourceInfo>>,
}

impl PartialEq for SourceMessage {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc
    }
}

impl Eq for SourceMessage {}

impl SourceMessage {
    fn new(desc: MessageDescriptor, info: Option<Arc<FileSourceInfo>>) -> Self {
        Self { desc, info }
    }

    /// The underlying unwrapped message descriptor.
    #[must_use]
    pub fn underlying(&self) -> &MessageDescriptor {
        &self.desc
    }

    /// Short name of the message.
    #[must_use]
    pub fn name(&self) -> &str {
        self.desc.name()
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.desc.full_name()
    }

    /// Whether this is a synthetic map-entry message.
    #[must_use]
    pub fn is_map_entry(&self) -> bool {
        self.desc.is_map_entry()
    }

    /// The enclosing message, wrapped.
    #[must_use]
    pub fn parent(&self) -> Option<SourceMessage> {
        Some(SourceMessage::new(self.desc.parent()?, self.info.clone()))
    }

    /// The declaring file, wrapped.
    #[must_use]
    pub fn parent_file(&self) -> SourceFile {
        SourceFile::with_info(self.desc.parent_file().clone(), self.info.clone())
    }

    /// This message's location record.
    ///
    /// Synthetic map-entry messages have no source to point at and report
    /// `None` regardless of index contents.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        if self.is_map_entry() {
            return None;
        }
        self.info.as_ref()?.index().by_descriptor(&self.desc)
    }

    comment_accessors!();

    /// Fields, wrapped.
    #[must_use]
    pub fn fields(&self) -> SourceFields {
        SourceFields {
            inner: self.desc.fields(),
            info: self.info.clone(),
        }
    }

    /// Oneofs, wrapped.
    #[must_use]
    pub fn oneofs(&self) -> SourceOneofs {
        SourceOneofs {
            inner: self.desc.oneofs(),
            info: self.info.clone(),
        }
    }

    /// Nested messages, wrapped.
    #[must_use]
    pub fn nested_messages(&self) -> SourceMessages {
        SourceMessages {
            inner: self.desc.nested_messages(),
            info: self.info.clone(),
        }
    }

    /// Nested enums, wrapped.
    #[must_use]
    pub fn nested_enums(&self) -> SourceEnums {
        SourceEnums {
            inner: self.desc.nested_enums(),
            info: self.info.clone(),
        }
    }

    /// Extensions declared inside this message, wrapped.
    #[must_use]
    pub fn nested_extensions(&self) -> SourceExtensions {
        SourceExtensions {
            inner: self.desc.nested_extensions(),
            info: self.info.clone(),
        }
    }

    /// Looks up a field by proto name, wrapped.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<SourceField> {
        self.fields().by_name(name)
    }

    /// Looks up a field by number, wrapped.
    #[must_use]
    pub fn field_by_number(&self, number: i32) -> Option<SourceField> {
        self.fields().by_number(number)
    }

    /// Looks up a field by JSON name, wrapped.
    #[must_use]
    pub fn field_by_json_name(&self, name: &str) -> Option<SourceField> {
        self.fields().by_json_name(name)
    }

    /// Looks up a oneof by name, wrapped.
    #[must_use]
    pub fn oneof_by_name(&self, name: &str) -> Option<SourceOneof> {
        let oneof = self.desc.oneof_by_name(name)?;
        Some(SourceOneof {
            desc: oneof,
            info: self.info.clone(),
        })
    }
}

/// Lazy wrapped view over messages.
#[derive(Debug, Clone)]
pub struct SourceMessages {
    inner: srcinfo_descriptor::Messages,
    info: Option<Arc<FileSourceInfo>>,
}

impl SourceMessages {
    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the scope declares no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `i`th message, wrapped on access.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<SourceMessage> {
        Some(SourceMessage::new(self.inner.get(i)?, self.info.clone()))
    }

    /// Looks up a message by short name, wrapped.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<SourceMessage> {
        Some(SourceMessage::new(
            self.inner.by_name(name)?,
            self.info.clone(),
        ))
    }

    /// Iterates messages in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SourceMessage> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

// ── Field ──

/// A field descriptor with source locations attached.
#[derive(Debug, Clone)]
pub struct SourceField {
    desc: FieldDescriptor,
    info: Option<Arc<FileSourceInfo>>,
}

impl PartialEq for SourceField {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc
    }
}

impl Eq for SourceField {}

impl SourceField {
    fn new(desc: FieldDescriptor, info: Option<Arc<FileSourceInfo>>) -> Self {
        Self { desc, info }
    }

    /// The underlying unwrapped field descriptor.
    #[must_use]
    pub fn underlying(&self) -> &FieldDescriptor {
        &self.desc
    }

    /// Proto name of the field.
    #[must_use]
    pub fn name(&self) -> &str {
        self.desc.name()
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.desc.full_name()
    }

    /// Field number.
    #[must_use]
    pub fn number(&self) -> i32 {
        self.desc.number()
    }

    /// Scalar/composite kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.desc.kind()
    }

    /// Cardinality label.
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.desc.cardinality()
    }

    /// JSON name.
    #[must_use]
    pub fn json_name(&self) -> String {
        self.desc.json_name()
    }

    /// Text-format name.
    #[must_use]
    pub fn text_name(&self) -> &str {
        self.desc.text_name()
    }

    /// Whether this field uses proto2 group syntax.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.desc.is_group()
    }

    /// The proto2 default value literal, if declared.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.desc.default_value()
    }

    /// The declaring message, wrapped.
    #[must_use]
    pub fn containing_message(&self) -> SourceMessage {
        SourceMessage::new(self.desc.containing_message(), self.info.clone())
    }

    /// The oneof this field belongs to, wrapped.
    #[must_use]
    pub fn containing_oneof(&self) -> Option<SourceOneof> {
        Some(SourceOneof {
            desc: self.desc.containing_oneof()?,
            info: self.info.clone(),
        })
    }

    /// This field's location record.
    ///
    /// Group fields attribute their comment to the synthetic group message,
    /// and fields of map-entry messages are themselves synthetic; both
    /// report `None` regardless of index contents.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        if self.desc.is_group() || self.desc.containing_message().is_map_entry() {
            return None;
        }
        self.info.as_ref()?.index().by_descriptor(&self.desc)
    }

    comment_accessors!();
}

/// Lazy wrapped view over a message's fields.
#[derive(Debug, Clone)]
pub struct SourceFields {
    inner: srcinfo_descriptor::Fields,
    info: Option<Arc<FileSourceInfo>>,
}

impl SourceFields {
    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the message has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `i`th field, wrapped on access.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<SourceField> {
        Some(SourceField::new(self.inner.get(i)?, self.info.clone()))
    }

    /// Looks up a field by proto name, wrapped.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<SourceField> {
        Some(SourceField::new(self.inner.by_name(name)?, self.info.clone()))
    }

    /// Looks up a field by number, wrapped.
    #[must_use]
    pub fn by_number(&self, number: i32) -> Option<SourceField> {
        Some(SourceField::new(
            self.inner.by_number(number)?,
            self.info.clone(),
        ))
    }

    /// Looks up a field by JSON name, wrapped.
    #[must_use]
    pub fn by_json_name(&self, name: &str) -> Option<SourceField> {
        Some(SourceField::new(
            self.inner.by_json_name(name)?,
            self.info.clone(),
        ))
    }

    /// Looks up a field by text-format name, wrapped.
    #[must_use]
    pub fn by_text_name(&self, name: &str) -> Option<SourceField> {
        Some(SourceField::new(
            self.inner.by_text_name(name)?,
            self.info.clone(),
        ))
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SourceField> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

// ── Oneof ──

/// A oneof descriptor with source locations attached.
#[derive(Debug, Clone)]
pub struct SourceOneof {
    desc: OneofDescriptor,
    info: Option<Arc<FileSourceInfo>>,
}

impl PartialEq for SourceOneof {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc
    }
}

impl Eq for SourceOneof {}

impl SourceOneof {
    /// The underlying unwrapped oneof descriptor.
    #[must_use]
    pub fn underlying(&self) -> &OneofDescriptor {
        &self.desc
    }

    /// Short name of the oneof.
    #[must_use]
    pub fn name(&self) -> &str {
        self.desc.name()
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.desc.full_name()
    }

    /// The declaring message, wrapped.
    #[must_use]
    pub fn containing_message(&self) -> SourceMessage {
        SourceMessage::new(self.desc.containing_message(), self.info.clone())
    }

    /// Member fields, wrapped.
    #[must_use]
    pub fn fields(&self) -> Vec<SourceField> {
        self.desc
            .fields()
            .into_iter()
            .map(|f| SourceField::new(f, self.info.clone()))
            .collect()
    }

    /// This oneof's location record.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.info.as_ref()?.index().by_descriptor(&self.desc)
    }

    comment_accessors!();
}

/// Lazy wrapped view over a message's oneofs.
#[derive(Debug, Clone)]
pub struct SourceOneofs {
    inner: srcinfo_descriptor::Oneofs,
    info: Option<Arc<FileSourceInfo>>,
}

impl SourceOneofs {
    /// Number of oneofs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the message declares no oneofs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `i`th oneof, wrapped on access.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<SourceOneof> {
        Some(SourceOneof {
            desc: self.inner.get(i)?,
            info: self.info.clone(),
        })
    }

    /// Iterates oneofs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SourceOneof> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

// ── Enum ──

/// An enum descriptor with source locations attached.
#[derive(Debug, Clone)]
pub struct SourceEnum {
    desc: EnumDescriptor,
    info: Option<Arc<FileSourceInfo>>,
}

impl PartialEq for SourceEnum {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc
    }
}

impl Eq for SourceEnum {}

impl SourceEnum {
    fn new(desc: EnumDescriptor, info: Option<Arc<FileSourceInfo>>) -> Self {
        Self { desc, info }
    }

    /// The underlying unwrapped enum descriptor.
    #[must_use]
    pub fn underlying(&self) -> &EnumDescriptor {
        &self.desc
    }

    /// Short name of the enum.
    #[must_use]
    pub fn name(&self) -> &str {
        self.desc.name()
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.desc.full_name()
    }

    /// The enclosing message, wrapped.
    #[must_use]
    pub fn parent(&self) -> Option<SourceMessage> {
        Some(SourceMessage::new(self.desc.parent()?, self.info.clone()))
    }

    /// The declaring file, wrapped.
    #[must_use]
    pub fn parent_file(&self) -> SourceFile {
        SourceFile::with_info(self.desc.parent_file().clone(), self.info.clone())
    }

    /// Values, wrapped.
    #[must_use]
    pub fn values(&self) -> SourceEnumValues {
        SourceEnumValues {
            inner: self.desc.values(),
            info: self.info.clone(),
        }
    }

    /// Looks up a value by name, wrapped.
    #[must_use]
    pub fn value_by_name(&self, name: &str) -> Option<SourceEnumValue> {
        self.values().by_name(name)
    }

    /// Looks up a value by number, wrapped.
    #[must_use]
    pub fn value_by_number(&self, number: i32) -> Option<SourceEnumValue> {
        self.values().by_number(number)
    }

    /// This enum's location record.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.info.as_ref()?.index().by_descriptor(&self.desc)
    }

    comment_accessors!();
}

/// A single enum value with source locations attached.
#[derive(Debug, Clone)]
pub struct SourceEnumValue {
    desc: EnumValueDescriptor,
    info: Option<Arc<FileSourceInfo>>,
}

impl PartialEq for SourceEnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc
    }
}

impl Eq for SourceEnumValue {}

impl SourceEnumValue {
    /// The underlying unwrapped enum value descriptor.
    #[must_use]
    pub fn underlying(&self) -> &EnumValueDescriptor {
        &self.desc
    }

    /// Name of the value.
    #[must_use]
    pub fn name(&self) -> &str {
        self.desc.name()
    }

    /// Fully-qualified name, scoped to the enum's container.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.desc.full_name()
    }

    /// Numeric value.
    #[must_use]
    pub fn number(&self) -> i32 {
        self.desc.number()
    }

    /// The declaring enum, wrapped.
    #[must_use]
    pub fn parent(&self) -> SourceEnum {
        SourceEnum::new(self.desc.parent(), self.info.clone())
    }

    /// This value's location record.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.info.as_ref()?.index().by_descriptor(&self.desc)
    }

    comment_accessors!();
}

/// Lazy wrapped view over enums.
#[derive(Debug, Clone)]
pub struct SourceEnums {
    inner: srcinfo_descriptor::Enums,
    info: Option<Arc<FileSourceInfo>>,
}

impl SourceEnums {
    /// Number of enums.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the scope declares no enums.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `i`th enum, wrapped on access.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<SourceEnum> {
        Some(SourceEnum::new(self.inner.get(i)?, self.info.clone()))
    }

    /// Looks up an enum by short name, wrapped.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<SourceEnum> {
        Some(SourceEnum::new(self.inner.by_name(name)?, self.info.clone()))
    }

    /// Iterates enums in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SourceEnum> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// Lazy wrapped view over an enum's values.
#[derive(Debug, Clone)]
pub struct SourceEnumValues {
    inner: srcinfo_descriptor::EnumValues,
    info: Option<Arc<FileSourceInfo>>,
}

impl SourceEnumValues {
    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the enum declares no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `i`th value, wrapped on access.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<SourceEnumValue> {
        Some(SourceEnumValue {
            desc: self.inner.get(i)?,
            info: self.info.clone(),
        })
    }

    /// Looks up a value by name, wrapped.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<SourceEnumValue> {
        Some(SourceEnumValue {
            desc: self.inner.by_name(name)?,
            info: self.info.clone(),
        })
    }

    /// Looks up a value by number, wrapped.
    #[must_use]
    pub fn by_number(&self, number: i32) -> Option<SourceEnumValue> {
        Some(SourceEnumValue {
            desc: self.inner.by_number(number)?,
            info: self.info.clone(),
        })
    }

    /// Iterates values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SourceEnumValue> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

// ── Extension ──

/// An extension descriptor with source locations attached.
#[derive(Debug, Clone)]
pub struct SourceExtension {
    desc: ExtensionDescriptor,
    info: Option<Arc<FileSourceInfo>>,
}

impl PartialEq for SourceExtension {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc
    }
}

impl Eq for SourceExtension {}

impl SourceExtension {
    /// The underlying unwrapped extension descriptor.
    #[must_use]
    pub fn underlying(&self) -> &ExtensionDescriptor {
        &self.desc
    }

    /// Proto name of the extension field.
    #[must_use]
    pub fn name(&self) -> &str {
        self.desc.name()
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.desc.full_name()
    }

    /// Field number in the extended message.
    #[must_use]
    pub fn number(&self) -> i32 {
        self.desc.number()
    }

    /// Scalar/composite kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.desc.kind()
    }

    /// Fully-qualified name of the extended message.
    #[must_use]
    pub fn extendee(&self) -> &str {
        self.desc.extendee()
    }

    /// The message this extension is declared inside, wrapped.
    #[must_use]
    pub fn declaring_message(&self) -> Option<SourceMessage> {
        Some(SourceMessage::new(
            self.desc.declaring_message()?,
            self.info.clone(),
        ))
    }

    /// This extension's location record.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.info.as_ref()?.index().by_descriptor(&self.desc)
    }

    comment_accessors!();
}

/// Lazy wrapped view over extensions.
#[derive(Debug, Clone)]
pub struct SourceExtensions {
    inner: srcinfo_descriptor::Extensions,
    info: Option<Arc<FileSourceInfo>>,
}

impl SourceExtensions {
    /// Number of extensions in this scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the scope declares no extensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `i`th extension, wrapped on access.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<SourceExtension> {
        Some(SourceExtension {
            desc: self.inner.get(i)?,
            info: self.info.clone(),
        })
    }

    /// Looks up an extension by proto name, wrapped.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<SourceExtension> {
        Some(SourceExtension {
            desc: self.inner.by_name(name)?,
            info: self.info.clone(),
        })
    }

    /// Iterates extensions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SourceExtension> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

// ── Service ──

/// A service descriptor with source locations attached.
#[derive(Debug, Clone)]
pub struct SourceService {
    desc: ServiceDescriptor,
    info: Option<Arc<FileSourceInfo>>,
}

impl PartialEq for SourceService {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc
    }
}

impl Eq for SourceService {}

impl SourceService {
    /// The underlying unwrapped service descriptor.
    #[must_use]
    pub fn underlying(&self) -> &ServiceDescriptor {
        &self.desc
    }

    /// Short name of the service.
    #[must_use]
    pub fn name(&self) -> &str {
        self.desc.name()
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.desc.full_name()
    }

    /// The declaring file, wrapped.
    #[must_use]
    pub fn parent_file(&self) -> SourceFile {
        SourceFile::with_info(self.desc.parent_file().clone(), self.info.clone())
    }

    /// Methods, wrapped.
    #[must_use]
    pub fn methods(&self) -> SourceMethods {
        SourceMethods {
            inner: self.desc.methods(),
            info: self.info.clone(),
        }
    }

    /// Looks up a method by name, wrapped.
    #[must_use]
    pub fn method_by_name(&self, name: &str) -> Option<SourceMethod> {
        self.methods().by_name(name)
    }

    /// This service's location record.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.info.as_ref()?.index().by_descriptor(&self.desc)
    }

    comment_accessors!();
}

/// An RPC method with source locations attached.
#[derive(Debug, Clone)]
pub struct SourceMethod {
    desc: MethodDescriptor,
    info: Option<Arc<FileSourceInfo>>,
}

impl PartialEq for SourceMethod {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc
    }
}

impl Eq for SourceMethod {}

impl SourceMethod {
    /// The underlying unwrapped method descriptor.
    #[must_use]
    pub fn underlying(&self) -> &MethodDescriptor {
        &self.desc
    }

    /// Name of the method.
    #[must_use]
    pub fn name(&self) -> &str {
        self.desc.name()
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.desc.full_name()
    }

    /// Fully-qualified request type name.
    #[must_use]
    pub fn input_type(&self) -> &str {
        self.desc.input_type()
    }

    /// Fully-qualified response type name.
    #[must_use]
    pub fn output_type(&self) -> &str {
        self.desc.output_type()
    }

    /// Whether the client streams.
    #[must_use]
    pub fn client_streaming(&self) -> bool {
        self.desc.client_streaming()
    }

    /// Whether the server streams.
    #[must_use]
    pub fn server_streaming(&self) -> bool {
        self.desc.server_streaming()
    }

    /// The declaring service, wrapped.
    #[must_use]
    pub fn parent(&self) -> SourceService {
        SourceService {
            desc: self.desc.parent(),
            info: self.info.clone(),
        }
    }

    /// This method's location record.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.info.as_ref()?.index().by_descriptor(&self.desc)
    }

    comment_accessors!();
}

/// Lazy wrapped view over a file's services.
#[derive(Debug, Clone)]
pub struct SourceServices {
    inner: srcinfo_descriptor::Services,
    info: Option<Arc<FileSourceInfo>>,
}

impl SourceServices {
    /// Number of services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the file declares no services.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `i`th service, wrapped on access.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<SourceService> {
        Some(SourceService {
            desc: self.inner.get(i)?,
            info: self.info.clone(),
        })
    }

    /// Looks up a service by short name, wrapped.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<SourceService> {
        Some(SourceService {
            desc: self.inner.by_name(name)?,
            info: self.info.clone(),
        })
    }

    /// Iterates services in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SourceService> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// Lazy wrapped view over a service's methods.
#[derive(Debug, Clone)]
pub struct SourceMethods {
    inner: srcinfo_descriptor::Methods,
    info: Option<Arc<FileSourceInfo>>,
}

impl SourceMethods {
    /// Number of methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the service declares no methods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `i`th method, wrapped on access.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<SourceMethod> {
        Some(SourceMethod {
            desc: self.inner.get(i)?,
            info: self.info.clone(),
        })
    }

    /// Looks up a method by name, wrapped.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<SourceMethod> {
        Some(SourceMethod {
            desc: self.inner.by_name(name)?,
            info: self.info.clone(),
        })
    }

    /// Iterates methods in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SourceMethod> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

// ── Wrap entry points ──

/// Wraps a file descriptor.
///
/// Files already carrying native location info serve it unchanged; files
/// the layer cannot re-associate with registered records become
/// pass-through wrappers. Wrapping an [`SourceFile::underlying`] handle
/// again yields a value equal to the original wrapper.
#[must_use]
pub fn wrap_file(file: FileDescriptor) -> SourceFile {
    if file.origin() == FileOrigin::Registry {
        if let Some(cached) = registry::cached_wrapped_file(&file) {
            return cached;
        }
    }
    let info = source_info_for(&file);
    SourceFile::with_info(file, info)
}

/// Wraps a message descriptor by its parent file's rules.
#[must_use]
pub fn wrap_message(desc: MessageDescriptor) -> SourceMessage {
    let info = source_info_for(desc.parent_file());
    SourceMessage::new(desc, info)
}

/// Wraps a field descriptor by its parent file's rules.
#[must_use]
pub fn wrap_field(desc: FieldDescriptor) -> SourceField {
    let info = source_info_for(desc.parent_file());
    SourceField::new(desc, info)
}

/// Wraps a oneof descriptor by its parent file's rules.
#[must_use]
pub fn wrap_oneof(desc: OneofDescriptor) -> SourceOneof {
    let info = source_info_for(desc.parent_file());
    SourceOneof { desc, info }
}

/// Wraps an enum descriptor by its parent file's rules.
#[must_use]
pub fn wrap_enum(desc: EnumDescriptor) -> SourceEnum {
    let info = source_info_for(desc.parent_file());
    SourceEnum::new(desc, info)
}

/// Wraps an enum value descriptor by its parent file's rules.
#[must_use]
pub fn wrap_enum_value(desc: EnumValueDescriptor) -> SourceEnumValue {
    let info = source_info_for(desc.parent_file());
    SourceEnumValue { desc, info }
}

/// Wraps an extension descriptor by its parent file's rules.
#[must_use]
pub fn wrap_extension(desc: ExtensionDescriptor) -> SourceExtension {
    let info = source_info_for(desc.parent_file());
    SourceExtension { desc, info }
}

/// Wraps a service descriptor by its parent file's rules.
#[must_use]
pub fn wrap_service(desc: ServiceDescriptor) -> SourceService {
    let info = source_info_for(desc.parent_file());
    SourceService { desc, info }
}

/// Wraps a method descriptor by its parent file's rules.
#[must_use]
pub fn wrap_method(desc: MethodDescriptor) -> SourceMethod {
    let info = source_info_for(desc.parent_file());
    SourceMethod { desc, info }
}
