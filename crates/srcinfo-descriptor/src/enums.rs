//! Enum and enum-value handles.

use crate::descriptor::Descriptor;
use crate::file::FileDescriptor;
use crate::message::MessageDescriptor;
use crate::path::{self, tag, Node};
use prost_types::{EnumDescriptorProto, EnumValueDescriptorProto};

/// An enum declaration, top-level or nested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    file: FileDescriptor,
    path: Box<[i32]>,
}

impl EnumDescriptor {
    pub(crate) fn new(file: FileDescriptor, path: Box<[i32]>) -> Self {
        Self { file, path }
    }

    fn proto(&self) -> Option<&EnumDescriptorProto> {
        match path::resolve(self.file.proto(), &self.path)? {
            Node::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Short name of the enum.
    #[must_use]
    pub fn name(&self) -> &str {
        self.proto().map_or("", |e| e.name())
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        path::container_full_name(self.file.proto(), &self.path)
    }

    /// The enclosing message for nested declarations.
    #[must_use]
    pub fn parent(&self) -> Option<MessageDescriptor> {
        let n = self.path.len();
        (n > 2).then(|| MessageDescriptor::new(self.file.clone(), self.path[..n - 2].into()))
    }

    /// The file this enum was declared in.
    #[must_use]
    pub fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    /// Values of this enum, in declaration order.
    #[must_use]
    pub fn values(&self) -> EnumValues {
        EnumValues {
            file: self.file.clone(),
            base: self.path.clone(),
        }
    }

    /// Looks up a value by name.
    #[must_use]
    pub fn value_by_name(&self, name: &str) -> Option<EnumValueDescriptor> {
        self.values().by_name(name)
    }

    /// Looks up a value by number; the first declared wins for aliases.
    #[must_use]
    pub fn value_by_number(&self, number: i32) -> Option<EnumValueDescriptor> {
        self.values().by_number(number)
    }
}

impl Descriptor for EnumDescriptor {
    fn name(&self) -> &str {
        EnumDescriptor::name(self)
    }

    fn full_name(&self) -> String {
        EnumDescriptor::full_name(self)
    }

    fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    fn path(&self) -> &[i32] {
        &self.path
    }
}

/// A single enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDescriptor {
    file: FileDescriptor,
    path: Box<[i32]>,
}

impl EnumValueDescriptor {
    fn proto(&self) -> Option<&EnumValueDescriptorProto> {
        match path::resolve(self.file.proto(), &self.path)? {
            Node::EnumValue(v) => Some(v),
            _ => None,
        }
    }

    /// Name of the value.
    #[must_use]
    pub fn name(&self) -> &str {
        self.proto().map_or("", |v| v.name())
    }

    /// Fully-qualified name.
    ///
    /// Proto scopes enum values to the enum's *container*, so the value
    /// `ACTIVE` of `shop.Status` is `shop.ACTIVE`.
    #[must_use]
    pub fn full_name(&self) -> String {
        let n = self.path.len();
        let container = path::container_full_name(self.file.proto(), &self.path[..n - 4]);
        path::join_full_name(&container, self.name())
    }

    /// Numeric value.
    #[must_use]
    pub fn number(&self) -> i32 {
        self.proto()
            .map_or(0, prost_types::EnumValueDescriptorProto::number)
    }

    /// The file this value was declared in.
    #[must_use]
    pub fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    /// The declaring enum.
    #[must_use]
    pub fn parent(&self) -> EnumDescriptor {
        let n = self.path.len();
        EnumDescriptor::new(self.file.clone(), self.path[..n - 2].into())
    }
}

impl Descriptor for EnumValueDescriptor {
    fn name(&self) -> &str {
        EnumValueDescriptor::name(self)
    }

    fn full_name(&self) -> String {
        EnumValueDescriptor::full_name(self)
    }

    fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    fn path(&self) -> &[i32] {
        &self.path
    }
}

/// Lazy view over the enums declared in a file or message.
#[derive(Debug, Clone)]
pub struct Enums {
    file: FileDescriptor,
    base: Box<[i32]>,
    tag: i32,
}

impl Enums {
    pub(crate) fn new(file: FileDescriptor, base: &[i32], tag: i32) -> Self {
        Self {
            file,
            base: base.into(),
            tag,
        }
    }

    fn slice(&self) -> &[EnumDescriptorProto] {
        if self.base.is_empty() {
            &self.file.proto().enum_type
        } else if let Some(Node::Message(m)) = path::resolve(self.file.proto(), &self.base) {
            &m.enum_type
        } else {
            &[]
        }
    }

    /// Number of enums in this scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slice().len()
    }

    /// Whether the scope declares no enums.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slice().is_empty()
    }

    /// The `i`th enum, in declaration order.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<EnumDescriptor> {
        if i >= self.len() {
            return None;
        }
        let p = path::child(&self.base, self.tag, i)?;
        Some(EnumDescriptor::new(self.file.clone(), p))
    }

    /// Looks up an enum by short name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<EnumDescriptor> {
        let i = self.slice().iter().position(|e| e.name() == name)?;
        self.get(i)
    }

    /// Iterates enums in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = EnumDescriptor> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// Lazy view over an enum's values.
#[derive(Debug, Clone)]
pub struct EnumValues {
    file: FileDescriptor,
    base: Box<[i32]>,
}

impl EnumValues {
    fn slice(&self) -> &[EnumValueDescriptorProto] {
        match path::resolve(self.file.proto(), &self.base) {
            Some(Node::Enum(e)) => &e.value,
            _ => &[],
        }
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slice().len()
    }

    /// Whether the enum declares no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slice().is_empty()
    }

    /// The `i`th value, in declaration order.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<EnumValueDescriptor> {
        if i >= self.len() {
            return None;
        }
        let path = path::child(&self.base, tag::ENUM_VALUE, i)?;
        Some(EnumValueDescriptor {
            file: self.file.clone(),
            path,
        })
    }

    /// Looks up a value by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<EnumValueDescriptor> {
        let i = self.slice().iter().position(|v| v.name() == name)?;
        self.get(i)
    }

    /// Looks up a value by number; the first declared wins for aliases.
    #[must_use]
    pub fn by_number(&self, number: i32) -> Option<EnumValueDescriptor> {
        let i = self.slice().iter().position(|v| v.number() == number)?;
        self.get(i)
    }

    /// Iterates values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = EnumValueDescriptor> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}
