//! Field and extension handles.

use crate::descriptor::Descriptor;
use crate::file::FileDescriptor;
use crate::message::{MessageDescriptor, OneofDescriptor};
use crate::path::{self, tag, Node};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::FieldDescriptorProto;

/// Scalar/composite kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Kind {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl From<Type> for Kind {
    fn from(t: Type) -> Self {
        match t {
            Type::Double => Kind::Double,
            Type::Float => Kind::Float,
            Type::Int64 => Kind::Int64,
            Type::Uint64 => Kind::Uint64,
            Type::Int32 => Kind::Int32,
            Type::Fixed64 => Kind::Fixed64,
            Type::Fixed32 => Kind::Fixed32,
            Type::Bool => Kind::Bool,
            Type::String => Kind::String,
            Type::Group => Kind::Group,
            Type::Message => Kind::Message,
            Type::Bytes => Kind::Bytes,
            Type::Uint32 => Kind::Uint32,
            Type::Enum => Kind::Enum,
            Type::Sfixed32 => Kind::Sfixed32,
            Type::Sfixed64 => Kind::Sfixed64,
            Type::Sint32 => Kind::Sint32,
            Type::Sint64 => Kind::Sint64,
        }
    }
}

/// Cardinality of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// `optional`, or unlabelled proto3.
    Optional,
    /// proto2 `required`.
    Required,
    /// `repeated`.
    Repeated,
}

impl From<Label> for Cardinality {
    fn from(l: Label) -> Self {
        match l {
            Label::Optional => Cardinality::Optional,
            Label::Required => Cardinality::Required,
            Label::Repeated => Cardinality::Repeated,
        }
    }
}

/// Returns the text-format name for a field proto: groups go by their group
/// message name, everything else by the proto name.
fn text_name(proto: &FieldDescriptorProto) -> &str {
    if proto.r#type() == Type::Group {
        proto
            .type_name()
            .rsplit('.')
            .next()
            .unwrap_or_else(|| proto.name())
    } else {
        proto.name()
    }
}

fn json_name(proto: &FieldDescriptorProto) -> String {
    match &proto.json_name {
        Some(j) => j.clone(),
        None => path::derive_json_name(proto.name()),
    }
}

/// A regular (non-extension) field of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    file: FileDescriptor,
    path: Box<[i32]>,
}

impl FieldDescriptor {
    pub(crate) fn new(file: FileDescriptor, path: Box<[i32]>) -> Self {
        Self { file, path }
    }

    fn proto(&self) -> Option<&FieldDescriptorProto> {
        match path::resolve(self.file.proto(), &self.path)? {
            Node::Field(f) => Some(f),
            _ => None,
        }
    }

    /// Proto name of the field.
    #[must_use]
    pub fn name(&self) -> &str {
        self.proto().map_or("", |f| f.name())
    }

    /// Fully-qualified name, e.g. `"shop.Order.id"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        let container = path::container_full_name(self.file.proto(), &self.path);
        path::join_full_name(&container, self.name())
    }

    /// Field number.
    #[must_use]
    pub fn number(&self) -> i32 {
        self.proto().map_or(0, prost_types::FieldDescriptorProto::number)
    }

    /// Scalar/composite kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.proto().map_or(Kind::Message, |f| f.r#type().into())
    }

    /// Cardinality label.
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.proto()
            .map_or(Cardinality::Optional, |f| f.label().into())
    }

    /// Whether this field uses proto2 group syntax.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind() == Kind::Group
    }

    /// JSON name, as recorded by the compiler or derived from the name.
    #[must_use]
    pub fn json_name(&self) -> String {
        self.proto().map_or_else(String::new, json_name)
    }

    /// Text-format name; differs from [`name`](Self::name) for groups.
    #[must_use]
    pub fn text_name(&self) -> &str {
        self.proto().map_or("", text_name)
    }

    /// Fully-qualified name of the referenced message/enum type, with the
    /// leading dot stripped; empty for scalar fields.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.proto()
            .map_or("", |f| f.type_name().trim_start_matches('.'))
    }

    /// The proto2 default value literal, if declared.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.proto().and_then(|f| f.default_value.as_deref())
    }

    /// Index into the containing message's oneof list, if any.
    #[must_use]
    pub fn oneof_index(&self) -> Option<i32> {
        self.proto().and_then(|f| f.oneof_index)
    }

    /// The oneof this field belongs to, if any.
    #[must_use]
    pub fn containing_oneof(&self) -> Option<OneofDescriptor> {
        let idx = usize::try_from(self.oneof_index()?).ok()?;
        self.containing_message().oneofs().get(idx)
    }

    /// The message declaring this field.
    #[must_use]
    pub fn containing_message(&self) -> MessageDescriptor {
        let n = self.path.len();
        MessageDescriptor::new(self.file.clone(), self.path[..n - 2].into())
    }

    /// The file this field was declared in.
    #[must_use]
    pub fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }
}

impl Descriptor for FieldDescriptor {
    fn name(&self) -> &str {
        FieldDescriptor::name(self)
    }

    fn full_name(&self) -> String {
        FieldDescriptor::full_name(self)
    }

    fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    fn path(&self) -> &[i32] {
        &self.path
    }
}

/// Lazy view over a message's fields.
#[derive(Debug, Clone)]
pub struct Fields {
    file: FileDescriptor,
    base: Box<[i32]>,
    tag: i32,
}

impl Fields {
    pub(crate) fn new(file: FileDescriptor, base: &[i32], tag: i32) -> Self {
        Self {
            file,
            base: base.into(),
            tag,
        }
    }

    fn slice(&self) -> &[FieldDescriptorProto] {
        match path::resolve(self.file.proto(), &self.base) {
            Some(Node::Message(m)) => &m.field,
            _ => &[],
        }
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slice().len()
    }

    /// Whether the message has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slice().is_empty()
    }

    /// The `i`th field, in declaration order.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<FieldDescriptor> {
        if i >= self.len() {
            return None;
        }
        let p = path::child(&self.base, self.tag, i)?;
        Some(FieldDescriptor::new(self.file.clone(), p))
    }

    /// Looks up a field by proto name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<FieldDescriptor> {
        let i = self.slice().iter().position(|f| f.name() == name)?;
        self.get(i)
    }

    /// Looks up a field by number.
    #[must_use]
    pub fn by_number(&self, number: i32) -> Option<FieldDescriptor> {
        let i = self.slice().iter().position(|f| f.number() == number)?;
        self.get(i)
    }

    /// Looks up a field by JSON name.
    #[must_use]
    pub fn by_json_name(&self, name: &str) -> Option<FieldDescriptor> {
        let i = self.slice().iter().position(|f| json_name(f) == name)?;
        self.get(i)
    }

    /// Looks up a field by text-format name.
    #[must_use]
    pub fn by_text_name(&self, name: &str) -> Option<FieldDescriptor> {
        let i = self.slice().iter().position(|f| text_name(f) == name)?;
        self.get(i)
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = FieldDescriptor> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// An extension declaration, at file level or inside a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    file: FileDescriptor,
    path: Box<[i32]>,
}

impl ExtensionDescriptor {
    pub(crate) fn new(file: FileDescriptor, path: Box<[i32]>) -> Self {
        Self { file, path }
    }

    fn proto(&self) -> Option<&FieldDescriptorProto> {
        match path::resolve(self.file.proto(), &self.path)? {
            Node::Field(f) => Some(f),
            _ => None,
        }
    }

    /// Proto name of the extension field.
    #[must_use]
    pub fn name(&self) -> &str {
        self.proto().map_or("", |f| f.name())
    }

    /// Fully-qualified name, scoped to the declaring file or message.
    #[must_use]
    pub fn full_name(&self) -> String {
        let container = path::container_full_name(self.file.proto(), &self.path);
        path::join_full_name(&container, self.name())
    }

    /// Field number in the extended message.
    #[must_use]
    pub fn number(&self) -> i32 {
        self.proto().map_or(0, prost_types::FieldDescriptorProto::number)
    }

    /// Scalar/composite kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.proto().map_or(Kind::Message, |f| f.r#type().into())
    }

    /// Fully-qualified name of the extended message, leading dot stripped.
    #[must_use]
    pub fn extendee(&self) -> &str {
        self.proto()
            .map_or("", |f| f.extendee().trim_start_matches('.'))
    }

    /// The message this extension is declared *inside*, if any (not the
    /// extended message).
    #[must_use]
    pub fn declaring_message(&self) -> Option<MessageDescriptor> {
        let n = self.path.len();
        (n > 2).then(|| MessageDescriptor::new(self.file.clone(), self.path[..n - 2].into()))
    }

    /// The file this extension was declared in.
    #[must_use]
    pub fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }
}

impl Descriptor for ExtensionDescriptor {
    fn name(&self) -> &str {
        ExtensionDescriptor::name(self)
    }

    fn full_name(&self) -> String {
        ExtensionDescriptor::full_name(self)
    }

    fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    fn path(&self) -> &[i32] {
        &self.path
    }
}

/// Lazy view over the extensions declared in a file or message.
#[derive(Debug, Clone)]
pub struct Extensions {
    file: FileDescriptor,
    base: Box<[i32]>,
    tag: i32,
}

impl Extensions {
    pub(crate) fn new(file: FileDescriptor, base: &[i32], tag: i32) -> Self {
        Self {
            file,
            base: base.into(),
            tag,
        }
    }

    fn slice(&self) -> &[FieldDescriptorProto] {
        if self.base.is_empty() {
            &self.file.proto().extension
        } else if let Some(Node::Message(m)) = path::resolve(self.file.proto(), &self.base) {
            &m.extension
        } else {
            &[]
        }
    }

    /// Number of extensions in this scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slice().len()
    }

    /// Whether the scope declares no extensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slice().is_empty()
    }

    /// The `i`th extension, in declaration order.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<ExtensionDescriptor> {
        if i >= self.len() {
            return None;
        }
        let p = path::child(&self.base, self.tag, i)?;
        Some(ExtensionDescriptor::new(self.file.clone(), p))
    }

    /// Looks up an extension by proto name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<ExtensionDescriptor> {
        let i = self.slice().iter().position(|f| f.name() == name)?;
        self.get(i)
    }

    /// Iterates extensions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = ExtensionDescriptor> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::FieldDescriptorProto;

    fn group_field() -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some("mygroup".into()),
            number: Some(3),
            r#type: Some(Type::Group as i32),
            type_name: Some(".pkg.MyGroup".into()),
            ..Default::default()
        }
    }

    #[test]
    fn group_text_name_is_group_message_name() {
        assert_eq!(text_name(&group_field()), "MyGroup");
    }

    #[test]
    fn json_name_prefers_recorded_value() {
        let f = FieldDescriptorProto {
            name: Some("order_id".into()),
            json_name: Some("orderId".into()),
            ..Default::default()
        };
        assert_eq!(json_name(&f), "orderId");
        let f = FieldDescriptorProto {
            name: Some("order_id".into()),
            ..Default::default()
        };
        assert_eq!(json_name(&f), "orderId");
    }
}
