//! Message and oneof handles.

use crate::descriptor::Descriptor;
use crate::enums::Enums;
use crate::field::{Extensions, FieldDescriptor, Fields};
use crate::file::FileDescriptor;
use crate::path::{self, tag, Node};
use prost_types::{DescriptorProto, OneofDescriptorProto};

/// A message declaration, top-level or nested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    file: FileDescriptor,
    path: Box<[i32]>,
}

impl MessageDescriptor {
    pub(crate) fn new(file: FileDescriptor, path: Box<[i32]>) -> Self {
        Self { file, path }
    }

    fn proto(&self) -> Option<&DescriptorProto> {
        path::resolve_message(self.file.proto(), &self.path)
    }

    /// Short name of the message.
    #[must_use]
    pub fn name(&self) -> &str {
        self.proto().map_or("", |m| m.name())
    }

    /// Fully-qualified name, e.g. `"shop.Order.LineItem"`.
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

    /// The file this message was declared in.
    #[must_use]
    pub fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    /// Fields of this message, in declaration order.
    #[must_use]
    pub fn fields(&self) -> Fields {
        Fields::new(self.file.clone(), &self.path, tag::MESSAGE_FIELD)
    }

    /// Oneof declarations, including proto3 synthetic oneofs.
    #[must_use]
    pub fn oneofs(&self) -> Oneofs {
        Oneofs {
            file: self.file.clone(),
            base: self.path.clone(),
        }
    }

    /// Nested message declarations.
    #[must_use]
    pub fn nested_messages(&self) -> Messages {
        Messages::new(self.file.clone(), &self.path, tag::MESSAGE_NESTED)
    }

    /// Nested enum declarations.
    #[must_use]
    pub fn nested_enums(&self) -> Enums {
        Enums::new(self.file.clone(), &self.path, tag::MESSAGE_ENUM)
    }

    /// Extensions declared inside this message.
    #[must_use]
    pub fn nested_extensions(&self) -> Extensions {
        Extensions::new(self.file.clone(), &self.path, tag::MESSAGE_EXTENSION)
    }

    /// Whether this is a synthetic map-entry message.
    #[must_use]
    pub fn is_map_entry(&self) -> bool {
        self.proto()
            .and_then(|m| m.options.as_ref())
            .is_some_and(|o| o.map_entry())
    }

    /// Looks up a field by its proto name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<FieldDescriptor> {
        self.fields().by_name(name)
    }

    /// Looks up a field by number.
    #[must_use]
    pub fn field_by_number(&self, number: i32) -> Option<FieldDescriptor> {
        self.fields().by_number(number)
    }

    /// Looks up a field by JSON name.
    #[must_use]
    pub fn field_by_json_name(&self, name: &str) -> Option<FieldDescriptor> {
        self.fields().by_json_name(name)
    }

    /// Looks up a field by text-format name.
    #[must_use]
    pub fn field_by_text_name(&self, name: &str) -> Option<FieldDescriptor> {
        self.fields().by_text_name(name)
    }

    /// Looks up a oneof by name.
    #[must_use]
    pub fn oneof_by_name(&self, name: &str) -> Option<OneofDescriptor> {
        self.oneofs().iter().find(|o| o.name() == name)
    }
}

impl Descriptor for MessageDescriptor {
    fn name(&self) -> &str {
        MessageDescriptor::name(self)
    }

    fn full_name(&self) -> String {
        MessageDescriptor::full_name(self)
    }

    fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    fn path(&self) -> &[i32] {
        &self.path
    }
}

/// Lazy view over the messages declared in a file or message.
#[derive(Debug, Clone)]
pub struct Messages {
    file: FileDescriptor,
    base: Box<[i32]>,
    tag: i32,
}

impl Messages {
    pub(crate) fn new(file: FileDescriptor, base: &[i32], tag: i32) -> Self {
        Self {
            file,
            base: base.into(),
            tag,
        }
    }

    fn slice(&self) -> &[DescriptorProto] {
        if self.base.is_empty() {
            &self.file.proto().message_type
        } else if let Some(Node::Message(m)) = path::resolve(self.file.proto(), &self.base) {
            &m.nested_type
        } else {
            &[]
        }
    }

    /// Number of messages in this scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slice().len()
    }

    /// Whether the scope declares no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slice().is_empty()
    }

    /// The `i`th message, in declaration order.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<MessageDescriptor> {
        if i >= self.len() {
            return None;
        }
        let p = path::child(&self.base, self.tag, i)?;
        Some(MessageDescriptor::new(self.file.clone(), p))
    }

    /// Looks up a message by short name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<MessageDescriptor> {
        let i = self.slice().iter().position(|m| m.name() == name)?;
        self.get(i)
    }

    /// Iterates messages in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = MessageDescriptor> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// A oneof declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofDescriptor {
    file: FileDescriptor,
    path: Box<[i32]>,
}

impl OneofDescriptor {
    pub(crate) fn new(file: FileDescriptor, path: Box<[i32]>) -> Self {
        Self { file, path }
    }

    fn proto(&self) -> Option<&OneofDescriptorProto> {
        match path::resolve(self.file.proto(), &self.path)? {
            Node::Oneof(o) => Some(o),
            _ => None,
        }
    }

    /// Short name of the oneof.
    #[must_use]
    pub fn name(&self) -> &str {
        self.proto().map_or("", |o| o.name())
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        let container = path::container_full_name(self.file.proto(), &self.path);
        path::join_full_name(&container, self.name())
    }

    /// The message declaring this oneof.
    #[must_use]
    pub fn containing_message(&self) -> MessageDescriptor {
        let n = self.path.len();
        MessageDescriptor::new(self.file.clone(), self.path[..n - 2].into())
    }

    /// Index of this oneof within its message's oneof list.
    #[must_use]
    pub fn index(&self) -> i32 {
        self.path.last().copied().unwrap_or_default()
    }

    /// The file this oneof was declared in.
    #[must_use]
    pub fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    /// Fields belonging to this oneof.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        let idx = self.index();
        self.containing_message()
            .fields()
            .iter()
            .filter(|f| f.oneof_index() == Some(idx))
            .collect()
    }
}

impl Descriptor for OneofDescriptor {
    fn name(&self) -> &str {
        OneofDescriptor::name(self)
    }

    fn full_name(&self) -> String {
        OneofDescriptor::full_name(self)
    }

    fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    fn path(&self) -> &[i32] {
        &self.path
    }
}

/// Lazy view over a message's oneofs.
#[derive(Debug, Clone)]
pub struct Oneofs {
    file: FileDescriptor,
    base: Box<[i32]>,
}

impl Oneofs {
    fn slice(&self) -> &[OneofDescriptorProto] {
        match path::resolve(self.file.proto(), &self.base) {
            Some(Node::Message(m)) => &m.oneof_decl,
            _ => &[],
        }
    }

    /// Number of oneofs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slice().len()
    }

    /// Whether the message declares no oneofs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slice().is_empty()
    }

    /// The `i`th oneof, in declaration order.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<OneofDescriptor> {
        if i >= self.len() {
            return None;
        }
        let p = path::child(&self.base, tag::MESSAGE_ONEOF, i)?;
        Some(OneofDescriptor::new(self.file.clone(), p))
    }

    /// Iterates oneofs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = OneofDescriptor> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}
