//! Structural paths: the `(tag, index)` pair encoding `descriptor.proto`
//! uses to address schema elements within a file, shared with
//! `SourceCodeInfo` locations.

use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MethodDescriptorProto, OneofDescriptorProto, ServiceDescriptorProto,
};

/// Field tags of `descriptor.proto`, as used in structural paths.
pub(crate) mod tag {
    /// `FileDescriptorProto.message_type`
    pub const FILE_MESSAGE: i32 = 4;
    /// `FileDescriptorProto.enum_type`
    pub const FILE_ENUM: i32 = 5;
    /// `FileDescriptorProto.service`
    pub const FILE_SERVICE: i32 = 6;
    /// `FileDescriptorProto.extension`
    pub const FILE_EXTENSION: i32 = 7;
    /// `DescriptorProto.field`
    pub const MESSAGE_FIELD: i32 = 2;
    /// `DescriptorProto.nested_type`
    pub const MESSAGE_NESTED: i32 = 3;
    /// `DescriptorProto.enum_type`
    pub const MESSAGE_ENUM: i32 = 4;
    /// `DescriptorProto.extension`
    pub const MESSAGE_EXTENSION: i32 = 6;
    /// `DescriptorProto.oneof_decl`
    pub const MESSAGE_ONEOF: i32 = 8;
    /// `EnumDescriptorProto.value`
    pub const ENUM_VALUE: i32 = 2;
    /// `ServiceDescriptorProto.method`
    pub const SERVICE_METHOD: i32 = 2;
}

/// A proto node resolved from a structural path.
pub(crate) enum Node<'a> {
    Message(&'a DescriptorProto),
    Field(&'a FieldDescriptorProto),
    Oneof(&'a OneofDescriptorProto),
    Enum(&'a EnumDescriptorProto),
    EnumValue(&'a EnumValueDescriptorProto),
    Service(&'a ServiceDescriptorProto),
    Method(&'a MethodDescriptorProto),
}

/// Walks `file` along a structural path of `(tag, index)` pairs.
///
/// Returns `None` for paths that do not address a node in this file; handles
/// constructed by this crate always carry paths that resolve.
pub(crate) fn resolve<'a>(file: &'a FileDescriptorProto, path: &[i32]) -> Option<Node<'a>> {
    let mut pairs = path.chunks_exact(2);
    let first = pairs.next()?;
    let (t, i) = (first[0], usize::try_from(first[1]).ok()?);
    let mut node = match t {
        tag::FILE_MESSAGE => Node::Message(file.message_type.get(i)?),
        tag::FILE_ENUM => Node::Enum(file.enum_type.get(i)?),
        tag::FILE_SERVICE => Node::Service(file.service.get(i)?),
        tag::FILE_EXTENSION => Node::Field(file.extension.get(i)?),
        _ => return None,
    };
    for pair in pairs {
        let (t, i) = (pair[0], usize::try_from(pair[1]).ok()?);
        node = match node {
            Node::Message(m) => match t {
                tag::MESSAGE_FIELD => Node::Field(m.field.get(i)?),
                tag::MESSAGE_NESTED => Node::Message(m.nested_type.get(i)?),
                tag::MESSAGE_ENUM => Node::Enum(m.enum_type.get(i)?),
                tag::MESSAGE_EXTENSION => Node::Field(m.extension.get(i)?),
                tag::MESSAGE_ONEOF => Node::Oneof(m.oneof_decl.get(i)?),
                _ => return None,
            },
            Node::Enum(e) if t == tag::ENUM_VALUE => Node::EnumValue(e.value.get(i)?),
            Node::Service(s) if t == tag::SERVICE_METHOD => Node::Method(s.method.get(i)?),
            _ => return None,
        };
    }
    Some(node)
}

/// Shorthand for resolving a path expected to land on a message.
pub(crate) fn resolve_message<'a>(
    file: &'a FileDescriptorProto,
    path: &[i32],
) -> Option<&'a DescriptorProto> {
    match resolve(file, path)? {
        Node::Message(m) => Some(m),
        _ => None,
    }
}

/// Extends a structural path by one `(tag, index)` pair.
pub(crate) fn child(base: &[i32], tag: i32, index: usize) -> Option<Box<[i32]>> {
    let index = i32::try_from(index).ok()?;
    let mut path = Vec::with_capacity(base.len() + 2);
    path.extend_from_slice(base);
    path.push(tag);
    path.push(index);
    Some(path.into_boxed_slice())
}

/// Fully-qualified name of the container addressed by `path`, i.e. the
/// package plus the names of every message/enum/service traversed.
///
/// An empty path yields the bare package (possibly empty).
pub(crate) fn container_full_name(file: &FileDescriptorProto, path: &[i32]) -> String {
    let mut out = file.package().to_owned();
    let mut prefix = 2;
    while prefix <= path.len() {
        if let Some(node) = resolve(file, &path[..prefix]) {
            let name = match node {
                Node::Message(m) => m.name(),
                Node::Enum(e) => e.name(),
                Node::Service(s) => s.name(),
                Node::Field(_) | Node::Oneof(_) | Node::EnumValue(_) | Node::Method(_) => "",
            };
            if !name.is_empty() {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
        }
        prefix += 2;
    }
    out
}

/// Joins a container name and a short name into a fully-qualified name.
pub(crate) fn join_full_name(container: &str, name: &str) -> String {
    if container.is_empty() {
        name.to_owned()
    } else {
        format!("{container}.{name}")
    }
}

/// Derives the JSON name of a field the way `protoc` does when the
/// descriptor does not carry one: underscores removed, following letter
/// upper-cased.
pub(crate) fn derive_json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_name_derivation() {
        assert_eq!(derive_json_name("order_id"), "orderId");
        assert_eq!(derive_json_name("id"), "id");
        assert_eq!(derive_json_name("a_b_c"), "aBC");
        assert_eq!(derive_json_name("trailing_"), "trailing");
    }

    #[test]
    fn join_handles_empty_container() {
        assert_eq!(join_full_name("", "Msg"), "Msg");
        assert_eq!(join_full_name("pkg", "Msg"), "pkg.Msg");
    }
}
