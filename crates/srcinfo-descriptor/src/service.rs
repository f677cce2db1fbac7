//! Service and method handles.

use crate::descriptor::Descriptor;
use crate::file::FileDescriptor;
use crate::path::{self, tag, Node};
use prost_types::{MethodDescriptorProto, ServiceDescriptorProto};

/// A service declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    file: FileDescriptor,
    path: Box<[i32]>,
}

impl ServiceDescriptor {
    pub(crate) fn new(file: FileDescriptor, path: Box<[i32]>) -> Self {
        Self { file, path }
    }

    fn proto(&self) -> Option<&ServiceDescriptorProto> {
        match path::resolve(self.file.proto(), &self.path)? {
            Node::Service(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the service.
    #[must_use]
    pub fn name(&self) -> &str {
        self.proto().map_or("", |s| s.name())
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        path::container_full_name(self.file.proto(), &self.path)
    }

    /// The file this service was declared in.
    #[must_use]
    pub fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    /// Methods of this service, in declaration order.
    #[must_use]
    pub fn methods(&self) -> Methods {
        Methods {
            file: self.file.clone(),
            base: self.path.clone(),
        }
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn method_by_name(&self, name: &str) -> Option<MethodDescriptor> {
        self.methods().by_name(name)
    }
}

impl Descriptor for ServiceDescriptor {
    fn name(&self) -> &str {
        ServiceDescriptor::name(self)
    }

    fn full_name(&self) -> String {
        ServiceDescriptor::full_name(self)
    }

    fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    fn path(&self) -> &[i32] {
        &self.path
    }
}

/// A single RPC method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    file: FileDescriptor,
    path: Box<[i32]>,
}

impl MethodDescriptor {
    fn proto(&self) -> Option<&MethodDescriptorProto> {
        match path::resolve(self.file.proto(), &self.path)? {
            Node::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Name of the method.
    #[must_use]
    pub fn name(&self) -> &str {
        self.proto().map_or("", |m| m.name())
    }

    /// Fully-qualified name, e.g. `"shop.Orders.Create"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        let container = path::container_full_name(self.file.proto(), &self.path);
        path::join_full_name(&container, self.name())
    }

    /// Fully-qualified request type name, leading dot stripped.
    #[must_use]
    pub fn input_type(&self) -> &str {
        self.proto()
            .map_or("", |m| m.input_type().trim_start_matches('.'))
    }

    /// Fully-qualified response type name, leading dot stripped.
    #[must_use]
    pub fn output_type(&self) -> &str {
        self.proto()
            .map_or("", |m| m.output_type().trim_start_matches('.'))
    }

    /// Whether the client streams.
    #[must_use]
    pub fn client_streaming(&self) -> bool {
        self.proto().is_some_and(|m| m.client_streaming())
    }

    /// Whether the server streams.
    #[must_use]
    pub fn server_streaming(&self) -> bool {
        self.proto().is_some_and(|m| m.server_streaming())
    }

    /// The file this method was declared in.
    #[must_use]
    pub fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    /// The declaring service.
    #[must_use]
    pub fn parent(&self) -> ServiceDescriptor {
        let n = self.path.len();
        ServiceDescriptor::new(self.file.clone(), self.path[..n - 2].into())
    }
}

impl Descriptor for MethodDescriptor {
    fn name(&self) -> &str {
        MethodDescriptor::name(self)
    }

    fn full_name(&self) -> String {
        MethodDescriptor::full_name(self)
    }

    fn parent_file(&self) -> &FileDescriptor {
        &self.file
    }

    fn path(&self) -> &[i32] {
        &self.path
    }
}

/// Lazy view over a file's services.
#[derive(Debug, Clone)]
pub struct Services {
    file: FileDescriptor,
}

impl Services {
    pub(crate) fn new(file: FileDescriptor) -> Self {
        Self { file }
    }

    /// Number of services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.file.proto().service.len()
    }

    /// Whether the file declares no services.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`th service, in declaration order.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<ServiceDescriptor> {
        if i >= self.len() {
            return None;
        }
        let p = path::child(&[], tag::FILE_SERVICE, i)?;
        Some(ServiceDescriptor::new(self.file.clone(), p))
    }

    /// Looks up a service by short name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<ServiceDescriptor> {
        let i = self
            .file
            .proto()
            .service
            .iter()
            .position(|s| s.name() == name)?;
        self.get(i)
    }

    /// Iterates services in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = ServiceDescriptor> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// Lazy view over a service's methods.
#[derive(Debug, Clone)]
pub struct Methods {
    file: FileDescriptor,
    base: Box<[i32]>,
}

impl Methods {
    fn slice(&self) -> &[MethodDescriptorProto] {
        match path::resolve(self.file.proto(), &self.base) {
            Some(Node::Service(s)) => &s.method,
            _ => &[],
        }
    }

    /// Number of methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slice().len()
    }

    /// Whether the service declares no methods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slice().is_empty()
    }

    /// The `i`th method, in declaration order.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<MethodDescriptor> {
        if i >= self.len() {
            return None;
        }
        let path = path::child(&self.base, tag::SERVICE_METHOD, i)?;
        Some(MethodDescriptor {
            file: self.file.clone(),
            path,
        })
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<MethodDescriptor> {
        let i = self.slice().iter().position(|m| m.name() == name)?;
        self.get(i)
    }

    /// Iterates methods in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = MethodDescriptor> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}
