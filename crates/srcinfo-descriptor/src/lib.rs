//! # srcinfo-descriptor
//!
//! Read-only handle graph over `prost-types` descriptor protos.
//!
//! This crate turns an already-validated [`prost_types::FileDescriptorProto`]
//! (plus its resolved dependencies) into a navigable family of cheap-clone
//! descriptor handles:
//!
//! - [`FileDescriptor`] and one handle type per schema element kind
//!   (message, field, oneof, enum, enum value, extension, service, method)
//! - typed child collections with by-index, by-name, by-number,
//!   by-JSON-name and by-text-name lookup
//! - the [`Descriptor`] trait as the common seam for code that only needs
//!   names, the owning file and the structural path
//!
//! Every handle is an owning file plus a *structural path*: the sequence of
//! `descriptor.proto` field tags and indexes that locates the element inside
//! the file, the same encoding `SourceCodeInfo` uses to attach source
//! locations. Handles resolve their proto node on access and never copy
//! subtrees; equality is "same file instance, same path".
//!
//! ## Example
//!
//! ```ignore
//! use srcinfo_descriptor::{FileDescriptor, FileOrigin};
//!
//! let file = FileDescriptor::build(proto, &[], FileOrigin::Standalone)?;
//! let msg = file.messages().by_name("Order").unwrap();
//! assert_eq!(msg.full_name(), "shop.Order");
//! ```
//!
//! This crate does not parse proto source and does not validate descriptor
//! semantics; it assumes its input came out of a descriptor compiler.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod descriptor;
mod enums;
mod field;
mod file;
mod message;
pub(crate) mod path;
mod service;

pub use descriptor::Descriptor;
pub use enums::{EnumDescriptor, EnumValueDescriptor, EnumValues, Enums};
pub use field::{Cardinality, ExtensionDescriptor, Extensions, FieldDescriptor, Fields, Kind};
pub use file::{BuildError, FileDescriptor, FileOrigin, Import, Imports};
pub use message::{MessageDescriptor, Messages, OneofDescriptor, Oneofs};
pub use service::{MethodDescriptor, Methods, ServiceDescriptor, Services};
