//! # srcinfo
//!
//! Source-position and comment augmentation for protobuf descriptor
//! graphs.
//!
//! Descriptor compilers often strip `SourceCodeInfo` from the descriptors
//! embedded in generated code, which loses the comments and spans that doc
//! tooling wants. A companion generator emits those `(path, span, comment)`
//! records as a per-file side table instead; this crate re-associates the
//! two without mutating the descriptor graph:
//!
//! - [`RawLocation`] / [`Span`]: the decoded side-table records
//! - [`SourceLocationIndex`]: a per-file, lazily built, build-once index —
//!   lookup by structural path or by descriptor, with duplicate-path
//!   chaining in record order
//! - the `Source*` wrapper family ([`SourceFile`], [`SourceMessage`], …):
//!   one wrapper per descriptor kind, forwarding every read to the
//!   underlying handle while navigation returns wrapped equivalents and
//!   comment lookup consults the index
//! - [`registry`]: process-wide, lazily populated file and type registries
//!   handing out memoized wrapped descriptors
//! - [`upgrade_file`] / [`is_upgradable`]: rebuilding a file with its side
//!   table embedded as native `source_code_info`
//!
//! Every entry point stays usable on any input: files with native source
//! info keep serving it, files of unknown provenance wrap into
//! pass-throughs with empty comment lookups, and equality of a wrapper is
//! equality of its underlying handle.
//!
//! ## Example
//!
//! ```ignore
//! use srcinfo::registry;
//!
//! registry::register_file(file_proto)?;
//! registry::register_encoded_source_info("shop/order.proto", side_table)?;
//!
//! let field = registry::find_file_by_path("shop/order.proto")?
//!     .messages().get(0).unwrap()
//!     .fields().by_name("order_id").unwrap();
//! println!("{}", field.leading_comments());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod index;
mod location;
pub mod registry;
mod upgrade;
mod wrap;

pub use index::{SourceLocation, SourceLocationIndex};
pub use location::{RawLocation, Span};
pub use registry::{RegistryError, SourceDescriptor};
pub use upgrade::{is_upgradable, upgrade_file};
pub use wrap::{
    wrap_enum, wrap_enum_value, wrap_extension, wrap_field, wrap_file, wrap_message, wrap_method,
    wrap_oneof, wrap_service, SourceEnum, SourceEnumValue, SourceEnumValues, SourceEnums,
    SourceExtension, SourceExtensions, SourceField, SourceFields, SourceFile, SourceImport,
    SourceImports, SourceMessage, SourceMessages, SourceMethod, SourceMethods, SourceOneof,
    SourceOneofs, SourceService, SourceServices,
};
