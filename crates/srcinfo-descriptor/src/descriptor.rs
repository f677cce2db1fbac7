//! The common descriptor seam.

use crate::file::FileDescriptor;

/// Capabilities shared by every descriptor handle kind.
///
/// This is the seam consumed by code that correlates schema elements with
/// per-file data keyed by structural path — notably the source-location
/// index, whose `by_descriptor` lookup needs exactly the owning file and
/// the path.
pub trait Descriptor {
    /// Short name of the element (file path for files).
    fn name(&self) -> &str;

    /// Fully-qualified name, e.g. `"shop.Order.id"`.
    ///
    /// Enum values are scoped to their enum's *container*, following proto
    /// scoping rules.
    fn full_name(&self) -> String;

    /// The file this element was declared in. For a file, itself.
    fn parent_file(&self) -> &FileDescriptor;

    /// Structural path from the file root; empty for the file itself.
    fn path(&self) -> &[i32];
}

impl Descriptor for FileDescriptor {
    fn name(&self) -> &str {
        FileDescriptor::name(self)
    }

    fn full_name(&self) -> String {
        FileDescriptor::name(self).to_owned()
    }

    fn parent_file(&self) -> &FileDescriptor {
        self
    }

    fn path(&self) -> &[i32] {
        &[]
    }
}
