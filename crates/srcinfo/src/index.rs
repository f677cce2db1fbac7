//! Per-file source-location index: path lookup and duplicate-path chains
//! over an ordered list of raw location records.

use crate::location::{RawLocation, Span};
use serde::Serialize;
use srcinfo_descriptor::{Descriptor, FileDescriptor};
use std::collections::HashMap;
use tracing::debug;

/// A materialized source location: one raw record plus its ordinal within
/// the owning file's record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    record: RawLocation,
    ordinal: usize,
}

impl SourceLocation {
    /// Structural path this location is attached to.
    #[must_use]
    pub fn path(&self) -> &[i32] {
        &self.record.path
    }

    /// Source span of the element.
    #[must_use]
    pub fn span(&self) -> Span {
        self.record.span
    }

    /// Leading comment text, empty when absent.
    #[must_use]
    pub fn leading_comments(&self) -> &str {
        self.record.leading_comments.as_deref().unwrap_or("")
    }

    /// Trailing comment text, empty when absent.
    #[must_use]
    pub fn trailing_comments(&self) -> &str {
        self.record.trailing_comments.as_deref().unwrap_or("")
    }

    /// Detached comment blocks above the element.
    #[must_use]
    pub fn leading_detached_comments(&self) -> &[String] {
        &self.record.leading_detached_comments
    }

    /// Position of this location in the file's record list.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// Queryable index over one file's source locations.
///
/// Built exactly once from the file's ordered raw records. Lookups never
/// fail; absence — including a descriptor from a different file instance —
/// is `None`.
#[derive(Debug)]
pub struct SourceLocationIndex {
    file: FileDescriptor,
    locations: Vec<SourceLocation>,
    /// Ordinal of the *first* location per path; later duplicates are
    /// reached through `next`.
    by_path: HashMap<Box<[i32]>, usize>,
    /// Per location, the ordinal of the next location sharing its path.
    next: Vec<Option<usize>>,
}

impl SourceLocationIndex {
    /// Builds the index for `file` from its raw records, preserving input
    /// order among records that share a path.
    #[must_use]
    pub fn build(file: FileDescriptor, records: &[RawLocation]) -> Self {
        let mut index = Self {
            file,
            locations: Vec::with_capacity(records.len()),
            by_path: HashMap::new(),
            next: vec![None; records.len()],
        };
        if records.is_empty() {
            return index;
        }
        let mut last_for_path: HashMap<&[i32], usize> = HashMap::new();
        for (ordinal, record) in records.iter().enumerate() {
            index.locations.push(SourceLocation {
                record: record.clone(),
                ordinal,
            });
            match last_for_path.insert(&record.path, ordinal) {
                Some(prev) => index.next[prev] = Some(ordinal),
                None => {
                    index
                        .by_path
                        .insert(record.path.clone().into_boxed_slice(), ordinal);
                }
            }
        }
        debug!(
            file = index.file.name(),
            locations = index.locations.len(),
            paths = index.by_path.len(),
            "built source location index"
        );
        index
    }

    /// The file this index was built for.
    #[must_use]
    pub fn file(&self) -> &FileDescriptor {
        &self.file
    }

    /// Number of locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the file carried no location records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// The `i`th location, in record order.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&SourceLocation> {
        self.locations.get(i)
    }

    /// First location attached to `path`, if any.
    #[must_use]
    pub fn by_path(&self, path: &[i32]) -> Option<&SourceLocation> {
        self.locations.get(*self.by_path.get(path)?)
    }

    /// Location of a descriptor, keyed by its structural path.
    ///
    /// Returns `None` when the descriptor's parent file is not the file
    /// this index was built for — a mismatched-context lookup across
    /// unrelated file instances, treated like any other absence.
    #[must_use]
    pub fn by_descriptor(&self, descriptor: &impl Descriptor) -> Option<&SourceLocation> {
        if descriptor.parent_file() != &self.file {
            return None;
        }
        self.by_path(descriptor.path())
    }

    /// The next location sharing `location`'s path, in record order.
    #[must_use]
    pub fn next_in_chain(&self, location: &SourceLocation) -> Option<&SourceLocation> {
        let next = (*self.next.get(location.ordinal)?)?;
        self.locations.get(next)
    }

    /// Iterates every location attached to `path`, in record order.
    pub fn all_by_path<'a>(&'a self, path: &[i32]) -> impl Iterator<Item = &'a SourceLocation> {
        let mut current = self.by_path(path);
        std::iter::from_fn(move || {
            let loc = current?;
            current = self.next_in_chain(loc);
            Some(loc)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::FileDescriptorProto;
    use srcinfo_descriptor::FileOrigin;

    fn empty_file(name: &str) -> FileDescriptor {
        let proto = FileDescriptorProto {
            name: Some(name.to_owned()),
            ..Default::default()
        };
        FileDescriptor::build(proto, &[], FileOrigin::Standalone).expect("builds")
    }

    fn record(path: &[i32], leading: &str) -> RawLocation {
        RawLocation {
            path: path.to_vec(),
            leading_comments: Some(leading.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_record_list_builds_an_empty_index() {
        let index = SourceLocationIndex::build(empty_file("a.proto"), &[]);
        assert_eq!(index.len(), 0);
        assert!(index.is_empty());
        assert!(index.by_path(&[4, 0]).is_none());
        assert!(index.get(0).is_none());
    }

    #[test]
    fn first_record_per_path_anchors_the_chain() {
        let records = vec![
            record(&[4, 0], " first\n"),
            record(&[5, 0], " other\n"),
            record(&[4, 0], " second\n"),
            record(&[4, 0], " third\n"),
        ];
        let index = SourceLocationIndex::build(empty_file("b.proto"), &records);
        assert_eq!(index.len(), 4);

        let first = index.by_path(&[4, 0]).expect("anchor");
        assert_eq!(first.leading_comments(), " first\n");
        let second = index.next_in_chain(first).expect("second in chain");
        assert_eq!(second.leading_comments(), " second\n");
        let third = index.next_in_chain(second).expect("third in chain");
        assert_eq!(third.leading_comments(), " third\n");
        assert!(index.next_in_chain(third).is_none());

        let chained: Vec<&str> = index
            .all_by_path(&[4, 0])
            .map(SourceLocation::leading_comments)
            .collect();
        assert_eq!(chained, [" first\n", " second\n", " third\n"]);

        let other = index.by_path(&[5, 0]).expect("other path");
        assert!(index.next_in_chain(other).is_none());
    }

    #[test]
    fn absent_path_is_none() {
        let index = SourceLocationIndex::build(empty_file("c.proto"), &[record(&[4, 0], " x\n")]);
        assert!(index.by_path(&[99]).is_none());
        assert!(index.all_by_path(&[99]).next().is_none());
    }

    #[test]
    fn mismatched_file_is_none() {
        let owner = empty_file("owner.proto");
        let other = empty_file("other.proto");
        let index = SourceLocationIndex::build(owner.clone(), &[record(&[], " file\n")]);
        assert!(index.by_descriptor(&owner).is_some());
        assert!(index.by_descriptor(&other).is_none());
    }
}
