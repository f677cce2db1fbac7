//! Upgrading: in-place-equivalent replacement of a descriptor by one that
//! embeds its registered source info natively, for consumers unaware of
//! the wrapping layer.

use crate::registry;
use prost_types::SourceCodeInfo;
use srcinfo_descriptor::{FileDescriptor, FileOrigin};
use tracing::debug;

/// Whether [`upgrade_file`] would produce a new descriptor for this file:
/// it carries no native source info, it was built by the registry, and a
/// side table is registered for its path.
#[must_use]
pub fn is_upgradable(file: &FileDescriptor) -> bool {
    file.location_count() == 0
        && file.origin() == FileOrigin::Registry
        && registry::registered_records(file.name()).is_some()
}

/// Rebuilds `file` with its registered source info embedded as native
/// `source_code_info`, so any descriptor consumer sees it without going
/// through wrappers.
///
/// Returns the input unchanged when the file is already fully equipped or
/// not upgradable. The result is a distinct file instance; handles into
/// the old instance stay valid but do not compare equal to handles into
/// the new one.
#[must_use]
pub fn upgrade_file(file: FileDescriptor) -> FileDescriptor {
    if !is_upgradable(&file) {
        return file;
    }
    let Some(records) = registry::registered_records(file.name()) else {
        return file;
    };
    let mut proto = file.proto().clone();
    proto.source_code_info = Some(SourceCodeInfo {
        location: records.iter().map(crate::location::RawLocation::to_proto).collect(),
    });
    let deps: Vec<FileDescriptor> = file.imports().iter().map(|i| i.file).collect();
    match FileDescriptor::build(proto, &deps, file.origin()) {
        Ok(upgraded) => {
            debug!(file = upgraded.name(), "upgraded file with embedded source info");
            upgraded
        }
        // Same proto, same deps: a rebuild failure means the input was
        // inconsistent, and the contract is to hand it back untouched.
        Err(_) => file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::FileDescriptorProto;

    #[test]
    fn standalone_files_are_not_upgradable() {
        let proto = FileDescriptorProto {
            name: Some("upgrade_unit/standalone.proto".into()),
            ..Default::default()
        };
        let file = FileDescriptor::build(proto, &[], FileOrigin::Standalone).expect("builds");
        assert!(!is_upgradable(&file));
        let same = upgrade_file(file.clone());
        assert_eq!(same, file);
    }
}
