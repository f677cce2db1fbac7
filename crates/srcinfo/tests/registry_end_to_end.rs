//! End-to-end registry tests: register file protos and side tables, then
//! look descriptors up by path, full name and extension number.
//!
//! The registries are process-global and tests in this binary run in
//! parallel, so every test keeps to its own package and file paths.

use prost::Message as _;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MethodDescriptorProto, ServiceDescriptorProto, SourceCodeInfo,
};
use srcinfo::registry::{
    find_descriptor_by_full_name, find_enum_by_full_name, find_extension_by_full_name,
    find_extension_by_number, find_file_by_path, find_message_by_full_name, register_encoded_source_info,
    register_file, register_source_info,
};
use srcinfo::{is_upgradable, upgrade_file, wrap_file, RawLocation, RegistryError};

fn string_field(name: &str, number: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_owned()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::String as i32),
        ..Default::default()
    }
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_owned()),
        field: fields,
        ..Default::default()
    }
}

fn file_proto(path: &str, package: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(path.to_owned()),
        package: Some(package.to_owned()),
        syntax: Some("proto3".into()),
        ..Default::default()
    }
}

fn loc(path: &[i32], leading: &str) -> RawLocation {
    RawLocation {
        path: path.to_vec(),
        leading_comments: Some(leading.to_owned()),
        ..Default::default()
    }
}

#[test]
fn path_and_full_name_lookups_agree() {
    let mut proto = file_proto("e2e_shop/order.proto", "e2e_shop");
    proto.message_type = vec![message(
        "Order",
        vec![string_field("order_id", 1), string_field("note", 2)],
    )];
    // Side table first: a name lookup elsewhere in this binary may build
    // every registered file, and built files do not pick up later tables.
    register_source_info(
        "e2e_shop/order.proto",
        vec![
            loc(&[4, 0], " Comment for Order\n"),
            loc(&[4, 0, 2, 0], " Comment for order_id\n"),
        ],
    );
    register_file(proto).expect("registers");

    let file = find_file_by_path("e2e_shop/order.proto").expect("built");
    let order = file.messages().by_name("Order").expect("Order");
    assert_eq!(order.leading_comments(), " Comment for Order\n");
    let field = order.field_by_name("order_id").expect("order_id");
    assert_eq!(field.leading_comments(), " Comment for order_id\n");

    // Resolution by dotted name lands on the same wrapped handle.
    let resolved = find_descriptor_by_full_name("e2e_shop.Order.order_id").expect("resolves");
    assert_eq!(resolved.full_name(), "e2e_shop.Order.order_id");
    assert_eq!(resolved.as_field(), Some(&field));
    assert_eq!(resolved.leading_comments(), " Comment for order_id\n");

    // Repeated lookups are memoized onto one wrapped instance.
    let again = find_file_by_path("e2e_shop/order.proto").expect("cached");
    assert_eq!(again, file);
    assert_eq!(wrap_file(file.underlying().clone()), file);
}

#[test]
fn typed_lookups_cover_every_name_shape() {
    let mut proto = file_proto("e2e_types/types.proto", "e2e_types");
    proto.message_type = vec![message("Msg", vec![string_field("body", 1)])];
    proto.enum_type = vec![EnumDescriptorProto {
        name: Some("Level".into()),
        value: vec![EnumValueDescriptorProto {
            name: Some("LEVEL_ZERO".into()),
            number: Some(0),
            ..Default::default()
        }],
        ..Default::default()
    }];
    proto.extension = vec![FieldDescriptorProto {
        name: Some("tag".into()),
        number: Some(1000),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::String as i32),
        extendee: Some(".e2e_types.Msg".into()),
        ..Default::default()
    }];
    proto.service = vec![ServiceDescriptorProto {
        name: Some("Admin".into()),
        method: vec![MethodDescriptorProto {
            name: Some("Ping".into()),
            input_type: Some(".e2e_types.Msg".into()),
            output_type: Some(".e2e_types.Msg".into()),
            ..Default::default()
        }],
        ..Default::default()
    }];
    register_file(proto).expect("registers");

    let msg = find_message_by_full_name("e2e_types.Msg").expect("message");
    assert_eq!(msg.full_name(), "e2e_types.Msg");
    let level = find_enum_by_full_name("e2e_types.Level").expect("enum");
    assert_eq!(level.full_name(), "e2e_types.Level");

    let by_name = find_extension_by_full_name("e2e_types.tag").expect("extension");
    let by_number = find_extension_by_number("e2e_types.Msg", 1000).expect("extension");
    assert_eq!(by_name, by_number);
    assert_eq!(by_number.extendee(), "e2e_types.Msg");

    // Top-level enum values are scoped to the package.
    let value = find_descriptor_by_full_name("e2e_types.LEVEL_ZERO").expect("enum value");
    assert_eq!(value.full_name(), "e2e_types.LEVEL_ZERO");

    let method = find_descriptor_by_full_name("e2e_types.Admin.Ping").expect("method");
    assert_eq!(method.name(), "Ping");

    // Files are found by path, never through name resolution.
    assert!(matches!(
        find_descriptor_by_full_name("e2e_types/types.proto"),
        Err(RegistryError::TypeNotFound { .. })
    ));
}

#[test]
fn racing_first_lookups_observe_one_wrapped_instance() {
    register_source_info(
        "e2e_race/histo.proto",
        vec![loc(&[4, 0], " Comment for Histo\n")],
    );
    let mut proto = file_proto("e2e_race/histo.proto", "e2e_race");
    proto.message_type = vec![message("Histo", vec![string_field("bucket", 1)])];
    register_file(proto).expect("registers");

    let files: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| find_file_by_path("e2e_race/histo.proto").expect("built")))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("lookup thread"))
            .collect()
    });
    for file in &files {
        assert_eq!(file, &files[0], "every racer sees the one winner");
        assert_eq!(
            file.messages()
                .by_name("Histo")
                .expect("Histo")
                .leading_comments(),
            " Comment for Histo\n"
        );
    }
}

#[test]
fn duplicate_file_registration_is_rejected() {
    register_file(file_proto("e2e_dup/one.proto", "e2e_dup")).expect("first");
    let err = register_file(file_proto("e2e_dup/one.proto", "e2e_dup"))
        .expect_err("second registration must fail");
    assert!(matches!(err, RegistryError::DuplicateFile { path } if path == "e2e_dup/one.proto"));
}

#[test]
fn missing_entities_report_not_found() {
    assert!(matches!(
        find_file_by_path("e2e_missing/nope.proto"),
        Err(RegistryError::FileNotFound { .. })
    ));
    assert!(matches!(
        find_message_by_full_name("e2e_missing.Nope"),
        Err(RegistryError::TypeNotFound { .. })
    ));
    assert!(matches!(
        find_extension_by_number("e2e_missing.Nope", 7),
        Err(RegistryError::ExtensionNotFound { number: 7, .. })
    ));
    // A name with no dot cannot fall back to container resolution.
    assert!(matches!(
        find_descriptor_by_full_name("e2e_missing_bare"),
        Err(RegistryError::TypeNotFound { .. })
    ));
}

#[test]
fn import_cycles_fail_the_lookup() {
    let mut a = file_proto("e2e_cycle/a.proto", "e2e_cycle");
    a.dependency = vec!["e2e_cycle/b.proto".into()];
    let mut b = file_proto("e2e_cycle/b.proto", "e2e_cycle");
    b.dependency = vec!["e2e_cycle/a.proto".into()];
    register_file(a).expect("registers a");
    register_file(b).expect("registers b");

    let err = find_file_by_path("e2e_cycle/a.proto").expect_err("cycle must fail");
    assert!(matches!(err, RegistryError::DependencyCycle { .. }));
}

#[test]
fn unregistered_dependencies_fail_the_lookup() {
    let mut proto = file_proto("e2e_nodep/a.proto", "e2e_nodep");
    proto.dependency = vec!["e2e_nodep/missing.proto".into()];
    register_file(proto).expect("registers");

    let err = find_file_by_path("e2e_nodep/a.proto").expect_err("dep is unregistered");
    assert!(
        matches!(err, RegistryError::FileNotFound { path } if path == "e2e_nodep/missing.proto")
    );
}

#[test]
fn dependencies_build_transitively_and_register_their_types() {
    let mut common = file_proto("e2e_dep/common.proto", "e2e_dep");
    common.message_type = vec![message("Money", vec![string_field("currency", 1)])];
    let mut order = file_proto("e2e_dep/order.proto", "e2e_dep");
    order.dependency = vec!["e2e_dep/common.proto".into()];
    order.message_type = vec![message("Order", vec![string_field("order_id", 1)])];
    register_file(common).expect("registers common");
    register_file(order).expect("registers order");

    let file = find_file_by_path("e2e_dep/order.proto").expect("built with dep");
    let import = file.imports().get(0).expect("one import");
    assert_eq!(import.file.name(), "e2e_dep/common.proto");
    assert_eq!(
        import.file,
        find_file_by_path("e2e_dep/common.proto").expect("dep is built")
    );

    // Building the importer registered the dependency's types too.
    let money = find_message_by_full_name("e2e_dep.Money").expect("dep type");
    assert_eq!(money.full_name(), "e2e_dep.Money");
}

#[test]
fn encoded_side_tables_decode_or_fail_loudly() {
    let info = SourceCodeInfo {
        location: vec![prost_types::source_code_info::Location {
            path: vec![4, 0],
            span: vec![3, 0, 12],
            leading_comments: Some(" Comment for Doc\n".into()),
            ..Default::default()
        }],
    };
    register_encoded_source_info("e2e_enc/doc.proto", &info.encode_to_vec()).expect("decodes");

    let mut proto = file_proto("e2e_enc/doc.proto", "e2e_enc");
    proto.message_type = vec![message("Doc", vec![string_field("title", 1)])];
    register_file(proto).expect("registers");

    let doc = find_file_by_path("e2e_enc/doc.proto")
        .expect("built")
        .messages()
        .by_name("Doc")
        .expect("Doc");
    assert_eq!(doc.leading_comments(), " Comment for Doc\n");

    let err = register_encoded_source_info("e2e_enc/garbage.proto", &[0xff, 0xff])
        .expect_err("garbage must not decode");
    assert!(matches!(err, RegistryError::Decode { path, .. } if path == "e2e_enc/garbage.proto"));
}

#[test]
fn upgrading_embeds_the_side_table_natively() {
    register_source_info(
        "e2e_up/api.proto",
        vec![loc(&[4, 0], " Comment for Api\n")],
    );
    let mut proto = file_proto("e2e_up/api.proto", "e2e_up");
    proto.message_type = vec![message("Api", vec![string_field("version", 1)])];
    register_file(proto).expect("registers");

    let original = find_file_by_path("e2e_up/api.proto")
        .expect("built")
        .underlying()
        .clone();
    assert_eq!(original.location_count(), 0);
    assert!(is_upgradable(&original));

    let upgraded = upgrade_file(original.clone());
    assert_ne!(upgraded, original, "upgrade produces a distinct instance");
    assert_eq!(upgraded.location_count(), 1);
    assert!(!is_upgradable(&upgraded));

    // Native info on the upgraded file wins over the registered table.
    let wrapped = wrap_file(upgraded);
    assert_eq!(
        wrapped
            .messages()
            .by_name("Api")
            .expect("Api")
            .leading_comments(),
        " Comment for Api\n"
    );
}
