//! Integration tests: navigation, lookup and naming over a hand-built
//! descriptor proto, the way a descriptor compiler would emit it.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MessageOptions, MethodDescriptorProto, OneofDescriptorProto,
    ServiceDescriptorProto,
};
use srcinfo_descriptor::{
    BuildError, Cardinality, Descriptor, FileDescriptor, FileOrigin, Kind,
};

fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_owned()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn order_file_proto() -> FileDescriptorProto {
    let labels_entry = DescriptorProto {
        name: Some("LabelsEntry".into()),
        field: vec![field("key", 1, Type::String), field("value", 2, Type::String)],
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };
    let line_item = DescriptorProto {
        name: Some("LineItem".into()),
        field: vec![field("name", 1, Type::String)],
        ..Default::default()
    };
    let mut card = field("card", 4, Type::String);
    card.oneof_index = Some(0);
    let mut cash = field("cash", 5, Type::Bool);
    cash.oneof_index = Some(0);
    let mut status = field("status", 2, Type::Enum);
    status.type_name = Some(".shop.Status".into());
    let mut labels = field("labels", 6, Type::Message);
    labels.label = Some(Label::Repeated as i32);
    labels.type_name = Some(".shop.Order.LabelsEntry".into());
    let order = DescriptorProto {
        name: Some("Order".into()),
        field: vec![
            field("order_id", 1, Type::Int64),
            status,
            field("note", 3, Type::String),
            card,
            cash,
            labels,
        ],
        nested_type: vec![line_item, labels_entry],
        enum_type: vec![EnumDescriptorProto {
            name: Some("Flag".into()),
            value: vec![EnumValueDescriptorProto {
                name: Some("FLAG_UNSET".into()),
                number: Some(0),
                ..Default::default()
            }],
            ..Default::default()
        }],
        oneof_decl: vec![OneofDescriptorProto {
            name: Some("payment".into()),
            ..Default::default()
        }],
        ..Default::default()
    };
    let mut ext = field("priority", 100, Type::Int32);
    ext.extendee = Some(".shop.Order".into());
    FileDescriptorProto {
        name: Some("shop/order.proto".into()),
        package: Some("shop".into()),
        syntax: Some("proto3".into()),
        dependency: vec!["shop/common.proto".into()],
        public_dependency: vec![0],
        message_type: vec![order],
        enum_type: vec![EnumDescriptorProto {
            name: Some("Status".into()),
            value: vec![
                EnumValueDescriptorProto {
                    name: Some("STATUS_UNSET".into()),
                    number: Some(0),
                    ..Default::default()
                },
                EnumValueDescriptorProto {
                    name: Some("ACTIVE".into()),
                    number: Some(1),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }],
        service: vec![ServiceDescriptorProto {
            name: Some("Orders".into()),
            method: vec![MethodDescriptorProto {
                name: Some("Create".into()),
                input_type: Some(".shop.Order".into()),
                output_type: Some(".shop.Order".into()),
                server_streaming: Some(true),
                ..Default::default()
            }],
            ..Default::default()
        }],
        extension: vec![ext],
        ..Default::default()
    }
}

fn common_file() -> FileDescriptor {
    let proto = FileDescriptorProto {
        name: Some("shop/common.proto".into()),
        package: Some("shop".into()),
        syntax: Some("proto3".into()),
        ..Default::default()
    };
    FileDescriptor::build(proto, &[], FileOrigin::Standalone).expect("common builds")
}

fn order_file() -> FileDescriptor {
    FileDescriptor::build(
        order_file_proto(),
        &[common_file()],
        FileOrigin::Standalone,
    )
    .expect("order builds")
}

#[test]
fn missing_dependency_is_an_error() {
    let err = FileDescriptor::build(order_file_proto(), &[], FileOrigin::Standalone)
        .expect_err("unresolved import must fail");
    assert_eq!(
        err,
        BuildError::MissingDependency {
            file: "shop/order.proto".into(),
            import: "shop/common.proto".into(),
        }
    );
}

#[test]
fn duplicate_dependency_is_an_error() {
    let err = FileDescriptor::build(
        order_file_proto(),
        &[common_file(), common_file()],
        FileOrigin::Standalone,
    )
    .expect_err("duplicate dep must fail");
    assert!(matches!(err, BuildError::DuplicateDependency { .. }));
}

#[test]
fn file_accessors() {
    let file = order_file();
    assert_eq!(file.name(), "shop/order.proto");
    assert_eq!(file.package(), "shop");
    assert_eq!(file.syntax(), "proto3");
    assert_eq!(file.location_count(), 0);
    assert_eq!(file.parent_file(), &file);
    let import = file.imports().get(0).expect("one import");
    assert_eq!(import.file.name(), "shop/common.proto");
    assert!(import.is_public);
    assert!(!import.is_weak);
}

#[test]
fn message_navigation_and_naming() {
    let file = order_file();
    let order = file.messages().by_name("Order").expect("Order exists");
    assert_eq!(order.full_name(), "shop.Order");
    assert_eq!(order.path(), &[4, 0]);
    assert!(order.parent().is_none());
    assert_eq!(order.parent_file(), &file);

    let item = order
        .nested_messages()
        .by_name("LineItem")
        .expect("nested message");
    assert_eq!(item.full_name(), "shop.Order.LineItem");
    assert_eq!(item.path(), &[4, 0, 3, 0]);
    assert_eq!(item.parent().as_ref(), Some(&order));

    let entry = order
        .nested_messages()
        .by_name("LabelsEntry")
        .expect("map entry");
    assert!(entry.is_map_entry());
    assert!(!order.is_map_entry());
}

#[test]
fn field_lookup_by_every_key() {
    let file = order_file();
    let order = file.messages().get(0).expect("Order");
    let id = order.field_by_name("order_id").expect("by name");
    assert_eq!(id.number(), 1);
    assert_eq!(id.kind(), Kind::Int64);
    assert_eq!(id.cardinality(), Cardinality::Optional);
    assert_eq!(id.full_name(), "shop.Order.order_id");
    assert_eq!(id.path(), &[4, 0, 2, 0]);
    assert_eq!(id.json_name(), "orderId");

    assert_eq!(order.field_by_number(3).map(|f| f.name().to_owned()), Some("note".into()));
    assert_eq!(
        order.field_by_json_name("orderId").as_ref(),
        Some(&id),
        "json lookup finds the same handle"
    );
    assert_eq!(order.field_by_text_name("order_id").as_ref(), Some(&id));
    assert!(order.field_by_name("nope").is_none());
    assert!(order.field_by_number(99).is_none());

    let status = order.field_by_name("status").expect("status");
    assert_eq!(status.type_name(), "shop.Status");
}

#[test]
fn oneof_membership() {
    let file = order_file();
    let order = file.messages().get(0).expect("Order");
    let payment = order.oneof_by_name("payment").expect("oneof");
    assert_eq!(payment.full_name(), "shop.Order.payment");
    let members: Vec<String> = payment.fields().iter().map(|f| f.name().to_owned()).collect();
    assert_eq!(members, ["card", "cash"]);
    let card = order.field_by_name("card").expect("card");
    assert_eq!(card.containing_oneof().as_ref(), Some(&payment));
    assert!(order
        .field_by_name("note")
        .expect("note")
        .containing_oneof()
        .is_none());
}

#[test]
fn enum_and_value_naming() {
    let file = order_file();
    let status = file.enums().by_name("Status").expect("Status");
    assert_eq!(status.full_name(), "shop.Status");
    let active = status.value_by_name("ACTIVE").expect("ACTIVE");
    assert_eq!(active.number(), 1);
    // Values scope to the enum's container, not the enum.
    assert_eq!(active.full_name(), "shop.ACTIVE");
    assert_eq!(active.parent(), status);
    assert_eq!(
        status.value_by_number(0).map(|v| v.name().to_owned()),
        Some("STATUS_UNSET".into())
    );

    let flag = file
        .messages()
        .get(0)
        .expect("Order")
        .nested_enums()
        .by_name("Flag")
        .expect("Flag");
    assert_eq!(flag.full_name(), "shop.Order.Flag");
    assert_eq!(
        flag.value_by_name("FLAG_UNSET").expect("value").full_name(),
        "shop.Order.FLAG_UNSET"
    );
}

#[test]
fn service_and_method() {
    let file = order_file();
    let svc = file.services().by_name("Orders").expect("service");
    assert_eq!(svc.full_name(), "shop.Orders");
    let create = svc.method_by_name("Create").expect("method");
    assert_eq!(create.full_name(), "shop.Orders.Create");
    assert_eq!(create.input_type(), "shop.Order");
    assert!(create.server_streaming());
    assert!(!create.client_streaming());
    assert_eq!(create.parent(), svc);
    assert_eq!(create.path(), &[6, 0, 2, 0]);
}

#[test]
fn extension_accessors() {
    let file = order_file();
    let ext = file.extensions().by_name("priority").expect("extension");
    assert_eq!(ext.full_name(), "shop.priority");
    assert_eq!(ext.extendee(), "shop.Order");
    assert_eq!(ext.number(), 100);
    assert!(ext.declaring_message().is_none());
}

#[test]
fn equality_is_per_build() {
    let a = order_file();
    let b = a.clone();
    assert_eq!(a, b);
    assert_eq!(a.messages().get(0), b.messages().get(0));
    // A second build of the same proto is a different file instance.
    let rebuilt = order_file();
    assert_ne!(a, rebuilt);
    assert_ne!(a.messages().get(0), rebuilt.messages().get(0));
}
