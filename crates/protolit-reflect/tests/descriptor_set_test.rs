use protolit_reflect::{DescriptorError, DescriptorPool, LoadError, MapKey, Scalar, Value};

const SHOP: &str = r#"{
  "package": "shop",
  "enums": [
    { "name": "Currency", "values": [{ "name": "EUR", "number": 0 }, { "name": "USD", "number": 1 }] }
  ],
  "messages": [
    {
      "name": "Order",
      "oneofs": ["Payment"],
      "fields": [
        { "name": "Id", "number": 1, "type": "uint64" },
        { "name": "Lines", "number": 2, "type": "message", "type_name": "Order.Line", "label": "repeated" },
        { "name": "Prices", "number": 3, "type": "message", "map": { "key": "uint32", "value": { "type": "double" } } },
        { "name": "Card", "number": 4, "type": "string", "oneof": "Payment" },
        { "name": "Cash", "number": 5, "type": "enum", "type_name": "Currency", "oneof": "Payment" },
        { "name": "State", "number": 6, "type": "enum", "type_name": "Order.State" }
      ],
      "messages": [
        { "name": "Line", "fields": [{ "name": "Sku", "number": 1, "type": "string" }] }
      ],
      "enums": [
        { "name": "State", "values": [{ "name": "OPEN", "number": 0 }, { "name": "PAID", "number": 1 }] }
      ]
    }
  ]
}"#;

fn pool() -> DescriptorPool {
    DescriptorPool::from_json(SHOP).unwrap()
}

#[test]
fn test_nested_types_get_flat_go_names() {
    let pool = pool();
    let line = pool.get_message_by_name("shop.Order.Line").unwrap();
    assert_eq!(line.go_name(), "shop.Order_Line");

    let state = pool.get_enum_by_name("shop.Order.State").unwrap();
    assert_eq!(state.go_name(), "shop.Order_State");
    assert_eq!(state.go_constant("PAID"), "shop.Order_PAID");

    let currency = pool.get_enum_by_name("shop.Currency").unwrap();
    assert_eq!(currency.go_constant("USD"), "shop.Currency_USD");
}

#[test]
fn test_decode_value() {
    let pool = pool();
    let order = pool
        .decode_message_json(
            "shop.Order",
            r#"{
                "Id": "18446744073709551615",
                "Lines": [{ "Sku": "a-1" }, {}],
                "Prices": { "7": 1.5, "2": "Infinity" },
                "Cash": "USD",
                "State": null
            }"#,
        )
        .unwrap();

    assert_eq!(
        order.get_field_by_name("Id"),
        Some(&Value::Scalar(Scalar::U64(u64::MAX)))
    );
    assert_eq!(order.get_field_by_name("Cash"), Some(&Value::Enum(1)));
    assert_eq!(order.get_field_by_name("State"), None);

    let Some(Value::List(lines)) = order.get_field_by_name("Lines") else {
        panic!("expected a list");
    };
    assert_eq!(lines.len(), 2);

    let Some(Value::Map(prices)) = order.get_field_by_name("Prices") else {
        panic!("expected a map");
    };
    assert_eq!(
        prices.get(&MapKey::U32(2)),
        Some(&Value::Scalar(Scalar::F64(f64::INFINITY)))
    );
}

#[test]
fn test_errors_carry_the_field_path() {
    let pool = pool();
    let err = pool
        .decode_message_json("shop.Order", r#"{ "Lines": [{}, { "Sku": 3 }] }"#)
        .unwrap_err();
    let LoadError::InvalidValue { path, .. } = err else {
        panic!("expected an invalid value error, got {err:?}");
    };
    assert_eq!(path, "$.Lines[1].Sku");
}

#[test]
fn test_second_union_member_is_rejected() {
    let pool = pool();
    let err = pool
        .decode_message_json("shop.Order", r#"{ "Card": "x", "Cash": "EUR" }"#)
        .unwrap_err();
    assert!(matches!(err, LoadError::InvalidValue { .. }), "{err:?}");
}

#[test]
fn test_unknown_message() {
    let err = pool().decode_message_json("shop.Missing", "{}").unwrap_err();
    assert!(matches!(err, LoadError::UnknownMessage { .. }));
}

#[test]
fn test_unresolved_type_in_set() {
    let err = DescriptorPool::from_json(
        r#"{ "package": "p", "messages": [{ "name": "M", "fields": [
            { "name": "x", "number": 1, "type": "message", "type_name": "Nope" }
        ] }] }"#,
    )
    .unwrap_err();
    assert!(
        matches!(
            err,
            LoadError::Descriptor(DescriptorError::UnresolvedType { .. })
        ),
        "{err:?}"
    );
}
