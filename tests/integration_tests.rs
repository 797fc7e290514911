// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for building configuration trees.
//!
//! These tests verify resolution, defaults, nullability, aliases, caching and
//! the eager and lazy validation modes end to end.

mod common;

use common::MockSource;
use layercfg::domain::kinds::{Bool, Choice, Int, ListField, PathField, Str};
use layercfg::prelude::*;

fn tree(pairs: &[(&str, RawValue)]) -> RawValue {
    let mut root = RawValue::Map(Default::default());
    for (key, value) in pairs {
        let path = KeyPath::parse(key).unwrap();
        root.insert_path(path.segments(), value.clone());
    }
    root
}

struct App {
    port: Field<Int<u16>>,
}

impl ConfigGroup for App {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            port: scope.field("port", Int::new())?,
        })
    }
}

struct Service {
    app: App,
}

impl ConfigGroup for Service {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            app: scope.group("app")?,
        })
    }
}

#[test]
fn test_end_to_end_nested_dict() {
    let config = ConfigBuilder::new()
        .with_dict(tree(&[("app.port", RawValue::from("9000"))]))
        .build::<Service>()
        .unwrap();

    let first = config.app.port.get().unwrap();
    assert_eq!(*first, 9000);

    let second = config.app.port.get().unwrap();
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_default_is_not_cast_or_validated() {
    struct Defaults {
        mode: Field<Choice<String>>,
        data: Field<PathField>,
    }

    impl ConfigGroup for Defaults {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                mode: scope.field(
                    "mode",
                    Choice::new(["fast".to_string()]).with_default("not-a-choice"),
                )?,
                data: scope.field(
                    "data",
                    PathField::folder().with_default("/definitely/not/here"),
                )?,
            })
        }
    }

    let config = ConfigBuilder::new().build::<Defaults>().unwrap();
    assert_eq!(config.mode.get().unwrap(), "not-a-choice");
    assert_eq!(
        config.data.get().unwrap(),
        &std::path::PathBuf::from("/definitely/not/here")
    );
}

#[test]
fn test_default_value_for_int() {
    struct Limits {
        retries: Field<Int>,
    }

    impl ConfigGroup for Limits {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                retries: scope.field("retries", Int::new().with_default(3))?,
            })
        }
    }

    let config = ConfigBuilder::new().build::<Limits>().unwrap();
    assert_eq!(*config.retries.get().unwrap(), 3);
}

struct Pair {
    present: Field<Str>,
    missing: Field<Str>,
}

impl ConfigGroup for Pair {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            present: scope.field("present", Str::new())?,
            missing: scope.field("missing", Str::new())?,
        })
    }
}

#[test]
fn test_required_missing_eager() {
    let err = ConfigBuilder::new()
        .with_defaults([("present", "here")])
        .unwrap()
        .build::<Pair>()
        .unwrap_err();

    assert!(matches!(err, ConfigError::ValueNotFound { .. }));
    assert_eq!(err.key(), Some("missing"));
}

#[test]
fn test_required_missing_lazy() {
    let config = ConfigBuilder::new()
        .with_defaults([("present", "here")])
        .unwrap()
        .fail_fast(false)
        .build::<Pair>()
        .unwrap();

    assert!(config.missing.get().unwrap_err().is_not_found());
    assert_eq!(config.present.get().unwrap(), "here");
    assert!(config.check().is_err());
}

#[test]
fn test_nullability() {
    struct Nulls {
        optional: Field<layercfg::domain::Nullable<Int>>,
    }

    impl ConfigGroup for Nulls {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                optional: scope.field("optional", Int::new().nullable())?,
            })
        }
    }

    struct Strict {
        required: Field<Int>,
    }

    impl ConfigGroup for Strict {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                required: scope.field("required", Int::new())?,
            })
        }
    }

    let config = ConfigBuilder::new()
        .with_dict(tree(&[("optional", RawValue::Null)]))
        .build::<Nulls>()
        .unwrap();
    assert_eq!(config.optional.get().unwrap(), &None);

    let err = ConfigBuilder::new()
        .with_dict(tree(&[("required", RawValue::Null)]))
        .build::<Strict>()
        .unwrap_err();
    assert!(matches!(err, ConfigError::NullValueError { .. }));
}

struct Database {
    host: Field<Str>,
}

impl ConfigGroup for Database {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            host: scope.field("host", Str::new())?,
        })
    }
}

struct Aliased {
    db: Database,
}

impl ConfigGroup for Aliased {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            db: scope.group_with_alias("db", "database")?,
        })
    }
}

#[test]
fn test_group_alias_replaces_attribute_name() {
    let config = ConfigBuilder::new()
        .with_defaults([("db.host", "wrong"), ("database.host", "right")])
        .unwrap()
        .build::<Aliased>()
        .unwrap();

    assert_eq!(config.db.host.get().unwrap(), "right");
    assert_eq!(config.db.host.key_path().to_string(), "database.host");
}

#[test]
#[cfg(feature = "env")]
fn test_group_alias_with_env_names() {
    use std::collections::HashMap;

    let mut vars = HashMap::new();
    vars.insert("MYAPP_DATABASE_HOST".to_string(), "db.internal".to_string());
    vars.insert("MYAPP_DB_HOST".to_string(), "wrong".to_string());

    let config = ConfigBuilder::new()
        .with_source(EnvVarAdapter::with_values(vars).prefix("myapp"))
        .build::<Aliased>()
        .unwrap();

    assert_eq!(config.db.host.get().unwrap(), "db.internal");
}

#[test]
fn test_cached_value_survives_source_mutation() {
    let source = MockSource::new("mock").with_value("app.port", "9000");

    let config = ConfigBuilder::new()
        .with_source(source.clone())
        .build::<Service>()
        .unwrap();
    assert_eq!(*config.app.port.get().unwrap(), 9000);

    source.set("app.port", "9999");
    assert_eq!(*config.app.port.get().unwrap(), 9000);

    let fresh = ConfigBuilder::new()
        .with_source(source)
        .build::<Service>()
        .unwrap();
    assert_eq!(*fresh.app.port.get().unwrap(), 9999);
}

#[test]
fn test_lazy_resolves_on_first_access() {
    let source = MockSource::new("mock").with_value("app.port", "9000");

    let config = ConfigBuilder::new()
        .with_source(source.clone())
        .fail_fast(false)
        .build::<Service>()
        .unwrap();
    assert!(!config.app.port.is_resolved());

    // Not read yet, so the change is still visible.
    source.set("app.port", "9001");
    assert_eq!(*config.app.port.get().unwrap(), 9001);
    assert!(config.app.port.is_resolved());
}

#[test]
fn test_lazy_failure_is_retried() {
    let source = MockSource::new("mock").with_value("app.port", "not a number");

    let config = ConfigBuilder::new()
        .with_source(source.clone())
        .fail_fast(false)
        .build::<Service>()
        .unwrap();

    assert!(matches!(
        config.app.port.get(),
        Err(ConfigError::TypeConversionError { .. })
    ));
    assert!(config.check().is_err());

    source.set("app.port", "8080");
    assert_eq!(*config.app.port.get().unwrap(), 8080);
    config.check().unwrap();
    assert!(config.is_checked());
}

#[test]
fn test_check_reports_first_failure_in_declaration_order() {
    struct Ordered {
        a: Field<Int>,
        nested: App,
        b: Field<Int>,
    }

    impl ConfigGroup for Ordered {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                a: scope.field("a", Int::new())?,
                nested: scope.group("nested")?,
                b: scope.field("b", Int::new())?,
            })
        }
    }

    let config = ConfigBuilder::new()
        .with_defaults([("a", "1"), ("nested.port", "x"), ("b", "y")])
        .unwrap()
        .fail_fast(false)
        .build::<Ordered>()
        .unwrap();

    let err = config.check().unwrap_err();
    assert_eq!(err.key(), Some("nested.port"));
    assert_eq!(*config.a.get().unwrap(), 1);
    assert!(config.b.get().is_err());
}

#[test]
fn test_sibling_groups_have_independent_caches() {
    struct Inner {
        value: Field<Int>,
    }

    impl ConfigGroup for Inner {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                value: scope.field("value", Int::new())?,
            })
        }
    }

    struct Outer {
        inner_1: Inner,
        inner_2: Inner,
    }

    impl ConfigGroup for Outer {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                inner_1: scope.group("inner_1")?,
                inner_2: scope.group("inner_2")?,
            })
        }
    }

    let config = ConfigBuilder::new()
        .with_defaults([("inner_1.value", "1"), ("inner_2.value", "2")])
        .unwrap()
        .build::<Outer>()
        .unwrap();

    assert_eq!(*config.inner_1.value.get().unwrap(), 1);
    assert_eq!(*config.inner_2.value.get().unwrap(), 2);
}

#[test]
fn test_inherited_fields() {
    struct Base {
        name: Field<Str>,
        debug: Field<Bool>,
    }

    impl ConfigGroup for Base {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                name: scope.field("name", Str::new())?,
                debug: scope.field("debug", Bool::new().with_default(false))?,
            })
        }
    }

    struct Derived {
        base: Base,
        workers: Field<Int<u8>>,
    }

    impl ConfigGroup for Derived {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                base: scope.inherit()?,
                workers: scope.field("workers", Int::new())?,
            })
        }
    }

    struct Root {
        svc: Derived,
    }

    impl ConfigGroup for Root {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                svc: scope.group("svc")?,
            })
        }
    }

    let config = ConfigBuilder::new()
        .with_defaults([("svc.name", "worker"), ("svc.workers", "4"), ("svc.debug", "t")])
        .unwrap()
        .build::<Root>()
        .unwrap();

    assert_eq!(config.svc.base.name.get().unwrap(), "worker");
    assert!(*config.svc.base.debug.get().unwrap());
    assert_eq!(*config.svc.workers.get().unwrap(), 4);

    let keys: Vec<String> = config.key_paths().iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["svc.name", "svc.debug", "svc.workers"]);
}

#[test]
fn test_field_alias() {
    struct Renamed {
        port: Field<Int<u16>>,
    }

    impl ConfigGroup for Renamed {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                port: scope.field("port", Int::new().alias("listen_port"))?,
            })
        }
    }

    let config = ConfigBuilder::new()
        .with_defaults([("port", "1"), ("listen_port", "2")])
        .unwrap()
        .build::<Renamed>()
        .unwrap();
    assert_eq!(*config.port.get().unwrap(), 2);
    assert_eq!(config.port.name(), "port");
}

#[test]
fn test_builtin_kinds_through_a_group() {
    struct Kinds {
        flag: Field<Bool>,
        sizes: Field<ListField<Int>>,
        names: Field<ListField>,
        level: Field<Choice<i64>>,
    }

    impl ConfigGroup for Kinds {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                flag: scope.field("flag", Bool::new())?,
                sizes: scope.field("sizes", ListField::of(Int::new()))?,
                names: scope.field("names", ListField::new())?,
                level: scope.field("level", Choice::new([10_i64, 100]).cast_as(Int::new()))?,
            })
        }
    }

    let config = ConfigBuilder::new()
        .with_defaults([
            ("flag", "random"),
            ("sizes", "1,2,3"),
            ("names", " a , b "),
            ("level", "10"),
        ])
        .unwrap()
        .build::<Kinds>()
        .unwrap();

    assert!(!*config.flag.get().unwrap());
    assert_eq!(config.sizes.get().unwrap(), &vec![1, 2, 3]);
    assert_eq!(config.names.get().unwrap(), &vec!["a".to_string(), "b".to_string()]);
    assert_eq!(*config.level.get().unwrap(), 10);

    let err = ConfigBuilder::new()
        .with_defaults([("flag", "1"), ("sizes", ""), ("names", ""), ("level", "2")])
        .unwrap()
        .build::<Kinds>()
        .unwrap_err();
    assert!(err.is_field_error());
}

#[test]
fn test_value_declared_by_type() {
    struct ByType {
        timeout: Field<layercfg::domain::DynKind<u64>>,
        label: Field<layercfg::domain::DynKind<Option<String>>>,
    }

    impl ConfigGroup for ByType {
        fn build(scope: &mut Scope<'_>) -> Result<Self> {
            Ok(Self {
                timeout: scope.value("timeout")?,
                label: scope.value("label")?,
            })
        }
    }

    let config = ConfigBuilder::new()
        .with_dict(tree(&[
            ("timeout", RawValue::Int(30)),
            ("label", RawValue::Null),
        ]))
        .build::<ByType>()
        .unwrap();

    assert_eq!(*config.timeout.get().unwrap(), 30);
    assert_eq!(config.label.get().unwrap(), &None);
}
