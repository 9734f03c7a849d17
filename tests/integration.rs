//! Integration tests using export files from `test_data/`.

use reg_export::{ErrorKind, Hive, RegFile, RegistryError, ValueData, ValueType};
use std::path::PathBuf;

fn test_data_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join(filename)
}

fn open_err(filename: &str) -> RegistryError {
    match RegFile::open(test_data_path(filename)) {
        Ok(file) => panic!("{} parsed with {} values", filename, file.len()),
        Err(err) => err,
    }
}

#[test]
fn test_basic_export() {
    let path = test_data_path("basic.reg");
    let result = RegFile::open(&path);

    assert!(result.is_ok(), "Failed to open basic.reg: {:?}", result.err());

    let file = result.unwrap();
    let values = file.values();
    assert_eq!(values.len(), 2);

    assert_eq!(values[0].hive(), Hive::CurrentUser);
    assert_eq!(values[0].key_path(), r"Software\Test");
    assert_eq!(values[0].name(), "Name");
    assert_eq!(values[0].value_type(), ValueType::String);
    assert_eq!(values[0].data(), &ValueData::String("Value".to_string()));

    assert_eq!(values[1].hive(), Hive::CurrentUser);
    assert_eq!(values[1].key_path(), r"Software\Test");
    assert_eq!(values[1].name(), "Num");
    assert_eq!(values[1].value_type(), ValueType::Dword);
    assert_eq!(values[1].data(), &ValueData::Dword(42));
}

#[test]
fn test_all_value_types() {
    let file = RegFile::open(test_data_path("all_types.reg")).expect("Failed to open all_types.reg");
    let key = r"SOFTWARE\Example";
    let get = |name: &str| {
        file.value(Hive::LocalMachine, key, name)
            .unwrap_or_else(|| panic!("value {:?} missing", name))
            .data()
            .clone()
    };

    assert_eq!(get(""), ValueData::String("Default".to_string()));
    assert_eq!(get("String"), ValueData::String("Hello, World".to_string()));
    assert_eq!(
        get("Escaped"),
        ValueData::String(r#"C:\Program Files\Example "Quoted""#.to_string())
    );
    assert_eq!(get("Dword"), ValueData::Dword(0xdeadbeef));
    assert_eq!(get("Qword"), ValueData::Qword(1));
    assert_eq!(get("Binary"), ValueData::Binary((0u8..=0x19).collect()));
    assert_eq!(get("None"), ValueData::None(Vec::new()));
    assert_eq!(get("Expand"), ValueData::ExpandString("%SystemRoot%".to_string()));
    assert_eq!(
        get("Multi"),
        ValueData::MultiString(vec!["one".to_string(), "two".to_string()])
    );

    let other = file
        .value(Hive::CurrentUser, r"Software\Example", "Equals=In=Name")
        .expect("value with '=' in its name");
    assert_eq!(other.data().as_str(), Some("a=b"));
}

#[test]
fn test_value_order_and_keys() {
    let file = RegFile::open(test_data_path("all_types.reg")).unwrap();

    let names: Vec<&str> = file.values().iter().map(|v| v.name()).collect();
    assert_eq!(
        names,
        vec![
            "", "String", "Escaped", "Dword", "Qword", "Binary", "None", "Expand", "Multi",
            "Equals=In=Name",
        ]
    );

    let keys: Vec<(Hive, &str)> = file.keys().collect();
    assert_eq!(
        keys,
        vec![
            (Hive::LocalMachine, r"SOFTWARE\Example"),
            (Hive::LocalMachine, r"SOFTWARE\Example\Empty"),
            (Hive::CurrentUser, r"Software\Example"),
        ]
    );
    assert_eq!(
        file.values_in(Hive::LocalMachine, r"SOFTWARE\Example\Empty").count(),
        0
    );
}

#[test]
fn test_utf16_export_matches_utf8() {
    let utf8 = RegFile::open(test_data_path("all_types.reg")).unwrap();
    let utf16 = RegFile::open(test_data_path("all_types_utf16.reg")).unwrap();

    assert_eq!(utf8.values(), utf16.values());
}

#[test]
fn test_multiline_string() {
    let file = RegFile::open(test_data_path("multiline_string.reg")).unwrap();

    assert_eq!(file.len(), 2);
    assert_eq!(file.values()[0].name(), "Long");
    assert_eq!(file.values()[0].data().as_str(), Some("abc\r\ndef"));
    assert_eq!(file.values()[1].data().as_u32(), Some(1));
}

#[test]
fn test_bad_header() {
    let err = open_err("bad_header.reg");

    assert_eq!(err.line(), Some(1));
    assert!(matches!(err.kind(), Some(ErrorKind::Header { .. })));
    match err {
        RegistryError::Parse { file, text, .. } => {
            assert!(file.ends_with("bad_header.reg"));
            assert_eq!(text, "garbage");
        }
        RegistryError::Io(e) => panic!("unexpected I/O error: {}", e),
    }
}

#[test]
fn test_expand_string_without_terminator() {
    let err = open_err("bad_expand.reg");

    assert_eq!(err.line(), Some(4));
    assert!(matches!(err.kind(), Some(ErrorKind::BinaryParse(_))));
}

#[test]
fn test_truncated_hex_continuation() {
    let err = open_err("truncated.reg");

    assert!(matches!(err.kind(), Some(ErrorKind::UnexpectedEndOfFile)));
}

#[test]
fn test_missing_file() {
    let err = open_err("does_not_exist.reg");

    assert!(matches!(err, RegistryError::Io(_)));
}

#[test]
fn test_parse_is_deterministic() {
    let path = test_data_path("all_types.reg");
    let first = RegFile::open(&path).unwrap().into_values();
    let second = RegFile::open(&path).unwrap().into_values();

    assert_eq!(first, second);
}

#[test]
fn test_parallel_parses_are_independent() {
    let handles: Vec<_> = ["basic.reg", "all_types.reg", "multiline_string.reg"]
        .into_iter()
        .map(|name| {
            let path = test_data_path(name);
            std::thread::spawn(move || RegFile::open(path).map(|f| f.len()))
        })
        .collect();

    let counts: Vec<usize> = handles
        .into_iter()
        .map(|h| h.join().expect("parser thread panicked").unwrap())
        .collect();
    assert_eq!(counts, vec![2, 10, 2]);
}
