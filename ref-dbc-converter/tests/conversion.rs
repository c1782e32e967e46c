// End-to-end conversion tests: container bytes in, DBC text out
use flate2::write::ZlibEncoder;
use flate2::Compression;
use ref_dbc_converter::{Converter, ConverterError, WarningKind};
use std::io::Write;

fn zlib(text: &str) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(text.as_bytes()).unwrap();
    enc.finish().unwrap()
}

fn push_block(data: &mut Vec<u8>, payload: &[u8]) {
    data.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    data.extend_from_slice(payload);
}

/// Build a reference container holding the given (already compressed) entries
fn container(entries: &[Vec<u8>]) -> Vec<u8> {
    let mut data = b"Racelogic Reference File\r\n012345\r\n".to_vec();
    push_block(&mut data, &zlib("0123456789"));
    data.extend_from_slice(&(entries.len() as u16).to_be_bytes());
    for entry in entries {
        push_block(&mut data, entry);
    }
    data
}

fn convert(data: &[u8]) -> (String, ref_dbc_converter::ConversionReport) {
    let mut out = Vec::new();
    let report = Converter::new().convert(data, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), report)
}

#[test]
fn empty_container_produces_preamble_only() {
    let (text, report) = convert(&container(&[]));

    assert!(text.starts_with("VERSION \"\"\n\nNS_ :\n"));
    assert!(text.contains("BS_:\n\nBU_: VECTOR__XXX\n"));
    assert!(!text.contains("BO_ "));
    assert_eq!(report.entry_count, 0);
    assert_eq!(report.stats.num_messages, 0);
    assert!(!report.has_warnings());
}

#[test]
fn full_conversion_output() {
    let data = container(&[zlib(
        "EngineSpeed,256,rpm,0,16,0,0.25,16383.75,0,unsigned,Intel,8\n\
         CoolantTemp,256,degC,16,8,-40,1,215,-40,signed,Motorola,8\n",
    )]);
    let (text, report) = convert(&data);

    let expected = "BO_ 256 CAN_MSG_256: 8 VECTOR__XXX\n \
        SG_ EngineSpeed : 0|16@1+ (0.25,0) [0|16383.75] \"rpm\" VECTOR__XXX\n \
        SG_ CoolantTemp : 16|8@0- (1,-40) [-40|215] \"degC\" VECTOR__XXX\n\n";
    assert!(text.ends_with(expected), "unexpected output:\n{}", text);
    assert!(!report.has_warnings());
    assert_eq!(report.line_count, 2);
    assert_eq!(report.stats.num_signals, 2);
}

#[test]
fn missing_dlc_defaults_and_warns() {
    let data = container(&[zlib("Speed,100,km/h,0,16,0,0.01,655.35,0,unsigned,Intel")]);
    let (text, report) = convert(&data);

    assert!(text.contains("BO_ 100 CAN_MSG_100: 8 VECTOR__XXX\n"));
    assert!(report.has_warnings());
    assert_eq!(report.warnings[0].kind, WarningKind::MissingDlc);
}

#[test]
fn non_numeric_dlc_defaults_and_keeps_signal() {
    let data = container(&[zlib("Speed,100,km/h,0,16,0,0.01,655.35,0,unsigned,Intel,eight")]);
    let (text, report) = convert(&data);

    assert!(text.contains("BO_ 100 CAN_MSG_100: 8 VECTOR__XXX\n"));
    assert!(text.contains(" SG_ Speed : 0|16@1+ (0.01,0) [0|655.35] \"km/h\" VECTOR__XXX\n"));
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::InvalidDlc);
}

#[test]
fn largest_dlc_wins_across_entries() {
    let data = container(&[
        zlib("A,300,,0,8,0,1,255,0,unsigned,Intel,8"),
        zlib("B,300,,8,8,0,1,255,0,unsigned,Intel,3"),
    ]);
    let (text, _) = convert(&data);

    assert!(text.contains("BO_ 300 CAN_MSG_300: 8 VECTOR__XXX\n"));
    assert_eq!(text.matches("BO_ 300 ").count(), 1);
}

#[test]
fn signal_and_message_ordering() {
    let data = container(&[zlib(
        "A,1000,,0,8,0,1,255,0,unsigned,Intel,8\n\
         X,20,,0,8,0,1,255,0,unsigned,Intel,8\n\
         B,1000,,8,8,0,1,255,0,unsigned,Intel,8\n\
         Y,3,,0,8,0,1,255,0,unsigned,Intel,8\n\
         C,1000,,16,8,0,1,255,0,unsigned,Intel,8\n",
    )]);
    let (text, _) = convert(&data);

    let pos = |needle: &str| text.find(needle).unwrap();
    assert!(pos("BO_ 3 ") < pos("BO_ 20 "));
    assert!(pos("BO_ 20 ") < pos("BO_ 1000 "));
    assert!(pos(" SG_ A ") < pos(" SG_ B "));
    assert!(pos(" SG_ B ") < pos(" SG_ C "));
}

#[test]
fn byte_order_and_sign_codes() {
    let data = container(&[zlib(
        "U,1,,0,8,0,1,255,0,unsigned,Motorola,8\n\
         S,1,,8,8,0,1,127,-128,signed,Intel,8\n",
    )]);
    let (text, _) = convert(&data);

    assert!(text.contains(" SG_ U : 0|8@0+ "));
    assert!(text.contains(" SG_ S : 8|8@1- "));
}

#[test]
fn unsigned_decimal_message_ids_only() {
    let data = container(&[zlib(
        "S, 7,km/h,0,8,0,1,255,0,unsigned,Intel,8\n\
         P,+9,,0,8,0,1,255,0,unsigned,Intel,8\n\
         N,11,,-3,8,0,1,255,0,unsigned,Intel,8\n",
    )]);
    let (text, report) = convert(&data);

    assert!(!text.contains("BO_ 7 "));
    assert!(!text.contains("BO_ 9 "));
    assert!(text.contains(" SG_ N : -3|8@1+ (1,0) [0|255] \"\" VECTOR__XXX\n"));

    let kinds: Vec<WarningKind> = report.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![WarningKind::InvalidMessageId, WarningKind::InvalidMessageId]
    );
}

#[test]
fn corrupt_entry_is_skipped() {
    let data = container(&[
        zlib("A,1,,0,8,0,1,255,0,unsigned,Intel,8"),
        vec![0x78, 0x9C, 0xDE, 0xAD, 0xBE, 0xEF],
        zlib("C,3,,0,8,0,1,255,0,unsigned,Intel,8"),
    ]);
    let (text, report) = convert(&data);

    assert!(text.contains("BO_ 1 CAN_MSG_1"));
    assert!(text.contains("BO_ 3 CAN_MSG_3"));
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::EntryDecompression);
    assert_eq!(report.warnings[0].entry, Some(2));
}

#[test]
fn trailing_byte_warns_without_changing_output() {
    let clean = container(&[zlib("A,1,,0,8,0,1,255,0,unsigned,Intel,8")]);
    let mut dirty = clean.clone();
    dirty.push(0x00);

    let (clean_text, clean_report) = convert(&clean);
    let (dirty_text, dirty_report) = convert(&dirty);

    assert_eq!(clean_text, dirty_text);
    assert!(!clean_report.has_warnings());
    assert_eq!(dirty_report.warnings.len(), 1);
    assert_eq!(dirty_report.warnings[0].kind, WarningKind::TrailingData);
}

#[test]
fn truncated_block_is_fatal() {
    let mut data = container(&[zlib("A,1,,0,8,0,1,255,0,unsigned,Intel,8")]);
    data.truncate(data.len() - 4);

    let mut out = Vec::new();
    let err = Converter::new().convert(data.as_slice(), &mut out).unwrap_err();
    assert!(matches!(err, ConverterError::Truncated { .. }));
    assert!(out.is_empty());
}

#[test]
fn output_is_accepted_by_dbc_parser() {
    let data = container(&[zlib(
        "EngineSpeed,256,rpm,0,16,0,0.25,16383.75,0,unsigned,Intel,8\n\
         CoolantTemp,256,degC,16,8,-40,1,215,-40,signed,Motorola,8\n\
         WheelSpeed,1280,km/h,0,16,0,0.01,655.35,0,unsigned,Intel,4\n",
    )]);
    let (text, _) = convert(&data);

    let dbc = can_dbc::DBC::from_slice(text.as_bytes()).expect("generated DBC should parse");
    let messages = dbc.messages();
    assert_eq!(messages.len(), 2);

    let engine = messages.iter().find(|m| m.message_id().0 == 256).unwrap();
    assert_eq!(engine.message_name(), "CAN_MSG_256");
    assert_eq!(*engine.message_size(), 8);
    assert_eq!(engine.signals().len(), 2);

    let speed = &engine.signals()[0];
    assert_eq!(speed.name(), "EngineSpeed");
    assert_eq!(*speed.start_bit(), 0);
    assert_eq!(*speed.signal_size(), 16);
    assert_eq!(*speed.factor(), 0.25);
    assert!(matches!(speed.byte_order(), can_dbc::ByteOrder::LittleEndian));
    assert!(matches!(speed.value_type(), can_dbc::ValueType::Unsigned));

    let temp = &engine.signals()[1];
    assert_eq!(*temp.offset(), -40.0);
    assert!(matches!(temp.byte_order(), can_dbc::ByteOrder::BigEndian));
    assert!(matches!(temp.value_type(), can_dbc::ValueType::Signed));

    let wheel = messages.iter().find(|m| m.message_id().0 == 1280).unwrap();
    assert_eq!(*wheel.message_size(), 4);
}

#[test]
fn convert_file_writes_dbc() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("session.ref");
    let output = dir.path().join("session.dbc");
    std::fs::write(
        &input,
        container(&[zlib("A,42,,0,8,0,1,255,0,unsigned,Intel,8")]),
    )
    .unwrap();

    let report = Converter::new().convert_file(&input, &output).unwrap();
    assert_eq!(report.stats.num_messages, 1);

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("BO_ 42 CAN_MSG_42: 8 VECTOR__XXX\n"));
}

#[test]
fn convert_file_fatal_error_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.ref");
    let output = dir.path().join("broken.dbc");
    std::fs::write(&input, b"header only\r\n").unwrap();

    assert!(Converter::new().convert_file(&input, &output).is_err());
    assert!(!output.exists());
}
