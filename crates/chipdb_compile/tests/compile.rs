//! End-to-end compile runs over a small synthetic device.
//!
//! Grid (x across, y down):
//!
//! ```text
//!   io  plc plc
//!   io  plc plc
//!   io  bot bot
//! ```

use chipdb_bba::{BlobReader, Endianness};
use chipdb_common::Location;
use chipdb_compile::{compile, ChipInfo, CompileError, CompileOptions};
use chipdb_config::IdentifierTable;
use chipdb_trellis::{DedupChipDb, Device, DeviceProvider, IoDb};

const CHIPDB: &str = r#"{
    "max_row": 2,
    "max_col": 2,
    "location_types": {
        "io": {
            "wires": [
                {"name": "JPADDIA_PIO", "bel_pins": [{"bel": {"rel": {"x": 0, "y": 0}, "id": 0}, "pin": "PAD"}]}
            ],
            "bels": [
                {"name": "PIOA", "type": "TRELLIS_IO", "z": 0,
                 "wires": [{"wire": {"rel": {"x": 0, "y": 0}, "id": 0}, "pin": "PAD", "dir": "INOUT"}]},
                {"name": "PIOB", "type": "TRELLIS_IO", "z": 1}
            ]
        },
        "plc": {
            "wires": [
                {"name": "H02E0001",
                 "arcs_downhill": [{"rel": {"x": 0, "y": 0}, "id": 0}],
                 "arcs_uphill": [{"rel": {"x": 0, "y": 0}, "id": 2}]},
                {"name": "H02W0001",
                 "arcs_uphill": [{"rel": {"x": 0, "y": 0}, "id": 0}],
                 "arcs_downhill": [{"rel": {"x": 0, "y": 0}, "id": 1}]},
                {"name": "JA0_SLICE",
                 "arcs_uphill": [{"rel": {"x": 0, "y": 0}, "id": 1}]}
            ],
            "arcs": [
                {"src_wire": {"rel": {"x": 0, "y": 0}, "id": 0},
                 "sink_wire": {"rel": {"x": 0, "y": 0}, "id": 1}, "tiletype": "PLC2", "cls": 0},
                {"src_wire": {"rel": {"x": 0, "y": 0}, "id": 1},
                 "sink_wire": {"rel": {"x": 0, "y": 0}, "id": 2}, "tiletype": "PLC2", "cls": 0},
                {"src_wire": {"rel": {"x": -1, "y": 0}, "id": 0},
                 "sink_wire": {"rel": {"x": 0, "y": 0}, "id": 0}, "tiletype": "CIB", "cls": 1}
            ],
            "bels": [
                {"name": "SLICEA", "type": "SLICE", "z": 0,
                 "wires": [{"wire": {"rel": {"x": 0, "y": 0}, "id": 2}, "pin": "A0", "dir": "INPUT"}]}
            ]
        },
        "bot": {}
    },
    "type_at_location": [
        {"x": 0, "y": 0, "type": "io"}, {"x": 1, "y": 0, "type": "plc"}, {"x": 2, "y": 0, "type": "plc"},
        {"x": 0, "y": 1, "type": "io"}, {"x": 1, "y": 1, "type": "plc"}, {"x": 2, "y": 1, "type": "plc"},
        {"x": 0, "y": 2, "type": "io"}, {"x": 1, "y": 2, "type": "bot"}, {"x": 2, "y": 2, "type": "bot"},
        {"x": -2, "y": -2, "type": "bot"}
    ],
    "tiles": [
        {"x": 0, "y": 0, "name": "R1C1:PICL0", "type": "PICL0"},
        {"x": 1, "y": 0, "name": "R1C2:PLC2", "type": "PLC2"},
        {"x": 1, "y": 0, "name": "R1C2:CIB", "type": "CIB"},
        {"x": 2, "y": 1, "name": "R2C3:PLC2", "type": "PLC2"}
    ],
    "global_data": [
        {"x": 0, "y": 0, "quadrant": "UL", "tap_dir": "LEFT", "tap_col": 1},
        {"x": 1, "y": 0, "quadrant": "UL", "tap_dir": "LEFT", "tap_col": 1},
        {"x": 2, "y": 0, "quadrant": "UR", "tap_dir": "RIGHT", "tap_col": 1},
        {"x": 0, "y": 1, "quadrant": "LL", "tap_dir": "LEFT", "tap_col": 1},
        {"x": 1, "y": 1, "quadrant": "LL", "tap_dir": "LEFT", "tap_col": 1},
        {"x": 2, "y": 1, "quadrant": "LR", "tap_dir": "RIGHT", "tap_col": 1},
        {"x": 0, "y": 2, "quadrant": "LL", "tap_dir": "LEFT", "tap_col": 1},
        {"x": 1, "y": 2, "quadrant": "LL", "tap_dir": "LEFT", "tap_col": 1},
        {"x": 2, "y": 2, "quadrant": "LR", "tap_dir": "RIGHT", "tap_col": 258}
    ]
}"#;

const IODB: &str = r#"{
    "packages": {
        "CSFBGA285": {
            "C1": {"col": 0, "row": 1, "pio": "A"}
        },
        "CABGA256": {
            "B2": {"col": 0, "row": 1, "pio": "B"},
            "A2": {"col": 0, "row": 0, "pio": "A"},
            "T1": {"col": 1, "row": 2, "pio": "A"}
        }
    },
    "pio_metadata": [
        {"col": 0, "row": 0, "pio": "A", "bank": 7, "function": "PCLKT7_0"},
        {"col": 0, "row": 1, "pio": "B", "bank": 6},
        {"col": 2, "row": 2, "pio": "A", "bank": 3}
    ]
}"#;

const CONSTIDS: &str = "X(TRELLIS_SLICE)\nX(TRELLIS_IO)\nX(PAD)\nX(A0)\n";

fn inputs() -> (DedupChipDb, IoDb, IdentifierTable) {
    (
        DedupChipDb::from_json(CHIPDB).unwrap(),
        IoDb::from_json(IODB).unwrap(),
        IdentifierTable::parse(CONSTIDS)
            .unwrap()
            .with_aliases()
            .unwrap(),
    )
}

fn build(options: CompileOptions) -> Result<chipdb_compile::ChipDb, CompileError> {
    let (chipdb, iodb, ids) = inputs();
    compile(Device::Lfe5u25f, &chipdb, &iodb, &ids, options)
}

#[test]
fn identical_inputs_give_identical_images() {
    let a = build(CompileOptions::default()).unwrap();
    let b = build(CompileOptions::default()).unwrap();
    assert_eq!(a.blob.bytes(), b.blob.bytes());
    assert_eq!(a.summary.hash, b.summary.hash);
    assert_eq!(a.blob.container(), "chipdb_blob_25k");
}

#[test]
fn summary_counts() {
    let db = build(CompileOptions {
        verify: true,
        ..CompileOptions::default()
    })
    .unwrap();
    let s = &db.summary;
    assert_eq!((s.width, s.height), (3, 3));
    assert_eq!(s.location_types, 3);
    // PLC2 and CIB from pips, PICL0 from tiles
    assert_eq!(s.tile_types, 3);
    assert_eq!(s.packages, 2);
    assert_eq!(s.package_pins, 3);
    assert_eq!(s.pios, 2);
    assert_eq!(s.dropped_pins, 2);
    assert!(s.verified_refs.unwrap() > 0);
    assert_eq!(s.image_size, db.blob.len());
}

#[test]
fn root_record_decodes() {
    let db = build(CompileOptions::default()).unwrap();
    let reader = db.blob.reader();

    // the root reference is the first field and points forward
    let root = reader.required_reference(0).unwrap();
    assert_eq!(Some(root), db.blob.label_offset("chip_info"));

    let info = ChipInfo::read(&reader).unwrap();
    assert_eq!(info.width, 3);
    assert_eq!(info.height, 3);
    assert_eq!(info.num_tiles, 9);
    assert_eq!(info.num_location_types, 3);
    assert_eq!(info.num_packages, 2);
    assert_eq!(info.num_pios, 2);
    assert_eq!(Some(info.locations), db.blob.label_offset("locations"));
    assert_eq!(Some(info.tile_info), db.blob.label_offset("tiles_info"));
    assert_eq!(Some(info.pio_info), db.blob.label_offset("pio_info"));
}

#[test]
fn location_types_numbered_by_first_discovery() {
    let db = build(CompileOptions::default()).unwrap();
    let reader = db.blob.reader();
    let info = ChipInfo::read(&reader).unwrap();

    let at = |x, y| {
        info.location_type_at(&reader, Location::new(x, y))
            .unwrap()
            .unwrap()
    };
    assert_eq!(at(0, 0), 0);
    assert_eq!(at(1, 0), 1);
    assert_eq!(at(2, 1), 1);
    assert_eq!(at(0, 2), 0);
    assert_eq!(at(2, 2), 2);
    assert_eq!(
        info.location_type_at(&reader, Location::new(3, 0)).unwrap(),
        None
    );
}

#[test]
fn global_info_table() {
    let db = build(CompileOptions::default()).unwrap();
    let reader = db.blob.reader();
    let info = ChipInfo::read(&reader).unwrap();

    assert_eq!(
        info.global_info_at(&reader, Location::new(2, 0)).unwrap(),
        Some((1, 1, 1))
    );
    assert_eq!(
        info.global_info_at(&reader, Location::new(1, 1)).unwrap(),
        Some((1, 0, 2))
    );
    assert_eq!(
        info.global_info_at(&reader, Location::new(2, 2)).unwrap(),
        Some((258, 1, 3))
    );
}

/// Pips of the `plc` location type (index 1).
fn plc_pips(reader: &BlobReader<'_>, info: &ChipInfo) -> Vec<(u16, u16, u32, u32, u32, u16, u8)> {
    let mut loc = reader.cursor(info.locations + 24);
    assert_eq!(loc.next_u32().unwrap(), 1, "num_bels");
    assert_eq!(loc.next_u32().unwrap(), 3, "num_wires");
    let num_pips = loc.next_u32().unwrap();
    assert!(loc.next_ref().unwrap().is_some());
    assert!(loc.next_ref().unwrap().is_some());
    let pips = loc.next_ref().unwrap().unwrap();

    let mut cur = reader.cursor(pips);
    (0..num_pips)
        .map(|_| {
            let src_x = cur.next_u16().unwrap();
            let _src_y = cur.next_u16().unwrap();
            let _dst_x = cur.next_u16().unwrap();
            let _dst_y = cur.next_u16().unwrap();
            let src_idx = cur.next_u32().unwrap();
            let dst_idx = cur.next_u32().unwrap();
            let delay = cur.next_u32().unwrap();
            let tile_type = cur.next_u16().unwrap();
            let pip_type = cur.next_u8().unwrap();
            assert_eq!(cur.next_u8().unwrap(), 0, "padding");
            (src_x, 0, src_idx, dst_idx, delay, tile_type, pip_type)
        })
        .collect()
}

#[test]
fn pip_records() {
    let db = build(CompileOptions::default()).unwrap();
    let reader = db.blob.reader();
    let info = ChipInfo::read(&reader).unwrap();

    let pips = plc_pips(&reader, &info);
    assert_eq!(
        pips,
        [
            (0, 0, 0, 1, 170, 0, 0),
            (0, 0, 1, 2, 205, 0, 0),
            // west neighbour wire, offset -1 wrapped into 16 bits
            (0xFFFF, 0, 0, 0, 90, 1, 1),
        ]
    );
}

#[test]
fn big_endian_image_has_same_layout() {
    let le = build(CompileOptions::default()).unwrap();
    let be = build(CompileOptions {
        endianness: Endianness::Big,
        ..CompileOptions::default()
    })
    .unwrap();
    assert_eq!(le.blob.len(), be.blob.len());
    assert_ne!(le.blob.bytes(), be.blob.bytes());
    assert_eq!(le.blob.records(), be.blob.records());

    let reader = be.blob.reader();
    let info = ChipInfo::read(&reader).unwrap();
    assert_eq!(info.num_tiles, 9);
    assert_eq!(plc_pips(&reader, &info)[1].4, 205);
}

#[test]
fn wire_names_are_pooled_strings() {
    let db = build(CompileOptions::default()).unwrap();
    let reader = db.blob.reader();
    let wires = db.blob.label_offset("loc1_wires").unwrap();

    let mut cur = reader.cursor(wires);
    assert_eq!(cur.next_string().unwrap(), Some("H02E0001"));
    assert_eq!(cur.next_u32().unwrap(), 1, "num_uphill");
    assert_eq!(cur.next_u32().unwrap(), 1, "num_downhill");
    assert!(cur.next_ref().unwrap().is_some());
    assert!(cur.next_ref().unwrap().is_some());
    assert_eq!(cur.next_u32().unwrap(), 0, "num_bel_pins");
    assert_eq!(cur.next_ref().unwrap(), None);

    let name_ref = reader.reference(wires).unwrap().unwrap();
    assert!(name_ref >= db.blob.string_pool_offset());
}

#[test]
fn package_tables() {
    let db = build(CompileOptions::default()).unwrap();
    let reader = db.blob.reader();
    let info = ChipInfo::read(&reader).unwrap();

    let mut cur = reader.cursor(info.package_info);
    assert_eq!(cur.next_string().unwrap(), Some("CABGA256"));
    assert_eq!(cur.next_u32().unwrap(), 2);
    let pins = cur.next_ref().unwrap().unwrap();
    assert_eq!(cur.next_string().unwrap(), Some("CSFBGA285"));

    let mut pin = reader.cursor(pins);
    assert_eq!(pin.next_string().unwrap(), Some("A2"));
    assert_eq!(pin.next_u16().unwrap(), 0);
    assert_eq!(pin.next_u16().unwrap(), 0);
    assert_eq!(pin.next_u32().unwrap(), 0);
    assert_eq!(pin.next_string().unwrap(), Some("B2"));
    pin.skip(4);
    assert_eq!(pin.next_u32().unwrap(), 1);

    let mut pio = reader.cursor(info.pio_info);
    pio.skip(8);
    assert_eq!(pio.next_string().unwrap(), Some("PCLKT7_0"));
    assert_eq!(pio.next_u16().unwrap(), 7);
    pio.skip(2 + 8);
    assert_eq!(pio.next_string().unwrap(), None);
    assert_eq!(pio.next_u16().unwrap(), 6);
}

#[test]
fn pin_miss_above_bottom_row_aborts() {
    let (chipdb, _, ids) = inputs();
    let iodb = IoDb::from_json(&IODB.replace(
        r#""T1": {"col": 1, "row": 2, "pio": "A"}"#,
        r#""T1": {"col": 1, "row": 1, "pio": "A"}"#,
    ))
    .unwrap();
    let err = compile(
        Device::Lfe5u25f,
        &chipdb,
        &iodb,
        &ids,
        CompileOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CompileError::UnresolvedPin { loc, .. } if loc == Location::new(1, 1)
    ));
}

#[test]
fn identifier_table_without_aliases_aborts() {
    let (chipdb, iodb, _) = inputs();
    let ids = IdentifierTable::parse(CONSTIDS).unwrap();
    let err = compile(Device::Lfe5u25f, &chipdb, &iodb, &ids, CompileOptions::default())
        .unwrap_err();
    assert!(matches!(err, CompileError::Config(_)));
}

#[test]
fn verifier_rejects_reference_off_the_grid() {
    // a plc column on the west edge makes the west-neighbour arc leave the grid
    let json = CHIPDB.replace(
        r#"{"x": 0, "y": 1, "type": "io"}"#,
        r#"{"x": 0, "y": 1, "type": "plc"}"#,
    );
    let chipdb = DedupChipDb::from_json(&json).unwrap();
    let (_, _, ids) = inputs();
    let iodb = IoDb::default();

    // without the verifier the representative coordinate is still fine
    assert!(compile(Device::Lfe5u25f, &chipdb, &iodb, &ids, CompileOptions::default()).is_ok());

    let err = compile(
        Device::Lfe5u25f,
        &chipdb,
        &iodb,
        &ids,
        CompileOptions {
            verify: true,
            ..CompileOptions::default()
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CompileError::OutsideGrid { from, .. } if from == Location::new(0, 1)
    ));
    assert_eq!(chipdb.max_row(), 2);
}

#[test]
fn layout_metadata_serializes() {
    let db = build(CompileOptions::default()).unwrap();
    let json = serde_json::to_value(db.blob.layout()).unwrap();
    assert_eq!(json["container"], "chipdb_blob_25k");
    assert_eq!(json["endianness"], "little");
    let records = json["records"].as_array().unwrap();
    assert_eq!(records.last().unwrap()["name"], "chip_info");
    assert_eq!(records.last().unwrap()["size"], 52);
}
