//! Tests for the domain model.

use super::*;

fn color(id: &str, first: u32, last: u32) -> Color {
    Color::from_range(id, first, last, 200).unwrap()
}

#[test]
fn test_color_from_range() {
    let c = color("T0", 10, 19);
    assert_eq!(c.first_layer(), 10);
    assert_eq!(c.last_layer(), 19);
    assert_eq!(c.usage_count(), 10);
    assert_eq!(c.name(), "T0");
    assert!(c.partial_layers().is_empty());
}

#[test]
fn test_color_rejects_reversed_range() {
    assert!(Color::from_range("T0", 20, 10, 100).is_err());
}

#[test]
fn test_color_rejects_empty_layers() {
    assert!(Color::from_layers("T0", Vec::new(), 100).is_err());
}

#[test]
fn test_color_from_sparse_layers() {
    let c = Color::from_layers("T1", [40, 3, 7, 8], 100).unwrap();
    assert_eq!(c.first_layer(), 3);
    assert_eq!(c.last_layer(), 40);
    assert_eq!(
        c.usage_ranges(),
        vec![
            LayerRange::single(3),
            LayerRange::new(7, 8),
            LayerRange::single(40)
        ]
    );
}

#[test]
fn test_partial_layers_are_subset_of_used() {
    let c = color("T0", 0, 9).with_partial_layers([2, 3, 50]);
    assert_eq!(c.partial_layers().iter().copied().collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn test_total_layers_covers_last_layer() {
    let c = Color::from_range("T0", 0, 99, 10).unwrap();
    assert_eq!(c.total_layers(), 100);
    assert_eq!(c.usage_percentage(), 100.0);
}

#[test]
fn test_overlap_is_symmetric_and_reflexive() {
    let a = color("A", 0, 50);
    let b = color("B", 50, 80);
    let c = color("C", 51, 80);

    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
    assert!(!a.overlaps(&c));
    assert!(!c.overlaps(&a));
    assert!(a.overlaps(&a));
}

#[test]
fn test_shares_layers_respects_gaps() {
    let a = Color::from_layers("A", [0, 1, 2, 10, 11], 20).unwrap();
    let b = Color::from_layers("B", [4, 5, 6], 20).unwrap();
    assert!(a.overlaps(&b));
    assert!(!a.shares_layers(&b));
}

#[test]
fn test_hex_parse_and_display() {
    let hex = HexColor::parse("#1a2B3c").unwrap();
    assert_eq!((hex.r(), hex.g(), hex.b()), (0x1a, 0x2b, 0x3c));
    assert_eq!(hex.to_string(), "#1A2B3C");
}

#[test]
fn test_hex_parse_errors() {
    assert_eq!(HexColor::parse(""), Err(ColorParseError::Empty));
    assert_eq!(HexColor::parse("112233"), Err(ColorParseError::MissingHash));
    assert_eq!(HexColor::parse("#123"), Err(ColorParseError::InvalidLength));
    assert_eq!(HexColor::parse("#12345G"), Err(ColorParseError::InvalidHex));
}

#[test]
fn test_hex_distance() {
    let black = HexColor::rgb(0, 0, 0);
    let white = HexColor::rgb(255, 255, 255);
    let near_black = HexColor::rgb(10, 10, 10);

    assert_eq!(black.distance(&black), 0.0);
    assert_eq!(black.distance(&white), white.distance(&black));
    assert!(black.distance(&near_black) < black.distance(&white));
}

#[test]
fn test_color_with_invalid_hex() {
    assert!(color("T0", 0, 1).with_hex_str("red").is_err());
    let c = color("T0", 0, 1).with_hex_str("#FF0000").unwrap();
    assert_eq!(c.hex(), Some(HexColor::rgb(255, 0, 0)));
}

#[test]
fn test_color_record_round_trip() {
    let json = r##"{
        "id": "T2",
        "name": "Orange",
        "hex": "#FF8800",
        "first_layer": 5,
        "last_layer": 9,
        "partial_layers": [6],
        "total_layers": 50
    }"##;

    let c: Color = serde_json::from_str(json).unwrap();
    assert_eq!(c.id(), &ColorId::from("T2"));
    assert_eq!(c.usage_count(), 5);
    assert!(c.partial_layers().contains(&6));

    let back: Color = serde_json::from_str(&serde_json::to_string(&c).unwrap()).unwrap();
    assert_eq!(back, c);
}

#[test]
fn test_color_record_rejects_bad_hex() {
    let json = r#"{"id": "T0", "hex": "blue", "first_layer": 0, "last_layer": 1}"#;
    assert!(serde_json::from_str::<Color>(json).is_err());
}

#[test]
fn test_merge_ranges_adjacent_and_overlapping() {
    let merged = merge_ranges(vec![
        LayerRange::new(20, 30),
        LayerRange::new(0, 10),
        LayerRange::new(11, 15),
        LayerRange::new(25, 40),
        LayerRange::new(42, 50),
    ]);
    assert_eq!(
        merged,
        vec![
            LayerRange::new(0, 15),
            LayerRange::new(20, 40),
            LayerRange::new(42, 50)
        ]
    );
}

#[test]
fn test_merge_ranges_is_idempotent() {
    let once = merge_ranges(vec![
        LayerRange::new(5, 9),
        LayerRange::new(0, 3),
        LayerRange::new(4, 4),
        LayerRange::new(12, 12),
    ]);
    let twice = merge_ranges(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn test_merge_ranges_empty() {
    assert!(merge_ranges(Vec::new()).is_empty());
}

#[test]
fn test_census_deduplicates_within_layer() {
    let mut census = LayerCensus::new();
    census.insert(3, ColorId::from("A"));
    census.insert(3, ColorId::from("B"));
    census.insert(3, ColorId::from("A"));

    assert_eq!(census.active(3), &[ColorId::from("A"), ColorId::from("B")]);
    assert!(census.active(4).is_empty());
    assert_eq!(census.max_active(), 2);
}

#[test]
fn test_census_from_colors() {
    let census = LayerCensus::from_colors(&[color("A", 0, 2), color("B", 2, 3)]);
    assert_eq!(census.len(), 4);
    assert_eq!(census.active(2).len(), 2);
}

#[test]
fn test_slot_validity() {
    let mut slot = Slot::new(SlotId::new(1, 1));
    slot.assign(color("A", 0, 10));
    slot.assign(color("B", 11, 20));
    assert!(slot.is_valid());

    slot.assign(color("C", 20, 30));
    assert!(!slot.is_valid());
    assert_eq!(slot.overlapping_pairs().count(), 1);
}

#[test]
fn test_slot_settle_and_clear() {
    let mut slot = Slot::new(SlotId::new(2, 3));
    slot.assign(color("A", 0, 10));
    slot.settle();
    assert!(slot.is_permanent());

    slot.assign(color("B", 20, 30));
    slot.settle();
    assert!(!slot.is_permanent());
    assert!(slot.is_shared());

    slot.clear();
    assert!(slot.is_empty());
    assert!(!slot.is_permanent());
    assert_eq!(slot.id().to_string(), "2-3");
}

#[test]
fn test_slot_id_ordering() {
    let mut ids = vec![SlotId::new(2, 1), SlotId::new(1, 4), SlotId::new(1, 2)];
    ids.sort();
    assert_eq!(ids, vec![SlotId::new(1, 2), SlotId::new(1, 4), SlotId::new(2, 1)]);
}

#[test]
fn test_snapshot_from_colors() {
    let snapshot = PrintSnapshot::from_colors(vec![color("A", 0, 9), color("B", 5, 19)])
        .with_estimate("A", FilamentEstimate::new(100.0, 3.0));

    assert_eq!(snapshot.total_layers, 200);
    assert_eq!(snapshot.census.active(7).len(), 2);
    assert_eq!(snapshot.usage_ranges[&ColorId::from("B")], vec![LayerRange::new(5, 19)]);
    assert!(snapshot.contains(&ColorId::from("A")));
    assert!(!snapshot.contains(&ColorId::from("Z")));
}

#[test]
fn test_filament_estimate_add() {
    let mut total = FilamentEstimate::new(10.0, 1.0);
    total += FilamentEstimate::new(5.0, 0.5);
    assert_eq!(total, FilamentEstimate::new(15.0, 1.5));
}
