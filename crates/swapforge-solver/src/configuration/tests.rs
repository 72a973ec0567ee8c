//! Tests for slot configuration and manual swaps.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use swapforge_config::{Algorithm, OptimizerConfig, Strategy};
use swapforge_test::colors::{color, colors_from_ranges, overlapping_colors, sequential_colors};

use super::*;

fn seven_colors() -> Vec<Color> {
    colors_from_ranges(&[
        (0, 50),
        (10, 60),
        (51, 100),
        (61, 110),
        (101, 150),
        (111, 160),
        (151, 200),
    ])
}

fn configuration(units: u32, slots: u32, strategy: Strategy) -> SlotConfiguration {
    SlotConfiguration::new(&OptimizerConfig::multi_slot_unit(units, slots).with_strategy(strategy))
        .unwrap()
}

#[test]
fn test_slots_created_in_unit_order() {
    let configuration = configuration(2, 2, Strategy::Intervals);
    let ids: Vec<String> = configuration
        .slots()
        .iter()
        .map(|s| s.id().to_string())
        .collect();
    assert_eq!(ids, vec!["1-1", "1-2", "2-1", "2-2"]);
    assert!(configuration.slots().iter().all(Slot::is_empty));
}

#[test]
fn test_invalid_layout_is_configuration_error() {
    let result = SlotConfiguration::new(&OptimizerConfig::multi_slot_unit(0, 4));
    assert!(matches!(result, Err(SwapForgeError::Configuration(_))));

    let result = SlotConfiguration::new(&OptimizerConfig::multi_slot_unit(17, 4));
    assert!(result.is_err());
}

#[test]
fn test_disjoint_colors_get_permanent_slots() {
    let colors = sequential_colors(3, 10);
    let mut configuration = configuration(1, 4, Strategy::Intervals);
    configuration.assign_colors(&colors).unwrap();

    assert!(configuration.manual_swaps().is_empty());
    for (slot, color) in configuration.slots().iter().zip(&colors) {
        assert!(slot.is_permanent());
        assert_eq!(slot.colors(), std::slice::from_ref(color));
    }
    assert!(!configuration.slots()[3].is_permanent());
}

#[test]
fn test_fully_overlapping_colors_fill_every_slot() {
    let colors = overlapping_colors(4, 0, 100);
    for strategy in [Strategy::Legacy, Strategy::Groups, Strategy::Intervals] {
        let mut configuration = configuration(1, 4, strategy);
        configuration.assign_colors(&colors).unwrap();

        assert!(configuration.slots().iter().all(Slot::is_permanent));
        assert!(configuration.manual_swaps().is_empty());
        assert!(configuration.is_valid());
    }
}

#[test]
fn test_duplicate_ids_rejected() {
    let colors = vec![color("A", 0, 10), color("A", 20, 30)];
    let mut configuration = configuration(1, 4, Strategy::Intervals);
    assert!(matches!(
        configuration.assign_colors(&colors),
        Err(SwapForgeError::InvalidColor(_))
    ));
}

#[test]
fn test_intervals_strategy_swaps() {
    let colors = seven_colors();
    let mut configuration = configuration(1, 4, Strategy::Intervals);
    configuration.assign_colors(&colors).unwrap();

    let assigned: usize = configuration.slots().iter().map(Slot::len).sum();
    assert_eq!(assigned, 7);
    assert!(configuration.is_valid());
    assert!(configuration.slots()[0].is_shared());
    assert!(!configuration.slots()[0].is_permanent());
    assert!(configuration.slots()[2].is_empty());

    let swaps = configuration.manual_swaps();
    let layers: Vec<u32> = swaps.iter().map(|s| s.at_layer).collect();
    assert_eq!(layers, vec![51, 61, 101, 111, 151]);
    assert!(swaps.iter().all(|s| s.confidence == SwapConfidence::Low));
    assert_eq!(swaps[0].from_color.as_str(), "T0");
    assert_eq!(swaps[0].to_color.as_str(), "T2");
    assert_eq!(swaps[0].slot, SlotId::new(1, 1));
    assert_eq!(swaps[1].slot, SlotId::new(1, 2));
}

#[test]
fn test_legacy_strategy_shares_last_slot() {
    let colors = vec![
        color("A", 0, 99),
        color("B", 0, 79),
        color("C", 0, 9),
        color("D", 20, 29),
        color("E", 5, 30),
    ];
    let mut configuration = configuration(1, 3, Strategy::Legacy);
    configuration.assign_colors(&colors).unwrap();

    let slots = configuration.slots();
    assert_eq!(slots[0].colors()[0].id().as_str(), "A");
    assert_eq!(slots[1].colors()[0].id().as_str(), "B");
    assert!(slots[0].is_permanent() && slots[1].is_permanent());

    // Largest non-overlapping group {C, D} first, then E forced in.
    let shared: Vec<&str> = slots[2].colors().iter().map(|c| c.id().as_str()).collect();
    assert_eq!(shared, vec!["C", "D", "E"]);
    assert_eq!(configuration.forced_placements(), 1);

    assert!(!configuration.is_valid());
    let violations = configuration.invariant_violations();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].first.as_str(), "C");
    assert_eq!(violations[0].second.as_str(), "E");
    assert_eq!(violations[0].shared_layers, LayerRange::new(5, 9));
    assert_eq!(violations[1].shared_layers, LayerRange::new(20, 29));

    let swaps = configuration.manual_swaps();
    let layers: Vec<u32> = swaps.iter().map(|s| s.at_layer).collect();
    assert_eq!(layers, vec![5, 20]);
}

#[test]
fn test_groups_strategy() {
    let colors = colors_from_ranges(&[(0, 9), (5, 14), (10, 19), (15, 24), (20, 29), (0, 29)]);
    let mut configuration = configuration(1, 2, Strategy::Groups);
    configuration.assign_colors(&colors).unwrap();

    let assigned: usize = configuration.slots().iter().map(Slot::len).sum();
    assert_eq!(assigned, 6);
    assert_eq!(configuration.slots()[0].len(), 4);
    assert_eq!(configuration.forced_placements(), 1);
    assert!(!configuration.is_valid());
}

#[test]
fn test_reassignment_clears_slots() {
    let mut configuration = configuration(1, 2, Strategy::Intervals);
    configuration.assign_colors(&seven_colors()).unwrap();
    configuration
        .assign_colors(&sequential_colors(1, 10))
        .unwrap();

    let assigned: usize = configuration.slots().iter().map(Slot::len).sum();
    assert_eq!(assigned, 1);
    assert!(configuration.slots()[0].is_permanent());
    assert!(!configuration.slots()[1].is_permanent());
}

#[test]
fn test_annealing_algorithm() {
    let config = OptimizerConfig::multi_slot_unit(1, 3)
        .with_strategy(Strategy::Intervals)
        .with_algorithm(Algorithm::SimulatedAnnealing)
        .with_random_seed(17)
        .with_annealing(swapforge_config::AnnealingConfig::default().with_iterations(200));
    let mut configuration = SlotConfiguration::new(&config).unwrap();
    configuration.assign_colors(&seven_colors()).unwrap();

    let assigned: usize = configuration.slots().iter().map(Slot::len).sum();
    assert_eq!(assigned, 7);
    let stats = configuration.annealing_statistics().unwrap();
    assert_eq!(stats.iterations, 200);
    assert_eq!(stats.seed, Some(17));
}

#[test]
fn test_legacy_ignores_annealing() {
    let config = OptimizerConfig::multi_slot_unit(1, 3)
        .with_strategy(Strategy::Legacy)
        .with_algorithm(Algorithm::SimulatedAnnealing);
    let mut configuration = SlotConfiguration::new(&config).unwrap();
    configuration.assign_colors(&seven_colors()).unwrap();
    assert!(configuration.annealing_statistics().is_none());
}

#[test]
fn test_terminate_flag_reaches_annealing() {
    let config = OptimizerConfig::multi_slot_unit(1, 2)
        .with_algorithm(Algorithm::SimulatedAnnealing)
        .with_random_seed(1);
    let mut configuration = SlotConfiguration::new(&config)
        .unwrap()
        .with_terminate_flag(Arc::new(AtomicBool::new(true)));
    configuration.assign_colors(&seven_colors()).unwrap();

    let stats = configuration.annealing_statistics().unwrap();
    assert!(stats.terminated_early);
    let assigned: usize = configuration.slots().iter().map(Slot::len).sum();
    assert_eq!(assigned, 7);
}

#[test]
fn test_swap_in_wide_gap() {
    let a = color("A", 0, 50);
    let b = color("B", 100, 150);
    let swap = ManualSwap::between(SlotId::new(1, 1), &a, &b);

    assert_eq!(swap.at_layer, 75);
    assert_eq!(swap.pause_window, LayerRange::new(51, 100));
    assert_eq!(
        swap.timing,
        TimingOptions {
            earliest: 65,
            latest: 85,
            optimal: 75
        }
    );
    assert_eq!(swap.confidence, SwapConfidence::High);
    assert_eq!(swap.confidence.score(), 0.9);
}

#[test]
fn test_swap_in_narrow_gap() {
    let a = color("A", 0, 50);
    let b = color("B", 56, 80);
    let swap = ManualSwap::between(SlotId::new(1, 1), &a, &b);

    assert_eq!(swap.at_layer, 53);
    assert_eq!(swap.pause_window, LayerRange::new(51, 56));
    assert_eq!(swap.timing.earliest, 43);
    assert_eq!(swap.timing.latest, 63);
    assert_eq!(swap.confidence, SwapConfidence::Medium);
}

#[test]
fn test_swap_at_boundary() {
    let a = color("A", 0, 50);
    let b = color("B", 51, 80);
    let swap = ManualSwap::between(SlotId::new(1, 1), &a, &b);

    assert_eq!(swap.at_layer, 51);
    assert_eq!(swap.pause_window, LayerRange::single(51));
    assert_eq!(swap.timing.earliest, 41);
    assert_eq!(swap.timing.latest, 61);
    assert_eq!(swap.confidence, SwapConfidence::Low);
}

#[test]
fn test_swap_timing_clamped_to_color_ranges() {
    let a = color("A", 45, 50);
    let b = color("B", 51, 55);
    let swap = ManualSwap::between(SlotId::new(1, 1), &a, &b);

    assert_eq!(swap.at_layer, 51);
    assert_eq!(
        swap.timing,
        TimingOptions {
            earliest: 45,
            latest: 55,
            optimal: 51
        }
    );
}

#[test]
fn test_result_summary() {
    let colors = seven_colors();
    let mut configuration = configuration(1, 4, Strategy::Intervals);
    configuration.assign_colors(&colors).unwrap();
    let result = configuration.result();

    assert_eq!(result.total_colors, 7);
    assert_eq!(result.required_slots, 7);
    assert_eq!(result.total_slots, 4);
    assert_eq!(result.peak_concurrent_colors, 2);
    assert_eq!(result.swap_count(), 5);
    assert_eq!(result.estimated_time_saved, 600);
    assert!(result.is_valid);
    assert!(result.annealing.is_none());
    assert_eq!(result.configuration.strategy, Strategy::Intervals);

    let colors_in_result: usize = result.slot_assignments.iter().map(|a| a.colors.len()).sum();
    assert_eq!(colors_in_result, 7);
    assert_eq!(result.slot_assignments[0].slot_id, "1-1");
    assert_eq!(result.slot_of(&ColorId::from("T6")).unwrap().slot, 1);

    // T0 [0,50] can share with every color starting after layer 50.
    assert!(result.can_share_slots.contains(&SharingPair {
        first: ColorId::from("T0"),
        second: ColorId::from("T2"),
    }));
    assert!(!result.can_share_slots.contains(&SharingPair {
        first: ColorId::from("T0"),
        second: ColorId::from("T1"),
    }));
}
