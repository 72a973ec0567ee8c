//! End-to-end scenarios through the public entry points.

use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use swapforge_config::{Algorithm, AnnealingConfig, OptimizerConfig, Strategy};
use swapforge_core::{Color, ColorId, LayerCensus, SwapForgeError};
use swapforge_solver::{
    analyze_feasibility, optimize, optimize_with_config_file, optimize_with_flag,
    AnnealingOptimizer, ConstraintAnalyzer, MergeTransform, OptimizationResult, OverlapAnalyzer,
};
use swapforge_test::census::uniform_census;
use swapforge_test::colors::{color, colors_from_ranges, overlapping_colors, sequential_colors};
use swapforge_test::snapshot::three_color_snapshot;

fn random_colors(seed: u64, count: usize) -> Vec<Color> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let first = rng.random_range(0..150);
            let length = rng.random_range(0..40);
            color(&format!("T{i}"), first, first + length)
        })
        .collect()
}

fn assert_each_color_once(result: &OptimizationResult, colors: &[Color]) {
    let assigned: Vec<&ColorId> = result
        .slot_assignments
        .iter()
        .flat_map(|a| a.colors.iter())
        .collect();
    assert_eq!(assigned.len(), colors.len());
    let unique: BTreeSet<&ColorId> = assigned.into_iter().collect();
    assert_eq!(unique.len(), colors.len());
    for color in colors {
        assert!(unique.contains(color.id()));
    }
}

#[test]
fn seven_colors_with_interval_strategy() {
    let colors = colors_from_ranges(&[
        (0, 50),
        (10, 60),
        (51, 100),
        (61, 110),
        (101, 150),
        (111, 160),
        (151, 200),
    ]);
    let config = OptimizerConfig::multi_slot_unit(1, 4).with_strategy(Strategy::Intervals);
    let result = optimize(&colors, &config).unwrap();

    assert_eq!(result.total_colors, 7);
    assert_each_color_once(&result, &colors);
    assert!(result.is_valid);
}

#[test]
fn four_overlapping_colors_in_four_slots() {
    let colors = overlapping_colors(4, 0, 100);
    let result = optimize(&colors, &OptimizerConfig::multi_slot_unit(1, 4)).unwrap();

    assert!(result.manual_swaps.is_empty());
    assert_eq!(result.estimated_time_saved, 0);
    for assignment in &result.slot_assignments {
        assert!(assignment.is_permanent);
        assert_eq!(assignment.colors.len(), 1);
    }
}

#[test]
fn disjoint_colors_that_fit_need_no_swaps() {
    for count in 1..=8 {
        let colors = sequential_colors(count, 7);
        let config = OptimizerConfig::multi_slot_unit(2, 4);
        let result = optimize(&colors, &config).unwrap();

        assert!(result.manual_swaps.is_empty());
        let used: Vec<_> = result
            .slot_assignments
            .iter()
            .filter(|a| !a.colors.is_empty())
            .collect();
        assert_eq!(used.len(), count as usize);
        assert!(used.iter().all(|a| a.is_permanent && a.colors.len() == 1));
    }
}

#[test]
fn no_color_lost_across_strategies_and_optimizers() {
    for seed in 0..5 {
        let colors = random_colors(seed, 12);
        for strategy in [Strategy::Legacy, Strategy::Groups, Strategy::Intervals] {
            for algorithm in [Algorithm::Greedy, Algorithm::SimulatedAnnealing] {
                let config = OptimizerConfig::multi_slot_unit(1, 4)
                    .with_strategy(strategy)
                    .with_algorithm(algorithm)
                    .with_random_seed(seed)
                    .with_annealing(AnnealingConfig::default().with_iterations(300));
                let result = optimize(&colors, &config).unwrap();
                assert_each_color_once(&result, &colors);
            }
        }
    }
}

#[test]
fn analyzer_strategies_keep_every_color() {
    for seed in 10..15 {
        let colors = random_colors(seed, 9);
        for slots in 1..=4 {
            let groups = OverlapAnalyzer::optimize_slot_assignments(&colors, slots).unwrap();
            let intervals = OverlapAnalyzer::optimize_by_intervals(&colors, slots).unwrap();
            assert_eq!(groups.assigned_count(), colors.len());
            assert_eq!(intervals.assigned_count(), colors.len());
            assert_eq!(intervals.swap_details.len(), intervals.total_swaps);
        }
    }
}

#[test]
fn annealing_with_zero_iterations_is_complete() {
    let colors = random_colors(99, 10);
    let result = AnnealingOptimizer::new(3)
        .unwrap()
        .with_iterations(0)
        .with_seed(99)
        .optimize(&colors)
        .unwrap();

    assert_eq!(result.plan.assigned_count(), 10);
    assert!(result.plan.assignments.iter().all(|slot| !slot.is_empty()));
}

#[test]
fn constraint_analyzer_boundaries() {
    let analyzer = ConstraintAnalyzer::new(3).unwrap();

    let full = uniform_census(0, 49, &["A", "B", "C"]);
    assert!(!analyzer.analyze(&full, &[]).has_violations);

    let mut overfull: LayerCensus = full.clone();
    overfull.insert(20, ColorId::from("D"));
    let report = analyzer.analyze(&overfull, &[]);
    assert!(report.has_violations);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].start_layer, 20);
    assert_eq!(report.violations[0].end_layer, 20);
}

#[test]
fn feasibility_from_snapshot() {
    let snapshot = three_color_snapshot();
    // Two colors are active on every layer.
    let one_slot = OptimizerConfig::single_toolhead(1);
    let two_slots = OptimizerConfig::single_toolhead(2);

    let report = analyze_feasibility(&snapshot, &one_slot).unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].start_layer, 0);
    assert_eq!(report.violations[0].end_layer, 29);
    assert!(analyze_feasibility(&snapshot, &two_slots)
        .unwrap()
        .is_feasible());
}

#[test]
fn merge_suggestion_makes_print_feasible() {
    let snapshot = three_color_snapshot();
    let config = OptimizerConfig::single_toolhead(2);
    let mut census = snapshot.census.clone();
    census.insert(15, ColorId::from("A"));
    let snapshot = snapshot.with_census(census);

    let report = analyze_feasibility(&snapshot, &config).unwrap();
    assert_eq!(report.violations.len(), 1);

    let suggestion = report
        .suggestions
        .iter()
        .find(|s| s.secondary_color.as_str() == "B" || s.primary_color.as_str() == "B")
        .unwrap();
    let merged = MergeTransform::apply_suggestion(&snapshot, suggestion).unwrap();
    assert!(analyze_feasibility(&merged.snapshot, &config)
        .unwrap()
        .is_feasible());
}

#[test]
fn merge_round_trip() {
    let snapshot = three_color_snapshot();
    let a = snapshot.color(&ColorId::from("A")).unwrap().clone();
    let b = snapshot.color(&ColorId::from("B")).unwrap().clone();

    let result = MergeTransform::apply(&snapshot, a.id(), &[b.id().clone()]).unwrap();
    let merged = result.snapshot.color(a.id()).unwrap();

    let union: BTreeSet<u32> = a.layers_used().union(b.layers_used()).copied().collect();
    assert_eq!(merged.layers_used(), &union);
    assert_eq!(merged.first_layer(), a.first_layer().min(b.first_layer()));
    assert_eq!(merged.last_layer(), a.last_layer().max(b.last_layer()));
}

#[test]
fn terminate_flag_still_returns_full_result() {
    let colors = random_colors(5, 15);
    let config = OptimizerConfig::multi_slot_unit(1, 4)
        .with_algorithm(Algorithm::SimulatedAnnealing)
        .with_random_seed(5);
    let result =
        optimize_with_flag(&colors, &config, Some(Arc::new(AtomicBool::new(true)))).unwrap();

    assert_each_color_once(&result, &colors);
    assert!(result.annealing.unwrap().terminated_early);
}

#[test]
fn result_serializes_to_json() {
    let colors = sequential_colors(6, 10);
    let result = optimize(&colors, &OptimizerConfig::multi_slot_unit(1, 2)).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["total_colors"], 6);
    assert_eq!(json["configuration"]["strategy"], "intervals");
    assert_eq!(json["slot_assignments"][0]["slot_id"], "1-1");
    // Back-to-back colors all fit into the first slot.
    assert_eq!(json["slot_assignments"][0]["colors"].as_array().unwrap().len(), 6);
    assert_eq!(json["manual_swaps"].as_array().unwrap().len(), 5);
    assert_eq!(json["estimated_time_saved"], 600);
}

#[test]
fn invalid_layout_is_rejected() {
    let colors = sequential_colors(3, 10);
    assert!(optimize(&colors, &OptimizerConfig::multi_slot_unit(0, 4)).is_err());
    assert!(optimize(&colors, &OptimizerConfig::multi_slot_unit(1, 5)).is_err());
    assert!(ConstraintAnalyzer::from_config(&OptimizerConfig::multi_slot_unit(1, 0)).is_err());
}

fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("swapforge-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn malformed_config_file_is_a_configuration_error() {
    let colors = sequential_colors(3, 10);

    let toml = write_config("malformed.toml", "unit_count = \"two\"\nslots_per_unit = 99\n");
    let result = optimize_with_config_file(&colors, &toml);
    std::fs::remove_file(&toml).unwrap();
    assert!(matches!(result, Err(SwapForgeError::Configuration(_))));

    let yaml = write_config("malformed.yaml", "unit_count: [1\n");
    let result = optimize_with_config_file(&colors, &yaml);
    std::fs::remove_file(&yaml).unwrap();
    assert!(matches!(result, Err(SwapForgeError::Configuration(_))));
}

#[test]
fn config_file_is_applied_and_missing_file_uses_defaults() {
    let colors = sequential_colors(3, 10);

    let path = write_config("two-slots.toml", "unit_count = 1\nslots_per_unit = 2\n");
    let result = optimize_with_config_file(&colors, &path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(result.unwrap().total_slots, 2);

    let result = optimize_with_config_file(&colors, "does-not-exist.toml").unwrap();
    assert_eq!(result.total_slots, 4);
}
