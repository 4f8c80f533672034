use image::{Rgba, RgbaImage};
use pdf_arrange::{
    ExportPlan, MergeMode, MoveDirection, PageSet, UnitSource, calculate_statistics, plan,
};

fn solid(width: u32, height: u32, value: u8) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
}

fn page_set(count: usize) -> PageSet {
    PageSet::new(
        (0..count)
            .map(|i| solid(100, 200, 10 + 10 * i as u8))
            .collect(),
    )
}

/// The unit ranges must partition 0..count with no gaps or overlaps.
fn assert_partition(export_plan: &ExportPlan, count: usize) {
    let mut expected_start = 0;
    for unit in &export_plan.units {
        assert_eq!(unit.slots.start, expected_start, "gap or overlap in plan");
        expected_start = unit.slots.end;
    }
    assert_eq!(expected_start, count);
}

#[test]
fn test_plan_for_pair_merge_scenario() {
    let mut pages = page_set(5);
    assert!(pages.apply_merge(1, MergeMode::Vertical));

    let export_plan = plan(&mut pages).unwrap();
    assert_eq!(export_plan.len(), 4);

    let labels: Vec<&str> = export_plan.units.iter().map(|u| u.label.as_str()).collect();
    assert_eq!(labels, vec!["page 1", "pages 2-3", "page 4", "page 5"]);

    assert_eq!(export_plan.units[0].source, UnitSource::Original(0));
    assert_eq!(
        export_plan.units[1].source,
        UnitSource::Composite(MergeMode::Vertical)
    );
    assert_eq!(export_plan.units[2].source, UnitSource::Original(3));
    assert_eq!(export_plan.units[3].source, UnitSource::Original(4));

    assert_partition(&export_plan, 5);
}

#[test]
fn test_plan_covers_all_slots_for_mixed_groups() {
    let mut pages = page_set(8);
    assert!(pages.apply_merge(0, MergeMode::Grid));
    assert!(pages.apply_merge(5, MergeMode::Horizontal));

    let export_plan = plan(&mut pages).unwrap();
    assert_eq!(export_plan.len(), 4);
    assert_partition(&export_plan, 8);

    let labels: Vec<&str> = export_plan.units.iter().map(|u| u.label.as_str()).collect();
    assert_eq!(labels, vec!["pages 1-4", "page 5", "pages 6-7", "page 8"]);
}

#[test]
fn test_plan_uses_composite_dimensions() {
    let mut pages = PageSet::new(vec![solid(100, 200, 10), solid(150, 100, 20)]);
    assert!(pages.apply_merge(0, MergeMode::Vertical));

    let export_plan = plan(&mut pages).unwrap();
    assert_eq!(export_plan.len(), 1);
    assert_eq!(export_plan.units[0].raster.dimensions(), (150, 300));
}

#[test]
fn test_truncated_group_degenerates_to_single_unit() {
    let mut pages = page_set(2);
    assert!(pages.apply_merge(0, MergeMode::Vertical));
    // pushing the lead to the end leaves its group without a partner
    assert!(pages.move_slot(0, MoveDirection::Forward));

    let export_plan = plan(&mut pages).unwrap();
    assert_eq!(export_plan.len(), 2);
    assert_eq!(export_plan.units[0].source, UnitSource::Original(1));
    assert_eq!(export_plan.units[1].source, UnitSource::Original(0));
    assert_eq!(export_plan.units[1].label, "page 2");
    assert_partition(&export_plan, 2);
}

#[test]
fn test_plan_recomputes_and_recaches_after_reorder() {
    let mut rasters: Vec<RgbaImage> = (0..4).map(|i| solid(100, 100, 10 + i)).collect();
    rasters.push(solid(160, 160, 99));
    let mut pages = PageSet::new(rasters);

    assert!(pages.apply_merge(0, MergeMode::Grid));
    assert_eq!(
        pages.slots()[0].merged_raster().unwrap().dimensions(),
        (200, 200)
    );

    // the 160x160 page moves into the group's bottom-right quadrant
    assert!(pages.move_slot(3, MoveDirection::Forward));
    assert!(pages.slots()[0].merged_raster().is_none());

    let export_plan = plan(&mut pages).unwrap();
    assert_eq!(export_plan.units[0].raster.dimensions(), (260, 260));
    // the recomputed composite is cached again
    assert!(pages.slots()[0].merged_raster().is_some());
}

#[test]
fn test_plan_of_empty_set_is_empty() {
    let mut pages = PageSet::default();
    let export_plan = plan(&mut pages).unwrap();
    assert!(export_plan.is_empty());
}

#[test]
fn test_statistics_match_plan() {
    let mut pages = page_set(5);
    assert!(pages.apply_merge(1, MergeMode::Vertical));

    let stats = calculate_statistics(&pages);
    assert_eq!(stats.source_pages, 5);
    assert_eq!(stats.export_units, 4);
    assert_eq!(stats.merged_groups, 1);
    assert_eq!(stats.passthrough_pages, 3);

    let export_plan = plan(&mut pages).unwrap();
    assert_eq!(stats.export_units, export_plan.len());
}

#[test]
fn test_statistics_count_truncated_group_as_passthrough() {
    let mut pages = page_set(2);
    assert!(pages.apply_merge(0, MergeMode::Vertical));
    assert!(pages.move_slot(0, MoveDirection::Forward));

    let stats = calculate_statistics(&pages);
    assert_eq!(stats.export_units, 2);
    assert_eq!(stats.merged_groups, 0);
    assert_eq!(stats.passthrough_pages, 2);
}
