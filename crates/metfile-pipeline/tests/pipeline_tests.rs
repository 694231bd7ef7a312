//! End-to-end runs over temporary GRAL projects.

use metfile_common::EvaluationPoint;
use metfile_pipeline::{
    CancelFlag, CoarseGridConfig, InMemoryFlowFields, InMemoryStability, MetfilePipeline,
    NoProgress, PipelineError, RunConfig, RunSummary, StabilityRaster, WindFieldSnapshot,
};
use test_utils::{
    encode_geometry, indexed_component, uniform_component, GeometryParams, ProjectFixture,
};

const EXTENT: (usize, usize, usize) = (10, 10, 20);

fn snapshot(u: f32, v: f32, class: i32) -> WindFieldSnapshot {
    let (nii, njj, nkk) = EXTENT;
    WindFieldSnapshot::new(
        EXTENT,
        uniform_component(nii, njj, nkk, u),
        uniform_component(nii, njj, nkk, v),
        uniform_component(nii, njj, nkk, 0.0),
        class,
    )
    .unwrap()
}

/// Two situations: southerly 2 m/s in class 3, westerly-component 1 m/s in
/// class 4.
fn flow_fields() -> InMemoryFlowFields {
    InMemoryFlowFields::new()
        .with(1, snapshot(0.0, 2.0, 3))
        .with(2, snapshot(1.0, 0.0, 4))
}

fn project() -> ProjectFixture {
    let project = ProjectFixture::new();
    project.write_situations(&[(180.0, 2.0, 3), (270.0, 1.0, 4)]);
    project.write_time_series(&[
        "01.06,00,2.01,180.02,3",
        "01.06,01,1.0,270.0,4",
        "01.01,02,2.0,180,3",
    ]);
    project.write_geometry(&encode_geometry(&GeometryParams::flat(0, 0), |_, _| 0.0));
    project
}

fn config(project: &ProjectFixture, points: Vec<EvaluationPoint>) -> RunConfig {
    RunConfig {
        project_dir: project.root().to_path_buf(),
        fine_cell_size: 10.0,
        flow_field_dir: None,
        coarse_grid: None,
        local_stability: false,
        output_dir: None,
        points,
    }
}

fn run(config: RunConfig, fields: &InMemoryFlowFields) -> Result<RunSummary, PipelineError> {
    MetfilePipeline::new(config).run(fields, None, &CancelFlag::new(), &NoProgress)
}

fn single_point(project: &ProjectFixture, x: f64, y: f64, z: f64) -> RunConfig {
    config(project, vec![EvaluationPoint::new("P.met", x, y, z)])
}

#[test]
fn test_full_run_writes_matched_series() {
    let project = project();
    let points = vec![EvaluationPoint::new("P1.met", 25.0, 35.0, 5.0)];

    let summary = run(config(&project, points), &flow_fields()).unwrap();

    assert_eq!(summary.points, 1);
    assert_eq!(summary.situations, 2);
    assert_eq!(summary.records, 3);
    assert!(!summary.truncated_series);
    assert_eq!(summary.files, vec![project.metfiles_dir().join("P1.met")]);

    assert_eq!(
        project.read_metfile("P1.met"),
        vec![
            "//P1.met",
            "//X=25",
            "//Y=35",
            "//Z=5",
            "01.06.1901,00:00,2,180,3",
            "01.06.1901,01:00,1,270,4",
            "01.01.1902,02:00,2,180,3",
        ]
    );
}

#[test]
fn test_point_outside_fields_gets_zero_wind() {
    let project = project();
    let points = vec![EvaluationPoint::new("Far.met", 250.0, 35.0, 5.0)];

    run(config(&project, points), &flow_fields()).unwrap();

    let lines = project.read_metfile("Far.met");
    assert_eq!(lines[4], "01.06.1901,00:00,0,0,3");
    assert_eq!(lines[5], "01.06.1901,01:00,0,0,4");
}

#[test]
fn test_samples_at_point_cell() {
    let project = project();
    let (nii, njj, nkk) = EXTENT;
    let fields = InMemoryFlowFields::new().with(
        1,
        WindFieldSnapshot::new(
            EXTENT,
            indexed_component(nii, njj, nkk),
            uniform_component(nii, njj, nkk, 0.0),
            uniform_component(nii, njj, nkk, 0.0),
            3,
        )
        .unwrap(),
    );
    // cell (3, 4); 2 m layers put z = 5 in layer 3
    let points = vec![EvaluationPoint::new("P.met", 25.0, 35.0, 5.0)];

    run(config(&project, points), &fields).unwrap();

    let lines = project.read_metfile("P.met");
    assert_eq!(lines[4], "01.06.1901,00:00,343,270,3");
}

#[test]
fn test_missing_flow_field_keeps_defaults() {
    let project = project();
    let fields = InMemoryFlowFields::new().with(1, snapshot(0.0, 2.0, 3));
    let points = vec![EvaluationPoint::new("P.met", 25.0, 35.0, 5.0)];

    run(config(&project, points), &fields).unwrap();

    let lines = project.read_metfile("P.met");
    assert_eq!(lines[4], "01.06.1901,00:00,2,180,3");
    assert_eq!(lines[5], "01.06.1901,01:00,0,0,0");
}

#[test]
fn test_local_stability_override() {
    let project = project();
    let mut config = single_point(&project, 25.0, 35.0, 5.0);
    config.coarse_grid = Some(CoarseGridConfig {
        west: 0.0,
        south: 0.0,
        cell_size: 100.0,
        windfield_dir: None,
    });
    config.local_stability = true;
    let rasters = InMemoryStability::new().with(1, StabilityRaster::new(1, 1, vec![6]).unwrap());

    MetfilePipeline::new(config)
        .run(&flow_fields(), Some(&rasters), &CancelFlag::new(), &NoProgress)
        .unwrap();

    let lines = project.read_metfile("P.met");
    assert_eq!(lines[4], "01.06.1901,00:00,2,180,6");
    // no raster for situation 2
    assert_eq!(lines[5], "01.06.1901,01:00,1,270,4");
}

#[test]
fn test_stability_source_ignored_without_flag() {
    let project = project();
    let rasters = InMemoryStability::new().with(1, StabilityRaster::new(1, 1, vec![6]).unwrap());

    MetfilePipeline::new(single_point(&project, 25.0, 35.0, 5.0))
        .run(&flow_fields(), Some(&rasters), &CancelFlag::new(), &NoProgress)
        .unwrap();

    assert_eq!(project.read_metfile("P.met")[4], "01.06.1901,00:00,2,180,3");
}

#[test]
fn test_cancelled_run_writes_nothing() {
    let project = project();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let err = MetfilePipeline::new(single_point(&project, 25.0, 35.0, 5.0))
        .run(&flow_fields(), None, &cancel, &NoProgress)
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(std::fs::read_dir(project.metfiles_dir()).unwrap().count(), 0);
}

#[test]
fn test_missing_geometry_is_reported() {
    let project = ProjectFixture::new();
    project.write_situations(&[(180.0, 2.0, 3)]);
    project.write_time_series(&["01.06,00,2.0,180,3"]);

    let err = run(single_point(&project, 1.0, 1.0, 1.0), &flow_fields()).unwrap_err();

    assert!(matches!(err, PipelineError::NoGeometry(_)));
    assert!(err.to_string().starts_with("No geometry available"));
}

#[test]
fn test_truncated_geometry_is_reported() {
    let project = project();
    let bytes = encode_geometry(&GeometryParams::flat(0, 0), |_, _| 0.0);
    project.write_geometry(&bytes[..bytes.len() - 4]);

    let err = run(single_point(&project, 1.0, 1.0, 1.0), &flow_fields()).unwrap_err();
    assert!(matches!(err, PipelineError::NoGeometry(_)));
}

#[test]
fn test_empty_situation_table() {
    let project = project();
    project.write_situations(&[]);

    let err = run(single_point(&project, 1.0, 1.0, 1.0), &flow_fields()).unwrap_err();
    assert!(matches!(err, PipelineError::EmptySituationTable));
}

#[test]
fn test_missing_situation_table() {
    let project = ProjectFixture::new();

    let err = run(single_point(&project, 1.0, 1.0, 1.0), &flow_fields()).unwrap_err();
    assert!(matches!(err, PipelineError::Input(_)));
}

#[test]
fn test_missing_time_series_writes_headers_only() {
    let project = ProjectFixture::new();
    project.write_situations(&[(180.0, 2.0, 3)]);
    project.write_geometry(&encode_geometry(&GeometryParams::flat(0, 0), |_, _| 0.0));

    let summary = run(single_point(&project, 25.0, 35.0, 5.0), &flow_fields()).unwrap();

    assert_eq!(summary.records, 0);
    assert_eq!(project.read_metfile("P.met").len(), 4);
}

#[test]
fn test_malformed_record_truncates_series() {
    let project = project();
    project.write_time_series(&[
        "01.06,00,2.0,180,3",
        "01.06,01,broken,180,3",
        "01.06,02,2.0,180,3",
    ]);

    let summary = run(single_point(&project, 25.0, 35.0, 5.0), &flow_fields()).unwrap();

    assert!(summary.truncated_series);
    assert_eq!(summary.records, 1);
    assert_eq!(project.read_metfile("P.met").len(), 5);
}

#[test]
fn test_existing_meteo_file_is_replaced() {
    let project = project();
    std::fs::write(project.metfiles_dir().join("P.met"), "stale\n").unwrap();

    run(single_point(&project, 25.0, 35.0, 5.0), &flow_fields()).unwrap();

    let lines = project.read_metfile("P.met");
    assert_eq!(lines[0], "//P.met");
    assert_eq!(lines.len(), 7);
}

#[test]
fn test_many_points_written_in_order() {
    let project = project();
    let points: Vec<EvaluationPoint> = (0..8)
        .map(|n| {
            EvaluationPoint::new(format!("P{}.met", n), 15.0 + n as f64 * 10.0, 35.0, 5.0)
        })
        .collect();

    let summary = run(config(&project, points), &flow_fields()).unwrap();

    let names: Vec<String> = summary
        .files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, (0..8).map(|n| format!("P{}.met", n)).collect::<Vec<_>>());
    for name in &names {
        assert_eq!(project.read_metfile(name).len(), 7);
    }
}

#[test]
fn test_point_far_outside_domain_degrades_to_zero_wind() {
    let project = project();
    let mut config = config(
        &project,
        vec![
            EvaluationPoint::new("East.met", 3.0e12, 35.0, 5.0),
            EvaluationPoint::new("West.met", -3.0e12, 35.0, 5.0),
        ],
    );
    config.coarse_grid = Some(CoarseGridConfig {
        west: 0.0,
        south: 0.0,
        cell_size: 1.0,
        windfield_dir: None,
    });
    config.local_stability = true;
    let rasters = InMemoryStability::new().with(1, StabilityRaster::new(1, 1, vec![6]).unwrap());

    MetfilePipeline::new(config)
        .run(&flow_fields(), Some(&rasters), &CancelFlag::new(), &NoProgress)
        .unwrap();

    for name in ["East.met", "West.met"] {
        let lines = project.read_metfile(name);
        assert_eq!(lines[4], "01.06.1901,00:00,0,0,3");
        assert_eq!(lines[5], "01.06.1901,01:00,0,0,4");
    }
}
