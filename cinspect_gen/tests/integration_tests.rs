use cinspect_gen::cmds::{analyze::AnalysisReport, codegen, common};
use cinspect_gen::config::{CodegenOverrides, CodegenSettings, GeneratorConfig};
use cinspect_gen::{BackendKind, RedeclarationPolicy};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

const GEOMETRY: &str = r#"
unit: geometry.h
structs:
  - name: Point
    location: { file: geometry.h, line: 3, column: 16 }
    fields:
      - { name: x, type-name: int }
      - { name: y, type-name: int }
"#;

const DRAWING: &str = r#"
unit: drawing.h
structs:
  - name: Stroke
    attributes: [generate_cinspect]
    location: { file: drawing.h, line: 10, column: 16 }
    fields:
      - { name: from, type-name: Point }
      - { name: to, type-name: Point }
      - { name: width, type-name: float }
      - { name: next, type-name: Stroke, indirection: 1 }
"#;

#[test]
fn test_complete_codegen_pipeline() {
    // Test the complete pipeline: glob -> load -> resolve across units -> both backends -> files on disk
    let dir = TempDir::new().unwrap();
    write(dir.path(), "desc/geometry.yaml", GEOMETRY);
    write(dir.path(), "desc/nested/drawing.yaml", DRAWING);

    let pattern = format!("{}/desc/**/*.yaml", dir.path().display());
    let out_dir = dir.path().join("out");
    let settings = CodegenSettings {
        output_dir: Some(out_dir.clone()),
        ..Default::default()
    };

    codegen::run(vec![pattern], settings, true).unwrap();

    let mut written: Vec<String> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec![
            "imgui_Point.cpp",
            "imgui_Point.h",
            "imgui_Stroke.cpp",
            "imgui_Stroke.h",
            "print_Point.c",
            "print_Point.h",
            "print_Stroke.c",
            "print_Stroke.h",
        ]
    );

    let stroke = fs::read_to_string(out_dir.join("print_Stroke.c")).unwrap();
    assert!(stroke.starts_with(
        "// depends on \"print_Point.c\"\n// depends on \"print_Stroke.c\"\nvoid print_Stroke("
    ));
    assert_eq!(stroke.matches("print_Point(").count(), 2);
    assert!(stroke.contains("print_Stroke(&*data->next, rec_depth+1, max_depth);"));

    let editor = fs::read_to_string(out_dir.join("imgui_Stroke.cpp")).unwrap();
    assert!(editor.contains("ShowPointEditor(data.from);"));
    assert!(editor.contains("ImGui::Text(\"next: Array<Stroke>\");"));
}

#[test]
fn test_fatal_diagnostic_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "ok.yaml", GEOMETRY);
    write(
        dir.path(),
        "bad.yaml",
        "diagnostics:\n  - severity: error\n    message: unknown type name 'vec3'\nstructs: []\n",
    );

    let out_dir = dir.path().join("out");
    let settings = CodegenSettings {
        output_dir: Some(out_dir.clone()),
        ..Default::default()
    };
    let inputs = vec![format!("{}/*.yaml", dir.path().display())];
    let err = codegen::run(inputs, settings, false).unwrap_err();

    assert!(err.to_string().contains("Failed to parse file"));
    assert!(err.to_string().contains("bad.yaml"));
    assert!(!out_dir.exists());
}

#[test]
fn test_no_inputs_is_an_error() {
    let err = codegen::run(Vec::new(), CodegenSettings::default(), false).unwrap_err();
    assert_eq!(err.to_string(), "Please provide a filename or glob pattern");
}

#[test]
fn test_redeclaration_across_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.yaml", GEOMETRY);
    write(
        dir.path(),
        "b.yaml",
        "unit: other.h\nstructs:\n  - name: Point\n    attributes: [generate_cinspect]\n    fields:\n      - { name: x, type-name: double }\n",
    );
    let inputs = vec![format!("{}/*.yaml", dir.path().display())];

    let table = common::resolve_inputs(&inputs, RedeclarationPolicy::Warn, false).unwrap();
    let point = table.get("Point").unwrap();
    assert_eq!(point.unit, "other.h");
    assert!(point.is_marked());

    let err = common::resolve_inputs(&inputs, RedeclarationPolicy::Error, false).unwrap_err();
    assert!(format!("{:#}", err).contains("'Point'"));
}

#[test]
fn test_config_file_with_overrides() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "cinspect.yaml",
        "output-dir: from-config\nbackends: editor\nmax-depth-default: 3\n",
    );
    let file = GeneratorConfig::load(&dir.path().join("cinspect.yaml")).unwrap();

    let settings = CodegenSettings::resolve(
        CodegenOverrides {
            backends: Some(BackendKind::Printer),
            ..Default::default()
        },
        Some(file),
    )
    .unwrap();

    assert_eq!(settings.output_dir.as_deref(), Some(Path::new("from-config")));
    assert_eq!(settings.backends, BackendKind::Printer);
    assert_eq!(settings.printer.default_max_depth, 3);

    assert!(GeneratorConfig::load(&dir.path().join("missing.yaml")).is_err());
}

#[test]
fn test_analysis_of_loaded_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "geometry.yaml", GEOMETRY);
    write(dir.path(), "drawing.yaml", DRAWING);
    let inputs = vec![
        dir.path().join("geometry.yaml").display().to_string(),
        dir.path().join("drawing.yaml").display().to_string(),
    ];

    let table = common::resolve_inputs(&inputs, RedeclarationPolicy::Warn, false).unwrap();
    let report = AnalysisReport::build(&table);

    assert_eq!(report.generation_order, vec!["Point", "Stroke"]);
    assert_eq!(report.structs[1].dependencies, vec!["Point", "Stroke"]);
    assert_eq!(report.structs[1].location.to_string(), "drawing.h:10:16");
    assert_eq!(report.short_circuited.len(), 1);
}
